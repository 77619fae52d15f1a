//! 2D primitives shared by the layout engine and relation routers.

use std::fmt::Write as _;
use std::ops::{Add, Mul, Sub};

/// Tile width in stage pixels.
pub const TILE_W: f64 = 140.0;
/// Tile height in stage pixels.
pub const TILE_H: f64 = 180.0;

/// A point in stage pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

	pub fn new(x: f64, y: f64) -> Self {
		Point { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}

	/// Angle toward `other` in degrees, in (-180, 180]. Y grows downward,
	/// so 90 points at the bottom of the stage.
	pub fn angle_to(self, other: Point) -> f64 {
		(other.y - self.y).atan2(other.x - self.x).to_degrees()
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;
	fn mul(self, k: f64) -> Point {
		Point::new(self.x * k, self.y * k)
	}
}

/// A 2-point segment, typically one full edge of a tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	pub a: Point,
	pub b: Point,
}

impl Segment {
	pub fn new(a: Point, b: Point) -> Self {
		Segment { a, b }
	}

	pub fn midpoint(self) -> Point {
		self.a.midpoint(self.b)
	}

	pub fn length(self) -> f64 {
		self.a.distance(self.b)
	}
}

/// One of the four tile sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	Left,
	Right,
	Top,
	Bottom,
}

impl Side {
	pub const ALL: [Side; 4] = [Side::Right, Side::Bottom, Side::Left, Side::Top];

	/// Canonical facing direction in degrees (screen coordinates, y down).
	pub fn canonical_angle(self) -> f64 {
		match self {
			Side::Right => 0.0,
			Side::Bottom => 90.0,
			Side::Left => 180.0,
			Side::Top => -90.0,
		}
	}

	/// The two angularly adjacent sides, going around the box.
	pub fn neighbors(self) -> [Side; 2] {
		match self {
			Side::Right => [Side::Top, Side::Bottom],
			Side::Bottom => [Side::Right, Side::Left],
			Side::Left => [Side::Bottom, Side::Top],
			Side::Top => [Side::Left, Side::Right],
		}
	}

	pub fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
			Side::Top => Side::Bottom,
			Side::Bottom => Side::Top,
		}
	}
}

/// Absolute difference between two angles in degrees, folded to [0, 180].
pub fn angle_delta(a: f64, b: f64) -> f64 {
	let mut d = (a - b) % 360.0;
	if d < -180.0 {
		d += 360.0;
	} else if d > 180.0 {
		d -= 360.0;
	}
	d.abs()
}

/// Axis-aligned rectangle, the footprint of one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl Rect {
	pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
		Rect { x, y, w, h }
	}

	/// Tile footprint at a computed position (top-left corner).
	pub fn tile(pos: Point) -> Self {
		Rect::new(pos.x, pos.y, TILE_W, TILE_H)
	}

	pub fn left(self) -> f64 {
		self.x
	}

	pub fn right(self) -> f64 {
		self.x + self.w
	}

	pub fn top(self) -> f64 {
		self.y
	}

	pub fn bottom(self) -> f64 {
		self.y + self.h
	}

	pub fn center(self) -> Point {
		Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	pub fn contains(self, p: Point) -> bool {
		p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
	}

	/// Full-span edge segment for one side. Endpoints run left-to-right
	/// for horizontal sides and top-to-bottom for vertical ones.
	pub fn edge(self, side: Side) -> Segment {
		match side {
			Side::Left => Segment::new(
				Point::new(self.left(), self.top()),
				Point::new(self.left(), self.bottom()),
			),
			Side::Right => Segment::new(
				Point::new(self.right(), self.top()),
				Point::new(self.right(), self.bottom()),
			),
			Side::Top => Segment::new(
				Point::new(self.left(), self.top()),
				Point::new(self.right(), self.top()),
			),
			Side::Bottom => Segment::new(
				Point::new(self.left(), self.bottom()),
				Point::new(self.right(), self.bottom()),
			),
		}
	}

	/// Midpoint of the edge nearest to `p`.
	pub fn nearest_edge_midpoint(self, p: Point) -> Point {
		Side::ALL
			.iter()
			.map(|&s| self.edge(s).midpoint())
			.min_by(|a, b| {
				a.distance(p)
					.partial_cmp(&b.distance(p))
					.unwrap_or(std::cmp::Ordering::Equal)
			})
			.unwrap_or_else(|| self.center())
	}
}

fn push_coords(out: &mut String, p: Point) {
	let _ = write!(out, "{:.2} {:.2}", p.x, p.y);
}

/// `M a L b` straight path.
pub fn line_path(a: Point, b: Point) -> String {
	let mut d = String::from("M ");
	push_coords(&mut d, a);
	d.push_str(" L ");
	push_coords(&mut d, b);
	d
}

/// `M a C c1 c2 b` cubic path.
pub fn cubic_path(a: Point, c1: Point, c2: Point, b: Point) -> String {
	let mut d = String::from("M ");
	push_coords(&mut d, a);
	d.push_str(" C ");
	push_coords(&mut d, c1);
	d.push_str(", ");
	push_coords(&mut d, c2);
	d.push_str(", ");
	push_coords(&mut d, b);
	d
}

/// Closed `M .. L .. Z` polygon path.
pub fn polygon_path(points: &[Point]) -> String {
	let mut d = String::new();
	for (i, p) in points.iter().enumerate() {
		d.push_str(if i == 0 { "M " } else { " L " });
		push_coords(&mut d, *p);
	}
	d.push_str(" Z");
	d
}

/// Ray-cast containment test for a simple polygon.
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
	let mut inside = false;
	let n = poly.len();
	let mut j = n.wrapping_sub(1);
	for i in 0..n {
		let (pi, pj) = (poly[i], poly[j]);
		if (pi.y > p.y) != (pj.y > p.y) {
			let x_cross = pj.x + (p.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
			if p.x < x_cross {
				inside = !inside;
			}
		}
		j = i;
	}
	inside
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edge_segments_span_full_sides() {
		let r = Rect::new(10.0, 20.0, 140.0, 180.0);
		let left = r.edge(Side::Left);
		assert_eq!(left.a, Point::new(10.0, 20.0));
		assert_eq!(left.b, Point::new(10.0, 200.0));
		assert_eq!(left.length(), 180.0);
		let bottom = r.edge(Side::Bottom);
		assert_eq!(bottom.a, Point::new(10.0, 200.0));
		assert_eq!(bottom.b, Point::new(150.0, 200.0));
		assert_eq!(bottom.midpoint(), Point::new(80.0, 200.0));
	}

	#[test]
	fn angle_delta_folds_across_the_wraparound() {
		assert_eq!(angle_delta(170.0, -170.0), 20.0);
		assert_eq!(angle_delta(-90.0, 90.0), 180.0);
		assert_eq!(angle_delta(45.0, 45.0), 0.0);
		assert_eq!(angle_delta(10.0, 350.0), 20.0);
	}

	#[test]
	fn angle_to_uses_screen_coordinates() {
		let o = Point::ZERO;
		assert_eq!(o.angle_to(Point::new(1.0, 0.0)), 0.0);
		assert_eq!(o.angle_to(Point::new(0.0, 1.0)), 90.0);
		assert_eq!(o.angle_to(Point::new(-1.0, 0.0)), 180.0);
		assert_eq!(o.angle_to(Point::new(0.0, -1.0)), -90.0);
	}

	#[test]
	fn nearest_edge_midpoint_picks_the_facing_side() {
		let r = Rect::tile(Point::ZERO);
		let far_right = Point::new(500.0, 90.0);
		assert_eq!(r.nearest_edge_midpoint(far_right), r.edge(Side::Right).midpoint());
		let far_up = Point::new(70.0, -300.0);
		assert_eq!(r.nearest_edge_midpoint(far_up), r.edge(Side::Top).midpoint());
	}

	#[test]
	fn polygon_containment() {
		let quad = [
			Point::new(0.0, 0.0),
			Point::new(10.0, 0.0),
			Point::new(10.0, 10.0),
			Point::new(0.0, 10.0),
		];
		assert!(point_in_polygon(Point::new(5.0, 5.0), &quad));
		assert!(!point_in_polygon(Point::new(15.0, 5.0), &quad));
		assert!(!point_in_polygon(Point::new(-1.0, -1.0), &quad));
	}

	#[test]
	fn path_strings() {
		assert_eq!(
			line_path(Point::ZERO, Point::new(1.0, 2.5)),
			"M 0.00 0.00 L 1.00 2.50"
		);
		let d = polygon_path(&[Point::ZERO, Point::new(1.0, 0.0), Point::new(1.0, 1.0)]);
		assert_eq!(d, "M 0.00 0.00 L 1.00 0.00 L 1.00 1.00 Z");
	}
}
