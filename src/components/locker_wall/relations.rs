//! Pairwise relation routing: edge selection, ribbon construction,
//! label paths and reveal.

use std::collections::{HashMap, HashSet};

use super::geometry::{self, Point, Rect, Segment, Side};
use super::reveal;
use super::types::{LayoutMode, Museum};

/// Label used when neither side of a pair carries one.
pub const FALLBACK_LABEL: &str = "related";

/// A fully routed pairwise connector, ready for projection.
#[derive(Clone, Debug)]
pub struct RoutedRelation {
	pub source: String,
	pub target: String,
	/// Resolved label, forward declaration preferred.
	pub label: String,
	pub source_side: Side,
	pub target_side: Side,
	/// Quadrilateral joining the two matched edge segments.
	pub ribbon: [Point; 4],
	pub ribbon_path: String,
	/// Midpoint-to-midpoint axis of the ribbon, oriented left-to-right.
	pub label_path: Segment,
	pub label_path_d: String,
	pub revealed: String,
	pub length: f64,
}

/// Pick the facing sides for two tiles. Grid mode prefers axis-aligned
/// facing judged by true edge-to-edge separation; everything else is
/// angle-dominant on center deltas.
pub fn facing_sides(a: Rect, b: Rect, mode: LayoutMode) -> (Side, Side) {
	if mode == LayoutMode::Grid {
		// positive when the tiles are truly apart along that axis
		let gap_x = (b.left() - a.right()).max(a.left() - b.right());
		let gap_y = (b.top() - a.bottom()).max(a.top() - b.bottom());
		if gap_x > 0.0 || gap_y > 0.0 {
			if gap_x >= gap_y {
				return if b.center().x >= a.center().x {
					(Side::Right, Side::Left)
				} else {
					(Side::Left, Side::Right)
				};
			}
			return if b.center().y >= a.center().y {
				(Side::Bottom, Side::Top)
			} else {
				(Side::Top, Side::Bottom)
			};
		}
	}
	angle_dominant_sides(a.center(), b.center())
}

fn angle_dominant_sides(from: Point, to: Point) -> (Side, Side) {
	let d = to - from;
	if d.x.abs() >= d.y.abs() {
		if d.x >= 0.0 {
			(Side::Right, Side::Left)
		} else {
			(Side::Left, Side::Right)
		}
	} else if d.y >= 0.0 {
		(Side::Bottom, Side::Top)
	} else {
		(Side::Top, Side::Bottom)
	}
}

/// Join two edge segments into a ribbon quad, picking the endpoint
/// pairing (direct vs swapped) that minimizes total connecting length so
/// the quad never self-crosses.
pub fn ribbon_between(source: Segment, target: Segment) -> [Point; 4] {
	let direct = source.a.distance(target.a) + source.b.distance(target.b);
	let swapped = source.a.distance(target.b) + source.b.distance(target.a);
	if direct <= swapped {
		[source.a, source.b, target.b, target.a]
	} else {
		[source.a, source.b, target.a, target.b]
	}
}

/// Route one relation between two tile footprints.
pub fn route_relation(
	source_id: &str,
	target_id: &str,
	source_rect: Rect,
	target_rect: Rect,
	mode: LayoutMode,
	label: &str,
) -> RoutedRelation {
	let (source_side, target_side) = facing_sides(source_rect, target_rect, mode);
	let source_edge = source_rect.edge(source_side);
	let target_edge = target_rect.edge(target_side);
	let ribbon = ribbon_between(source_edge, target_edge);

	let (mut start, mut end) = (source_edge.midpoint(), target_edge.midpoint());
	// keep label text upright: swap when the path points leftward
	if end.x < start.x {
		std::mem::swap(&mut start, &mut end);
	}
	let label_path = Segment::new(start, end);
	let length = label_path.length();

	RoutedRelation {
		source: source_id.to_owned(),
		target: target_id.to_owned(),
		label: label.to_owned(),
		source_side,
		target_side,
		ribbon_path: geometry::polygon_path(&ribbon),
		ribbon,
		label_path_d: geometry::line_path(start, end),
		label_path,
		revealed: reveal::revealed_prefix(label, length),
		length,
	}
}

/// Resolve the label for a pair: the declaring side's label wins, the
/// reverse declaration is the fallback, then a generic string.
fn resolve_label(source: &Museum, target: &Museum, forward: &str) -> String {
	if !forward.is_empty() {
		return forward.to_owned();
	}
	target
		.relations
		.iter()
		.find(|r| r.target_id == source.id && !r.label.is_empty())
		.map(|r| r.label.clone())
		.unwrap_or_else(|| FALLBACK_LABEL.to_owned())
}

/// Route every declared relation once per unordered pair. Dangling
/// targets and members without positions are skipped.
pub fn route_all(
	museums: &[Museum],
	positions: &HashMap<String, Point>,
	mode: LayoutMode,
) -> Vec<RoutedRelation> {
	let by_id: HashMap<&str, &Museum> = museums.iter().map(|m| (m.id.as_str(), m)).collect();
	let mut seen: HashSet<(String, String)> = HashSet::new();
	let mut routed = Vec::new();

	for museum in museums {
		let Some(&source_pos) = positions.get(&museum.id) else {
			continue;
		};
		for rel in &museum.relations {
			let Some(target) = by_id.get(rel.target_id.as_str()) else {
				log::debug!("skipping dangling relation {} -> {}", museum.id, rel.target_id);
				continue;
			};
			let Some(&target_pos) = positions.get(&target.id) else {
				continue;
			};
			let key = if museum.id <= target.id {
				(museum.id.clone(), target.id.clone())
			} else {
				(target.id.clone(), museum.id.clone())
			};
			if !seen.insert(key) {
				continue;
			}
			let label = resolve_label(museum, target, &rel.label);
			routed.push(route_relation(
				&museum.id,
				&target.id,
				Rect::tile(source_pos),
				Rect::tile(target_pos),
				mode,
				&label,
			));
		}
	}
	routed
}

/// Ribbon hit-test for relation selection, topmost (last drawn) first.
pub fn relation_at(p: Point, routed: &[RoutedRelation]) -> Option<&RoutedRelation> {
	routed
		.iter()
		.rev()
		.find(|r| geometry::point_in_polygon(p, &r.ribbon))
}
