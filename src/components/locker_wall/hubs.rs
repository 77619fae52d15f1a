//! Hub routing: a shared anchor point for many-to-many groupings, with
//! angular side assignment and per-member ribbons.

use std::collections::HashMap;

use super::geometry::{self, Point, Rect, Segment, Side, angle_delta};
use super::relations::ribbon_between;
use super::reveal;
use super::types::{LayoutMode, Museum, RelationHub};

/// Half-extent of the square anchor box drawn at the hub centroid.
pub const ANCHOR_HALF: f64 = 14.0;

/// Largest deviation tolerated when rebalancing a member onto an
/// adjacent side.
const REASSIGN_LIMIT: f64 = 80.0;

/// One member's connector to the hub anchor.
#[derive(Clone, Debug)]
pub struct HubRibbon {
	pub member_id: String,
	/// Anchor side this member attaches to.
	pub side: Side,
	pub ribbon: [Point; 4],
	pub ribbon_path: String,
	pub label_path: Segment,
	pub label: String,
	pub revealed: String,
	pub length: f64,
}

/// A routed hub: anchor position plus one ribbon per resolvable member.
#[derive(Clone, Debug)]
pub struct RoutedHub {
	pub hub_id: String,
	pub label: String,
	pub anchor: Point,
	pub anchor_rect: Rect,
	/// Only hubs carrying `info` are click targets.
	pub clickable: bool,
	pub ribbons: Vec<HubRibbon>,
}

fn sector_side(angle: f64) -> Side {
	if !(-135.0..135.0).contains(&angle) {
		Side::Left
	} else if angle < -45.0 {
		Side::Top
	} else if angle < 45.0 {
		Side::Right
	} else {
		Side::Bottom
	}
}

/// Assign each member (given its true angle from the anchor) to one of
/// the four anchor sides. Quadrant sectors first; an overcrowded side
/// then tries to push its angularly first or last member onto an empty
/// adjacent side, but only while that side's canonical direction stays
/// within [`REASSIGN_LIMIT`] of the member's angle. Guarantees no
/// assignment ever deviates more than 90 degrees.
pub fn assign_sides(angles: &[f64]) -> Vec<Side> {
	let mut order: Vec<usize> = (0..angles.len()).collect();
	order.sort_by(|&a, &b| {
		angles[a]
			.partial_cmp(&angles[b])
			.unwrap_or(std::cmp::Ordering::Equal)
	});

	let mut occupancy: HashMap<Side, Vec<usize>> = HashMap::new();
	for &i in &order {
		occupancy.entry(sector_side(angles[i])).or_default().push(i);
	}

	for side in Side::ALL {
		loop {
			let members = occupancy.get(&side).cloned().unwrap_or_default();
			if members.len() <= 1 {
				break;
			}
			let mut moved = false;
			for &candidate in [members[0], members[members.len() - 1]].iter() {
				let angle = angles[candidate];
				let mut neighbors = side.neighbors();
				neighbors.sort_by(|a, b| {
					angle_delta(angle, a.canonical_angle())
						.partial_cmp(&angle_delta(angle, b.canonical_angle()))
						.unwrap_or(std::cmp::Ordering::Equal)
				});
				for adj in neighbors {
					let free = occupancy.get(&adj).is_none_or(|v| v.is_empty());
					if free && angle_delta(angle, adj.canonical_angle()) <= REASSIGN_LIMIT {
						occupancy.entry(side).or_default().retain(|&i| i != candidate);
						occupancy.entry(adj).or_default().push(candidate);
						moved = true;
						break;
					}
				}
				if moved {
					break;
				}
			}
			if !moved {
				break;
			}
		}
	}

	let mut out = vec![Side::Right; angles.len()];
	for (side, members) in occupancy {
		for i in members {
			out[i] = side;
		}
	}
	out
}

/// Route one hub against the current position map. Members without a
/// resolvable position are skipped; a hub with none returns `None`.
/// `runtime_offset` is the persisted anchor-drag adjustment for the
/// current layout mode.
pub fn route_hub(
	hub: &RelationHub,
	museums: &[Museum],
	positions: &HashMap<String, Point>,
	mode: LayoutMode,
	runtime_offset: Point,
) -> Option<RoutedHub> {
	let names: HashMap<&str, &str> = museums
		.iter()
		.map(|m| (m.id.as_str(), m.name.as_str()))
		.collect();

	let tiles: Vec<(&str, Rect)> = hub
		.members
		.iter()
		.filter_map(|id| positions.get(id).map(|&p| (id.as_str(), Rect::tile(p))))
		.collect();
	if tiles.is_empty() {
		return None;
	}

	let mut centroid = Point::ZERO;
	for (_, rect) in &tiles {
		centroid = centroid + rect.center();
	}
	centroid = centroid * (1.0 / tiles.len() as f64);
	let manual = hub.anchor_offset(mode);
	let anchor = Point::new(
		centroid.x + manual.x + runtime_offset.x,
		centroid.y + manual.y + runtime_offset.y,
	);
	let anchor_rect = Rect::new(
		anchor.x - ANCHOR_HALF,
		anchor.y - ANCHOR_HALF,
		ANCHOR_HALF * 2.0,
		ANCHOR_HALF * 2.0,
	);

	let angles: Vec<f64> = tiles
		.iter()
		.map(|(_, rect)| anchor.angle_to(rect.nearest_edge_midpoint(anchor)))
		.collect();
	let sides = assign_sides(&angles);

	let ribbons = tiles
		.iter()
		.zip(sides)
		.map(|(&(id, rect), side)| {
			let anchor_edge = anchor_rect.edge(side);
			let member_edge = rect.edge(facing_anchor(rect, anchor));
			let ribbon = ribbon_between(anchor_edge, member_edge);

			let (mut start, mut end) = (anchor_edge.midpoint(), member_edge.midpoint());
			if end.x < start.x {
				std::mem::swap(&mut start, &mut end);
			}
			let label_path = Segment::new(start, end);
			let length = label_path.length();
			let label = format!("{} · {}", hub.label, names.get(id).copied().unwrap_or(id));

			HubRibbon {
				member_id: id.to_owned(),
				side,
				ribbon_path: geometry::polygon_path(&ribbon),
				ribbon,
				label_path,
				revealed: reveal::revealed_prefix(&label, length),
				label,
				length,
			}
		})
		.collect();

	Some(RoutedHub {
		hub_id: hub.id.clone(),
		label: hub.label.clone(),
		anchor,
		anchor_rect,
		clickable: hub.info.is_some(),
		ribbons,
	})
}

/// Which member-tile edge faces the anchor (angle-dominant).
fn facing_anchor(rect: Rect, anchor: Point) -> Side {
	let d = anchor - rect.center();
	if d.x.abs() >= d.y.abs() {
		if d.x >= 0.0 { Side::Right } else { Side::Left }
	} else if d.y >= 0.0 {
		Side::Bottom
	} else {
		Side::Top
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::locker_wall::geometry::{TILE_H, TILE_W};
	use crate::components::locker_wall::types::{LayoutOffsets, Offset};

	fn hub(members: &[&str]) -> RelationHub {
		RelationHub {
			id: "h".into(),
			label: "golden age".into(),
			members: members.iter().map(|&m| m.to_owned()).collect(),
			offset: None,
			layout_offsets: None,
			info: None,
		}
	}

	fn museum(id: &str) -> Museum {
		Museum {
			id: id.into(),
			name: id.to_uppercase(),
			region: String::new(),
			city: String::new(),
			topic: None,
			position_grid: None,
			position_map: None,
			relations: Vec::new(),
			detail: Default::default(),
		}
	}

	#[test]
	fn spread_members_get_distinct_sides() {
		let sides = assign_sides(&[10.0, 100.0, 190.0 - 360.0]);
		assert_eq!(sides[0], Side::Right);
		assert_eq!(sides[1], Side::Bottom);
		assert_eq!(sides[2], Side::Left);
	}

	#[test]
	fn crowded_side_offloads_to_an_empty_neighbor() {
		let sides = assign_sides(&[0.0, 20.0]);
		assert_eq!(sides[0], Side::Right);
		assert_eq!(sides[1], Side::Bottom);
	}

	#[test]
	fn rebalancing_refuses_visually_wrong_sides() {
		// both members point hard right; neither neighbor is within 80
		// degrees, so the side stays crowded rather than lying.
		let sides = assign_sides(&[-4.0, 4.0]);
		assert_eq!(sides, vec![Side::Right, Side::Right]);
	}

	#[test]
	fn no_assignment_deviates_more_than_ninety_degrees() {
		let fans: &[&[f64]] = &[
			&[0.0, 20.0, 40.0, 60.0],
			&[-170.0, 170.0, 175.0],
			&[-30.0, -20.0, -10.0, 10.0, 20.0],
			&[89.0, 91.0, 93.0],
		];
		for angles in fans {
			for (angle, side) in angles.iter().zip(assign_sides(angles)) {
				assert!(
					angle_delta(*angle, side.canonical_angle()) <= 90.0,
					"{angle} assigned to {side:?}"
				);
			}
		}
	}

	#[test]
	fn anchor_is_centroid_plus_offsets() {
		let museums = vec![museum("a"), museum("b")];
		let mut positions = HashMap::new();
		positions.insert("a".to_owned(), Point::new(0.0, 0.0));
		positions.insert("b".to_owned(), Point::new(400.0, 200.0));
		let mut h = hub(&["a", "b"]);
		h.offset = Some(Offset { x: 10.0, y: -10.0 });

		let routed =
			route_hub(&h, &museums, &positions, LayoutMode::Grid, Point::new(5.0, 5.0)).unwrap();
		let centroid = Point::new((0.0 + 400.0) / 2.0 + TILE_W / 2.0, (0.0 + 200.0) / 2.0 + TILE_H / 2.0);
		assert_eq!(routed.anchor, Point::new(centroid.x + 15.0, centroid.y - 5.0));
	}

	#[test]
	fn layout_offset_overrides_the_global_offset() {
		let museums = vec![museum("a")];
		let mut positions = HashMap::new();
		positions.insert("a".to_owned(), Point::new(100.0, 100.0));
		let mut h = hub(&["a"]);
		h.offset = Some(Offset { x: 50.0, y: 0.0 });
		h.layout_offsets = Some(LayoutOffsets {
			grid: Some(Offset { x: -50.0, y: 0.0 }),
			topic: None,
			map: None,
		});

		let grid = route_hub(&h, &museums, &positions, LayoutMode::Grid, Point::ZERO).unwrap();
		let map = route_hub(&h, &museums, &positions, LayoutMode::Map, Point::ZERO).unwrap();
		// grid uses its own override, map falls back to the global offset
		assert_eq!(map.anchor.x - grid.anchor.x, 100.0);
	}

	#[test]
	fn unresolvable_members_are_skipped_and_empty_hubs_vanish() {
		let museums = vec![museum("a")];
		let mut positions = HashMap::new();
		positions.insert("a".to_owned(), Point::new(0.0, 0.0));

		let partial = hub(&["a", "missing"]);
		let routed =
			route_hub(&partial, &museums, &positions, LayoutMode::Grid, Point::ZERO).unwrap();
		assert_eq!(routed.ribbons.len(), 1);
		assert_eq!(routed.ribbons[0].member_id, "a");

		let empty = hub(&["missing"]);
		assert!(route_hub(&empty, &museums, &positions, LayoutMode::Grid, Point::ZERO).is_none());
	}

	#[test]
	fn member_ribbons_carry_composite_reveal_truncated_labels() {
		let museums = vec![museum("rijks")];
		let mut positions = HashMap::new();
		// member far to the right so the ribbon is long
		positions.insert("rijks".to_owned(), Point::new(600.0, 0.0));
		let mut h = hub(&["rijks"]);
		h.info = Some("shared storage".into());

		let routed = route_hub(&h, &museums, &positions, LayoutMode::Grid, Point::ZERO).unwrap();
		assert!(routed.clickable);
		let ribbon = &routed.ribbons[0];
		assert_eq!(ribbon.label, "golden age · RIJKS");
		assert!(ribbon.label.starts_with(&ribbon.revealed));
	}
}
