use serde::Deserialize;

/// Layout arrangement for the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
	#[default]
	Grid,
	Topic,
	Map,
}

impl LayoutMode {
	pub fn label(self) -> &'static str {
		match self {
			LayoutMode::Grid => "grid",
			LayoutMode::Topic => "topic",
			LayoutMode::Map => "map",
		}
	}
}

/// Integer row/column hint used by grid layout.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct GridPos {
	pub x: u32,
	pub y: u32,
}

/// Fractional 0..1 coordinate hint used by map layout.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct MapPos {
	pub x: f64,
	pub y: f64,
}

/// Manual anchor adjustment in stage pixels.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Offset {
	pub x: f64,
	pub y: f64,
}

/// Directed edge stored on the source museum.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
	pub target_id: String,
	pub label: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub external_links: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MuseumDetail {
	pub description: String,
	#[serde(default)]
	pub images: Vec<String>,
	#[serde(default)]
	pub url: String,
}

/// One entity rendered as a locker tile.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Museum {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub region: String,
	#[serde(default)]
	pub city: String,
	#[serde(default)]
	pub topic: Option<String>,
	#[serde(default)]
	pub position_grid: Option<GridPos>,
	#[serde(default)]
	pub position_map: Option<MapPos>,
	#[serde(default)]
	pub relations: Vec<Relation>,
	#[serde(default)]
	pub detail: MuseumDetail,
}

/// Per-layout anchor adjustments for a hub, each optional.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct LayoutOffsets {
	#[serde(default)]
	pub grid: Option<Offset>,
	#[serde(default)]
	pub topic: Option<Offset>,
	#[serde(default)]
	pub map: Option<Offset>,
}

impl LayoutOffsets {
	pub fn for_mode(&self, mode: LayoutMode) -> Option<Offset> {
		match mode {
			LayoutMode::Grid => self.grid,
			LayoutMode::Topic => self.topic,
			LayoutMode::Map => self.map,
		}
	}
}

/// Many-to-many grouping drawn around a shared anchor point.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationHub {
	pub id: String,
	pub label: String,
	pub members: Vec<String>,
	#[serde(default)]
	pub offset: Option<Offset>,
	#[serde(default)]
	pub layout_offsets: Option<LayoutOffsets>,
	#[serde(default)]
	pub info: Option<String>,
}

impl RelationHub {
	/// Manual anchor adjustment: per-layout override, else the global
	/// offset, else zero.
	pub fn anchor_offset(&self, mode: LayoutMode) -> Offset {
		self.layout_offsets
			.as_ref()
			.and_then(|lo| lo.for_mode(mode))
			.or(self.offset)
			.unwrap_or_default()
	}
}

/// Pixel bounding box of the render surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
	pub width: f64,
	pub height: f64,
}

/// Events the wall emits toward the embedding page.
#[derive(Clone, Debug, PartialEq)]
pub enum WallEvent {
	EntityActivated(String),
	EntityExpanded(String),
	EntityDragged(String, super::geometry::Point),
	RelationSelected {
		source: String,
		target: String,
		label: String,
	},
	HubInfoSelected(String),
	LayoutModeChanged(LayoutMode),
}
