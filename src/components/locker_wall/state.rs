//! Interaction state for the locker wall.
//!
//! One `WallState` owns every piece of mutable UI state: computed and
//! override positions, active/expanded/highlight ids, drag, pan/zoom
//! and the routed connector caches. All transitions are pure methods;
//! DOM wiring lives in `component.rs`. Timer-driven transitions
//! (hover dwell, transient highlight) are guarded by generation tokens
//! so a stale callback can never apply an outdated intent.

use std::collections::HashMap;

use super::geometry::{Point, Rect};
use super::hubs::{self, RoutedHub};
use super::layout;
use super::relations::{self, RoutedRelation};
use super::types::{LayoutMode, Museum, RelationHub, Stage, WallEvent};

/// Hover duration promoting an active tile to expanded.
pub const DWELL_MS: i32 = 1500;
/// Lifetime of the deep-link highlight flash.
pub const HIGHLIGHT_MS: i32 = 2600;
/// Quiet period after the last resize event before layout recomputes.
pub const RESIZE_DEBOUNCE_MS: i32 = 150;

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 2.6;

/// Pointer travel below this is a click, not a drag.
const CLICK_SLOP: f64 = 4.0;

/// Generation token carried by scheduled timers. A fire whose token no
/// longer matches the owning intent is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token(u64);

/// Pan/zoom view transform, `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		ViewTransform {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug)]
enum DragTarget {
	Tile(String),
	HubAnchor(String),
}

#[derive(Clone, Debug, Default)]
struct DragState {
	target: Option<DragTarget>,
	/// World-space pointer position at press time.
	start: Point,
	/// Dragged thing's value at press time (tile position or hub offset).
	origin: Point,
	/// Whether this gesture ever applied an override. Once true the
	/// release resolves as a drag even if the pointer returned to the
	/// press point.
	applied: bool,
}

#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start: Point,
	origin: (f64, f64),
}

pub struct WallState {
	museums: Vec<Museum>,
	hubs: Vec<RelationHub>,
	pub mode: LayoutMode,
	stage: Stage,
	/// Layout-engine output for the current mode and stage.
	computed: HashMap<String, Point>,
	/// Sparse drag overrides layered on top, cleared on mode change.
	overrides: HashMap<String, Point>,
	/// Effective positions (computed + overrides), what everything reads.
	positions: HashMap<String, Point>,
	/// Persisted hub-anchor drags, keyed per hub per layout mode.
	hub_offsets: HashMap<(String, LayoutMode), Point>,

	pub active: Option<String>,
	pub expanded: Option<String>,
	pub highlight: Option<String>,
	pub transform: ViewTransform,
	hover: Option<String>,
	hover_token: Token,
	highlight_token: Token,
	resize_token: Token,
	/// Stage measured by the latest resize request, applied on fire.
	pending_stage: Option<Stage>,
	drag: DragState,
	pan: PanState,
	/// Screen position at pointer press, for click-vs-drag resolution.
	press: Option<Point>,
	generation: u64,

	pub routed_relations: Vec<RoutedRelation>,
	pub routed_hubs: Vec<RoutedHub>,
	events: Vec<WallEvent>,
}

impl WallState {
	pub fn new(museums: Vec<Museum>, hubs: Vec<RelationHub>, stage: Stage) -> Self {
		let mut state = WallState {
			museums,
			hubs,
			mode: LayoutMode::Grid,
			stage: layout::clamp_stage(stage),
			computed: HashMap::new(),
			overrides: HashMap::new(),
			positions: HashMap::new(),
			hub_offsets: HashMap::new(),
			active: None,
			expanded: None,
			highlight: None,
			transform: ViewTransform::default(),
			hover: None,
			hover_token: Token(0),
			highlight_token: Token(0),
			resize_token: Token(0),
			pending_stage: None,
			drag: DragState::default(),
			pan: PanState::default(),
			press: None,
			generation: 0,
			routed_relations: Vec::new(),
			routed_hubs: Vec::new(),
			events: Vec::new(),
		};
		state.recompute();
		state
	}

	pub fn museums(&self) -> &[Museum] {
		&self.museums
	}

	pub fn stage(&self) -> Stage {
		self.stage
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hover.as_deref()
	}

	/// Effective tile position: drag override, else computed layout.
	pub fn position_of(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}

	pub fn positions(&self) -> &HashMap<String, Point> {
		&self.positions
	}

	/// Drain events accumulated since the last call.
	pub fn take_events(&mut self) -> Vec<WallEvent> {
		std::mem::take(&mut self.events)
	}

	fn next_token(&mut self) -> Token {
		self.generation += 1;
		Token(self.generation)
	}

	/// Invalidate every outstanding timer token.
	fn cancel_timers(&mut self) {
		self.generation += 1;
		self.hover_token = Token(0);
		self.highlight_token = Token(0);
	}

	fn recompute(&mut self) {
		self.computed = layout::compute_positions(&self.museums, self.mode, self.stage);
		self.apply_overrides();
	}

	fn apply_overrides(&mut self) {
		self.positions = self.computed.clone();
		for (id, &p) in &self.overrides {
			self.positions.insert(id.clone(), p);
		}
		self.reroute();
	}

	fn reroute(&mut self) {
		self.routed_relations = relations::route_all(&self.museums, &self.positions, self.mode);
		self.routed_hubs = self
			.hubs
			.iter()
			.filter_map(|hub| {
				let offset = self
					.hub_offsets
					.get(&(hub.id.clone(), self.mode))
					.copied()
					.unwrap_or(Point::ZERO);
				hubs::route_hub(hub, &self.museums, &self.positions, self.mode, offset)
			})
			.collect();
	}

	/// Switch layout mode: discard drag overrides, reset pan/zoom,
	/// cancel pending timers and recompute everything.
	pub fn set_mode(&mut self, mode: LayoutMode) {
		if mode == self.mode {
			return;
		}
		log::info!("layout mode -> {}", mode.label());
		self.mode = mode;
		self.overrides.clear();
		self.transform = ViewTransform::default();
		self.cancel_timers();
		self.hover = None;
		self.expanded = None;
		self.recompute();
		self.events.push(WallEvent::LayoutModeChanged(mode));
	}

	/// Stage resize: recompute layout, overrides survive.
	pub fn resize(&mut self, stage: Stage) {
		self.stage = layout::clamp_stage(stage);
		self.recompute();
	}

	/// Record a resize and return the token the caller should schedule a
	/// [`Self::resize_fire`] for. A burst of resize events keeps
	/// superseding the token, so only the last request applies.
	pub fn resize_requested(&mut self, stage: Stage) -> Token {
		self.pending_stage = Some(stage);
		let token = self.next_token();
		self.resize_token = token;
		token
	}

	/// Debounced resize timer fired. Returns whether the pending stage
	/// was applied; stale tokens are discarded.
	pub fn resize_fire(&mut self, token: Token) -> bool {
		if token != self.resize_token {
			return false;
		}
		self.resize_token = Token(0);
		match self.pending_stage.take() {
			Some(stage) => {
				self.resize(stage);
				true
			}
			None => false,
		}
	}

	pub fn screen_to_world(&self, p: Point) -> Point {
		Point::new(
			(p.x - self.transform.x) / self.transform.k,
			(p.y - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost tile whose footprint contains the world point.
	pub fn tile_at(&self, world: Point) -> Option<&str> {
		self.museums
			.iter()
			.rev()
			.find(|m| {
				self.positions
					.get(&m.id)
					.is_some_and(|&pos| Rect::tile(pos).contains(world))
			})
			.map(|m| m.id.as_str())
	}

	fn hub_at(&self, world: Point) -> Option<&RoutedHub> {
		self.routed_hubs
			.iter()
			.find(|h| h.anchor_rect.contains(world))
	}

	/// Explicitly activate a tile (door open, summary visible).
	pub fn activate(&mut self, id: &str) {
		if self.active.as_deref() == Some(id) {
			return;
		}
		self.active = Some(id.to_owned());
		// a tile losing active status also loses expansion
		self.expanded = None;
		self.events.push(WallEvent::EntityActivated(id.to_owned()));
	}

	pub fn close_active(&mut self) {
		self.active = None;
		self.expanded = None;
		self.cancel_timers();
	}

	/// Pointer press. Resolves, in order: tile drag, hub-anchor drag,
	/// background pan (map mode only). Starting any press cancels a
	/// pending hover dwell.
	pub fn pointer_down(&mut self, screen: Point) {
		let world = self.screen_to_world(screen);
		self.press = Some(screen);
		self.hover_token = Token(0);

		if let Some(id) = self.tile_at(world).map(str::to_owned) {
			let origin = self.position_of(&id).unwrap_or(Point::ZERO);
			self.drag = DragState {
				target: Some(DragTarget::Tile(id)),
				start: world,
				origin,
				applied: false,
			};
		} else if let Some(hub_id) = self.hub_at(world).map(|h| h.hub_id.clone()) {
			let origin = self
				.hub_offsets
				.get(&(hub_id.clone(), self.mode))
				.copied()
				.unwrap_or(Point::ZERO);
			self.drag = DragState {
				target: Some(DragTarget::HubAnchor(hub_id)),
				start: world,
				origin,
				applied: false,
			};
		} else if self.mode == LayoutMode::Map {
			self.pan = PanState {
				active: true,
				start: screen,
				origin: (self.transform.x, self.transform.y),
			};
		}
	}

	/// Pointer move. Returns a dwell token when a hover timer should be
	/// scheduled by the caller.
	pub fn pointer_move(&mut self, screen: Point) -> Option<Token> {
		let world = self.screen_to_world(screen);

		if let Some(target) = self.drag.target.clone() {
			// once the slop is broken the drag stays live, so the thing
			// keeps tracking the pointer even back near the press point
			if self.drag.applied || self.press_moved(screen) {
				self.drag.applied = true;
				let delta = world - self.drag.start;
				match target {
					DragTarget::Tile(id) => {
						self.overrides.insert(id, self.drag.origin + delta);
						self.apply_overrides();
					}
					DragTarget::HubAnchor(id) => {
						self.hub_offsets
							.insert((id, self.mode), self.drag.origin + delta);
						self.reroute();
					}
				}
			}
			return None;
		}

		if self.pan.active {
			self.transform.x = self.pan.origin.0 + (screen.x - self.pan.start.x);
			self.transform.y = self.pan.origin.1 + (screen.y - self.pan.start.y);
			return None;
		}

		self.update_hover(self.tile_at(world).map(str::to_owned))
	}

	/// Hover bookkeeping. Only hovering the active tile arms a dwell
	/// timer; its token must be passed back via [`Self::dwell_fire`].
	pub fn update_hover(&mut self, id: Option<String>) -> Option<Token> {
		if self.hover == id {
			return None;
		}
		self.hover = id;
		self.hover_token = Token(0);
		if self.hover.is_some() && self.hover == self.active {
			let token = self.next_token();
			self.hover_token = token;
			return Some(token);
		}
		None
	}

	/// Dwell timer fired. Stale tokens (cancelled hover, drag started,
	/// mode changed) are discarded.
	pub fn dwell_fire(&mut self, token: Token) {
		if token != self.hover_token || self.hover.is_none() || self.hover != self.active {
			return;
		}
		self.expand(self.active.clone().unwrap_or_default());
	}

	fn expand(&mut self, id: String) {
		if self.expanded.as_deref() == Some(&id) {
			return;
		}
		self.events.push(WallEvent::EntityExpanded(id.clone()));
		self.expanded = Some(id);
	}

	fn press_moved(&self, screen: Point) -> bool {
		self.press
			.is_some_and(|press| press.distance(screen) > CLICK_SLOP)
	}

	/// Pointer release: ends drags and pans, resolves clicks. A drag
	/// gesture is one that ever applied an override, not one that ends
	/// far from the press point. A release without a matching press
	/// (mouseleave, double fire) only resets.
	pub fn pointer_up(&mut self, screen: Point) {
		if self.press.is_none() {
			self.drag = DragState::default();
			self.pan.active = false;
			return;
		}
		let world = self.screen_to_world(screen);
		let moved = self.press_moved(screen);
		let target = self.drag.target.take();
		let dragged = self.drag.applied;
		self.drag.applied = false;
		let was_pan = self.pan.active;
		self.pan.active = false;
		self.press = None;

		match target {
			Some(DragTarget::Tile(id)) => {
				if dragged {
					// released drag: override persisted, tile closes and
					// never auto-reopens
					if let Some(pos) = self.position_of(&id) {
						self.events.push(WallEvent::EntityDragged(id.clone(), pos));
					}
					if self.active.as_deref() == Some(&id) {
						self.active = None;
					}
					if self.expanded.as_deref() == Some(&id) {
						self.expanded = None;
					}
				} else if self.active.as_deref() == Some(&id) {
					// click-through on the active tile
					self.expand(id);
				} else {
					self.activate(&id);
				}
			}
			Some(DragTarget::HubAnchor(id)) => {
				let clickable = self
					.routed_hubs
					.iter()
					.any(|h| h.hub_id == id && h.clickable);
				if !dragged && clickable {
					self.events.push(WallEvent::HubInfoSelected(id));
				}
			}
			None => {
				if !moved && !was_pan {
					if let Some(rel) = relations::relation_at(world, &self.routed_relations) {
						self.events.push(WallEvent::RelationSelected {
							source: rel.source.clone(),
							target: rel.target.clone(),
							label: rel.label.clone(),
						});
					} else {
						// explicit close: clicking empty wall space
						self.close_active();
					}
				}
			}
		}
	}

	/// Wheel zoom, map mode only, anchored at the cursor so the point
	/// under it stays fixed.
	pub fn wheel(&mut self, screen: Point, delta_y: f64) {
		if self.mode != LayoutMode::Map {
			return;
		}
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = screen.x - (screen.x - self.transform.x) * ratio;
		self.transform.y = screen.y - (screen.y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Resolve a URL fragment to an entity activation. Returns the
	/// highlight token the caller should schedule a clear for; unknown
	/// fragments are a no-op.
	pub fn resolve_deep_link(&mut self, fragment: &str) -> Option<Token> {
		let id = fragment.trim_start_matches('#');
		if id.is_empty() {
			return None;
		}
		let Some(id) = self
			.museums
			.iter()
			.find(|m| m.id == id)
			.map(|m| m.id.clone())
		else {
			log::debug!("deep link matched no museum: {id}");
			return None;
		};
		self.activate(&id);
		self.expanded = None;
		self.highlight = Some(id.clone());
		self.center_on(&id);
		let token = self.next_token();
		self.highlight_token = token;
		Some(token)
	}

	/// Highlight timer fired; stale tokens are discarded.
	pub fn highlight_clear(&mut self, token: Token) {
		if token == self.highlight_token {
			self.highlight = None;
			self.highlight_token = Token(0);
		}
	}

	/// Bring a tile into view. Only map mode carries a free transform;
	/// the other modes already fit the stage.
	fn center_on(&mut self, id: &str) {
		if self.mode != LayoutMode::Map {
			return;
		}
		if let Some(pos) = self.position_of(id) {
			let center = Rect::tile(pos).center();
			self.transform.x = self.stage.width / 2.0 - center.x * self.transform.k;
			self.transform.y = self.stage.height / 2.0 - center.y * self.transform.k;
		}
	}
}
