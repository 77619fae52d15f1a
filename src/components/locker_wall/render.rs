//! Projection of the wall state onto a 2D canvas context. Pure
//! consumer: reads positions and routed connectors, draws shapes and
//! text, owns no state.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

use super::geometry::{self, Point, Rect, Segment, TILE_H, TILE_W};
use super::hubs::ANCHOR_HALF;
use super::state::WallState;

const TOPIC_COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

const RIBBON_FILL: &str = "rgba(255, 179, 71, 0.25)";
const RIBBON_EDGE: &str = "rgba(255, 179, 71, 0.7)";
const LABEL_FILL: &str = "#f6f6fa";

fn topic_color(topic: Option<&str>) -> &'static str {
	let key = topic.unwrap_or("etc");
	let sum: usize = key.bytes().map(usize::from).sum();
	TOPIC_COLORS[sum % TOPIC_COLORS.len()]
}

pub fn render(state: &WallState, ctx: &CanvasRenderingContext2d) {
	let stage = state.stage();
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, stage.width, stage.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_ribbons(state, ctx);
	draw_hubs(state, ctx);
	draw_tiles(state, ctx);
	ctx.restore();
}

fn fill_path(ctx: &CanvasRenderingContext2d, d: &str, fill: &str, edge: &str) {
	let Ok(path) = Path2d::new_with_path_string(d) else {
		return;
	};
	ctx.set_fill_style_str(fill);
	ctx.fill_with_path_2d(&path);
	ctx.set_stroke_style_str(edge);
	ctx.set_line_width(1.0);
	ctx.stroke_with_path(&path);
}

/// Draw `text` along the segment's axis, centered, upright.
fn draw_path_label(ctx: &CanvasRenderingContext2d, path: Segment, text: &str, k: f64) {
	if text.is_empty() {
		return;
	}
	let mid = path.midpoint();
	let angle = path.a.angle_to(path.b).to_radians();
	ctx.save();
	let _ = ctx.translate(mid.x, mid.y);
	let _ = ctx.rotate(angle);
	ctx.set_fill_style_str(LABEL_FILL);
	ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(text, 0.0, -4.0);
	ctx.restore();
}

fn draw_ribbons(state: &WallState, ctx: &CanvasRenderingContext2d) {
	for rel in &state.routed_relations {
		fill_path(ctx, &rel.ribbon_path, RIBBON_FILL, RIBBON_EDGE);

		// curved centerline along the ribbon's long axis
		let mid = rel.label_path.midpoint();
		let ctrl = Point::new(mid.x, mid.y - 24.0);
		let d = geometry::cubic_path(rel.label_path.a, ctrl, ctrl, rel.label_path.b);
		if let Ok(path) = Path2d::new_with_path_string(&d) {
			ctx.set_stroke_style_str(RIBBON_EDGE);
			ctx.set_line_width(2.0 / state.transform.k);
			ctx.stroke_with_path(&path);
		}

		draw_path_label(ctx, rel.label_path, &rel.revealed, state.transform.k);
	}
}

fn draw_hubs(state: &WallState, ctx: &CanvasRenderingContext2d) {
	for hub in &state.routed_hubs {
		// hub ribbons stroke dashed so they read apart from pairwise ones
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(4.0),
		));
		for ribbon in &hub.ribbons {
			fill_path(ctx, &ribbon.ribbon_path, RIBBON_FILL, RIBBON_EDGE);
		}
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		for ribbon in &hub.ribbons {
			draw_path_label(ctx, ribbon.label_path, &ribbon.revealed, state.transform.k);
		}

		// diamond anchor
		let a = hub.anchor;
		ctx.begin_path();
		ctx.move_to(a.x, a.y - ANCHOR_HALF);
		ctx.line_to(a.x + ANCHOR_HALF, a.y);
		ctx.line_to(a.x, a.y + ANCHOR_HALF);
		ctx.line_to(a.x - ANCHOR_HALF, a.y);
		ctx.close_path();
		ctx.set_fill_style_str("#ffb347");
		ctx.fill();
		if hub.clickable {
			ctx.set_stroke_style_str("#f6f6fa");
			ctx.set_line_width(1.5 / state.transform.k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(LABEL_FILL);
		ctx.set_font(&format!("{}px sans-serif", 12.0 / state.transform.k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&hub.label, a.x, a.y + ANCHOR_HALF + 14.0);
	}
}

fn draw_tiles(state: &WallState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for m in state.museums() {
		let Some(pos) = state.position_of(&m.id) else {
			continue;
		};
		let rect = Rect::tile(pos);
		let active = state.active.as_deref() == Some(m.id.as_str());
		let expanded = state.expanded.as_deref() == Some(m.id.as_str());
		let hovered = state.hovered() == Some(m.id.as_str());

		if state.highlight.as_deref() == Some(m.id.as_str()) {
			draw_highlight_glow(ctx, rect);
		}

		ctx.set_fill_style_str(if active { "#2d2d4e" } else { "#22223a" });
		ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
		ctx.set_stroke_style_str(topic_color(m.topic.as_deref()));
		ctx.set_line_width(if active || hovered { 3.0 / k } else { 1.5 / k });
		ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);

		ctx.set_fill_style_str(LABEL_FILL);
		ctx.set_text_align("left");
		ctx.set_font(&format!("{}px sans-serif", 13.0 / k.max(0.5)));
		let _ = ctx.fill_text_with_max_width(&m.name, rect.x + 8.0, rect.y + 20.0, TILE_W - 16.0);

		if active {
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			ctx.set_fill_style_str("rgba(246, 246, 250, 0.8)");
			let _ = ctx.fill_text_with_max_width(&m.city, rect.x + 8.0, rect.y + 38.0, TILE_W - 16.0);
			let _ =
				ctx.fill_text_with_max_width(&m.region, rect.x + 8.0, rect.y + 52.0, TILE_W - 16.0);
		}
		if expanded {
			draw_detail(ctx, rect, &m.detail.description, k);
		}
	}
}

fn draw_detail(ctx: &CanvasRenderingContext2d, rect: Rect, description: &str, k: f64) {
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	ctx.set_fill_style_str("rgba(246, 246, 250, 0.7)");
	let mut y = rect.y + 72.0;
	for line in wrap_chars(description, 24).into_iter().take(5) {
		let _ = ctx.fill_text_with_max_width(&line, rect.x + 8.0, y, TILE_W - 16.0);
		y += 14.0;
	}
}

/// Greedy word wrap by character budget.
fn wrap_chars(text: &str, budget: usize) -> Vec<String> {
	let mut lines = Vec::new();
	let mut line = String::new();
	for word in text.split_whitespace() {
		if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > budget {
			lines.push(std::mem::take(&mut line));
		}
		if !line.is_empty() {
			line.push(' ');
		}
		line.push_str(word);
	}
	if !line.is_empty() {
		lines.push(line);
	}
	lines
}

fn draw_highlight_glow(ctx: &CanvasRenderingContext2d, rect: Rect) {
	let Point { x, y } = rect.center();
	let inner = TILE_W / 2.0;
	let outer = TILE_H * 1.1;
	let Ok(gradient) = ctx.create_radial_gradient(x, y, inner, x, y, outer) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(255, 179, 71, 0.35)");
	let _ = gradient.add_color_stop(1.0, "rgba(255, 179, 71, 0.0)");
	ctx.begin_path();
	let _ = ctx.arc(x, y, outer, 0.0, 2.0 * std::f64::consts::PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&JsValue::from(gradient));
	ctx.fill();
}
