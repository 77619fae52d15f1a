use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::geometry::Point;
use super::render;
use super::state::{DWELL_MS, HIGHLIGHT_MS, RESIZE_DEBOUNCE_MS, WallState};
use super::types::{LayoutMode, Museum, RelationHub, Stage, WallEvent};

type SharedState = Rc<RefCell<Option<WallState>>>;

/// Fire-and-forget timeout. The generation token checked inside `f`
/// makes stale fires harmless, so nothing needs explicit cancellation.
fn schedule_timeout(ms: i32, f: impl FnOnce() + 'static) {
	let cb = Closure::once_into_js(f);
	if let Some(window) = web_sys::window() {
		let _ = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms);
	}
}

fn flush_events(state: &mut WallState, on_event: Option<Callback<WallEvent>>) {
	for ev in state.take_events() {
		log::debug!("wall event: {ev:?}");
		if let Some(cb) = on_event {
			cb.run(ev);
		}
	}
}

/// Read the current URL fragment, resolve it against the wall and
/// schedule the transient-highlight clear.
fn apply_deep_link(state: &SharedState, on_event: Option<Callback<WallEvent>>) {
	let hash = web_sys::window()
		.and_then(|w| w.location().hash().ok())
		.unwrap_or_default();
	let token = {
		let mut guard = state.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		let token = s.resolve_deep_link(&hash);
		flush_events(s, on_event);
		token
	};
	if let Some(token) = token {
		let state = state.clone();
		schedule_timeout(HIGHLIGHT_MS, move || {
			if let Some(s) = state.borrow_mut().as_mut() {
				s.highlight_clear(token);
			}
		});
	}
}

/// Measure the stage: window size when fullscreen, else the canvas
/// parent's client box.
fn measure_stage(canvas: &HtmlCanvasElement, fullscreen: bool) -> Stage {
	let (width, height) = if fullscreen {
		let window: Window = web_sys::window().unwrap();
		(
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		)
	} else {
		(
			canvas
				.parent_element()
				.map(|p| f64::from(p.client_width()))
				.unwrap_or(1200.0),
			canvas
				.parent_element()
				.map(|p| f64::from(p.client_height()))
				.unwrap_or(800.0),
		)
	};
	Stage { width, height }
}

fn event_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		f64::from(ev.client_x()) - rect.left(),
		f64::from(ev.client_y()) - rect.top(),
	)
}

/// The locker wall: tiles, ribbons and hubs on one canvas.
#[component]
pub fn LockerWallCanvas(
	museums: Vec<Museum>,
	hubs: Vec<RelationHub>,
	#[prop(into)] mode: Signal<LayoutMode>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional, into)] on_event: Option<Callback<WallEvent>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let hash_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init, hash_cb_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		hash_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let stage = measure_stage(&canvas, fullscreen);
		canvas.set_width(stage.width as u32);
		canvas.set_height(stage.height as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(WallState::new(museums.clone(), hubs.clone(), stage));
		log::info!("locker wall mounted: {}x{}", stage.width, stage.height);

		// deep link on load, then on every fragment change
		apply_deep_link(&state_init, on_event);
		let state_hash = state_init.clone();
		*hash_cb_init.borrow_mut() = Some(Closure::new(move || {
			apply_deep_link(&state_hash, on_event);
		}));
		if let Some(ref cb) = *hash_cb_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("hashchange", cb.as_ref().unchecked_ref());
		}

		// debounced: each event supersedes the pending token, so only the
		// last resize in a burst recomputes the layout
		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let stage = measure_stage(&canvas_resize, fullscreen);
			let token = {
				let mut guard = state_resize.borrow_mut();
				let Some(s) = guard.as_mut() else {
					return;
				};
				s.resize_requested(stage)
			};
			let state = state_resize.clone();
			let canvas = canvas_resize.clone();
			schedule_timeout(RESIZE_DEBOUNCE_MS, move || {
				if let Some(ref mut s) = *state.borrow_mut() {
					if s.resize_fire(token) {
						let stage = s.stage();
						canvas.set_width(stage.width as u32);
						canvas.set_height(stage.height as u32);
					}
				}
			});
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref s) = *state_anim.borrow() {
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// layout mode is owned by the page; react to the signal
	let state_mode = state.clone();
	Effect::new(move |_| {
		let m = mode.get();
		if let Some(ref mut s) = *state_mode.borrow_mut() {
			s.set_mode(m);
			flush_events(s, on_event);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let p = event_point(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(p);
			flush_events(s, on_event);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let p = event_point(&canvas, &ev);
		let dwell = {
			let mut guard = state_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let token = s.pointer_move(p);
			flush_events(s, on_event);
			token
		};
		if let Some(token) = dwell {
			let state = state_mm.clone();
			schedule_timeout(DWELL_MS, move || {
				if let Some(ref mut s) = *state.borrow_mut() {
					s.dwell_fire(token);
					flush_events(s, on_event);
				}
			});
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let p = event_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up(p);
			flush_events(s, on_event);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let p = event_point(&canvas, &ev);
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_up(p);
			let _ = s.update_hover(None);
			flush_events(s, on_event);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let p = event_point(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(p, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="locker-wall-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
