use leptos::prelude::*;
use log::{error, info};

use crate::components::locker_wall::data::{self, Catalog};
use crate::components::locker_wall::{LayoutMode, LockerWallCanvas, WallEvent};

/// One segmented-control button per layout mode.
#[component]
fn LayoutToggle(mode: ReadSignal<LayoutMode>, set_mode: WriteSignal<LayoutMode>) -> impl IntoView {
	let button = move |m: LayoutMode| {
		view! {
			<button
				class:active=move || mode.get() == m
				on:click=move |_| set_mode.set(m)
			>
				{m.label()}
			</button>
		}
	};
	view! {
		<div class="layout-toggle">
			{button(LayoutMode::Grid)}
			{button(LayoutMode::Topic)}
			{button(LayoutMode::Map)}
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let catalog = data::load_catalog().unwrap_or_else(|e| {
		error!("failed to load museum catalog: {e}");
		Catalog::default()
	});
	let (mode, set_mode) = signal(LayoutMode::Grid);
	let on_event = Callback::new(|ev: WallEvent| {
		info!("wall event: {ev:?}");
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-wall">
				<LockerWallCanvas
					museums=catalog.museums
					hubs=catalog.hubs
					mode=mode
					fullscreen=true
					on_event=on_event
				/>
				<div class="wall-overlay">
					<h1>"Museum Lockers"</h1>
					<p class="subtitle">
						"Click a locker to open it, hover to expand. Drag lockers to rearrange. Scroll to zoom the map."
					</p>
					<LayoutToggle mode=mode set_mode=set_mode />
				</div>
			</div>
		</ErrorBoundary>
	}
}
