use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::html;
use leptos::leptos_dom::helpers::{WindowListenerHandle, window_event_listener};
use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::export::{EXPORT_FILE_NAME, to_svg_document};
use super::render;
use super::state::FlowGraphState;
use super::types::LayoutAlgorithm;
use crate::components::console::{
	Console, ConsoleHistory, DEFAULT_CONSOLE_HEIGHT, console_height_for,
};
use crate::model::{ExecutionStep, Position, VisualizationResult};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Window listeners installed for one console resize drag.
struct ResizeListeners(Vec<WindowListenerHandle>);

impl ResizeListeners {
	fn release(self) {
		for handle in self.0 {
			handle.remove();
		}
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn request_frame(callback: &FrameCallback) {
	if let (Some(window), Some(cb)) = (web_sys::window(), callback.borrow().as_ref()) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Match the canvas backing store to its parent box.
fn fit_to_parent(canvas: &HtmlCanvasElement, state: &RefCell<FlowGraphState>) {
	let Some(parent) = canvas.parent_element() else {
		return;
	};
	let (w, h) = (parent.client_width().max(1), parent.client_height().max(1));
	if canvas.width() != w as u32 || canvas.height() != h as u32 {
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		state.borrow_mut().resize(w as f64, h as f64);
	}
}

fn local_point(canvas_ref: NodeRef<html::Canvas>, ev: &MouseEvent) -> Option<Position> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Position::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn download_svg(svg: &str) -> Result<(), JsValue> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
	let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&format!(
		"data:image/svg+xml;charset=utf-8,{}",
		js_sys::encode_uri_component(svg)
	));
	anchor.set_download(EXPORT_FILE_NAME);
	body.append_child(&anchor)?;
	anchor.click();
	anchor.remove();
	Ok(())
}

/// Pannable, zoomable flowchart of a visualization result with the variable console
/// docked underneath.
#[component]
pub fn FlowGraph(
	#[prop(into)] result: Signal<Option<VisualizationResult>>,
	/// Changes whenever the result is replaced, even by an identical one.
	#[prop(into)]
	generation: Signal<u64>,
	#[prop(into)] layout: Signal<LayoutAlgorithm>,
	#[prop(into)] active_node: Signal<Option<String>>,
	#[prop(into)] current_step: Signal<Option<ExecutionStep>>,
	/// Each change triggers one SVG download.
	#[prop(into)]
	export_requests: Signal<u32>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<html::Canvas>::new();
	let container_ref = NodeRef::<html::Div>::new();
	let state = Rc::new(RefCell::new(FlowGraphState::new(800.0, 600.0)));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let history = RwSignal::new(ConsoleHistory::default());
	let console_height = RwSignal::new(DEFAULT_CONSOLE_HEIGHT);
	let listeners: Rc<RefCell<Option<ResizeListeners>>> = Rc::new(RefCell::new(None));

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if animate_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas 2d context unavailable");
			return;
		};
		info!("flow graph canvas ready");

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut cursor = "";
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			fit_to_parent(&canvas, &state_anim);
			let s = state_anim.borrow();
			if s.cursor() != cursor {
				cursor = s.cursor();
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
			render::render(&s, &ctx);
			drop(s);
			request_frame(&animate_inner);
		}));
		request_frame(&animate_init);
	});

	let state_load = state.clone();
	Effect::new(move |_| {
		generation.track();
		let layout = layout.get();
		let loaded = result.with(|r| {
			state_load.borrow_mut().load(r.as_ref(), layout);
			r.is_some()
		});
		history.set(if loaded {
			ConsoleHistory::ready()
		} else {
			ConsoleHistory::default()
		});
	});

	let state_active = state.clone();
	Effect::new(move |_| {
		state_active.borrow_mut().set_active(active_node.get());
	});

	let state_export = state.clone();
	Effect::new(move |prev: Option<u32>| {
		let requests = export_requests.get();
		if prev.is_some() {
			let s = state_export.borrow();
			if s.nodes.is_empty() {
				warn!("nothing to export");
			} else {
				let svg = to_svg_document(&s);
				debug!("exporting {} bytes of svg", svg.len());
				if let Err(err) = download_svg(&svg) {
					error!("svg export failed: {err:?}");
				}
			}
		}
		requests
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		if let Some(p) = local_point(canvas_ref, &ev) {
			ev.prevent_default();
			state_md.borrow_mut().pointer_down(p);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(p) = local_point(canvas_ref, &ev) {
			state_mm.borrow_mut().pointer_move(p);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		state_mu.borrow_mut().pointer_up();
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().pointer_leave();
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(p) = local_point(canvas_ref, &ev) {
			state_wh.borrow_mut().wheel(p, ev.delta_y());
		}
	};

	let state_rs = state.clone();
	let on_resize_start = move |event: MouseEvent| {
		if !state_rs.borrow_mut().begin_console_resize() {
			return;
		}
		event.prevent_default();

		let on_move = move |ev: MouseEvent| {
			let Some(container) = container_ref.get_untracked() else {
				return;
			};
			let rect = container.get_bounding_client_rect();
			console_height.set(console_height_for(
				ev.client_y() as f64,
				rect.bottom(),
				rect.height(),
			));
		};
		let (state_end, listeners_end) = (state_rs.clone(), listeners.clone());
		let on_up = move |_: MouseEvent| {
			state_end.borrow_mut().end_console_resize();
			let taken = listeners_end.borrow_mut().take();
			if let Some(taken) = taken {
				taken.release();
			}
		};
		// resizing only starts from Idle, so no earlier set is still installed
		*listeners.borrow_mut() = Some(ResizeListeners(vec![
			window_event_listener(ev::mousemove, on_move),
			window_event_listener(ev::mouseup, on_up),
		]));
	};

	view! {
		<div class="flow-graph" node_ref=container_ref>
			<div class="flow-graph-viewport">
				<canvas
					node_ref=canvas_ref
					class="flow-graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
				/>
			</div>
			<div class="console-resize-handle" on:mousedown=on_resize_start />
			<div class="console-dock" style:height=move || format!("{}px", console_height.get())>
				<Console history=history current_step=current_step />
			</div>
		</div>
	}
}
