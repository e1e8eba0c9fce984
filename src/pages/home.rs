use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::components::code_input::CodeInput;
use crate::components::context_panel::ContextPanel;
use crate::components::flow_graph::{FlowGraph, LayoutAlgorithm};
use crate::components::legend::GraphLegend;
use crate::components::settings::SettingsModal;
use crate::config::AnalysisConfig;
use crate::services::analysis::visualize_code;
use crate::session::Session;

const SAMPLE_CODE: &str = "function factorial(n) {
  if (n === 0 || n === 1) {
    return 1;
  }
  return n * factorial(n - 1);
}

const result = factorial(4);
console.log(result);";

/// Editor, diagram and context panel side by side.
#[component]
pub fn Home() -> impl IntoView {
	let session = RwSignal::new(Session::new(SAMPLE_CODE));
	let layout = RwSignal::new(LayoutAlgorithm::default());
	let settings_open = RwSignal::new(false);
	let export_requests = RwSignal::new(0u32);
	let config = StoredValue::new(AnalysisConfig::from_env());

	let result = Memo::new(move |_| session.with(|s| s.result().cloned()));
	let generation = Memo::new(move |_| session.with(Session::generation));
	let active_node = Memo::new(move |_| session.with(|s| s.active_node_id().map(str::to_owned)));
	let current_step = Memo::new(move |_| session.with(|s| s.current_step().cloned()));
	let loading = Memo::new(move |_| session.with(Session::is_loading));
	let error = Memo::new(move |_| session.with(|s| s.error().map(str::to_owned)));

	let on_visualize = Callback::new(move |()| {
		let request = match session.try_update(Session::begin_analysis) {
			Some(Ok(request)) => request,
			Some(Err(err)) => {
				debug!("visualize rejected: {err}");
				return;
			}
			None => return,
		};
		let config = config.get_value();
		spawn_local(async move {
			let outcome = visualize_code(&config, &request.code).await;
			session.update(|s| {
				s.finish_analysis(request.id, outcome);
			});
		});
	});

	let overlay = move || {
		if loading.get() {
			Some(
				view! {
					<div class="graph-overlay">
						<div class="spinner" />
						<p class="overlay-title">"Visualizing Code..."</p>
						<p class="overlay-detail">"The AI is analyzing the execution flow."</p>
					</div>
				}
				.into_any(),
			)
		} else if let Some(message) = error.get() {
			Some(
				view! {
					<div class="graph-overlay overlay-error">
						<p class="overlay-title">"An Error Occurred"</p>
						<p class="overlay-detail">{message}</p>
					</div>
				}
				.into_any(),
			)
		} else if result.with(Option::is_none) {
			Some(
				view! {
					<div class="graph-overlay">
						<p class="overlay-title">"Visualization Panel"</p>
						<p class="overlay-detail">"Your code's execution flow will appear here."</p>
					</div>
				}
				.into_any(),
			)
		} else {
			None
		}
	};

	view! {
		<div class="app-shell">
			<header class="app-header">
				<h1>"AI Code Visualizer"</h1>
				<button
					class="icon-button"
					aria-label="Open settings"
					on:click=move |_| settings_open.set(true)
				>
					"⚙"
				</button>
			</header>
			<main class="app-main">
				<section class="column column-code">
					<CodeInput session=session on_visualize=on_visualize />
				</section>
				<section class="column column-graph">
					<div class="panel visualization">
						<FlowGraph
							result=result
							generation=generation
							layout=layout
							active_node=active_node
							current_step=current_step
							export_requests=export_requests
						/>
						<Show when=move || result.with(Option::is_some)>
							<GraphLegend />
						</Show>
						{overlay}
					</div>
				</section>
				<section class="column column-context">
					<ContextPanel session=session />
				</section>
			</main>
			<SettingsModal open=settings_open layout=layout export_requests=export_requests />
		</div>
	}
}
