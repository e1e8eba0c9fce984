use leptos::prelude::*;
use serde_json::Value;

use crate::model::ExecutionStep;
use crate::session::Session;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ContextTab {
	#[default]
	Explanation,
	Variables,
	CallStack,
}

impl ContextTab {
	const ALL: [ContextTab; 3] = [
		ContextTab::Explanation,
		ContextTab::Variables,
		ContextTab::CallStack,
	];

	fn title(self) -> &'static str {
		match self {
			ContextTab::Explanation => "Explanation",
			ContextTab::Variables => "Variables",
			ContextTab::CallStack => "Call Stack",
		}
	}
}

/// Nested key/value rendering of a JSON value; scalars are shown as JSON literals.
fn variable_tree(value: &Value, level: usize) -> AnyView {
	let entries: Vec<(String, &Value)> = match value {
		Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
		Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
		scalar => return view! { <span class="var-scalar">{scalar.to_string()}</span> }.into_any(),
	};
	if entries.is_empty() {
		let empty = if value.is_array() { "[]" } else { "{}" };
		return view! { <span class="var-empty">{empty}</span> }.into_any();
	}
	let key_class = if value.is_array() { "var-index" } else { "var-key" };
	view! {
		<div class="var-tree">
			{entries
				.into_iter()
				.map(|(key, child)| {
					view! {
						<div style:padding-left=format!("{}px", level * 16)>
							<span class=key_class>{key}": "</span>
							{variable_tree(child, level + 1)}
						</div>
					}
				})
				.collect_view()}
		</div>
	}
	.into_any()
}

fn variables_view(step: Option<&ExecutionStep>) -> AnyView {
	match step.map(ExecutionStep::scope).transpose() {
		Err(err) => view! { <p class="notice-error">{err.to_string()}</p> }.into_any(),
		Ok(scope) => match scope.flatten() {
			Some(map) if !map.is_empty() => variable_tree(&Value::Object(map), 0),
			_ => view! { <p class="muted">"No variables in scope."</p> }.into_any(),
		},
	}
}

fn call_stack_view(step: Option<&ExecutionStep>) -> AnyView {
	let frames: Vec<String> = step
		.map(|s| s.frames().map(str::to_owned).collect())
		.unwrap_or_default();
	if frames.is_empty() {
		return view! { <p class="muted">"Call stack is empty."</p> }.into_any();
	}
	frames
		.into_iter()
		.enumerate()
		.map(|(i, frame)| {
			let class = if i == 0 { "frame frame-current" } else { "frame" };
			view! { <div class=class>{frame}</div> }
		})
		.collect_view()
		.into_any()
}

/// Per-step explanation, variables and call stack, plus the stepping controls.
#[component]
pub fn ContextPanel(session: RwSignal<Session>) -> impl IntoView {
	let (tab, set_tab) = signal(ContextTab::default());
	let active = Memo::new(move |_| session.with(|s| s.result().is_some()));
	let step = Memo::new(move |_| session.with(|s| s.current_step().cloned()));
	let total = Memo::new(move |_| session.with(Session::total_steps));
	let index = Memo::new(move |_| session.with(Session::step_index));

	let content = move || {
		if !active.get() {
			return view! {
				<p class="muted centered">"Visualize the code to see the execution context."</p>
			}
			.into_any();
		}
		step.with(|step| match tab.get() {
			ContextTab::Explanation => match step {
				Some(s) => view! { <p class="explanation">{s.explanation.clone()}</p> }.into_any(),
				None => view! { <p class="muted">"No explanation for this step."</p> }.into_any(),
			},
			ContextTab::Variables => variables_view(step.as_ref()),
			ContextTab::CallStack => call_stack_view(step.as_ref()),
		})
	};

	view! {
		<div class="panel context-panel">
			<div class="panel-header tabs">
				{ContextTab::ALL
					.into_iter()
					.map(|t| {
						view! {
							<button
								class="tab"
								class:tab-active=move || tab.get() == t
								on:click=move |_| set_tab.set(t)
							>
								{t.title()}
							</button>
						}
					})
					.collect_view()}
			</div>
			<div class="panel-body">{content}</div>
			<Show when=move || { active.get() && total.get() > 0 }>
				<div class="panel-footer stepper">
					<div class="stepper-row">
						<button
							class="step-button"
							aria-label="Previous Step"
							disabled=move || session.with(|s| !s.can_step_back())
							on:click=move |_| {
								session.update(|s| {
									s.prev_step();
								})
							}
						>
							"Prev"
						</button>
						<span class="step-counter">
							{move || format!("Step {} / {}", index.get() + 1, total.get())}
						</span>
						<button
							class="step-button"
							aria-label="Next Step"
							disabled=move || session.with(|s| !s.can_step_forward())
							on:click=move |_| {
								session.update(|s| {
									s.next_step();
								})
							}
						>
							"Next"
						</button>
					</div>
					<button
						class="primary-button"
						aria-label="Continue to next breakpoint"
						disabled=move || session.with(|s| !s.can_continue())
						on:click=move |_| {
							session.update(|s| {
								s.continue_to_breakpoint();
							})
						}
					>
						"Continue to Breakpoint"
					</button>
				</div>
			</Show>
		</div>
	}
}
