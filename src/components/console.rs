//! Interactive console for inspecting variables at the current trace step.

use leptos::ev::SubmitEvent;
use leptos::html;
use leptos::prelude::*;
use log::error;
use serde_json::Value;

use crate::model::ExecutionStep;

pub const MIN_CONSOLE_HEIGHT: f64 = 40.0;
pub const DEFAULT_CONSOLE_HEIGHT: f64 = 180.0;
/// Vertical space always left to the diagram above the console.
pub const GRAPH_RESERVE: f64 = 100.0;

const READY: &str = "Console ready. Type a variable name to inspect its value at the current step.";
const CLEARED: &str = "Console cleared.";
const UNREADABLE: &str = "Internal error: Could not read variable state.";

/// Console height for a resize drag with the pointer at `pointer_y`, measured against a
/// container whose bottom edge is at `container_bottom`.
pub fn console_height_for(pointer_y: f64, container_bottom: f64, container_height: f64) -> f64 {
	let max = (container_height - GRAPH_RESERVE).max(MIN_CONSOLE_HEIGHT);
	(container_bottom - pointer_y).clamp(MIN_CONSOLE_HEIGHT, max)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleEntry {
	Command(String),
	Output(String),
	Error(String),
	Info(String),
}

impl ConsoleEntry {
	fn class(&self) -> &'static str {
		match self {
			ConsoleEntry::Command(_) => "console-command",
			ConsoleEntry::Output(_) => "console-output",
			ConsoleEntry::Error(_) => "console-error",
			ConsoleEntry::Info(_) => "console-info",
		}
	}

	fn text(&self) -> &str {
		match self {
			ConsoleEntry::Command(s)
			| ConsoleEntry::Output(s)
			| ConsoleEntry::Error(s)
			| ConsoleEntry::Info(s) => s,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsoleHistory {
	entries: Vec<ConsoleEntry>,
}

impl ConsoleHistory {
	pub fn ready() -> Self {
		Self {
			entries: vec![ConsoleEntry::Info(READY.into())],
		}
	}

	pub fn entries(&self) -> &[ConsoleEntry] {
		&self.entries
	}

	/// Evaluate one input line against `step`. Blank input is ignored.
	pub fn submit(&mut self, input: &str, step: Option<&ExecutionStep>) {
		let command = input.trim();
		if command.is_empty() {
			return;
		}
		self.entries.push(ConsoleEntry::Command(command.into()));

		let scope = match step.map(ExecutionStep::scope).transpose() {
			Ok(scope) => scope.flatten().unwrap_or_default(),
			Err(err) => {
				error!("variables for the current step are unreadable: {err:?}");
				self.entries.push(ConsoleEntry::Error(UNREADABLE.into()));
				return;
			}
		};

		// a variable named `clear` shadows the command
		if let Some(value) = scope.get(command) {
			self.entries.push(ConsoleEntry::Output(pretty(value)));
		} else if command == "clear" {
			self.entries = vec![ConsoleEntry::Info(CLEARED.into())];
		} else {
			self.entries.push(ConsoleEntry::Error(format!(
				"'{command}' is not defined in the current scope."
			)));
		}
	}
}

fn pretty(value: &Value) -> String {
	serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[component]
pub fn Console(
	history: RwSignal<ConsoleHistory>,
	#[prop(into)] current_step: Signal<Option<ExecutionStep>>,
) -> impl IntoView {
	let (input, set_input) = signal(String::new());
	let output_ref = NodeRef::<html::Div>::new();

	Effect::new(move |_| {
		history.track();
		if let Some(output) = output_ref.get() {
			output.set_scroll_top(output.scroll_height());
		}
	});

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let line = input.get_untracked();
		if line.trim().is_empty() {
			return;
		}
		current_step.with_untracked(|step| history.update(|h| h.submit(&line, step.as_ref())));
		set_input.set(String::new());
	};

	view! {
		<div class="console">
			<div class="console-title">"Interactive Console"</div>
			<div class="console-output" node_ref=output_ref>
				{move || {
					history
						.get()
						.entries()
						.iter()
						.map(|entry| {
							let prefix = matches!(entry, ConsoleEntry::Command(_)).then_some("> ");
							view! {
								<pre class=entry.class()>{prefix}{entry.text().to_string()}</pre>
							}
						})
						.collect_view()
				}}
			</div>
			<form class="console-input" on:submit=on_submit>
				<span class="console-prompt">">"</span>
				<input
					type="text"
					placeholder="Inspect a variable..."
					spellcheck="false"
					prop:value=input
					on:input=move |ev| set_input.set(event_target_value(&ev))
				/>
			</form>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn step(variables: Option<&str>) -> ExecutionStep {
		ExecutionStep {
			node_id: "n1".into(),
			explanation: String::new(),
			line: 1,
			variables: variables.map(str::to_owned),
			call_stack: None,
		}
	}

	#[test]
	fn height_is_clamped() {
		assert_eq!(console_height_for(500.0, 800.0, 600.0), 300.0);
		assert_eq!(console_height_for(790.0, 800.0, 600.0), MIN_CONSOLE_HEIGHT);
		assert_eq!(console_height_for(100.0, 800.0, 600.0), 500.0);
		// tiny containers still leave the minimum
		assert_eq!(console_height_for(0.0, 100.0, 100.0), MIN_CONSOLE_HEIGHT);
	}

	#[test]
	fn known_variable_is_pretty_printed() {
		let mut history = ConsoleHistory::ready();
		let s = step(Some(r#"{"n": 3, "arr": [1, 2]}"#));
		history.submit("  arr ", Some(&s));
		assert_eq!(
			history.entries()[1..],
			[
				ConsoleEntry::Command("arr".into()),
				ConsoleEntry::Output("[\n  1,\n  2\n]".into()),
			]
		);
	}

	#[test]
	fn unknown_variable_and_blank_input() {
		let mut history = ConsoleHistory::ready();
		history.submit("   ", None);
		assert_eq!(history.entries().len(), 1);
		history.submit("x", Some(&step(None)));
		assert_eq!(
			history.entries().last(),
			Some(&ConsoleEntry::Error("'x' is not defined in the current scope.".into()))
		);
	}

	#[test]
	fn clear_resets_unless_shadowed() {
		let mut history = ConsoleHistory::ready();
		history.submit("y", None);
		history.submit("clear", None);
		assert_eq!(history.entries(), [ConsoleEntry::Info(CLEARED.into())]);

		history.submit("clear", Some(&step(Some(r#"{"clear": true}"#))));
		assert_eq!(history.entries().last(), Some(&ConsoleEntry::Output("true".into())));
	}

	#[test]
	fn malformed_variables_do_not_panic() {
		let mut history = ConsoleHistory::ready();
		history.submit("n", Some(&step(Some("{n: 1"))));
		assert_eq!(history.entries().last(), Some(&ConsoleEntry::Error(UNREADABLE.into())));
	}
}
