use leptos::prelude::*;

use crate::session::Session;

/// Matches `.code-editor` line-height in the stylesheet.
const LINE_HEIGHT: f64 = 24.0;

/// Source editor with a clickable breakpoint gutter and the current-line highlight.
#[component]
pub fn CodeInput(session: RwSignal<Session>, on_visualize: Callback<()>) -> impl IntoView {
	let line_count = Memo::new(move |_| session.with(|s| s.code().split('\n').count()));
	let loading = Memo::new(move |_| session.with(Session::is_loading));
	let highlighted = Memo::new(move |_| session.with(Session::highlighted_line));
	let breakpoint_count = Memo::new(move |_| session.with(|s| s.breakpoints().len()));

	view! {
		<div class="panel code-input">
			<div class="panel-header">
				<h2>"Code Editor"</h2>
				<Show when=move || { breakpoint_count.get() > 0 }>
					<button
						class="link-button"
						title="Remove all breakpoints"
						on:click=move |_| session.update(Session::clear_breakpoints)
					>
						{move || match breakpoint_count.get() {
							1 => "Clear 1 breakpoint".to_string(),
							n => format!("Clear {n} breakpoints"),
						}}
					</button>
				</Show>
			</div>
			<div class="code-scroll">
				<div class="code-gutter">
					{move || {
						(1..=line_count.get() as u32)
							.map(|line| {
								let has_bp = move || session.with(|s| s.breakpoints().contains(line));
								view! {
									<div class="gutter-line">
										<span
											class="breakpoint-slot"
											title="Toggle breakpoint"
											on:click=move |_| {
												session.update(|s| {
													s.toggle_breakpoint(line);
												})
											}
										>
											<Show when=has_bp>
												<span class="breakpoint-dot" />
											</Show>
										</span>
										{line}
									</div>
								}
							})
							.collect_view()
					}}
				</div>
				<div class="code-area">
					<textarea
						class="code-editor"
						placeholder="Paste your code here..."
						spellcheck="false"
						prop:value=move || session.with(|s| s.code().to_string())
						on:input=move |ev| {
							let code = event_target_value(&ev);
							session.update(|s| s.edit_code(code));
						}
					/>
					{move || {
						highlighted
							.get()
							.map(|line| {
								let top = (line.saturating_sub(1)) as f64 * LINE_HEIGHT;
								view! {
									<div
										class="line-highlight"
										style:height=format!("{LINE_HEIGHT}px")
										style:transform=format!("translateY({top}px)")
									/>
								}
							})
					}}
				</div>
			</div>
			<div class="panel-footer">
				<button
					class="primary-button"
					disabled=move || loading.get()
					on:click=move |_| on_visualize.run(())
				>
					{move || if loading.get() { "Analyzing..." } else { "Visualize Execution" }}
				</button>
			</div>
		</div>
	}
}
