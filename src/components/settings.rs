use leptos::prelude::*;

use super::flow_graph::LayoutAlgorithm;

#[component]
pub fn SettingsModal(
	open: RwSignal<bool>,
	layout: RwSignal<LayoutAlgorithm>,
	/// Bumped once per export click.
	export_requests: RwSignal<u32>,
) -> impl IntoView {
	let close = move |_: leptos::ev::MouseEvent| open.set(false);

	view! {
		<Show when=move || open.get()>
			<div class="modal-backdrop" on:click=close>
				<div class="modal" on:click=|ev| ev.stop_propagation()>
					<div class="modal-header">
						<h2>"Settings"</h2>
						<button class="icon-button" aria-label="Close settings" on:click=close>
							"×"
						</button>
					</div>
					<div class="modal-section">
						<label>"Graph Layout"</label>
						<div class="segmented">
							{[LayoutAlgorithm::Freeform, LayoutAlgorithm::Hierarchical]
								.into_iter()
								.map(|algorithm| {
									view! {
										<button
											class="segment"
											class:segment-active=move || layout.get() == algorithm
											on:click=move |_| layout.set(algorithm)
										>
											{algorithm.label()}
										</button>
									}
								})
								.collect_view()}
						</div>
					</div>
					<div class="modal-section modal-footer">
						<button
							class="primary-button"
							on:click=move |_| export_requests.update(|n| *n = n.wrapping_add(1))
						>
							"Export Graph as SVG"
						</button>
					</div>
				</div>
			</div>
		</Show>
	}
}
