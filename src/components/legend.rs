use leptos::prelude::*;

use super::flow_graph::kind_color;
use crate::model::NodeKind;

#[component]
pub fn GraphLegend() -> impl IntoView {
	let items = [
		("legend-pill", NodeKind::Start, "Start / End"),
		("legend-rect", NodeKind::Process, "Process"),
		("legend-diamond", NodeKind::Decision, "Decision"),
	];
	view! {
		<div class="graph-legend">
			{items
				.into_iter()
				.map(|(shape, kind, label)| {
					view! {
						<div class="legend-item">
							<span class=format!("legend-swatch {shape}") style:border-color=kind_color(kind) />
							<span class="legend-label">{label}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}
