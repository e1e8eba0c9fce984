//! Standalone SVG snapshot of the diagram as currently shown.

use std::fmt::Write;

use super::edges::label_anchor;
use super::state::FlowGraphState;
use super::types::{NODE_HEIGHT, NODE_WIDTH, NodeShape, kind_color};
use crate::model::GraphNode;

pub const EXPORT_FILE_NAME: &str = "code-visualization.svg";

const EDGE_COLOR: &str = "#475569";
const EDGE_HIGHLIGHT: &str = "#38bdf8";
const NODE_FILL: &str = "#1e293b";
const TEXT_COLOR: &str = "#e2e8f0";

pub fn escape_xml(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&apos;"),
			c => out.push(c),
		}
	}
	out
}

/// Render the whole canvas extent in canvas coordinates, with nodes at their current
/// positions and the current hover/active highlighting.
pub fn to_svg_document(state: &FlowGraphState) -> String {
	let (w, h) = (state.canvas.width, state.canvas.height);
	let mut svg = String::new();
	svg.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\r\n");
	let _ = write!(
		svg,
		"<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
		 width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
	);
	svg.push_str(concat!(
		"<defs>",
		"<marker id=\"arrowhead\" viewBox=\"-5 -5 10 10\" refX=\"4\" refY=\"0\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto\">",
		"<path d=\"M 0,-4 L 5,0 L 0,4\" fill=\"#64748B\"/></marker>",
		"<marker id=\"arrowhead-highlight\" viewBox=\"-5 -5 10 10\" refX=\"4\" refY=\"0\" markerWidth=\"7\" markerHeight=\"7\" orient=\"auto\">",
		"<path d=\"M 0,-4 L 5,0 L 0,4\" fill=\"#38BDF8\"/></marker>",
		"</defs>"
	));
	let _ = write!(svg, "<rect width=\"{w}\" height=\"{h}\" fill=\"#0f172a\"/>");

	for routed in state.routed_edges() {
		let lit = state.is_edge_highlighted(routed.edge);
		let (stroke, width, marker) = if lit {
			(EDGE_HIGHLIGHT, 2.5, "arrowhead-highlight")
		} else {
			(EDGE_COLOR, 1.5, "arrowhead")
		};
		let _ = write!(
			svg,
			"<path d=\"{}\" stroke=\"{stroke}\" stroke-width=\"{width}\" fill=\"none\" marker-end=\"url(#{marker})\"/>",
			routed.curve.to_svg_path()
		);
		if let Some(label) = &routed.edge.label {
			let at = label_anchor(routed.source, routed.target);
			let _ = write!(
				svg,
				"<text x=\"{}\" y=\"{}\" fill=\"{TEXT_COLOR}\" font-size=\"14\" text-anchor=\"middle\" \
				 stroke=\"#0f172a\" stroke-width=\"4\" paint-order=\"stroke\">{}</text>",
				at.x,
				at.y,
				escape_xml(label)
			);
		}
	}

	for i in state.draw_order() {
		let node = &state.nodes[i];
		let active = state.active.as_deref() == Some(node.id.as_str());
		write_node(&mut svg, node, active);
	}

	svg.push_str("</svg>");
	svg
}

fn write_node(svg: &mut String, node: &GraphNode, active: bool) {
	let p = node.position;
	let color = kind_color(node.kind);
	let stroke_width = if active { 3 } else { 1 };
	let stroke = if active { color } else { "#334155" };
	let shape = NodeShape::of(node.kind);
	let _ = write!(svg, "<g class=\"node node-{}\">", node.kind.as_str());
	match shape {
		NodeShape::Diamond => {
			let _ = write!(
				svg,
				"<polygon points=\"{},{} {},{} {},{} {},{}\" fill=\"{NODE_FILL}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
				p.x + NODE_WIDTH / 2.0,
				p.y,
				p.x + NODE_WIDTH,
				p.y + NODE_HEIGHT / 2.0,
				p.x + NODE_WIDTH / 2.0,
				p.y + NODE_HEIGHT,
				p.x,
				p.y + NODE_HEIGHT / 2.0
			);
		}
		NodeShape::Pill | NodeShape::Rectangle => {
			let _ = write!(
				svg,
				"<rect x=\"{}\" y=\"{}\" width=\"{NODE_WIDTH}\" height=\"{NODE_HEIGHT}\" rx=\"{}\" fill=\"{NODE_FILL}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
				p.x,
				p.y,
				shape.corner_radius()
			);
		}
	}
	let _ = write!(
		svg,
		"<text x=\"{}\" y=\"{}\" fill=\"{TEXT_COLOR}\" font-size=\"14\" font-weight=\"600\" text-anchor=\"middle\">{}</text>",
		p.x + NODE_WIDTH / 2.0,
		p.y + 36.0,
		escape_xml(&node.label)
	);
	if !node.code_snippet.is_empty() {
		let _ = write!(
			svg,
			"<text x=\"{}\" y=\"{}\" fill=\"{color}\" font-size=\"12\" font-family=\"monospace\" text-anchor=\"middle\">{}</text>",
			p.x + NODE_WIDTH / 2.0,
			p.y + 60.0,
			escape_xml(node.code_snippet.lines().next().unwrap_or_default())
		);
	}
	svg.push_str("</g>");
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::LayoutAlgorithm;
	use crate::model::{GraphEdge, NodeKind, Position, VisualizationResult};

	fn state() -> FlowGraphState {
		let node = |id: &str, kind, y| GraphNode {
			id: id.into(),
			label: format!("<{id}> & co"),
			explanation: String::new(),
			code_snippet: "if (n < 2)".into(),
			kind,
			position: Position::new(50.0, y),
		};
		let result = VisualizationResult {
			nodes: vec![node("a", NodeKind::Decision, 0.0), node("b", NodeKind::End, 300.0)],
			edges: vec![
				GraphEdge {
					id: "e1".into(),
					source: "a".into(),
					target: "b".into(),
					label: Some("true".into()),
				},
				GraphEdge {
					id: "e2".into(),
					source: "a".into(),
					target: "ghost".into(),
					label: None,
				},
			],
			execution_trace: Vec::new(),
		};
		let mut state = FlowGraphState::new(800.0, 600.0);
		state.load(Some(&result), LayoutAlgorithm::Freeform);
		state
	}

	#[test]
	fn document_is_standalone() {
		let svg = to_svg_document(&state());
		assert!(svg.starts_with("<?xml version=\"1.0\" standalone=\"no\"?>\r\n<svg"));
		assert!(svg.contains("xmlns=\"http://www.w3.org/2000/svg\""));
		assert!(svg.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
		assert!(svg.ends_with("</svg>"));
	}

	#[test]
	fn document_contains_shapes_edges_and_escaped_text() {
		let svg = to_svg_document(&state());
		assert_eq!(svg.matches("<polygon").count(), 1);
		assert_eq!(svg.matches("rx=\"16\"").count(), 1);
		assert_eq!(svg.matches("marker-end=").count(), 1);
		assert!(svg.contains("&lt;a&gt; &amp; co"));
		assert!(svg.contains("if (n &lt; 2)"));
		assert!(svg.contains(">true</text>"));
		assert!(svg.contains("<g class=\"node node-decision\">"));
	}

	#[test]
	fn highlight_is_exported() {
		let mut state = state();
		assert!(!to_svg_document(&state).contains("url(#arrowhead-highlight)"));
		state.set_active(Some("b".into()));
		assert!(to_svg_document(&state).contains("url(#arrowhead-highlight)"));
	}
}
