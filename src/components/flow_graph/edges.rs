//! Connector routing between node anchors.

use std::collections::HashMap;

use super::types::{NODE_HEIGHT, NODE_WIDTH, NodeShape};
use crate::model::{GraphEdge, GraphNode, Position};

/// Control points lean this fraction of the horizontal span towards the other end.
pub const CURVE_SPAN_FRACTION: f64 = 0.1;
/// Control points sit this far below the start and above the end.
pub const CURVE_VERTICAL_PULL: f64 = 60.0;
pub const LABEL_LIFT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicCurve {
	pub start: Position,
	pub control1: Position,
	pub control2: Position,
	pub end: Position,
}

impl CubicCurve {
	/// Unit direction the curve arrives with, for arrowheads.
	pub fn end_tangent(&self) -> Position {
		let d = self.end - self.control2;
		let len = (d.x * d.x + d.y * d.y).sqrt();
		if len < f64::EPSILON {
			return Position::new(0.0, 1.0);
		}
		d / len
	}

	pub fn to_svg_path(&self) -> String {
		format!(
			"M {},{} C {},{} {},{} {},{}",
			self.start.x,
			self.start.y,
			self.control1.x,
			self.control1.y,
			self.control2.x,
			self.control2.y,
			self.end.x,
			self.end.y
		)
	}
}

pub fn route(source: &GraphNode, target: &GraphNode) -> CubicCurve {
	let target_is_right = target.position.x - source.position.x > 0.0;
	let start = NodeShape::of(source.kind).exit_anchor(source.position, target_is_right);
	let end = NodeShape::of(target.kind).entry_anchor(target.position);
	let dx = end.x - start.x;
	CubicCurve {
		start,
		control1: start + Position::new(dx * CURVE_SPAN_FRACTION, CURVE_VERTICAL_PULL),
		control2: end - Position::new(dx * CURVE_SPAN_FRACTION, CURVE_VERTICAL_PULL),
		end,
	}
}

/// Where an edge label is drawn: between the two node boxes, lifted slightly.
pub fn label_anchor(source: &GraphNode, target: &GraphNode) -> Position {
	Position::new(
		(source.position.x + target.position.x + NODE_WIDTH) / 2.0,
		(source.position.y + target.position.y + NODE_HEIGHT) / 2.0 - LABEL_LIFT,
	)
}

pub fn is_highlighted(edge: &GraphEdge, hovered: Option<&str>, active: Option<&str>) -> bool {
	let touches = |id: Option<&str>| id.is_some_and(|id| id == edge.source || id == edge.target);
	touches(hovered) || touches(active)
}

/// An edge whose endpoints both resolved.
pub struct RoutedEdge<'a> {
	pub edge: &'a GraphEdge,
	pub source: &'a GraphNode,
	pub target: &'a GraphNode,
	pub curve: CubicCurve,
}

/// Route every edge; edges with a missing endpoint are dropped silently.
pub fn route_all<'a>(nodes: &'a [GraphNode], edges: &'a [GraphEdge]) -> Vec<RoutedEdge<'a>> {
	let by_id: HashMap<&str, &GraphNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
	edges
		.iter()
		.filter_map(|edge| {
			let source = *by_id.get(edge.source.as_str())?;
			let target = *by_id.get(edge.target.as_str())?;
			Some(RoutedEdge {
				edge,
				source,
				target,
				curve: route(source, target),
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::NodeKind;

	fn node(id: &str, kind: NodeKind, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: String::new(),
			explanation: String::new(),
			code_snippet: String::new(),
			kind,
			position: Position::new(x, y),
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			id: format!("{source}->{target}"),
			source: source.into(),
			target: target.into(),
			label: None,
		}
	}

	#[test]
	fn process_exits_bottom_center_and_enters_top_center() {
		let a = node("a", NodeKind::Process, 0.0, 0.0);
		let b = node("b", NodeKind::Process, 300.0, 200.0);
		let curve = route(&a, &b);
		assert_eq!(curve.start, Position::new(NODE_WIDTH / 2.0, NODE_HEIGHT));
		assert_eq!(curve.end, Position::new(300.0 + NODE_WIDTH / 2.0, 200.0));
		assert_eq!(curve.control1, Position::new(120.0 + 30.0, NODE_HEIGHT + 60.0));
		assert_eq!(curve.control2, Position::new(420.0 - 30.0, 140.0));
	}

	#[test]
	fn decision_exits_towards_the_target_side() {
		let d = node("d", NodeKind::Decision, 100.0, 100.0);
		let right = node("r", NodeKind::Process, 400.0, 300.0);
		let left = node("l", NodeKind::Process, -200.0, 300.0);
		let below = node("b", NodeKind::Process, 100.0, 300.0);

		assert_eq!(
			route(&d, &right).start,
			Position::new(100.0 + NODE_WIDTH, 100.0 + NODE_HEIGHT / 2.0)
		);
		assert_eq!(
			route(&d, &left).start,
			Position::new(100.0, 100.0 + NODE_HEIGHT / 2.0)
		);
		assert_eq!(route(&d, &below).start.x, 100.0);
	}

	#[test]
	fn vertical_curve_arrives_pointing_down() {
		let a = node("a", NodeKind::Start, 0.0, 0.0);
		let b = node("b", NodeKind::End, 0.0, 300.0);
		let curve = route(&a, &b);
		assert_eq!(curve.start, Position::new(NODE_WIDTH / 2.0, NODE_HEIGHT));
		assert_eq!(curve.end, Position::new(NODE_WIDTH / 2.0, 300.0));
		assert_eq!(curve.end_tangent(), Position::new(0.0, 1.0));
	}

	#[test]
	fn svg_path_uses_cubic_command() {
		let a = node("a", NodeKind::Process, 0.0, 0.0);
		let b = node("b", NodeKind::Process, 0.0, 200.0);
		assert_eq!(route(&a, &b).to_svg_path(), "M 120,90 C 120,150 120,140 120,200");
	}

	#[test]
	fn highlight_follows_hover_and_active_endpoints() {
		let e = edge("a", "b");
		assert!(!is_highlighted(&e, None, None));
		assert!(is_highlighted(&e, Some("a"), None));
		assert!(is_highlighted(&e, Some("b"), None));
		assert!(is_highlighted(&e, None, Some("b")));
		assert!(!is_highlighted(&e, Some("c"), Some("d")));
	}

	#[test]
	fn dangling_edges_are_not_routed() {
		let nodes = vec![
			node("a", NodeKind::Start, 0.0, 0.0),
			node("b", NodeKind::End, 0.0, 200.0),
		];
		let edges = vec![edge("a", "b"), edge("a", "ghost"), edge("ghost", "b")];
		let routed = route_all(&nodes, &edges);
		assert_eq!(routed.len(), 1);
		assert_eq!(routed[0].edge.id, "a->b");
	}
}
