//! Diagram state driven by pointer input and drawn each frame.

use log::debug;

use super::edges::{self, RoutedEdge};
use super::layout::hierarchical_layout;
use super::minimap::{MiniMap, canvas_extent};
use super::types::{LayoutAlgorithm, NodeShape, Size};
use super::viewport::{Viewport, ZoomDirection};
use crate::model::{GraphEdge, GraphNode, Position, VisualizationResult};

/// What pointer movement currently means. Exactly one drag kind at a time; a new one
/// can only start from `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerMode {
	#[default]
	Idle,
	/// `anchor` is the pointer position minus the offset at press time.
	Panning { anchor: Position },
	/// `grab_offset` is pointer minus node position, in canvas space.
	DraggingNode { node: usize, grab_offset: Position },
	DraggingMinimap,
	ResizingConsole,
}

pub struct FlowGraphState {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub layout: LayoutAlgorithm,
	pub viewport: Viewport,
	pub pointer: PointerMode,
	pub hovered: Option<usize>,
	pub active: Option<String>,
	pub width: f64,
	pub height: f64,
	pub canvas: Size,
}

impl FlowGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			layout: LayoutAlgorithm::default(),
			viewport: Viewport::default(),
			pointer: PointerMode::Idle,
			hovered: None,
			active: None,
			width,
			height,
			canvas: canvas_extent(&[]),
		}
	}

	/// Replace the diagram. Resets the viewport and ends any canvas drag.
	pub fn load(&mut self, result: Option<&VisualizationResult>, layout: LayoutAlgorithm) {
		let (nodes, edges) = match result {
			Some(r) if layout == LayoutAlgorithm::Hierarchical => {
				(hierarchical_layout(&r.nodes, &r.edges), r.edges.clone())
			}
			Some(r) => (r.nodes.clone(), r.edges.clone()),
			None => (Vec::new(), Vec::new()),
		};
		debug!(
			"loading {} nodes, {} edges with {:?} layout",
			nodes.len(),
			edges.len(),
			layout
		);
		self.nodes = nodes;
		self.edges = edges;
		self.layout = layout;
		self.viewport.reset();
		self.hovered = None;
		if self.pointer != PointerMode::ResizingConsole {
			self.pointer = PointerMode::Idle;
		}
		self.canvas = canvas_extent(&self.nodes);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn view_size(&self) -> Size {
		Size::new(self.width, self.height)
	}

	pub fn set_active(&mut self, node_id: Option<String>) {
		self.active = node_id;
	}

	pub fn minimap(&self) -> Option<MiniMap> {
		(!self.nodes.is_empty()).then(|| MiniMap::new(self.canvas))
	}

	pub fn screen_to_graph(&self, screen: Position) -> Position {
		self.viewport.screen_to_canvas(screen)
	}

	/// Topmost node under a screen point.
	pub fn node_at_position(&self, screen: Position) -> Option<usize> {
		let p = self.screen_to_graph(screen);
		self.draw_order()
			.rev()
			.find(|&i| NodeShape::of(self.nodes[i].kind).contains(self.nodes[i].position, p))
	}

	/// Node indices back to front; the dragged node is drawn last.
	pub fn draw_order(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
		let dragged = self.dragged_node();
		(0..self.nodes.len())
			.filter(move |&i| Some(i) != dragged)
			.chain(dragged)
	}

	pub fn dragged_node(&self) -> Option<usize> {
		match self.pointer {
			PointerMode::DraggingNode { node, .. } => Some(node),
			_ => None,
		}
	}

	pub fn hovered_id(&self) -> Option<&str> {
		self.hovered
			.and_then(|i| self.nodes.get(i))
			.map(|n| n.id.as_str())
	}

	/// Tooltip target: the hovered node unless a node is being dragged.
	pub fn tooltip_node(&self) -> Option<&GraphNode> {
		if self.dragged_node().is_some() {
			return None;
		}
		self.hovered.and_then(|i| self.nodes.get(i))
	}

	pub fn cursor(&self) -> &'static str {
		match self.pointer {
			PointerMode::Panning { .. }
			| PointerMode::DraggingNode { .. }
			| PointerMode::DraggingMinimap => "grabbing",
			PointerMode::ResizingConsole => "ns-resize",
			PointerMode::Idle if self.hovered.is_some() && !self.layout.allows_drag() => "pointer",
			PointerMode::Idle => "grab",
		}
	}

	pub fn routed_edges(&self) -> Vec<RoutedEdge<'_>> {
		edges::route_all(&self.nodes, &self.edges)
	}

	pub fn is_edge_highlighted(&self, edge: &GraphEdge) -> bool {
		edges::is_highlighted(edge, self.hovered_id(), self.active.as_deref())
	}

	fn minimap_local(&self, screen: Position) -> Option<(MiniMap, Position)> {
		let map = self.minimap()?;
		let rect = map.screen_rect(self.view_size());
		rect.contains(screen).then(|| (map, screen - rect.origin))
	}

	pub fn pointer_down(&mut self, screen: Position) {
		if self.pointer != PointerMode::Idle {
			return;
		}
		if let Some((map, local)) = self.minimap_local(screen) {
			if let Some(offset) = map.press(local, &self.viewport, self.view_size()) {
				self.viewport.offset = offset;
			}
			self.pointer = PointerMode::DraggingMinimap;
			return;
		}
		if let Some(node) = self.node_at_position(screen) {
			if self.layout.allows_drag() {
				let grab_offset = self.screen_to_graph(screen) - self.nodes[node].position;
				self.pointer = PointerMode::DraggingNode { node, grab_offset };
				self.hovered = None;
			}
			return;
		}
		self.pointer = PointerMode::Panning {
			anchor: screen - self.viewport.offset,
		};
	}

	pub fn pointer_move(&mut self, screen: Position) {
		match self.pointer {
			PointerMode::Idle | PointerMode::Panning { .. } => {
				self.hovered = if self.minimap_local(screen).is_some() {
					None
				} else {
					self.node_at_position(screen)
				};
				if let PointerMode::Panning { anchor } = self.pointer {
					self.viewport.offset = screen - anchor;
				}
			}
			PointerMode::DraggingNode { node, grab_offset } => {
				if let Some(n) = self.nodes.get_mut(node) {
					n.position = self.viewport.screen_to_canvas(screen) - grab_offset;
				}
				self.canvas = canvas_extent(&self.nodes);
			}
			PointerMode::DraggingMinimap => {
				if let Some(map) = self.minimap() {
					let local = screen - map.screen_origin(self.view_size());
					self.viewport.offset =
						map.centered_offset(local, &self.viewport, self.view_size());
				}
			}
			PointerMode::ResizingConsole => {}
		}
	}

	pub fn pointer_up(&mut self) {
		self.end_canvas_drag();
	}

	pub fn pointer_leave(&mut self) {
		self.end_canvas_drag();
		self.hovered = None;
	}

	fn end_canvas_drag(&mut self) {
		if self.pointer != PointerMode::ResizingConsole {
			self.pointer = PointerMode::Idle;
		}
	}

	pub fn wheel(&mut self, screen: Position, delta_y: f64) {
		self.viewport
			.zoom_at(screen, ZoomDirection::from_wheel_delta(delta_y));
	}

	/// Enter console resizing. Refused while any other drag is active.
	pub fn begin_console_resize(&mut self) -> bool {
		if self.pointer != PointerMode::Idle {
			return false;
		}
		self.pointer = PointerMode::ResizingConsole;
		true
	}

	pub fn end_console_resize(&mut self) {
		if self.pointer == PointerMode::ResizingConsole {
			self.pointer = PointerMode::Idle;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::{NODE_HEIGHT, NODE_WIDTH};
	use crate::model::NodeKind;

	fn node(id: &str, kind: NodeKind, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			explanation: format!("{id} explained"),
			code_snippet: String::new(),
			kind,
			position: Position::new(x, y),
		}
	}

	fn result() -> VisualizationResult {
		VisualizationResult {
			nodes: vec![
				node("a", NodeKind::Start, 100.0, 100.0),
				node("b", NodeKind::Process, 100.0, 400.0),
				node("c", NodeKind::End, 600.0, 400.0),
			],
			edges: vec![GraphEdge {
				id: "e1".into(),
				source: "a".into(),
				target: "b".into(),
				label: None,
			}],
			execution_trace: Vec::new(),
		}
	}

	fn loaded(layout: LayoutAlgorithm) -> FlowGraphState {
		let mut state = FlowGraphState::new(1200.0, 900.0);
		state.load(Some(&result()), layout);
		state
	}

	#[test]
	fn drag_keeps_the_grab_offset() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		state.pointer_down(Position::new(110.0, 110.0));
		assert!(matches!(state.pointer, PointerMode::DraggingNode { node: 0, .. }));

		state.pointer_move(Position::new(150.0, 130.0));
		assert_eq!(state.nodes[0].position, Position::new(140.0, 120.0));
		assert_eq!(state.nodes[1].position, Position::new(100.0, 400.0));

		state.pointer_up();
		assert_eq!(state.pointer, PointerMode::Idle);
		assert_eq!(state.nodes[0].position, Position::new(140.0, 120.0));
	}

	#[test]
	fn drag_respects_zoom_and_pan() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		state.viewport = Viewport {
			scale: 2.0,
			offset: Position::new(-50.0, 20.0),
		};
		// canvas (110, 110) is at screen (170, 240)
		state.pointer_down(Position::new(170.0, 240.0));
		state.pointer_move(Position::new(270.0, 300.0));
		assert_eq!(state.nodes[0].position, Position::new(150.0, 130.0));
	}

	#[test]
	fn hierarchical_layout_disables_drag_and_pan_on_nodes() {
		let mut state = loaded(LayoutAlgorithm::Hierarchical);
		let origin = state.nodes[0].position;
		let screen = state.viewport.canvas_to_screen(origin + Position::new(10.0, 10.0));
		state.pointer_down(screen);
		assert_eq!(state.pointer, PointerMode::Idle);
		state.pointer_move(screen + Position::new(50.0, 50.0));
		assert_eq!(state.nodes[0].position, origin);
	}

	#[test]
	fn background_press_pans() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		state.pointer_down(Position::new(20.0, 20.0));
		assert!(matches!(state.pointer, PointerMode::Panning { .. }));
		state.pointer_move(Position::new(70.0, -10.0));
		assert_eq!(state.viewport.offset, Position::new(50.0, -30.0));
		state.pointer_leave();
		assert_eq!(state.pointer, PointerMode::Idle);
		state.pointer_move(Position::new(500.0, 500.0));
		assert_eq!(state.viewport.offset, Position::new(50.0, -30.0));
	}

	#[test]
	fn hover_is_frozen_while_dragging() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		state.pointer_move(Position::new(150.0, 450.0));
		assert_eq!(state.hovered_id(), Some("b"));
		assert!(state.is_edge_highlighted(&state.edges[0]));

		state.pointer_down(Position::new(110.0, 110.0));
		state.pointer_move(Position::new(150.0, 430.0));
		assert_eq!(state.hovered, None);
		assert!(state.tooltip_node().is_none());
	}

	#[test]
	fn cursor_follows_pointer_mode() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		assert_eq!(state.cursor(), "grab");
		state.pointer_down(Position::new(110.0, 110.0));
		assert_eq!(state.cursor(), "grabbing");
		state.pointer_up();

		let mut state = loaded(LayoutAlgorithm::Hierarchical);
		let over = state
			.viewport
			.canvas_to_screen(state.nodes[0].position + Position::new(5.0, 45.0));
		state.pointer_move(over);
		assert_eq!(state.cursor(), "pointer");
	}

	#[test]
	fn drag_kinds_are_mutually_exclusive() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		state.pointer_down(Position::new(20.0, 20.0));
		assert!(!state.begin_console_resize());
		state.pointer_up();

		assert!(state.begin_console_resize());
		state.pointer_down(Position::new(20.0, 20.0));
		assert_eq!(state.pointer, PointerMode::ResizingConsole);
		state.pointer_move(Position::new(90.0, 90.0));
		assert_eq!(state.viewport.offset, Position::default());
		state.pointer_leave();
		assert_eq!(state.pointer, PointerMode::ResizingConsole);
		state.end_console_resize();
		assert_eq!(state.pointer, PointerMode::Idle);
	}

	#[test]
	fn minimap_press_recenters_main_view() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		// park the main view far away so every map press lands outside its rect
		state.viewport.offset = Position::new(-5000.0, -5000.0);
		let map = state.minimap().unwrap();
		let origin = map.screen_origin(state.view_size());
		let local = Position::new(map.size.width - 5.0, map.size.height - 5.0);

		state.pointer_down(origin + local);
		assert_eq!(state.pointer, PointerMode::DraggingMinimap);
		let center = map.viewport_rect(&state.viewport, state.view_size()).center();
		assert!((center.x - local.x).abs() < 1e-9 && (center.y - local.y).abs() < 1e-9);

		let next = local - Position::new(20.0, 10.0);
		state.pointer_move(origin + next);
		let center = map.viewport_rect(&state.viewport, state.view_size()).center();
		assert!((center.x - next.x).abs() < 1e-9 && (center.y - next.y).abs() < 1e-9);
	}

	#[test]
	fn load_resets_the_viewport() {
		let mut state = loaded(LayoutAlgorithm::Freeform);
		state.wheel(Position::new(300.0, 300.0), -1.0);
		state.pointer_down(Position::new(20.0, 20.0));
		state.load(Some(&result()), LayoutAlgorithm::Hierarchical);
		assert_eq!(state.viewport, Viewport::default());
		assert_eq!(state.pointer, PointerMode::Idle);

		state.load(None, LayoutAlgorithm::Hierarchical);
		assert!(state.nodes.is_empty());
		assert!(state.minimap().is_none());
	}

	#[test]
	fn diamond_hit_test_ignores_corners() {
		let mut state = FlowGraphState::new(800.0, 600.0);
		let mut r = result();
		r.nodes = vec![node("d", NodeKind::Decision, 0.0, 0.0)];
		state.load(Some(&r), LayoutAlgorithm::Freeform);
		assert_eq!(
			state.node_at_position(Position::new(NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0)),
			Some(0)
		);
		assert_eq!(state.node_at_position(Position::new(2.0, 2.0)), None);
	}
}
