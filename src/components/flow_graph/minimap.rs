//! Scaled overview of the whole canvas with a draggable viewport rectangle.

use super::types::{NODE_HEIGHT, NODE_WIDTH, Rect, Size};
use super::viewport::Viewport;
use crate::model::{GraphNode, Position};

pub const MINIMAP_WIDTH: f64 = 200.0;
pub const MINIMAP_MARGIN: f64 = 16.0;

pub const MIN_CANVAS: Size = Size::new(1000.0, 800.0);
pub const CANVAS_PADDING: f64 = 400.0;

/// Extent of the drawable canvas: the node bounding box plus padding, never smaller
/// than [`MIN_CANVAS`].
pub fn canvas_extent(nodes: &[GraphNode]) -> Size {
	if nodes.is_empty() {
		return MIN_CANVAS;
	}
	let right = nodes
		.iter()
		.map(|n| n.position.x + NODE_WIDTH)
		.fold(f64::NEG_INFINITY, f64::max);
	let bottom = nodes
		.iter()
		.map(|n| n.position.y + NODE_HEIGHT)
		.fold(f64::NEG_INFINITY, f64::max);
	Size::new(
		(right + CANVAS_PADDING).max(MIN_CANVAS.width),
		(bottom + CANVAS_PADDING).max(MIN_CANVAS.height),
	)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiniMap {
	pub map_scale: f64,
	pub size: Size,
}

impl MiniMap {
	pub fn new(canvas: Size) -> Self {
		let map_scale = MINIMAP_WIDTH / canvas.width;
		Self {
			map_scale,
			size: Size::new(MINIMAP_WIDTH, canvas.height * map_scale),
		}
	}

	/// Top-left corner of the map inside a view of `view` size.
	pub fn screen_origin(&self, view: Size) -> Position {
		Position::new(
			view.width - self.size.width - MINIMAP_MARGIN,
			view.height - self.size.height - MINIMAP_MARGIN,
		)
	}

	pub fn screen_rect(&self, view: Size) -> Rect {
		Rect::new(self.screen_origin(view), self.size)
	}

	/// A node's box in map-local coordinates.
	pub fn node_rect(&self, node: &GraphNode) -> Rect {
		Rect::new(
			node.position * self.map_scale,
			Size::new(NODE_WIDTH * self.map_scale, NODE_HEIGHT * self.map_scale),
		)
	}

	/// The visible part of the main view, in map-local coordinates.
	pub fn viewport_rect(&self, viewport: &Viewport, view: Size) -> Rect {
		Rect::new(
			-viewport.offset * self.map_scale,
			Size::new(
				view.width / viewport.scale * self.map_scale,
				view.height / viewport.scale * self.map_scale,
			),
		)
	}

	/// Main-view offset that centers the viewport rectangle on `local`.
	pub fn centered_offset(&self, local: Position, viewport: &Viewport, view: Size) -> Position {
		let rect = self.viewport_rect(viewport, view);
		let top_left = rect.origin + (local - rect.center());
		-top_left / self.map_scale
	}

	/// Offset to apply for a press at `local`: re-center unless the press landed inside
	/// the current viewport rectangle.
	pub fn press(&self, local: Position, viewport: &Viewport, view: Size) -> Option<Position> {
		if self.viewport_rect(viewport, view).contains(local) {
			None
		} else {
			Some(self.centered_offset(local, viewport, view))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::NodeKind;

	fn node(x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: format!("{x}:{y}"),
			label: String::new(),
			explanation: String::new(),
			code_snippet: String::new(),
			kind: NodeKind::Process,
			position: Position::new(x, y),
		}
	}

	#[test]
	fn extent_pads_the_node_bounds() {
		assert_eq!(canvas_extent(&[]), MIN_CANVAS);
		assert_eq!(canvas_extent(&[node(0.0, 0.0)]), MIN_CANVAS);
		assert_eq!(
			canvas_extent(&[node(0.0, 0.0), node(1200.0, 900.0)]),
			Size::new(1200.0 + NODE_WIDTH + CANVAS_PADDING, 900.0 + NODE_HEIGHT + CANVAS_PADDING)
		);
	}

	#[test]
	fn map_keeps_the_canvas_aspect() {
		let map = MiniMap::new(Size::new(1600.0, 800.0));
		assert_eq!(map.map_scale, 0.125);
		assert_eq!(map.size, Size::new(200.0, 100.0));
	}

	#[test]
	fn viewport_rect_tracks_offset_and_scale() {
		let map = MiniMap::new(Size::new(1600.0, 1600.0));
		let viewport = Viewport {
			scale: 2.0,
			offset: Position::new(-400.0, -200.0),
		};
		let rect = map.viewport_rect(&viewport, Size::new(800.0, 600.0));
		assert_eq!(rect.origin, Position::new(50.0, 25.0));
		assert_eq!(rect.size, Size::new(50.0, 37.5));
	}

	#[test]
	fn click_round_trips_to_a_centered_rect() {
		let map = MiniMap::new(Size::new(1640.0, 1230.0));
		let view = Size::new(900.0, 640.0);
		let mut viewport = Viewport {
			scale: 1.3,
			offset: Position::new(0.0, 0.0),
		};
		let click = Position::new(150.0, 120.0);

		let offset = map.press(click, &viewport, view).expect("click outside the rect");
		viewport.offset = offset;
		let center = map.viewport_rect(&viewport, view).center();
		assert!((center.x - click.x).abs() < 1e-9);
		assert!((center.y - click.y).abs() < 1e-9);
	}

	#[test]
	fn press_inside_the_rect_does_not_jump() {
		let map = MiniMap::new(Size::new(1000.0, 800.0));
		let viewport = Viewport::default();
		let view = Size::new(500.0, 400.0);
		assert_eq!(map.press(Position::new(10.0, 10.0), &viewport, view), None);
	}

	#[test]
	fn map_sits_in_the_bottom_right_corner() {
		let map = MiniMap::new(Size::new(1600.0, 800.0));
		let origin = map.screen_origin(Size::new(1000.0, 700.0));
		assert_eq!(
			origin,
			Position::new(1000.0 - 200.0 - MINIMAP_MARGIN, 700.0 - 100.0 - MINIMAP_MARGIN)
		);
	}
}
