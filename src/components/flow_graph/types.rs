//! Node geometry, layout choices and kind colors.

use crate::model::{NodeKind, Position};

pub const NODE_WIDTH: f64 = 240.0;
pub const NODE_HEIGHT: f64 = 90.0;

/// Who owns node positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutAlgorithm {
	/// Positions as supplied by the analysis; nodes can be dragged.
	#[default]
	Freeform,
	/// Breadth-first layered layout; positions are algorithm-owned.
	Hierarchical,
}

impl LayoutAlgorithm {
	pub fn label(self) -> &'static str {
		match self {
			LayoutAlgorithm::Freeform => "AI positions",
			LayoutAlgorithm::Hierarchical => "Hierarchical",
		}
	}

	pub fn allows_drag(self) -> bool {
		self == LayoutAlgorithm::Freeform
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub origin: Position,
	pub size: Size,
}

impl Rect {
	pub const fn new(origin: Position, size: Size) -> Self {
		Self { origin, size }
	}

	pub fn contains(&self, p: Position) -> bool {
		p.x >= self.origin.x
			&& p.x <= self.origin.x + self.size.width
			&& p.y >= self.origin.y
			&& p.y <= self.origin.y + self.size.height
	}

	pub fn center(&self) -> Position {
		Position::new(
			self.origin.x + self.size.width / 2.0,
			self.origin.y + self.size.height / 2.0,
		)
	}
}

/// Outline a node is drawn with, and where its edges attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
	Pill,
	Rectangle,
	Diamond,
}

impl NodeShape {
	pub fn of(kind: NodeKind) -> Self {
		match kind {
			NodeKind::Start | NodeKind::End => NodeShape::Pill,
			NodeKind::Process => NodeShape::Rectangle,
			NodeKind::Decision => NodeShape::Diamond,
		}
	}

	/// Where an outgoing edge leaves a node whose top-left corner is `origin`.
	pub fn exit_anchor(self, origin: Position, target_is_right: bool) -> Position {
		match self {
			NodeShape::Diamond if target_is_right => {
				origin + Position::new(NODE_WIDTH, NODE_HEIGHT / 2.0)
			}
			NodeShape::Diamond => origin + Position::new(0.0, NODE_HEIGHT / 2.0),
			NodeShape::Pill | NodeShape::Rectangle => {
				origin + Position::new(NODE_WIDTH / 2.0, NODE_HEIGHT)
			}
		}
	}

	/// Where an incoming edge enters. Same for every shape.
	pub fn entry_anchor(self, origin: Position) -> Position {
		origin + Position::new(NODE_WIDTH / 2.0, 0.0)
	}

	/// Hit test in canvas space against the node box at `origin`.
	pub fn contains(self, origin: Position, p: Position) -> bool {
		let local = p - origin;
		match self {
			NodeShape::Diamond => {
				let dx = (local.x - NODE_WIDTH / 2.0).abs() / (NODE_WIDTH / 2.0);
				let dy = (local.y - NODE_HEIGHT / 2.0).abs() / (NODE_HEIGHT / 2.0);
				dx + dy <= 1.0
			}
			NodeShape::Pill | NodeShape::Rectangle => {
				(0.0..=NODE_WIDTH).contains(&local.x) && (0.0..=NODE_HEIGHT).contains(&local.y)
			}
		}
	}

	/// Corner radius for the rounded shapes.
	pub fn corner_radius(self) -> f64 {
		match self {
			NodeShape::Pill => 16.0,
			NodeShape::Rectangle => 8.0,
			NodeShape::Diamond => 0.0,
		}
	}
}

/// Accent color per node kind, shared by the canvas, legend and SVG export.
pub fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Start => "#34d399",
		NodeKind::End => "#fb7185",
		NodeKind::Process => "#38bdf8",
		NodeKind::Decision => "#fbbf24",
	}
}
