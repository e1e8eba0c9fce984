//! Pan and zoom transform between screen and canvas space.

use crate::model::Position;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_FACTOR: f64 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
	In,
	Out,
}

impl ZoomDirection {
	/// Scrolling down (positive delta) zooms out.
	pub fn from_wheel_delta(delta_y: f64) -> Self {
		if delta_y > 0.0 {
			ZoomDirection::Out
		} else {
			ZoomDirection::In
		}
	}
}

/// Pan/zoom transform: a canvas point `p` is drawn at `p * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub offset: Position,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scale: 1.0,
			offset: Position::default(),
		}
	}
}

impl Viewport {
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn canvas_to_screen(&self, p: Position) -> Position {
		p * self.scale + self.offset
	}

	pub fn screen_to_canvas(&self, p: Position) -> Position {
		(p - self.offset) / self.scale
	}

	/// Zoom one step keeping the canvas point under `anchor` (screen space) fixed.
	pub fn zoom_at(&mut self, anchor: Position, direction: ZoomDirection) {
		let target = match direction {
			ZoomDirection::In => self.scale * ZOOM_FACTOR,
			ZoomDirection::Out => self.scale / ZOOM_FACTOR,
		};
		let scale = target.clamp(MIN_SCALE, MAX_SCALE);
		let ratio = scale / self.scale;
		self.offset = anchor - (anchor - self.offset) * ratio;
		self.scale = scale;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: Position, b: Position) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
	}

	#[test]
	fn transforms_are_inverse() {
		let viewport = Viewport {
			scale: 1.7,
			offset: Position::new(-40.0, 25.5),
		};
		let p = Position::new(312.0, -88.25);
		assert!(close(
			viewport.screen_to_canvas(viewport.canvas_to_screen(p)),
			p
		));
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let cases = [
			(1.0, Position::new(0.0, 0.0), Position::new(400.0, 300.0), ZoomDirection::In),
			(0.5, Position::new(-120.0, 60.0), Position::new(15.0, 700.0), ZoomDirection::Out),
			(2.9, Position::new(33.0, -210.0), Position::new(250.0, 10.0), ZoomDirection::In),
			(0.1, Position::new(5.0, 5.0), Position::new(80.0, 80.0), ZoomDirection::Out),
		];
		for (scale, offset, mouse, direction) in cases {
			let mut viewport = Viewport { scale, offset };
			let before = viewport.screen_to_canvas(mouse);
			viewport.zoom_at(mouse, direction);
			assert!(close(viewport.screen_to_canvas(mouse), before));
		}
	}

	#[test]
	fn zoom_saturates_at_both_ends() {
		let mut viewport = Viewport::default();
		let anchor = Position::new(10.0, 10.0);
		for _ in 0..100 {
			viewport.zoom_at(anchor, ZoomDirection::In);
			assert!(viewport.scale <= MAX_SCALE);
		}
		assert_eq!(viewport.scale, MAX_SCALE);

		for _ in 0..200 {
			viewport.zoom_at(anchor, ZoomDirection::Out);
			assert!(viewport.scale >= MIN_SCALE);
		}
		assert_eq!(viewport.scale, MIN_SCALE);
	}

	#[test]
	fn wheel_direction() {
		assert_eq!(ZoomDirection::from_wheel_delta(120.0), ZoomDirection::Out);
		assert_eq!(ZoomDirection::from_wheel_delta(-3.0), ZoomDirection::In);
	}
}
