use web_sys::CanvasRenderingContext2d;

use super::edges::{RoutedEdge, label_anchor};
use super::state::FlowGraphState;
use super::types::{NODE_HEIGHT, NODE_WIDTH, NodeShape, kind_color};
use crate::model::{GraphNode, Position};

const BACKGROUND: &str = "#0f172a";
const GRID_DOT: &str = "rgba(148, 163, 184, 0.18)";
const GRID_STEP: f64 = 24.0;
const NODE_FILL: &str = "#1e293b";
const NODE_BORDER: &str = "#334155";
const TEXT: &str = "#e2e8f0";
const EDGE: &str = "#475569";
const EDGE_HIGHLIGHT: &str = "#38bdf8";
const ARROW_SIZE: f64 = 9.0;

const LABEL_CHARS: usize = 26;
const SNIPPET_CHARS: usize = 30;
const TOOLTIP_WIDTH: f64 = 280.0;
const TOOLTIP_CHARS: usize = 40;
const TOOLTIP_LINE: f64 = 18.0;

pub fn render(state: &FlowGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.viewport.offset.x, state.viewport.offset.y);
	let _ = ctx.scale(state.viewport.scale, state.viewport.scale);
	let routed = state.routed_edges();
	draw_edges(state, &routed, ctx);
	draw_nodes(state, ctx);
	draw_edge_labels(&routed, ctx);
	ctx.restore();

	if let Some(node) = state.tooltip_node() {
		draw_tooltip(state, node, ctx);
	}
	draw_minimap(state, ctx);
}

/// Dot grid in screen space, phase-locked to the viewport so it pans with the diagram.
fn draw_grid(state: &FlowGraphState, ctx: &CanvasRenderingContext2d) {
	let step = GRID_STEP * state.viewport.scale;
	if step < 6.0 {
		return;
	}
	let start_x = state.viewport.offset.x.rem_euclid(step);
	let start_y = state.viewport.offset.y.rem_euclid(step);
	ctx.set_fill_style_str(GRID_DOT);
	let mut y = start_y;
	while y < state.height {
		let mut x = start_x;
		while x < state.width {
			ctx.fill_rect(x - 1.0, y - 1.0, 2.0, 2.0);
			x += step;
		}
		y += step;
	}
}

fn draw_edges(state: &FlowGraphState, routed: &[RoutedEdge<'_>], ctx: &CanvasRenderingContext2d) {
	// highlighted edges go last so they sit on top
	let (lit, dim): (Vec<_>, Vec<_>) = routed
		.iter()
		.partition(|r| state.is_edge_highlighted(r.edge));
	for (edges, color, width) in [(dim, EDGE, 1.5), (lit, EDGE_HIGHLIGHT, 2.5)] {
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(width);
		for r in edges {
			let c = r.curve;
			ctx.begin_path();
			ctx.move_to(c.start.x, c.start.y);
			ctx.bezier_curve_to(
				c.control1.x,
				c.control1.y,
				c.control2.x,
				c.control2.y,
				c.end.x,
				c.end.y,
			);
			ctx.stroke();
			draw_arrowhead(ctx, c.end, c.end_tangent());
		}
	}
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip: Position, dir: Position) {
	let back = tip - dir * ARROW_SIZE;
	let side = Position::new(-dir.y, dir.x) * (ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back.x + side.x, back.y + side.y);
	ctx.line_to(back.x - side.x, back.y - side.y);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_labels(routed: &[RoutedEdge<'_>], ctx: &CanvasRenderingContext2d) {
	ctx.set_font("13px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_line_width(4.0);
	ctx.set_stroke_style_str(BACKGROUND);
	ctx.set_fill_style_str(TEXT);
	for r in routed {
		let Some(label) = &r.edge.label else {
			continue;
		};
		let at = label_anchor(r.source, r.target);
		let _ = ctx.stroke_text(label, at.x, at.y);
		let _ = ctx.fill_text(label, at.x, at.y);
	}
}

fn draw_nodes(state: &FlowGraphState, ctx: &CanvasRenderingContext2d) {
	let hovered = state.hovered;
	for i in state.draw_order() {
		let node = &state.nodes[i];
		let active = state.active.as_deref() == Some(node.id.as_str());
		let color = kind_color(node.kind);

		if active {
			ctx.set_shadow_color(color);
			ctx.set_shadow_blur(18.0);
		}
		trace_shape(ctx, node);
		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill();
		ctx.set_shadow_blur(0.0);

		let (border, width) = if active {
			(color, 3.0)
		} else if hovered == Some(i) {
			(color, 2.0)
		} else {
			(NODE_BORDER, 1.0)
		};
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(width);
		ctx.stroke();

		if NodeShape::of(node.kind) != NodeShape::Diamond {
			// kind stripe along the left edge
			ctx.set_fill_style_str(color);
			ctx.fill_rect(node.position.x + 6.0, node.position.y + 20.0, 3.0, NODE_HEIGHT - 40.0);
		}

		let cx = node.position.x + NODE_WIDTH / 2.0;
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str(TEXT);
		ctx.set_font("600 14px sans-serif");
		let _ = ctx.fill_text(
			&truncate_chars(&node.label, LABEL_CHARS),
			cx,
			node.position.y + 36.0,
		);
		if let Some(line) = node.code_snippet.lines().next() {
			ctx.set_fill_style_str(color);
			ctx.set_font("12px monospace");
			let _ = ctx.fill_text(
				&truncate_chars(line.trim(), SNIPPET_CHARS),
				cx,
				node.position.y + 60.0,
			);
		}
	}
}

/// Leave the outline of `node` as the current path.
fn trace_shape(ctx: &CanvasRenderingContext2d, node: &GraphNode) {
	let Position { x, y } = node.position;
	let shape = NodeShape::of(node.kind);
	ctx.begin_path();
	match shape {
		NodeShape::Diamond => {
			ctx.move_to(x + NODE_WIDTH / 2.0, y);
			ctx.line_to(x + NODE_WIDTH, y + NODE_HEIGHT / 2.0);
			ctx.line_to(x + NODE_WIDTH / 2.0, y + NODE_HEIGHT);
			ctx.line_to(x, y + NODE_HEIGHT / 2.0);
		}
		NodeShape::Pill | NodeShape::Rectangle => {
			rounded_rect(ctx, x, y, NODE_WIDTH, NODE_HEIGHT, shape.corner_radius());
		}
	}
	ctx.close_path();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let (right, bottom) = (x + w, y + h);
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(right, y, right, bottom, r);
	let _ = ctx.arc_to(right, bottom, x, bottom, r);
	let _ = ctx.arc_to(x, bottom, x, y, r);
	let _ = ctx.arc_to(x, y, right, y, r);
}

fn draw_tooltip(state: &FlowGraphState, node: &GraphNode, ctx: &CanvasRenderingContext2d) {
	let lines = wrap_words(&node.explanation, TOOLTIP_CHARS);
	if lines.is_empty() {
		return;
	}
	let anchor = state
		.viewport
		.canvas_to_screen(node.position + Position::new(NODE_WIDTH / 2.0, 0.0));
	let height = 20.0 + TOOLTIP_LINE * lines.len() as f64;
	let x = (anchor.x - TOOLTIP_WIDTH / 2.0).clamp(8.0, (state.width - TOOLTIP_WIDTH - 8.0).max(8.0));
	let mut y = anchor.y - height - 12.0;
	if y < 8.0 {
		// no room above, flip below the node
		y = state
			.viewport
			.canvas_to_screen(node.position + Position::new(0.0, NODE_HEIGHT))
			.y + 12.0;
	}

	ctx.set_fill_style_str("rgba(2, 6, 23, 0.94)");
	ctx.set_stroke_style_str(NODE_BORDER);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	rounded_rect(ctx, x, y, TOOLTIP_WIDTH, height, 6.0);
	ctx.close_path();
	ctx.fill();
	ctx.stroke();

	ctx.set_fill_style_str(TEXT);
	ctx.set_font("13px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 10.0, y + 10.0 + TOOLTIP_LINE * i as f64);
	}
}

fn draw_minimap(state: &FlowGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(map) = state.minimap() else {
		return;
	};
	let view = state.view_size();
	let origin = map.screen_origin(view);

	ctx.save();
	ctx.set_fill_style_str("rgba(15, 23, 42, 0.85)");
	ctx.fill_rect(origin.x, origin.y, map.size.width, map.size.height);
	ctx.set_stroke_style_str(NODE_BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(origin.x, origin.y, map.size.width, map.size.height);

	ctx.begin_path();
	ctx.rect(origin.x, origin.y, map.size.width, map.size.height);
	ctx.clip();

	for node in &state.nodes {
		let r = map.node_rect(node);
		ctx.set_fill_style_str(kind_color(node.kind));
		ctx.fill_rect(origin.x + r.origin.x, origin.y + r.origin.y, r.size.width, r.size.height);
	}

	let v = map.viewport_rect(&state.viewport, view);
	ctx.set_fill_style_str("rgba(56, 189, 248, 0.12)");
	ctx.fill_rect(origin.x + v.origin.x, origin.y + v.origin.y, v.size.width, v.size.height);
	ctx.set_stroke_style_str(EDGE_HIGHLIGHT);
	ctx.set_line_width(1.5);
	ctx.stroke_rect(origin.x + v.origin.x, origin.y + v.origin.y, v.size.width, v.size.height);
	ctx.restore();
}

pub fn truncate_chars(text: &str, max: usize) -> String {
	if text.chars().count() <= max {
		return text.to_string();
	}
	let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
	out.push('…');
	out
}

/// Greedy word wrap by character count. Words longer than a line are kept whole.
pub fn wrap_words(text: &str, max: usize) -> Vec<String> {
	let mut lines = Vec::new();
	let mut line = String::new();
	for word in text.split_whitespace() {
		let needed = if line.is_empty() {
			word.chars().count()
		} else {
			line.chars().count() + 1 + word.chars().count()
		};
		if needed > max && !line.is_empty() {
			lines.push(std::mem::take(&mut line));
		}
		if !line.is_empty() {
			line.push(' ');
		}
		line.push_str(word);
	}
	if !line.is_empty() {
		lines.push(line);
	}
	lines
}
