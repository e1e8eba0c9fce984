//! Breadth-first layered layout.
//!
//! Levels are BFS depths from a single root. A node reachable along several paths keeps
//! the first depth it is discovered at, so at merge points it can sit above a
//! predecessor that is only reached along a longer path.

use std::collections::{HashMap, VecDeque};

use super::types::{NODE_HEIGHT, NODE_WIDTH};
use crate::model::{GraphEdge, GraphNode, NodeKind, Position};

pub const HORIZONTAL_SPACING: f64 = 100.0;
pub const VERTICAL_SPACING: f64 = 80.0;
pub const TOP_MARGIN: f64 = 50.0;
pub const LEFT_MARGIN: f64 = 50.0;

const COLUMN: f64 = NODE_WIDTH + HORIZONTAL_SPACING;
const ROW: f64 = NODE_HEIGHT + VERTICAL_SPACING;

/// Reposition `nodes` into layers. Returns a copy in input order; if no root can be
/// chosen the input comes back unchanged.
pub fn hierarchical_layout(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<GraphNode> {
	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.rev()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	let mut adjacency = vec![Vec::new(); nodes.len()];
	let mut in_degree = vec![0usize; nodes.len()];
	for edge in edges {
		let (Some(&src), Some(&tgt)) = (
			index.get(edge.source.as_str()),
			index.get(edge.target.as_str()),
		) else {
			continue;
		};
		adjacency[src].push(tgt);
		in_degree[tgt] += 1;
	}

	let Some(root) = nodes
		.iter()
		.position(|n| n.kind == NodeKind::Start)
		.or_else(|| in_degree.iter().position(|&d| d == 0))
	else {
		return nodes.to_vec();
	};

	let levels = bfs_levels(root, &adjacency);
	let widest = levels.iter().map(Vec::len).max().unwrap_or(0);
	let total_width = row_width(widest);

	let mut positions: Vec<Option<Position>> = vec![None; nodes.len()];
	for (depth, level) in levels.iter().enumerate() {
		let start_x = (total_width - row_width(level.len())) / 2.0;
		let y = TOP_MARGIN + depth as f64 * ROW;
		for (slot, &node) in level.iter().enumerate() {
			positions[node] = Some(Position::new(start_x + slot as f64 * COLUMN, y));
		}
	}

	let mut stray_y = TOP_MARGIN + levels.len() as f64 * ROW;
	nodes
		.iter()
		.zip(positions)
		.map(|(node, placed)| {
			let position = placed.unwrap_or_else(|| {
				let p = Position::new(LEFT_MARGIN, stray_y);
				stray_y += ROW;
				p
			});
			GraphNode {
				position,
				..node.clone()
			}
		})
		.collect()
}

/// Node indices grouped by depth, each group in discovery order.
fn bfs_levels(root: usize, adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
	let mut levels: Vec<Vec<usize>> = Vec::new();
	let mut visited = vec![false; adjacency.len()];
	let mut queue = VecDeque::from([(root, 0usize)]);
	visited[root] = true;

	while let Some((node, depth)) = queue.pop_front() {
		if levels.len() <= depth {
			levels.resize_with(depth + 1, Vec::new);
		}
		levels[depth].push(node);
		for &next in &adjacency[node] {
			if !visited[next] {
				visited[next] = true;
				queue.push_back((next, depth + 1));
			}
		}
	}
	levels
}

fn row_width(count: usize) -> f64 {
	if count == 0 {
		return 0.0;
	}
	count as f64 * COLUMN - HORIZONTAL_SPACING
}
