mod component;
mod edges;
mod export;
mod layout;
mod minimap;
mod render;
mod state;
mod types;
mod viewport;

pub use component::FlowGraph;
pub use types::{LayoutAlgorithm, kind_color};
