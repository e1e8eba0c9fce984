pub mod code_input;
pub mod console;
pub mod context_panel;
pub mod flow_graph;
pub mod legend;
pub mod settings;
