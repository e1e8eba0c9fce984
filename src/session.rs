//! Visualization session: code, result, trace cursor and breakpoints, with explicit
//! transitions for every user action.

use log::{debug, error, info};

use crate::error::AnalysisError;
use crate::model::{ExecutionStep, VisualizationResult};
use crate::trace::{Breakpoints, TraceStepper};

/// Handle for one in-flight analysis call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
	pub id: u64,
	pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
	code: String,
	result: Option<VisualizationResult>,
	stepper: TraceStepper,
	breakpoints: Breakpoints,
	pending: Option<u64>,
	next_request: u64,
	error: Option<String>,
	generation: u64,
}

impl Session {
	pub fn new(code: impl Into<String>) -> Self {
		Self {
			code: code.into(),
			..Self::default()
		}
	}

	pub fn code(&self) -> &str {
		&self.code
	}

	pub fn result(&self) -> Option<&VisualizationResult> {
		self.result.as_ref()
	}

	/// Bumped whenever the result is replaced or discarded.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn breakpoints(&self) -> &Breakpoints {
		&self.breakpoints
	}

	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	pub fn is_loading(&self) -> bool {
		self.pending.is_some()
	}

	pub fn step_index(&self) -> usize {
		self.stepper.index()
	}

	pub fn total_steps(&self) -> usize {
		self.stepper.len()
	}

	pub fn current_step(&self) -> Option<&ExecutionStep> {
		let result = self.result.as_ref()?;
		self.stepper.current(&result.execution_trace)
	}

	pub fn active_node_id(&self) -> Option<&str> {
		self.current_step().map(|step| step.node_id.as_str())
	}

	pub fn highlighted_line(&self) -> Option<u32> {
		self.current_step().map(|step| step.line)
	}

	pub fn can_step_back(&self) -> bool {
		self.result.is_some() && !self.stepper.is_first()
	}

	pub fn can_step_forward(&self) -> bool {
		self.result.is_some() && !self.stepper.is_last()
	}

	pub fn can_continue(&self) -> bool {
		self.result.is_some() && self.stepper.can_continue(&self.breakpoints)
	}

	/// Editing the source invalidates any loaded result. Breakpoints stay.
	/// A pending request is not cancelled and still lands for the code it was sent with.
	pub fn edit_code(&mut self, code: impl Into<String>) {
		self.code = code.into();
		if self.result.take().is_some() {
			debug!("source edited, discarding visualization");
			self.stepper = TraceStepper::default();
			self.generation += 1;
		}
	}

	pub fn toggle_breakpoint(&mut self, line: u32) -> bool {
		let set = self.breakpoints.toggle(line);
		debug!("breakpoint on line {line}: {}", if set { "set" } else { "cleared" });
		set
	}

	pub fn clear_breakpoints(&mut self) {
		debug!("clearing {} breakpoints", self.breakpoints.len());
		self.breakpoints.clear();
	}

	pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, AnalysisError> {
		if self.pending.is_some() {
			return Err(AnalysisError::Busy);
		}
		if self.code.trim().is_empty() {
			self.error = Some(AnalysisError::EmptySource.to_string());
			return Err(AnalysisError::EmptySource);
		}
		self.next_request += 1;
		let id = self.next_request;
		self.pending = Some(id);
		self.error = None;
		if self.result.take().is_some() {
			self.generation += 1;
		}
		self.stepper = TraceStepper::default();
		info!("analysis request {id} started");
		Ok(AnalysisRequest {
			id,
			code: self.code.clone(),
		})
	}

	/// Apply the outcome of a request. Outcomes for anything but the pending request
	/// are dropped.
	pub fn finish_analysis(
		&mut self,
		id: u64,
		outcome: Result<VisualizationResult, AnalysisError>,
	) -> bool {
		if self.pending != Some(id) {
			debug!("ignoring stale analysis response {id}");
			return false;
		}
		self.pending = None;
		match outcome {
			Ok(result) => {
				info!(
					"analysis request {id} finished: {} nodes, {} edges, {} steps",
					result.nodes.len(),
					result.edges.len(),
					result.execution_trace.len()
				);
				self.stepper = TraceStepper::new(result.execution_trace.len());
				self.result = Some(result);
				self.error = None;
			}
			Err(err) => {
				if let AnalysisError::Failed { detail } = &err {
					error!("analysis request {id} failed: {detail}");
				} else {
					error!("analysis request {id} failed: {err}");
				}
				self.error = Some(err.to_string());
			}
		}
		self.generation += 1;
		true
	}

	pub fn next_step(&mut self) -> bool {
		self.result.is_some() && self.stepper.next()
	}

	pub fn prev_step(&mut self) -> bool {
		self.result.is_some() && self.stepper.prev()
	}

	pub fn continue_to_breakpoint(&mut self) -> bool {
		let Some(result) = self.result.as_ref() else {
			return false;
		};
		self.stepper
			.continue_to_breakpoint(&result.execution_trace, &self.breakpoints)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{GraphNode, NodeKind, Position};

	fn result(lines: &[u32]) -> VisualizationResult {
		VisualizationResult {
			nodes: vec![GraphNode {
				id: "n1".into(),
				label: "Start".into(),
				explanation: String::new(),
				code_snippet: String::new(),
				kind: NodeKind::Start,
				position: Position::default(),
			}],
			edges: Vec::new(),
			execution_trace: lines
				.iter()
				.map(|&line| ExecutionStep {
					node_id: "n1".into(),
					explanation: format!("line {line}"),
					line,
					variables: None,
					call_stack: None,
				})
				.collect(),
		}
	}

	fn loaded(lines: &[u32]) -> Session {
		let mut session = Session::new("let x = 1;");
		let request = session.begin_analysis().unwrap();
		assert!(session.finish_analysis(request.id, Ok(result(lines))));
		session
	}

	#[test]
	fn no_trace_means_no_active_node() {
		let session = Session::new("x");
		assert_eq!(session.active_node_id(), None);
		assert_eq!(session.highlighted_line(), None);
		assert!(!session.can_continue());
	}

	#[test]
	fn loading_a_result_starts_at_step_zero() {
		let session = loaded(&[3, 4, 5]);
		assert_eq!(session.step_index(), 0);
		assert_eq!(session.active_node_id(), Some("n1"));
		assert_eq!(session.highlighted_line(), Some(3));
		assert!(!session.is_loading());
	}

	#[test]
	fn second_request_while_pending_is_refused() {
		let mut session = Session::new("x");
		let first = session.begin_analysis().unwrap();
		assert!(matches!(session.begin_analysis(), Err(AnalysisError::Busy)));
		assert!(session.finish_analysis(first.id, Ok(result(&[1]))));
		assert!(session.begin_analysis().is_ok());
	}

	#[test]
	fn empty_code_is_rejected_with_a_message() {
		let mut session = Session::new("   \n");
		assert!(matches!(
			session.begin_analysis(),
			Err(AnalysisError::EmptySource)
		));
		assert!(session.error().is_some());
		assert!(!session.is_loading());
	}

	#[test]
	fn editing_discards_result_but_keeps_breakpoints() {
		let mut session = loaded(&[1, 2, 3]);
		session.toggle_breakpoint(2);
		session.next_step();
		let before = session.generation();

		session.edit_code("let y = 2;");
		assert!(session.result().is_none());
		assert_eq!(session.step_index(), 0);
		assert!(session.breakpoints().contains(2));
		assert!(session.generation() > before);
	}

	#[test]
	fn failure_keeps_code_and_breakpoints() {
		let mut session = Session::new("code");
		session.toggle_breakpoint(7);
		let request = session.begin_analysis().unwrap();
		session.finish_analysis(request.id, Err(AnalysisError::RateLimited));
		assert_eq!(session.code(), "code");
		assert!(session.breakpoints().contains(7));
		assert_eq!(
			session.error(),
			Some("API rate limit exceeded. Please wait a moment and try again.")
		);
	}

	#[test]
	fn edit_during_request_keeps_pending_response() {
		let mut session = Session::new("code");
		let request = session.begin_analysis().unwrap();
		session.edit_code("other code");
		assert!(session.is_loading());
		assert!(session.finish_analysis(request.id, Ok(result(&[1]))));
		assert_eq!(session.code(), "other code");
		assert!(session.result().is_some());
	}

	#[test]
	fn stale_response_is_ignored() {
		let mut session = Session::new("code");
		let request = session.begin_analysis().unwrap();
		assert!(!session.finish_analysis(request.id + 1, Ok(result(&[1]))));
		assert!(session.is_loading());
	}

	#[test]
	fn continue_uses_session_breakpoints() {
		let mut session = loaded(&[1, 2, 3, 2, 1]);
		assert!(!session.can_continue());
		session.toggle_breakpoint(2);
		assert!(session.continue_to_breakpoint());
		assert_eq!(session.step_index(), 1);
		assert!(session.continue_to_breakpoint());
		assert_eq!(session.step_index(), 3);
	}
}
