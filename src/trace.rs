//! Cursor over an execution trace with breakpoint-aware "continue".

use std::collections::BTreeSet;

use crate::model::ExecutionStep;

/// User-marked source lines. Independent of any trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Breakpoints(BTreeSet<u32>);

impl Breakpoints {
	/// Returns `true` if the line is now set.
	pub fn toggle(&mut self, line: u32) -> bool {
		if self.0.remove(&line) {
			false
		} else {
			self.0.insert(line);
			true
		}
	}

	pub fn contains(&self, line: u32) -> bool {
		self.0.contains(&line)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn clear(&mut self) {
		self.0.clear();
	}
}

impl FromIterator<u32> for Breakpoints {
	fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Position in a loaded trace. Only exists while a trace is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceStepper {
	index: usize,
	len: usize,
}

impl TraceStepper {
	pub fn new(len: usize) -> Self {
		Self { index: 0, len }
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_first(&self) -> bool {
		self.index == 0
	}

	pub fn is_last(&self) -> bool {
		self.len == 0 || self.index + 1 >= self.len
	}

	pub fn next(&mut self) -> bool {
		if self.is_last() {
			return false;
		}
		self.index += 1;
		true
	}

	pub fn prev(&mut self) -> bool {
		if self.is_first() {
			return false;
		}
		self.index -= 1;
		true
	}

	pub fn can_continue(&self, breakpoints: &Breakpoints) -> bool {
		!breakpoints.is_empty() && !self.is_last()
	}

	/// Jump to the next step after the cursor whose line has a breakpoint, or to the
	/// last step when none is left.
	pub fn continue_to_breakpoint(
		&mut self,
		trace: &[ExecutionStep],
		breakpoints: &Breakpoints,
	) -> bool {
		if !self.can_continue(breakpoints) {
			return false;
		}
		let end = self.len.min(trace.len());
		self.index = trace[..end]
			.iter()
			.enumerate()
			.skip(self.index + 1)
			.find(|(_, step)| breakpoints.contains(step.line))
			.map(|(i, _)| i)
			.unwrap_or(self.len - 1);
		true
	}

	pub fn current<'a>(&self, trace: &'a [ExecutionStep]) -> Option<&'a ExecutionStep> {
		trace.get(self.index)
	}
}
