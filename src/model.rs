//! Wire types returned by the analysis backend.

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{AnalysisError, VariablesError};

/// A point in canvas or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl Add for Position {
	type Output = Position;

	fn add(self, rhs: Position) -> Position {
		Position::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Position {
	type Output = Position;

	fn sub(self, rhs: Position) -> Position {
		Position::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Position {
	type Output = Position;

	fn mul(self, k: f64) -> Position {
		Position::new(self.x * k, self.y * k)
	}
}

impl Div<f64> for Position {
	type Output = Position;

	fn div(self, k: f64) -> Position {
		Position::new(self.x / k, self.y / k)
	}
}

impl Neg for Position {
	type Output = Position;

	fn neg(self) -> Position {
		Position::new(-self.x, -self.y)
	}
}

/// Role of a flowchart node. Unknown tags deserialize as [`NodeKind::Process`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NodeKind {
	Start,
	End,
	#[default]
	Process,
	Decision,
}

impl NodeKind {
	pub fn parse(tag: &str) -> Self {
		match tag.trim().to_ascii_lowercase().as_str() {
			"start" => NodeKind::Start,
			"end" => NodeKind::End,
			"decision" => NodeKind::Decision,
			_ => NodeKind::Process,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Start => "start",
			NodeKind::End => "end",
			NodeKind::Process => "process",
			NodeKind::Decision => "decision",
		}
	}
}

impl From<String> for NodeKind {
	fn from(tag: String) -> Self {
		NodeKind::parse(&tag)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub explanation: String,
	#[serde(default)]
	pub code_snippet: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	#[serde(default)]
	pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
	pub node_id: String,
	#[serde(default)]
	pub explanation: String,
	#[serde(deserialize_with = "line_number")]
	pub line: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub variables: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub call_stack: Option<Vec<String>>,
}

/// Models emit JSON numbers, sometimes with a fractional part.
fn line_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = f64::deserialize(deserializer)?;
	if !raw.is_finite() {
		return Err(serde::de::Error::custom("line must be a finite number"));
	}
	Ok(raw.round().clamp(1.0, u32::MAX as f64) as u32)
}

impl ExecutionStep {
	/// Parse the step's `variables` blob. `Ok(None)` when the step carries none.
	pub fn scope(&self) -> Result<Option<Map<String, Value>>, VariablesError> {
		let Some(raw) = self.variables.as_deref() else {
			return Ok(None);
		};
		if raw.trim().is_empty() {
			return Ok(None);
		}
		match serde_json::from_str::<Value>(raw)? {
			Value::Object(map) => Ok(Some(map)),
			_ => Err(VariablesError::NotAnObject),
		}
	}

	/// Frames innermost first.
	pub fn frames(&self) -> impl Iterator<Item = &str> {
		self.call_stack
			.iter()
			.flat_map(|stack| stack.iter().rev())
			.map(String::as_str)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationResult {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub execution_trace: Vec<ExecutionStep>,
}

impl VisualizationResult {
	/// Parse a model response. The three top-level fields must be arrays; anything
	/// deeper that fails to deserialize is a generic failure.
	pub fn from_json(text: &str) -> Result<Self, AnalysisError> {
		let value: Value = serde_json::from_str(text).map_err(|e| AnalysisError::Failed {
			detail: format!("response is not valid JSON: {e}"),
		})?;
		Self::from_value(value)
	}

	pub fn from_value(value: Value) -> Result<Self, AnalysisError> {
		let has_shape = ["nodes", "edges", "executionTrace"]
			.iter()
			.all(|field| value.get(field).is_some_and(Value::is_array));
		if !has_shape {
			return Err(AnalysisError::InvalidShape);
		}
		serde_json::from_value(value).map_err(|e| AnalysisError::Failed {
			detail: format!("response does not match the schema: {e}"),
		})
	}
}
