//! Gemini `generateContent` client that turns source code into a [`VisualizationResult`].

use log::{debug, error, info};
use serde::Deserialize;
use serde_json::{Value, json};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::model::VisualizationResult;

const PROMPT_HEADER: &str = r#"Analyze the following code and represent its execution flow as a directed graph AND a step-by-step execution trace.
Act as an expert code execution analyzer. Your output must be a single, valid JSON object that adheres to the provided schema.

- **Nodes**: Represent blocks of code. Position them logically for a clear, top-down flowchart on a 1000px canvas.
- **Edges**: Connect nodes to show control flow.
- **executionTrace**: This is the MOST IMPORTANT part. Provide an ordered array of execution steps like a debugger.
  - **'nodeId'**: The ID of the node being executed.
  - **'line'**: The 1-based line number of the code being executed for this step.
  - **'explanation'**: A specific, runtime-like explanation for THIS step. If a function is called, state the arguments. For decisions, explain why the condition is true/false based on variable values.
  - **'variables'**: (Optional) A JSON STRING representing the variable state in the current scope. Update this at each step. Fully represent arrays and simple objects. E.g., '{"a": 5, "myArray": [1, 2, 3]}'.
  - **'callStack'**: (Optional) An array of strings representing the call stack. The last element is the currently executing function. For global scope, you can use ['(global)']. For a call like 'factorial(3)', an entry could be 'factorial(3)'.

Example 'executionTrace' for 'function greet(name) { return "Hello, " + name; } greet("World");':
[
  { "nodeId": "n1", "line": 1, "explanation": "Function 'greet' is defined.", "callStack": ["(global)"] },
  { "nodeId": "n2", "line": 2, "explanation": "Calling function 'greet' with argument 'World'.", "callStack": ["(global)"] },
  { "nodeId": "n1", "line": 1, "explanation": "Entering 'greet' with 'name' = 'World'.", "variables": "{\"name\": \"World\"}", "callStack": ["(global)", "greet(\"World\")"] },
  { "nodeId": "n1", "line": 1, "explanation": "Returning from 'greet' with value 'Hello, World'.", "variables": "{\"name\": \"World\"}", "callStack": ["(global)", "greet(\"World\")"] },
  { "nodeId": "n2", "line": 2, "explanation": "Function 'greet' returned 'Hello, World'.", "callStack": ["(global)"] }
]

Code to analyze:
```
"#;

pub fn build_prompt(code: &str) -> String {
	format!("{PROMPT_HEADER}{code}\n```\n")
}

/// Structured-output schema the model is constrained to.
pub fn response_schema() -> Value {
	json!({
		"type": "OBJECT",
		"properties": {
			"nodes": {
				"type": "ARRAY",
				"description": "An array of objects, where each object represents a node in the execution flow graph.",
				"items": {
					"type": "OBJECT",
					"properties": {
						"id": { "type": "STRING", "description": "A unique string identifier for the node (e.g., 'n1', 'n2')." },
						"label": { "type": "STRING", "description": "A very short title or summary for the node (e.g., 'Start', 'if (n === 0)')." },
						"explanation": { "type": "STRING", "description": "A general explanation of what this code block does." },
						"codeSnippet": { "type": "STRING", "description": "The relevant line or block of code for this node." },
						"type": { "type": "STRING", "description": "The node's role, one of: 'start', 'end', 'process', 'decision'." },
						"position": {
							"type": "OBJECT",
							"properties": {
								"x": { "type": "NUMBER", "description": "The x-coordinate for the node's position on a 2D canvas." },
								"y": { "type": "NUMBER", "description": "The y-coordinate for the node's position on a 2D canvas." }
							},
							"required": ["x", "y"]
						}
					},
					"required": ["id", "label", "explanation", "codeSnippet", "type", "position"]
				}
			},
			"edges": {
				"type": "ARRAY",
				"description": "An array of objects, where each object represents a directed edge connecting two nodes.",
				"items": {
					"type": "OBJECT",
					"properties": {
						"id": { "type": "STRING", "description": "A unique string identifier for the edge (e.g., 'e1', 'e2')." },
						"source": { "type": "STRING", "description": "The 'id' of the starting node for this edge." },
						"target": { "type": "STRING", "description": "The 'id' of the ending node for this edge." },
						"label": { "type": "STRING", "description": "An optional label for the edge, especially for decision branches (e.g., 'true', 'false')." }
					},
					"required": ["id", "source", "target"]
				}
			},
			"executionTrace": {
				"type": "ARRAY",
				"description": "An ordered array of execution steps. Each object represents a single step in the execution flow.",
				"items": {
					"type": "OBJECT",
					"properties": {
						"nodeId": { "type": "STRING", "description": "The 'id' of the graph node corresponding to this execution step." },
						"explanation": { "type": "STRING", "description": "A detailed, step-specific explanation. For example, mention the current values of variables." },
						"line": { "type": "NUMBER", "description": "The 1-based line number in the original code that is being executed in this step." },
						"variables": {
							"type": "STRING",
							"description": "An optional JSON string representing the state of variables in the current scope *after* this step has executed. Represent arrays and simple objects fully. Example: '{\"a\":5, \"arr\": [1, 2]}' or '{\"obj\": {\"x\": 1}}'."
						},
						"callStack": {
							"type": "ARRAY",
							"description": "An optional array of strings representing the call stack. The last element is the current function. Example: ['main', 'factorial(4)', 'factorial(3)'].",
							"items": { "type": "STRING" }
						}
					},
					"required": ["nodeId", "explanation", "line"]
				}
			}
		},
		"required": ["nodes", "edges", "executionTrace"]
	})
}

pub fn request_body(config: &AnalysisConfig, code: &str) -> Value {
	json!({
		"contents": [{ "role": "user", "parts": [{ "text": build_prompt(code) }] }],
		"generationConfig": {
			"responseMimeType": "application/json",
			"responseSchema": response_schema(),
			"temperature": config.temperature,
		}
	})
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
	#[serde(default)]
	parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
	text: Option<String>,
}

/// Extract the model's text from a successful `generateContent` body and parse it.
pub fn parse_generate_response(body: &str) -> Result<VisualizationResult, AnalysisError> {
	let response: GenerateContentResponse =
		serde_json::from_str(body).map_err(|e| AnalysisError::Failed {
			detail: format!("unreadable generateContent response: {e}"),
		})?;
	let text: String = response
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
		.unwrap_or_default();
	let text = text.trim();
	if text.is_empty() {
		return Err(AnalysisError::Failed {
			detail: "response has no candidate text".into(),
		});
	}
	VisualizationResult::from_json(text)
}

/// Map a non-success HTTP response to the user-facing error.
pub fn classify_failure(status: u16, body: &str) -> AnalysisError {
	if status == 429 || body.contains("RESOURCE_EXHAUSTED") {
		return AnalysisError::RateLimited;
	}
	AnalysisError::Failed {
		detail: format!("HTTP {status}: {}", body.trim()),
	}
}

fn js_failure(context: &str, err: JsValue) -> AnalysisError {
	let message = err.as_string().unwrap_or_else(|| format!("{err:?}"));
	if message.contains("429") {
		return AnalysisError::RateLimited;
	}
	AnalysisError::Failed {
		detail: format!("{context}: {message}"),
	}
}

/// Run one analysis round trip. No retries.
pub async fn visualize_code(
	config: &AnalysisConfig,
	code: &str,
) -> Result<VisualizationResult, AnalysisError> {
	let url = config.generate_content_url()?;
	let body = request_body(config, code).to_string();
	debug!("posting {} bytes to {}", body.len(), config.model);

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_body(&JsValue::from_str(&body));
	let request =
		Request::new_with_str_and_init(&url, &init).map_err(|e| js_failure("request", e))?;
	request
		.headers()
		.set("Content-Type", "application/json")
		.map_err(|e| js_failure("headers", e))?;

	let window = web_sys::window().ok_or_else(|| AnalysisError::Failed {
		detail: "no window".into(),
	})?;
	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| js_failure("fetch", e))?
		.dyn_into()
		.map_err(|e| js_failure("fetch", e))?;
	let text = JsFuture::from(response.text().map_err(|e| js_failure("body", e))?)
		.await
		.map_err(|e| js_failure("body", e))?
		.as_string()
		.unwrap_or_default();

	if !response.ok() {
		let err = classify_failure(response.status(), &text);
		error!("generateContent returned {}", response.status());
		return Err(err);
	}
	let result = parse_generate_response(&text)?;
	info!(
		"model returned {} nodes, {} edges, {} steps",
		result.nodes.len(),
		result.edges.len(),
		result.execution_trace.len()
	);
	Ok(result)
}
