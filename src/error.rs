//! Error kinds surfaced to the user. `Display` is the message shown in the UI.

/// Failure of an analysis request. Prior code text and breakpoints survive all of these.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
	#[error("Please enter some code to visualize.")]
	EmptySource,

	#[error("A visualization request is already in progress.")]
	Busy,

	#[error("No API key configured. Set GEMINI_API_KEY when building the app.")]
	MissingApiKey,

	#[error("API rate limit exceeded. Please wait a moment and try again.")]
	RateLimited,

	#[error("AI response did not match the expected format with nodes, edges, and executionTrace.")]
	InvalidShape,

	/// Network errors, malformed JSON, schema mismatches. `detail` is logged, never shown.
	#[error("Failed to get visualization from AI. The model may have generated an invalid response.")]
	Failed { detail: String },
}

/// A trace step's `variables` blob could not be read.
#[derive(Debug, thiserror::Error)]
pub enum VariablesError {
	#[error("Could not parse variable data.")]
	Malformed(#[from] serde_json::Error),

	#[error("Could not parse variable data.")]
	NotAnObject,
}
