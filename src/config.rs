//! Build-time configuration. A CSR bundle has no process environment, so everything is
//! baked in with `option_env!` when the WASM is compiled.

use log::Level;

use crate::error::AnalysisError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
	pub api_key: Option<String>,
	pub model: String,
	pub endpoint: String,
	pub temperature: f64,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			api_key: None,
			model: DEFAULT_MODEL.into(),
			endpoint: DEFAULT_ENDPOINT.into(),
			temperature: DEFAULT_TEMPERATURE,
		}
	}
}

impl AnalysisConfig {
	pub fn from_env() -> Self {
		let api_key = option_env!("GEMINI_API_KEY")
			.or(option_env!("API_KEY"))
			.filter(|key| !key.trim().is_empty())
			.map(str::to_owned);
		Self {
			api_key,
			model: option_env!("GEMINI_MODEL").unwrap_or(DEFAULT_MODEL).into(),
			endpoint: option_env!("GEMINI_ENDPOINT")
				.unwrap_or(DEFAULT_ENDPOINT)
				.into(),
			..Self::default()
		}
	}

	pub fn generate_content_url(&self) -> Result<String, AnalysisError> {
		let key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;
		Ok(format!(
			"{}/{}:generateContent?key={}",
			self.endpoint.trim_end_matches('/'),
			self.model,
			js_sys::encode_uri_component(key)
		))
	}
}

/// Console log level, `LOG_LEVEL` at build time, debug otherwise.
pub fn log_level() -> Level {
	option_env!("LOG_LEVEL")
		.and_then(|raw| raw.parse().ok())
		.unwrap_or(Level::Debug)
}
