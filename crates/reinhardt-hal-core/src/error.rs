//! Error types for HAL documents

use thiserror::Error;

/// Errors raised while assembling HAL documents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
	/// A forms resource has no `default` template
	#[error("HAL-Forms resource has no `default` template")]
	MissingDefaultTemplate,

	/// A template has neither a target nor a method
	#[error("template `{0}` has neither a target nor a method")]
	UnaddressableTemplate(String),

	/// The resource state is not a JSON object
	#[error("resource state must serialize to a JSON object: {0}")]
	InvalidState(String),
}

pub type HalResult<T> = Result<T, HalError>;
