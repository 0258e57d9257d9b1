//! Error types for template generation.
//!
//! Every variant is a configuration error: a missing target, a failing hook,
//! a bad settings file. Data errors found while filling a template (absent
//! members, mismatched shapes) are absorbed by the value factory and never
//! surface here.

use reinhardt_hal_core::HalError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error returned by customization hooks and collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building templates and forms resources.
#[derive(Debug, Error)]
pub enum HalFormsError {
	/// A property customization hook failed.
	#[error("Customization `{hook}` failed for {type_name}.{property}: {source}")]
	Customization {
		/// Name of the failing hook.
		hook: String,
		/// Type whose template was being built.
		type_name: String,
		/// Property being customized.
		property: String,
		#[source]
		source: BoxError,
	},

	/// A forms-resource customization hook failed.
	#[error("Resource customization `{hook}` failed for {type_name}: {source}")]
	ResourceCustomization {
		hook: String,
		type_name: String,
		#[source]
		source: BoxError,
	},

	/// The foreign-key-link provider failed (declining is not an error).
	#[error("Foreign key link to {target} for member `{member}` failed: {source}")]
	ForeignKeyLink {
		/// Member carrying the foreign key.
		member: String,
		/// Referenced type.
		target: String,
		#[source]
		source: BoxError,
	},

	/// The link creation service could not resolve an endpoint.
	#[error("Link creation failed for {endpoint}: {message}")]
	LinkCreation {
		/// Endpoint description.
		endpoint: String,
		/// Reason reported by the link service.
		message: String,
	},

	/// Two properties of one template share a name.
	#[error("Duplicate property `{property}` in template for {type_name}")]
	DuplicateProperty { type_name: String, property: String },

	/// A resource template has neither target nor method after all hooks ran.
	#[error("Template for {0} has neither a target nor a method")]
	MissingTarget(String),

	/// Template construction was cancelled by the caller.
	#[error("Template construction for {0} was cancelled")]
	Cancelled(String),

	/// Invalid settings.
	#[error("Settings error: {0}")]
	Settings(String),

	/// HAL document error.
	#[error(transparent)]
	Hal(#[from] HalError),

	/// Error raised by a concurrent computation of the same cache entry.
	#[error(transparent)]
	Shared(Arc<HalFormsError>),
}

impl HalFormsError {
	/// Whether this error (or the shared error it wraps) is a cancellation.
	pub fn is_cancelled(&self) -> bool {
		match self {
			Self::Cancelled(_) => true,
			Self::Shared(inner) => inner.is_cancelled(),
			_ => false,
		}
	}

	/// Unwraps an error shared through the template cache when this is the
	/// last reference to it.
	pub(crate) fn from_shared(error: Arc<HalFormsError>) -> Self {
		match Arc::try_unwrap(error) {
			Ok(error) => error,
			Err(shared) => Self::Shared(shared),
		}
	}

	/// Copy of this error for requests waiting on the same cache entry.
	/// Variants and fields are kept; boxed sources become their messages.
	pub(crate) fn detached(&self) -> Self {
		match self {
			Self::Customization {
				hook,
				type_name,
				property,
				source,
			} => Self::Customization {
				hook: hook.clone(),
				type_name: type_name.clone(),
				property: property.clone(),
				source: source.to_string().into(),
			},
			Self::ResourceCustomization {
				hook,
				type_name,
				source,
			} => Self::ResourceCustomization {
				hook: hook.clone(),
				type_name: type_name.clone(),
				source: source.to_string().into(),
			},
			Self::ForeignKeyLink {
				member,
				target,
				source,
			} => Self::ForeignKeyLink {
				member: member.clone(),
				target: target.clone(),
				source: source.to_string().into(),
			},
			Self::LinkCreation { endpoint, message } => Self::LinkCreation {
				endpoint: endpoint.clone(),
				message: message.clone(),
			},
			Self::DuplicateProperty {
				type_name,
				property,
			} => Self::DuplicateProperty {
				type_name: type_name.clone(),
				property: property.clone(),
			},
			Self::MissingTarget(name) => Self::MissingTarget(name.clone()),
			Self::Cancelled(name) => Self::Cancelled(name.clone()),
			Self::Settings(message) => Self::Settings(message.clone()),
			Self::Hal(error) => Self::Hal(error.clone()),
			Self::Shared(inner) => Self::Shared(inner.clone()),
		}
	}
}

/// Result type alias for HAL-Forms operations.
pub type HalFormsResult<T> = Result<T, HalFormsError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_customization_error_names_hook_and_property() {
		let error = HalFormsError::Customization {
			hook: "Redact".to_string(),
			type_name: "User".to_string(),
			property: "password".to_string(),
			source: "boom".into(),
		};
		assert_eq!(
			error.to_string(),
			"Customization `Redact` failed for User.password: boom"
		);
	}

	#[rstest]
	fn test_shared_cancellation_is_detected() {
		let error = HalFormsError::Shared(Arc::new(HalFormsError::Cancelled("User".into())));
		assert!(error.is_cancelled());
		assert!(!HalFormsError::Settings("x".into()).is_cancelled());
	}

	#[rstest]
	fn test_detached_copy_keeps_variant_and_message() {
		let error = HalFormsError::Customization {
			hook: "Redact".to_string(),
			type_name: "User".to_string(),
			property: "password".to_string(),
			source: "boom".into(),
		};

		let copy = error.detached();

		assert_eq!(copy.to_string(), error.to_string());
		assert!(matches!(
			copy,
			HalFormsError::Customization { hook, property, .. } if hook == "Redact" && property == "password"
		));
	}

	#[rstest]
	fn test_from_shared_unwraps_last_reference() {
		let error = HalFormsError::from_shared(Arc::new(HalFormsError::MissingTarget("User".into())));
		assert!(matches!(error, HalFormsError::MissingTarget(name) if name == "User"));
	}
}
