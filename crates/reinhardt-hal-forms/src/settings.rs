//! Generation settings
//!
//! Settings are plain serde data so they can live in a project's TOML
//! configuration next to the rest of the application settings:
//!
//! ```toml
//! [hal_forms]
//! max_depth = 4
//! property_naming = "snake_case"
//! cache_ttl = 600
//! ```

use crate::error::{HalFormsError, HalFormsResult};
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How member names become property names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamingPolicy {
	/// `first_name` becomes `firstName`
	#[default]
	#[serde(rename = "camelCase")]
	CamelCase,
	/// Member names are used verbatim
	#[serde(rename = "asIs")]
	AsIs,
	/// `firstName` becomes `first_name`
	#[serde(rename = "snake_case")]
	SnakeCase,
}

impl NamingPolicy {
	/// Applies the policy to a member name.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_forms::NamingPolicy;
	///
	/// assert_eq!(NamingPolicy::CamelCase.apply("first_name"), "firstName");
	/// assert_eq!(NamingPolicy::SnakeCase.apply("firstName"), "first_name");
	/// assert_eq!(NamingPolicy::AsIs.apply("First_Name"), "First_Name");
	/// ```
	pub fn apply(&self, name: &str) -> String {
		match self {
			Self::CamelCase => name.to_case(Case::Camel),
			Self::SnakeCase => name.to_case(Case::Snake),
			Self::AsIs => name.to_string(),
		}
	}
}

/// Settings for template generation and caching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalFormsSettings {
	/// Maximum nesting depth of object and collection templates
	pub max_depth: usize,
	/// Maximum number of cached templates
	pub cache_capacity: u64,
	/// Time-to-live of cached templates, in seconds. `None` keeps entries
	/// until evicted by capacity.
	pub cache_ttl: Option<u64>,
	pub property_naming: NamingPolicy,
	/// Content type used when a request does not name one
	pub default_content_type: String,
	/// Key of the template nested in object and collection properties. The
	/// top-level entry of a forms resource is always `default`.
	pub nested_template_name: String,
	/// Camel-case the prompts of inline enum options
	pub camel_case_option_prompts: bool,
}

impl Default for HalFormsSettings {
	fn default() -> Self {
		Self {
			max_depth: 8,
			cache_capacity: 1000,
			cache_ttl: None,
			property_naming: NamingPolicy::default(),
			default_content_type: "application/json".to_string(),
			nested_template_name: "default".to_string(),
			camel_case_option_prompts: false,
		}
	}
}

impl HalFormsSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads settings from a TOML document. Missing keys take their defaults.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal_forms::{HalFormsSettings, NamingPolicy};
	///
	/// let settings = HalFormsSettings::from_toml_str(
	/// 	r#"
	/// max_depth = 3
	/// property_naming = "asIs"
	/// "#,
	/// )
	/// .unwrap();
	///
	/// assert_eq!(settings.max_depth, 3);
	/// assert_eq!(settings.property_naming, NamingPolicy::AsIs);
	/// assert_eq!(settings.nested_template_name, "default");
	/// ```
	pub fn from_toml_str(source: &str) -> HalFormsResult<Self> {
		let settings: Self =
			toml::from_str(source).map_err(|e| HalFormsError::Settings(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> HalFormsResult<()> {
		if self.max_depth == 0 {
			return Err(HalFormsError::Settings(
				"max_depth must be at least 1".to_string(),
			));
		}
		if self.nested_template_name.trim().is_empty() {
			return Err(HalFormsError::Settings(
				"nested_template_name must not be empty".to_string(),
			));
		}
		Ok(())
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_property_naming(mut self, naming: NamingPolicy) -> Self {
		self.property_naming = naming;
		self
	}

	pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
		self.cache_capacity = capacity;
		self
	}

	pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
		self.cache_ttl = Some(ttl.as_secs());
		self
	}

	pub fn with_camel_case_option_prompts(mut self, enabled: bool) -> Self {
		self.camel_case_option_prompts = enabled;
		self
	}

	pub fn cache_ttl(&self) -> Option<Duration> {
		self.cache_ttl.map(Duration::from_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = HalFormsSettings::default();
		assert_eq!(settings.max_depth, 8);
		assert_eq!(settings.cache_capacity, 1000);
		assert_eq!(settings.cache_ttl(), None);
		assert_eq!(settings.property_naming, NamingPolicy::CamelCase);
		assert_eq!(settings.default_content_type, "application/json");
	}

	#[rstest]
	fn test_empty_toml_yields_defaults() {
		assert_eq!(
			HalFormsSettings::from_toml_str("").unwrap(),
			HalFormsSettings::default()
		);
	}

	#[rstest]
	#[case("max_depth = 0")]
	#[case("nested_template_name = \" \"")]
	#[case("property_naming = \"kebab\"")]
	fn test_invalid_settings_are_rejected(#[case] source: &str) {
		assert!(matches!(
			HalFormsSettings::from_toml_str(source),
			Err(HalFormsError::Settings(_))
		));
	}

	#[rstest]
	#[case("age", "age")]
	#[case("first_name", "firstName")]
	#[case("created_at_utc", "createdAtUtc")]
	fn test_camel_case_naming(#[case] member: &str, #[case] expected: &str) {
		assert_eq!(NamingPolicy::CamelCase.apply(member), expected);
	}
}
