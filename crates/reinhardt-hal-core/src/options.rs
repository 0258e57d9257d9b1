//! HAL-Forms `options` element
//!
//! An options descriptor lists the values a property may take, either inline
//! or through a link to a remote list endpoint. The two sources are mutually
//! exclusive, which is why [`OptionsSource`] is an enum rather than a pair of
//! optional fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single inline choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineOption {
	/// Human-readable text shown to the user
	pub prompt: String,
	/// Raw value submitted when this option is selected
	pub value: Value,
}

impl InlineOption {
	/// Creates an inline option from a prompt and a raw value.
	pub fn new(prompt: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			prompt: prompt.into(),
			value: value.into(),
		}
	}
}

/// Link to a remote endpoint that returns the selectable values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsLink {
	pub href: String,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub templated: bool,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub content_type: Option<String>,
}

impl OptionsLink {
	/// Creates a non-templated options link.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			templated: false,
			content_type: None,
		}
	}

	/// Marks the link as a URI template.
	pub fn templated(mut self, templated: bool) -> Self {
		self.templated = templated;
		self
	}

	/// Sets the media type returned by the link.
	pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}
}

/// Where the selectable values come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionsSource {
	/// Values listed in the form itself, in declaration order
	Inline(Vec<InlineOption>),
	/// Values fetched from a remote endpoint
	Link(OptionsLink),
}

/// Options descriptor attached to enum-like, foreign-key-like and
/// multi-select properties
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{InlineOption, Options};
/// use serde_json::json;
///
/// let options = Options::inline(vec![
/// 	InlineOption::new("Flag1", "Flag1"),
/// 	InlineOption::new("Flag2", "Flag2"),
/// ])
/// .with_max_items(1);
///
/// assert_eq!(
/// 	serde_json::to_value(&options).unwrap(),
/// 	json!({
/// 		"inline": [
/// 			{"prompt": "Flag1", "value": "Flag1"},
/// 			{"prompt": "Flag2", "value": "Flag2"}
/// 		],
/// 		"maxItems": 1
/// 	})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
	#[serde(flatten)]
	pub source: OptionsSource,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prompt_field: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_field: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_items: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_items: Option<usize>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub selected_values: Vec<Value>,
}

impl Options {
	fn from_source(source: OptionsSource) -> Self {
		Self {
			source,
			prompt_field: None,
			value_field: None,
			min_items: None,
			max_items: None,
			selected_values: Vec::new(),
		}
	}

	/// Creates an inline options descriptor.
	pub fn inline(options: Vec<InlineOption>) -> Self {
		Self::from_source(OptionsSource::Inline(options))
	}

	/// Creates a remote options descriptor.
	pub fn link(link: OptionsLink) -> Self {
		Self::from_source(OptionsSource::Link(link))
	}

	/// Sets the field of remote entries used as prompt.
	pub fn with_prompt_field(mut self, field: impl Into<String>) -> Self {
		self.prompt_field = Some(field.into());
		self
	}

	/// Sets the field of remote entries used as value.
	pub fn with_value_field(mut self, field: impl Into<String>) -> Self {
		self.value_field = Some(field.into());
		self
	}

	/// Sets the minimum number of selected items.
	pub fn with_min_items(mut self, min_items: usize) -> Self {
		self.min_items = Some(min_items);
		self
	}

	/// Sets the maximum number of selected items.
	pub fn with_max_items(mut self, max_items: usize) -> Self {
		self.max_items = Some(max_items);
		self
	}

	/// Inline entries, if the options are inline.
	pub fn inline_options(&self) -> Option<&[InlineOption]> {
		match &self.source {
			OptionsSource::Inline(options) => Some(options),
			OptionsSource::Link(_) => None,
		}
	}

	/// Remote link, if the options are fetched remotely.
	pub fn options_link(&self) -> Option<&OptionsLink> {
		match &self.source {
			OptionsSource::Link(link) => Some(link),
			OptionsSource::Inline(_) => None,
		}
	}

	/// Whether the options come from a URI template.
	pub fn is_templated(&self) -> bool {
		self.options_link().is_some_and(|link| link.templated)
	}

	/// Replaces the selected values with those found in `value`.
	///
	/// Arrays select each element, `null` selects nothing, any other value
	/// selects itself.
	pub fn select(&mut self, value: Option<&Value>) {
		self.selected_values = match value {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Array(items)) => items.clone(),
			Some(other) => vec![other.clone()],
		};
	}
}
