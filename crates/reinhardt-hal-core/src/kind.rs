//! Semantic property kinds
//!
//! Every property of a HAL-Forms template carries exactly one [`PropertyKind`].
//! The kind decides which constraint attributes are meaningful for the
//! property and maps to the `type` field of the HAL-Forms wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic classification of a form property
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::PropertyKind;
///
/// assert_eq!(PropertyKind::DateTimeLocal.as_str(), "datetime-local");
/// assert_eq!("email".parse::<PropertyKind>().unwrap(), PropertyKind::Email);
/// assert!(PropertyKind::Number.is_range_like());
/// assert!(PropertyKind::Password.is_text_like());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
	#[serde(rename = "hidden")]
	Hidden,
	#[serde(rename = "text")]
	Text,
	#[serde(rename = "textarea")]
	Textarea,
	#[serde(rename = "search")]
	Search,
	#[serde(rename = "tel")]
	Tel,
	#[serde(rename = "url")]
	Url,
	#[serde(rename = "email")]
	Email,
	#[serde(rename = "password")]
	Password,
	#[serde(rename = "date")]
	Date,
	#[serde(rename = "month")]
	Month,
	#[serde(rename = "week")]
	Week,
	#[serde(rename = "time")]
	Time,
	#[serde(rename = "datetime-local")]
	DateTimeLocal,
	#[serde(rename = "number")]
	Number,
	#[serde(rename = "range")]
	Range,
	#[serde(rename = "color")]
	Color,
	#[serde(rename = "bool")]
	Bool,
	#[serde(rename = "datetime-offset")]
	DateTimeOffset,
	#[serde(rename = "duration")]
	Duration,
	#[serde(rename = "image")]
	Image,
	#[serde(rename = "file")]
	File,
	#[serde(rename = "collection")]
	Collection,
	#[serde(rename = "object")]
	Object,
}

impl PropertyKind {
	/// All kinds, in wire-format declaration order.
	pub const ALL: [PropertyKind; 23] = [
		Self::Hidden,
		Self::Text,
		Self::Textarea,
		Self::Search,
		Self::Tel,
		Self::Url,
		Self::Email,
		Self::Password,
		Self::Date,
		Self::Month,
		Self::Week,
		Self::Time,
		Self::DateTimeLocal,
		Self::Number,
		Self::Range,
		Self::Color,
		Self::Bool,
		Self::DateTimeOffset,
		Self::Duration,
		Self::Image,
		Self::File,
		Self::Collection,
		Self::Object,
	];

	/// Returns the HAL-Forms `type` value for this kind.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Hidden => "hidden",
			Self::Text => "text",
			Self::Textarea => "textarea",
			Self::Search => "search",
			Self::Tel => "tel",
			Self::Url => "url",
			Self::Email => "email",
			Self::Password => "password",
			Self::Date => "date",
			Self::Month => "month",
			Self::Week => "week",
			Self::Time => "time",
			Self::DateTimeLocal => "datetime-local",
			Self::Number => "number",
			Self::Range => "range",
			Self::Color => "color",
			Self::Bool => "bool",
			Self::DateTimeOffset => "datetime-offset",
			Self::Duration => "duration",
			Self::Image => "image",
			Self::File => "file",
			Self::Collection => "collection",
			Self::Object => "object",
		}
	}

	/// Kinds that accept `regex`, `minLength`, `maxLength` and `placeholder`.
	pub fn is_text_like(&self) -> bool {
		matches!(
			self,
			Self::Text
				| Self::Textarea
				| Self::Search
				| Self::Tel
				| Self::Url
				| Self::Email
				| Self::Password
		)
	}

	/// Kinds that accept `min`, `max` and `step`.
	pub fn is_range_like(&self) -> bool {
		matches!(
			self,
			Self::Number
				| Self::Range
				| Self::Date
				| Self::Month
				| Self::Week
				| Self::Time
				| Self::DateTimeLocal
				| Self::DateTimeOffset
		)
	}

	/// Kinds that may carry nested `_templates`.
	pub fn is_nested(&self) -> bool {
		matches!(self, Self::Collection | Self::Object)
	}

	/// Kinds that can carry an options descriptor.
	pub fn accepts_options(&self) -> bool {
		self.is_text_like() || self.is_range_like() || matches!(self, Self::Collection)
	}
}

impl fmt::Display for PropertyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown property kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown property kind: {0}")]
pub struct UnknownPropertyKind(pub String);

impl FromStr for PropertyKind {
	type Err = UnknownPropertyKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase();
		Self::ALL
			.iter()
			.copied()
			.find(|kind| kind.as_str() == normalized)
			.or(match normalized.as_str() {
				"checkbox" | "boolean" => Some(Self::Bool),
				"datetime" | "datetimelocal" => Some(Self::DateTimeLocal),
				"datetimeoffset" => Some(Self::DateTimeOffset),
				_ => None,
			})
			.ok_or_else(|| UnknownPropertyKind(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(PropertyKind::Text, "\"text\"")]
	#[case(PropertyKind::DateTimeLocal, "\"datetime-local\"")]
	#[case(PropertyKind::Bool, "\"bool\"")]
	#[case(PropertyKind::Collection, "\"collection\"")]
	fn test_kind_serializes_to_wire_name(#[case] kind: PropertyKind, #[case] expected: &str) {
		assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
	}

	#[rstest]
	fn test_every_kind_round_trips_through_its_name() {
		for kind in PropertyKind::ALL {
			assert_eq!(kind.as_str().parse::<PropertyKind>().unwrap(), kind);
		}
	}

	#[rstest]
	#[case("Checkbox", PropertyKind::Bool)]
	#[case(" EMAIL ", PropertyKind::Email)]
	#[case("datetime", PropertyKind::DateTimeLocal)]
	fn test_kind_parse_aliases(#[case] input: &str, #[case] expected: PropertyKind) {
		assert_eq!(input.parse::<PropertyKind>().unwrap(), expected);
	}

	#[rstest]
	fn test_unknown_kind_is_rejected() {
		let error = "slider".parse::<PropertyKind>().unwrap_err();
		assert_eq!(error.to_string(), "unknown property kind: slider");
	}

	#[rstest]
	fn test_constraint_families_do_not_overlap() {
		for kind in PropertyKind::ALL {
			assert!(!(kind.is_text_like() && kind.is_range_like()), "{kind}");
			assert!(!(kind.is_nested() && kind.is_text_like()), "{kind}");
		}
	}
}
