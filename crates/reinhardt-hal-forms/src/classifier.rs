//! Property type classification
//!
//! Maps a member's declared [`TypeShape`] to a [`PropertyKind`]. The mapping is
//! total: anything not recognized becomes [`PropertyKind::Object`].

use crate::schema::{MemberInfo, TypeShape};
use reinhardt_hal_core::PropertyKind;
use std::collections::HashMap;

/// Classifies member types into property kinds
///
/// Rules, first match wins:
///
/// 1. `bool` is `Bool`
/// 2. enums are `Text` (options are attached separately)
/// 3. dates, times, offsets and durations map to their date kinds
/// 4. numbers are `Number`
/// 5. binary content is `File`, or `Image` for image content
/// 6. strings, chars and UUIDs are `Text`
/// 7. collections are `Collection`
/// 8. everything else is `Object`, unless a mapping was registered for the
///    type name
///
/// Nullable wrappers are unwrapped first. String subtypes such as `Email` or
/// `Password` are never inferred from member names; they come from an explicit
/// kind annotation, see [`classify_member`](Self::classify_member).
///
/// # Examples
///
/// ```
/// use reinhardt_hal_forms::schema::{NumberShape, TypeShape};
/// use reinhardt_hal_forms::{PropertyKind, PropertyTypeClassifier};
///
/// let classifier = PropertyTypeClassifier::new().with_mapping("Money", PropertyKind::Number);
///
/// assert_eq!(
/// 	classifier.classify(&TypeShape::optional(TypeShape::Number(NumberShape::Integer))),
/// 	PropertyKind::Number
/// );
/// assert_eq!(classifier.classify(&TypeShape::Opaque("Money")), PropertyKind::Number);
/// assert_eq!(classifier.classify(&TypeShape::Opaque("Geometry")), PropertyKind::Object);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyTypeClassifier {
	type_mappings: HashMap<String, PropertyKind>,
}

impl PropertyTypeClassifier {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the kind of an object or opaque type, by type name.
	pub fn register_type(&mut self, type_name: impl Into<String>, kind: PropertyKind) {
		self.type_mappings.insert(type_name.into(), kind);
	}

	pub fn with_mapping(mut self, type_name: impl Into<String>, kind: PropertyKind) -> Self {
		self.register_type(type_name, kind);
		self
	}

	/// Classifies a type shape.
	pub fn classify(&self, shape: &TypeShape) -> PropertyKind {
		match shape {
			TypeShape::Optional(inner) => self.classify(inner),
			TypeShape::Bool => PropertyKind::Bool,
			TypeShape::Enum(_) => PropertyKind::Text,
			TypeShape::Date => PropertyKind::Date,
			TypeShape::Time => PropertyKind::Time,
			TypeShape::DateTimeOffset => PropertyKind::DateTimeOffset,
			TypeShape::DateTime => PropertyKind::DateTimeLocal,
			TypeShape::Duration => PropertyKind::Duration,
			TypeShape::Number(_) => PropertyKind::Number,
			TypeShape::Binary { image: true } => PropertyKind::Image,
			TypeShape::Binary { image: false } => PropertyKind::File,
			TypeShape::String | TypeShape::Char | TypeShape::Uuid => PropertyKind::Text,
			TypeShape::Collection(_) => PropertyKind::Collection,
			TypeShape::Object(type_ref) => self.mapped(type_ref.name),
			TypeShape::Opaque(name) => self.mapped(name),
		}
	}

	/// Classifies a member, honoring an explicit kind annotation.
	pub fn classify_member(&self, member: &MemberInfo) -> PropertyKind {
		member
			.annotations
			.kind
			.unwrap_or_else(|| self.classify(&member.shape))
	}

	fn mapped(&self, type_name: &str) -> PropertyKind {
		self.type_mappings
			.get(type_name)
			.copied()
			.unwrap_or(PropertyKind::Object)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{EnumRef, EnumVariant, NumberShape};
	use rstest::rstest;
	use std::any::TypeId;

	static FLAGS: [EnumVariant; 1] = [EnumVariant {
		value: "Flag1",
		display: "Flag1",
	}];

	fn flags() -> TypeShape {
		TypeShape::Enum(EnumRef {
			id: TypeId::of::<u8>(),
			name: "Flags",
			variants: &FLAGS,
		})
	}

	#[rstest]
	#[case(TypeShape::Bool, PropertyKind::Bool)]
	#[case(flags(), PropertyKind::Text)]
	#[case(TypeShape::Date, PropertyKind::Date)]
	#[case(TypeShape::Time, PropertyKind::Time)]
	#[case(TypeShape::DateTimeOffset, PropertyKind::DateTimeOffset)]
	#[case(TypeShape::DateTime, PropertyKind::DateTimeLocal)]
	#[case(TypeShape::Duration, PropertyKind::Duration)]
	#[case(TypeShape::Number(NumberShape::Float), PropertyKind::Number)]
	#[case(TypeShape::Number(NumberShape::Decimal), PropertyKind::Number)]
	#[case(TypeShape::Binary { image: false }, PropertyKind::File)]
	#[case(TypeShape::Binary { image: true }, PropertyKind::Image)]
	#[case(TypeShape::String, PropertyKind::Text)]
	#[case(TypeShape::Uuid, PropertyKind::Text)]
	#[case(TypeShape::collection(TypeShape::String), PropertyKind::Collection)]
	#[case(TypeShape::Opaque("Geometry"), PropertyKind::Object)]
	fn test_classify(#[case] shape: TypeShape, #[case] expected: PropertyKind) {
		assert_eq!(PropertyTypeClassifier::new().classify(&shape), expected);
	}

	#[rstest]
	fn test_nullability_never_changes_kind() {
		let classifier = PropertyTypeClassifier::new();
		for shape in [TypeShape::Bool, TypeShape::Date, TypeShape::String, flags()] {
			assert_eq!(
				classifier.classify(&TypeShape::optional(shape.clone())),
				classifier.classify(&shape)
			);
		}
	}

	#[rstest]
	fn test_string_kind_comes_from_annotation_only() {
		let classifier = PropertyTypeClassifier::new();
		let email = MemberInfo::new("email", TypeShape::String);
		assert_eq!(classifier.classify_member(&email), PropertyKind::Text);

		let email = email.kind(PropertyKind::Email);
		assert_eq!(classifier.classify_member(&email), PropertyKind::Email);
	}
}
