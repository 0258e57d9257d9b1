//! Type metadata consumed by the template factory
//!
//! Templates are derived from an explicit description of a type rather than
//! from runtime reflection. A [`TypeInfo`] lists the members of a type in
//! declaration order; each [`MemberInfo`] pairs the member's [`TypeShape`]
//! with presence-based [`Annotations`]. Descriptions are normally generated
//! by `#[derive(FormModel)]`, but can also be written by hand:
//!
//! ```
//! use reinhardt_hal_forms::schema::{MemberInfo, TypeInfo};
//! use reinhardt_hal_forms::PropertyKind;
//!
//! let info = TypeInfo::new("Signup")
//! 	.member(MemberInfo::of::<String>("email").kind(PropertyKind::Email).max_length(254))
//! 	.member(MemberInfo::of::<Option<u8>>("age").min(18));
//!
//! assert_eq!(info.member_names(), vec!["email", "age"]);
//! assert!(info.members[1].is_nullable());
//! ```

use crate::value::{FormEnum, FormModel};
use reinhardt_hal_core::PropertyKind;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;

/// Numeric families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberShape {
	Byte,
	Integer,
	Float,
	Decimal,
}

/// The declared type of a member, as far as form generation cares
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
	Bool,
	String,
	Char,
	Number(NumberShape),
	/// Date without time
	Date,
	/// Time of day without date
	Time,
	/// Date and time without offset
	DateTime,
	/// Date and time with a UTC offset
	DateTimeOffset,
	Duration,
	Uuid,
	/// Raw bytes; `image` marks image content
	Binary { image: bool },
	Enum(EnumRef),
	/// Nullable wrapper
	Optional(Box<TypeShape>),
	/// Sequence of elements
	Collection(Box<TypeShape>),
	/// Nested form model
	Object(TypeRef),
	/// A type with no form description
	Opaque(&'static str),
}

impl TypeShape {
	pub fn optional(inner: TypeShape) -> Self {
		Self::Optional(Box::new(inner))
	}

	pub fn collection(element: TypeShape) -> Self {
		Self::Collection(Box::new(element))
	}

	/// Strips every nullable wrapper.
	pub fn unwrap_optional(&self) -> &TypeShape {
		let mut shape = self;
		while let Self::Optional(inner) = shape {
			shape = inner;
		}
		shape
	}

	pub fn is_optional(&self) -> bool {
		matches!(self, Self::Optional(_))
	}

	/// Element shape of a (possibly nullable) collection.
	pub fn element(&self) -> Option<&TypeShape> {
		match self.unwrap_optional() {
			Self::Collection(element) => Some(element),
			_ => None,
		}
	}

	/// Nested model of a (possibly nullable) object.
	pub fn object(&self) -> Option<&TypeRef> {
		match self.unwrap_optional() {
			Self::Object(type_ref) => Some(type_ref),
			_ => None,
		}
	}

	/// Whether a member of this shape is required when no annotation says
	/// otherwise: nullable members and collections are not.
	pub fn is_required_by_default(&self) -> bool {
		!matches!(self, Self::Optional(_) | Self::Collection(_))
	}

	/// Name used for custom classifier mappings.
	pub fn type_name(&self) -> Option<&'static str> {
		match self.unwrap_optional() {
			Self::Object(type_ref) => Some(type_ref.name),
			Self::Enum(enum_ref) => Some(enum_ref.name),
			Self::Opaque(name) => Some(name),
			_ => None,
		}
	}
}

/// Lazily described reference to a nested form model
///
/// The description is only produced when the template factory recurses into
/// the type, which is what allows self-referencing types.
#[derive(Clone, Copy)]
pub struct TypeRef {
	pub id: TypeId,
	pub name: &'static str,
	describe: fn() -> TypeInfo,
}

impl TypeRef {
	pub fn of<T: FormModel + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: T::type_name(),
			describe: T::type_info,
		}
	}

	/// Produces the member description of the referenced type.
	pub fn describe(&self) -> TypeInfo {
		(self.describe)()
	}
}

impl fmt::Debug for TypeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TypeRef").field(&self.name).finish()
	}
}

impl PartialEq for TypeRef {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeRef {}

/// One member of an enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
	/// Raw stored value
	pub value: &'static str,
	/// Human-readable name
	pub display: &'static str,
}

/// Reference to an enumeration and its members in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumRef {
	pub id: TypeId,
	pub name: &'static str,
	pub variants: &'static [EnumVariant],
}

impl EnumRef {
	pub fn of<T: FormEnum + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: T::enum_name(),
			variants: T::variants(),
		}
	}
}

/// Marks a key member as referencing a collection of `T` elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKey {
	pub id: TypeId,
	pub name: &'static str,
}

impl ForeignKey {
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: short_type_name(std::any::type_name::<T>()),
		}
	}
}

/// Last path segment of a type name, generics included.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
	let end = full.find('<').unwrap_or(full.len());
	match full[..end].rfind("::") {
		Some(index) => &full[index + 2..],
		None => full,
	}
}

/// Source-level constraints of a member
///
/// Every constraint is presence-based: `None` means unconstrained, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
	/// Explicit required flag; inferred from nullability when absent
	pub required: Option<bool>,
	pub read_only: bool,
	pub regex: Option<String>,
	pub min: Option<Value>,
	pub max: Option<Value>,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	pub step: Option<f64>,
	pub prompt: Option<String>,
	pub placeholder: Option<String>,
	/// Explicit kind override
	pub kind: Option<PropertyKind>,
	/// Foreign key marker
	pub references: Option<ForeignKey>,
	pub min_items: Option<usize>,
	pub max_items: Option<usize>,
	pub cols: Option<u32>,
	pub rows: Option<u32>,
	pub templated: bool,
	/// Property name replacing the naming policy's output
	pub rename: Option<String>,
}

/// One public member of a type
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
	pub name: String,
	pub shape: TypeShape,
	pub annotations: Annotations,
}

impl MemberInfo {
	pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
		Self {
			name: name.into(),
			shape,
			annotations: Annotations::default(),
		}
	}

	/// Describes a member of Rust type `T`.
	pub fn of<T: crate::value::FormType>(name: impl Into<String>) -> Self {
		Self::new(name, T::shape())
	}

	pub fn is_nullable(&self) -> bool {
		self.shape.is_optional()
	}

	pub fn required(mut self, required: bool) -> Self {
		self.annotations.required = Some(required);
		self
	}

	pub fn read_only(mut self) -> Self {
		self.annotations.read_only = true;
		self
	}

	pub fn regex(mut self, pattern: impl Into<String>) -> Self {
		self.annotations.regex = Some(pattern.into());
		self
	}

	pub fn min(mut self, min: impl Into<Value>) -> Self {
		self.annotations.min = Some(min.into());
		self
	}

	pub fn max(mut self, max: impl Into<Value>) -> Self {
		self.annotations.max = Some(max.into());
		self
	}

	pub fn min_length(mut self, min_length: usize) -> Self {
		self.annotations.min_length = Some(min_length);
		self
	}

	pub fn max_length(mut self, max_length: usize) -> Self {
		self.annotations.max_length = Some(max_length);
		self
	}

	pub fn step(mut self, step: f64) -> Self {
		self.annotations.step = Some(step);
		self
	}

	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.annotations.prompt = Some(prompt.into());
		self
	}

	pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.annotations.placeholder = Some(placeholder.into());
		self
	}

	pub fn kind(mut self, kind: PropertyKind) -> Self {
		self.annotations.kind = Some(kind);
		self
	}

	pub fn references(mut self, target: ForeignKey) -> Self {
		self.annotations.references = Some(target);
		self
	}

	pub fn min_items(mut self, min_items: usize) -> Self {
		self.annotations.min_items = Some(min_items);
		self
	}

	pub fn max_items(mut self, max_items: usize) -> Self {
		self.annotations.max_items = Some(max_items);
		self
	}

	pub fn cols(mut self, cols: u32) -> Self {
		self.annotations.cols = Some(cols);
		self
	}

	pub fn rows(mut self, rows: u32) -> Self {
		self.annotations.rows = Some(rows);
		self
	}

	pub fn templated(mut self) -> Self {
		self.annotations.templated = true;
		self
	}

	pub fn rename(mut self, name: impl Into<String>) -> Self {
		self.annotations.rename = Some(name.into());
		self
	}
}

/// Member description of a type, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
	pub name: &'static str,
	pub members: Vec<MemberInfo>,
}

impl TypeInfo {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			members: Vec::new(),
		}
	}

	pub fn member(mut self, member: MemberInfo) -> Self {
		self.members.push(member);
		self
	}

	pub fn get(&self, name: &str) -> Option<&MemberInfo> {
		self.members.iter().find(|m| m.name == name)
	}

	pub fn member_names(&self) -> Vec<&str> {
		self.members.iter().map(|m| m.name.as_str()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::FormType;
	use rstest::rstest;

	#[rstest]
	#[case("alloc::string::String", "String")]
	#[case("app::models::Category", "Category")]
	#[case("app::Page<app::Item>", "Page<app::Item>")]
	#[case("u32", "u32")]
	fn test_short_type_name(#[case] full: &'static str, #[case] expected: &str) {
		assert_eq!(short_type_name(full), expected);
	}

	#[rstest]
	fn test_unwrap_nested_optionals() {
		let shape = <Option<Option<Vec<u32>>>>::shape();
		assert!(shape.is_optional());
		assert_eq!(
			shape.element(),
			Some(&TypeShape::Number(NumberShape::Integer))
		);
	}

	#[rstest]
	fn test_annotations_default_to_unconstrained() {
		let member = MemberInfo::of::<u32>("count");
		assert_eq!(member.annotations, Annotations::default());
		assert!(member.annotations.min.is_none());
		assert!(member.annotations.required.is_none());
	}

	#[rstest]
	fn test_foreign_key_names_last_segment() {
		struct Category;
		assert_eq!(ForeignKey::of::<Category>().name, "Category");
	}
}
