//! Form model traits
//!
//! [`FormModel`] is implemented by types that can be rendered as forms. It
//! exposes the type description used to build templates and a by-name member
//! accessor used to fill them. [`FormType`] and [`IntoFieldValue`] connect
//! ordinary Rust types to the shapes and values the factories understand.

use crate::schema::{EnumVariant, NumberShape, TypeInfo, TypeShape};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// A type that can be rendered as a HAL-Forms template
///
/// Usually derived:
///
/// ```
/// use reinhardt_hal_forms::{FieldValue, FormModel};
///
/// #[derive(FormModel)]
/// struct Person {
/// 	name: String,
/// 	age: u32,
/// }
///
/// let person = Person { name: "John Doe".into(), age: 42 };
/// assert_eq!(Person::type_info().member_names(), vec!["name", "age"]);
/// assert!(matches!(person.field("age"), Some(FieldValue::Scalar(v)) if v == 42));
/// assert!(person.field("missing").is_none());
/// ```
pub trait FormModel: Send + Sync {
	/// Member description in declaration order.
	fn type_info() -> TypeInfo
	where
		Self: Sized;

	/// Type name used in cache keys, logs and errors.
	fn type_name() -> &'static str
	where
		Self: Sized;

	/// Reads a member by its declared name.
	fn field(&self, member: &str) -> Option<FieldValue<'_>>;

	/// Declared member names, in declaration order.
	fn field_names(&self) -> &'static [&'static str];

	/// Name of the concrete type, for diagnostics.
	fn model_name(&self) -> &'static str {
		crate::schema::short_type_name(std::any::type_name::<Self>())
	}
}

/// An enumeration usable as an options source
pub trait FormEnum: Send + Sync {
	fn enum_name() -> &'static str
	where
		Self: Sized;

	/// Members in declaration order.
	fn variants() -> &'static [EnumVariant]
	where
		Self: Sized;

	/// Raw value of this member.
	fn variant_value(&self) -> &'static str;
}

/// Maps a Rust type to its [`TypeShape`]
pub trait FormType {
	fn shape() -> TypeShape;

	/// Shape of `Vec<Self>`.
	#[doc(hidden)]
	fn sequence_shape() -> TypeShape
	where
		Self: Sized,
	{
		TypeShape::collection(Self::shape())
	}
}

/// A member value read from a model
#[derive(Clone)]
pub enum FieldValue<'a> {
	Null,
	Scalar(Value),
	Object(&'a dyn FormModel),
	List(Vec<FieldValue<'a>>),
}

impl FieldValue<'_> {
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Converts to JSON. Objects become maps keyed by declared member name.
	pub fn to_json(&self) -> Value {
		match self {
			Self::Null => Value::Null,
			Self::Scalar(value) => value.clone(),
			Self::Object(model) => model_to_json(*model),
			Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
		}
	}
}

impl fmt::Debug for FieldValue<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
			Self::Object(model) => f.debug_tuple("Object").field(&model_to_json(*model)).finish(),
			Self::List(items) => f.debug_tuple("List").field(items).finish(),
		}
	}
}

/// Serializes every member of `model` to a JSON object.
pub fn model_to_json(model: &dyn FormModel) -> Value {
	let mut map = Map::new();
	for name in model.field_names() {
		if let Some(value) = model.field(name) {
			map.insert((*name).to_string(), value.to_json());
		}
	}
	Value::Object(map)
}

/// Borrows a Rust value as a [`FieldValue`]
pub trait IntoFieldValue {
	fn to_field_value(&self) -> FieldValue<'_>;

	/// Value of `[Self]`.
	#[doc(hidden)]
	fn sequence_value(items: &[Self]) -> FieldValue<'_>
	where
		Self: Sized,
	{
		FieldValue::List(items.iter().map(IntoFieldValue::to_field_value).collect())
	}
}

macro_rules! number_types {
	($shape:ident: $($ty:ty),+) => {$(
		impl FormType for $ty {
			fn shape() -> TypeShape {
				TypeShape::Number(NumberShape::$shape)
			}
		}

		impl IntoFieldValue for $ty {
			fn to_field_value(&self) -> FieldValue<'_> {
				FieldValue::Scalar(Value::from(*self))
			}
		}
	)+};
}

number_types!(Integer: i8, i16, i32, i64, isize, u16, u32, u64, usize);
number_types!(Float: f32, f64);

// Byte sequences are binary content, not collections of numbers.
impl FormType for u8 {
	fn shape() -> TypeShape {
		TypeShape::Number(NumberShape::Byte)
	}

	fn sequence_shape() -> TypeShape {
		TypeShape::Binary { image: false }
	}
}

impl IntoFieldValue for u8 {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::from(*self))
	}

	fn sequence_value(items: &[Self]) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(BASE64.encode(items)))
	}
}

impl FormType for bool {
	fn shape() -> TypeShape {
		TypeShape::Bool
	}
}

impl IntoFieldValue for bool {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::Bool(*self))
	}
}

impl FormType for String {
	fn shape() -> TypeShape {
		TypeShape::String
	}
}

impl IntoFieldValue for String {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.clone()))
	}
}

impl FormType for str {
	fn shape() -> TypeShape {
		TypeShape::String
	}
}

impl IntoFieldValue for str {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.to_string()))
	}
}

impl FormType for char {
	fn shape() -> TypeShape {
		TypeShape::Char
	}
}

impl IntoFieldValue for char {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.to_string()))
	}
}

impl FormType for Value {
	fn shape() -> TypeShape {
		TypeShape::Opaque("Value")
	}
}

impl IntoFieldValue for Value {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(self.clone())
	}
}

impl<T: FormType> FormType for Option<T> {
	fn shape() -> TypeShape {
		TypeShape::optional(T::shape())
	}
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
	fn to_field_value(&self) -> FieldValue<'_> {
		match self {
			Some(value) => value.to_field_value(),
			None => FieldValue::Null,
		}
	}
}

impl<T: FormType> FormType for Vec<T> {
	fn shape() -> TypeShape {
		T::sequence_shape()
	}
}

impl<T: IntoFieldValue> IntoFieldValue for Vec<T> {
	fn to_field_value(&self) -> FieldValue<'_> {
		T::sequence_value(self)
	}
}

macro_rules! collection_types {
	($($collection:ident),+) => {$(
		impl<T: FormType> FormType for $collection<T> {
			fn shape() -> TypeShape {
				TypeShape::collection(T::shape())
			}
		}

		impl<T: IntoFieldValue> IntoFieldValue for $collection<T> {
			fn to_field_value(&self) -> FieldValue<'_> {
				FieldValue::List(self.iter().map(IntoFieldValue::to_field_value).collect())
			}
		}
	)+};
}

collection_types!(VecDeque, BTreeSet, HashSet);

impl<T: FormType + ?Sized> FormType for Box<T> {
	fn shape() -> TypeShape {
		T::shape()
	}
}

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for Box<T> {
	fn to_field_value(&self) -> FieldValue<'_> {
		(**self).to_field_value()
	}
}

impl<T: FormType + ?Sized> FormType for Arc<T> {
	fn shape() -> TypeShape {
		T::shape()
	}
}

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for Arc<T> {
	fn to_field_value(&self) -> FieldValue<'_> {
		(**self).to_field_value()
	}
}

impl FormType for bytes::Bytes {
	fn shape() -> TypeShape {
		TypeShape::Binary { image: false }
	}
}

impl IntoFieldValue for bytes::Bytes {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(BASE64.encode(self)))
	}
}

impl FormType for rust_decimal::Decimal {
	fn shape() -> TypeShape {
		TypeShape::Number(NumberShape::Decimal)
	}
}

// Decimals keep their exact textual form.
impl IntoFieldValue for rust_decimal::Decimal {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.to_string()))
	}
}

impl FormType for uuid::Uuid {
	fn shape() -> TypeShape {
		TypeShape::Uuid
	}
}

impl IntoFieldValue for uuid::Uuid {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.to_string()))
	}
}

impl FormType for chrono::NaiveDate {
	fn shape() -> TypeShape {
		TypeShape::Date
	}
}

impl IntoFieldValue for chrono::NaiveDate {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.format("%Y-%m-%d").to_string()))
	}
}

impl FormType for chrono::NaiveTime {
	fn shape() -> TypeShape {
		TypeShape::Time
	}
}

impl IntoFieldValue for chrono::NaiveTime {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.format("%H:%M:%S%.f").to_string()))
	}
}

impl FormType for chrono::NaiveDateTime {
	fn shape() -> TypeShape {
		TypeShape::DateTime
	}
}

impl IntoFieldValue for chrono::NaiveDateTime {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(
			self.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
		))
	}
}

impl<Tz: chrono::TimeZone> FormType for chrono::DateTime<Tz> {
	fn shape() -> TypeShape {
		TypeShape::DateTimeOffset
	}
}

impl<Tz: chrono::TimeZone> IntoFieldValue for chrono::DateTime<Tz>
where
	Tz::Offset: fmt::Display,
{
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.to_rfc3339()))
	}
}

impl FormType for chrono::Duration {
	fn shape() -> TypeShape {
		TypeShape::Duration
	}
}

impl IntoFieldValue for chrono::Duration {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(self.to_string()))
	}
}

impl FormType for std::time::Duration {
	fn shape() -> TypeShape {
		TypeShape::Duration
	}
}

impl IntoFieldValue for std::time::Duration {
	fn to_field_value(&self) -> FieldValue<'_> {
		FieldValue::Scalar(Value::String(format!("PT{}S", self.as_secs_f64())))
	}
}
