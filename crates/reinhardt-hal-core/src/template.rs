//! HAL-Forms templates and properties
//!
//! A [`Template`] is the schema of a submittable form. Its [`Property`]
//! entries are tagged by [`PropertyType`], so a property only carries the
//! constraint attributes its kind can use: a `Bool` property has no
//! `options`, a `Text` property has no `step`, and only `Object` and
//! `Collection` properties hold nested templates.

use crate::error::HalError;
use crate::kind::PropertyKind;
use crate::options::Options;
use http::Method;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// Constraints of text-like properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextConstraints {
	pub regex: Option<String>,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	pub placeholder: Option<String>,
	pub options: Option<Options>,
}

/// Constraints of `textarea` properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextareaConstraints {
	pub text: TextConstraints,
	pub cols: Option<u32>,
	pub rows: Option<u32>,
}

/// Constraints of numeric and date/time properties
///
/// `min` and `max` are JSON values because date-like kinds express their
/// bounds as strings (`"2024-01-01"`) while numeric kinds use numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeConstraints {
	pub min: Option<Value>,
	pub max: Option<Value>,
	pub step: Option<f64>,
	pub placeholder: Option<String>,
	pub options: Option<Options>,
}

/// Collection details: options for multi-select and the element schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionDetails {
	pub options: Option<Options>,
	pub templates: IndexMap<String, Template>,
}

/// Object details: the nested schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectDetails {
	pub templates: IndexMap<String, Template>,
}

/// Kind-specific part of a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
	Hidden,
	Text(TextConstraints),
	Textarea(TextareaConstraints),
	Search(TextConstraints),
	Tel(TextConstraints),
	Url(TextConstraints),
	Email(TextConstraints),
	Password(TextConstraints),
	Date(RangeConstraints),
	Month(RangeConstraints),
	Week(RangeConstraints),
	Time(RangeConstraints),
	DateTimeLocal(RangeConstraints),
	Number(RangeConstraints),
	Range(RangeConstraints),
	Color,
	Bool,
	DateTimeOffset(RangeConstraints),
	Duration,
	Image,
	File,
	Collection(CollectionDetails),
	Object(ObjectDetails),
}

impl PropertyType {
	/// Creates an unconstrained property type for `kind`.
	pub fn from_kind(kind: PropertyKind) -> Self {
		Self::assemble(kind, Parts::default())
	}

	/// The semantic kind of this property type.
	pub fn kind(&self) -> PropertyKind {
		match self {
			Self::Hidden => PropertyKind::Hidden,
			Self::Text(_) => PropertyKind::Text,
			Self::Textarea(_) => PropertyKind::Textarea,
			Self::Search(_) => PropertyKind::Search,
			Self::Tel(_) => PropertyKind::Tel,
			Self::Url(_) => PropertyKind::Url,
			Self::Email(_) => PropertyKind::Email,
			Self::Password(_) => PropertyKind::Password,
			Self::Date(_) => PropertyKind::Date,
			Self::Month(_) => PropertyKind::Month,
			Self::Week(_) => PropertyKind::Week,
			Self::Time(_) => PropertyKind::Time,
			Self::DateTimeLocal(_) => PropertyKind::DateTimeLocal,
			Self::Number(_) => PropertyKind::Number,
			Self::Range(_) => PropertyKind::Range,
			Self::Color => PropertyKind::Color,
			Self::Bool => PropertyKind::Bool,
			Self::DateTimeOffset(_) => PropertyKind::DateTimeOffset,
			Self::Duration => PropertyKind::Duration,
			Self::Image => PropertyKind::Image,
			Self::File => PropertyKind::File,
			Self::Collection(_) => PropertyKind::Collection,
			Self::Object(_) => PropertyKind::Object,
		}
	}

	/// Converts to another kind, keeping every constraint the target kind
	/// can still express.
	pub fn into_kind(self, kind: PropertyKind) -> Self {
		if self.kind() == kind {
			return self;
		}
		Self::assemble(kind, self.into_parts())
	}

	pub fn text_constraints(&self) -> Option<&TextConstraints> {
		match self {
			Self::Text(c)
			| Self::Search(c)
			| Self::Tel(c)
			| Self::Url(c)
			| Self::Email(c)
			| Self::Password(c) => Some(c),
			Self::Textarea(c) => Some(&c.text),
			_ => None,
		}
	}

	pub fn text_constraints_mut(&mut self) -> Option<&mut TextConstraints> {
		match self {
			Self::Text(c)
			| Self::Search(c)
			| Self::Tel(c)
			| Self::Url(c)
			| Self::Email(c)
			| Self::Password(c) => Some(c),
			Self::Textarea(c) => Some(&mut c.text),
			_ => None,
		}
	}

	pub fn range_constraints(&self) -> Option<&RangeConstraints> {
		match self {
			Self::Date(c)
			| Self::Month(c)
			| Self::Week(c)
			| Self::Time(c)
			| Self::DateTimeLocal(c)
			| Self::Number(c)
			| Self::Range(c)
			| Self::DateTimeOffset(c) => Some(c),
			_ => None,
		}
	}

	pub fn range_constraints_mut(&mut self) -> Option<&mut RangeConstraints> {
		match self {
			Self::Date(c)
			| Self::Month(c)
			| Self::Week(c)
			| Self::Time(c)
			| Self::DateTimeLocal(c)
			| Self::Number(c)
			| Self::Range(c)
			| Self::DateTimeOffset(c) => Some(c),
			_ => None,
		}
	}

	pub fn options(&self) -> Option<&Options> {
		match self {
			Self::Collection(c) => c.options.as_ref(),
			other => other
				.text_constraints()
				.and_then(|c| c.options.as_ref())
				.or_else(|| other.range_constraints().and_then(|c| c.options.as_ref())),
		}
	}

	pub fn options_mut(&mut self) -> Option<&mut Options> {
		match self {
			Self::Collection(c) => c.options.as_mut(),
			Self::Text(c)
			| Self::Search(c)
			| Self::Tel(c)
			| Self::Url(c)
			| Self::Email(c)
			| Self::Password(c) => c.options.as_mut(),
			Self::Textarea(c) => c.text.options.as_mut(),
			Self::Date(c)
			| Self::Month(c)
			| Self::Week(c)
			| Self::Time(c)
			| Self::DateTimeLocal(c)
			| Self::Number(c)
			| Self::Range(c)
			| Self::DateTimeOffset(c) => c.options.as_mut(),
			_ => None,
		}
	}

	/// Attaches options. Returns them back when the kind cannot hold options.
	pub fn set_options(&mut self, options: Option<Options>) -> Result<(), Option<Options>> {
		match self {
			Self::Collection(c) => c.options = options,
			other => {
				if let Some(c) = other.text_constraints_mut() {
					c.options = options;
				} else if let Some(c) = other.range_constraints_mut() {
					c.options = options;
				} else {
					return Err(options);
				}
			}
		}
		Ok(())
	}

	pub fn templates(&self) -> Option<&IndexMap<String, Template>> {
		match self {
			Self::Collection(c) => Some(&c.templates),
			Self::Object(o) => Some(&o.templates),
			_ => None,
		}
	}

	pub fn templates_mut(&mut self) -> Option<&mut IndexMap<String, Template>> {
		match self {
			Self::Collection(c) => Some(&mut c.templates),
			Self::Object(o) => Some(&mut o.templates),
			_ => None,
		}
	}

	fn into_parts(self) -> Parts {
		match self {
			Self::Text(c)
			| Self::Search(c)
			| Self::Tel(c)
			| Self::Url(c)
			| Self::Email(c)
			| Self::Password(c) => Parts {
				text: Some(c),
				..Parts::default()
			},
			Self::Textarea(c) => Parts {
				text: Some(c.text),
				cols: c.cols,
				rows: c.rows,
				..Parts::default()
			},
			Self::Date(c)
			| Self::Month(c)
			| Self::Week(c)
			| Self::Time(c)
			| Self::DateTimeLocal(c)
			| Self::Number(c)
			| Self::Range(c)
			| Self::DateTimeOffset(c) => Parts {
				range: Some(c),
				..Parts::default()
			},
			Self::Collection(c) => Parts {
				options: c.options,
				templates: c.templates,
				..Parts::default()
			},
			Self::Object(o) => Parts {
				templates: o.templates,
				..Parts::default()
			},
			Self::Hidden
			| Self::Color
			| Self::Bool
			| Self::Duration
			| Self::Image
			| Self::File => Parts::default(),
		}
	}

	fn assemble(kind: PropertyKind, mut parts: Parts) -> Self {
		let options = parts
			.options
			.take()
			.or_else(|| parts.text.as_mut().and_then(|t| t.options.take()))
			.or_else(|| parts.range.as_mut().and_then(|r| r.options.take()));
		let placeholder = parts
			.text
			.as_ref()
			.and_then(|t| t.placeholder.clone())
			.or_else(|| parts.range.as_ref().and_then(|r| r.placeholder.clone()));
		let text = || TextConstraints {
			options: options.clone(),
			placeholder: placeholder.clone(),
			..parts.text.clone().unwrap_or_default()
		};
		let range = || RangeConstraints {
			options: options.clone(),
			placeholder: placeholder.clone(),
			..parts.range.clone().unwrap_or_default()
		};

		match kind {
			PropertyKind::Hidden => Self::Hidden,
			PropertyKind::Text => Self::Text(text()),
			PropertyKind::Textarea => Self::Textarea(TextareaConstraints {
				text: text(),
				cols: parts.cols,
				rows: parts.rows,
			}),
			PropertyKind::Search => Self::Search(text()),
			PropertyKind::Tel => Self::Tel(text()),
			PropertyKind::Url => Self::Url(text()),
			PropertyKind::Email => Self::Email(text()),
			PropertyKind::Password => Self::Password(text()),
			PropertyKind::Date => Self::Date(range()),
			PropertyKind::Month => Self::Month(range()),
			PropertyKind::Week => Self::Week(range()),
			PropertyKind::Time => Self::Time(range()),
			PropertyKind::DateTimeLocal => Self::DateTimeLocal(range()),
			PropertyKind::Number => Self::Number(range()),
			PropertyKind::Range => Self::Range(range()),
			PropertyKind::Color => Self::Color,
			PropertyKind::Bool => Self::Bool,
			PropertyKind::DateTimeOffset => Self::DateTimeOffset(range()),
			PropertyKind::Duration => Self::Duration,
			PropertyKind::Image => Self::Image,
			PropertyKind::File => Self::File,
			PropertyKind::Collection => Self::Collection(CollectionDetails {
				options,
				templates: parts.templates,
			}),
			PropertyKind::Object => Self::Object(ObjectDetails {
				templates: parts.templates,
			}),
		}
	}
}

#[derive(Default)]
struct Parts {
	text: Option<TextConstraints>,
	range: Option<RangeConstraints>,
	cols: Option<u32>,
	rows: Option<u32>,
	options: Option<Options>,
	templates: IndexMap<String, Template>,
}

/// One field of a template
///
/// # Examples
///
/// ```
/// use reinhardt_hal_core::{Property, PropertyKind};
///
/// let mut property = Property::new("email", PropertyKind::Text).required(true);
/// property.set_kind(PropertyKind::Email);
/// property.details.text_constraints_mut().unwrap().max_length = Some(254);
///
/// assert_eq!(property.kind(), PropertyKind::Email);
/// assert_eq!(property.details.text_constraints().unwrap().max_length, Some(254));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
	/// Property name, unique within its template
	pub name: String,
	/// Human-readable label
	pub prompt: Option<String>,
	pub required: bool,
	pub read_only: bool,
	/// Whether the value or options are URI-template driven
	pub templated: bool,
	/// Concrete value, present only once the template has been filled
	pub value: Option<Value>,
	/// Kind-specific constraints
	pub details: PropertyType,
	/// Name of the source member this property was generated from. Not part
	/// of the wire format.
	pub source: Option<String>,
}

impl Property {
	/// Creates an unconstrained, optional, writable property.
	pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
		Self {
			name: name.into(),
			prompt: None,
			required: false,
			read_only: false,
			templated: false,
			value: None,
			details: PropertyType::from_kind(kind),
			source: None,
		}
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn read_only(mut self, read_only: bool) -> Self {
		self.read_only = read_only;
		self
	}

	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());
		self
	}

	pub fn with_value(mut self, value: impl Into<Value>) -> Self {
		self.value = Some(value.into());
		self
	}

	pub fn kind(&self) -> PropertyKind {
		self.details.kind()
	}

	/// Changes the kind, keeping the constraints the new kind supports.
	pub fn set_kind(&mut self, kind: PropertyKind) {
		let details = std::mem::replace(&mut self.details, PropertyType::Hidden);
		self.details = details.into_kind(kind);
	}

	pub fn options(&self) -> Option<&Options> {
		self.details.options()
	}

	pub fn options_mut(&mut self) -> Option<&mut Options> {
		self.details.options_mut()
	}

	pub fn templates(&self) -> Option<&IndexMap<String, Template>> {
		self.details.templates()
	}

	pub fn templates_mut(&mut self) -> Option<&mut IndexMap<String, Template>> {
		self.details.templates_mut()
	}

	/// Whether the property name matches `name`, ignoring ASCII case.
	pub fn is_named(&self, name: &str) -> bool {
		self.name.eq_ignore_ascii_case(name)
	}
}

impl Serialize for Property {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("name", &self.name)?;
		map.serialize_entry("type", &self.kind())?;
		if let Some(prompt) = &self.prompt {
			map.serialize_entry("prompt", prompt)?;
		}
		if let Some(value) = &self.value {
			map.serialize_entry("value", value)?;
		}
		map.serialize_entry("required", &self.required)?;
		map.serialize_entry("readOnly", &self.read_only)?;
		if self.templated {
			map.serialize_entry("templated", &true)?;
		}

		match &self.details {
			PropertyType::Textarea(c) => {
				serialize_text(&mut map, &c.text)?;
				if let Some(cols) = c.cols {
					map.serialize_entry("cols", &cols)?;
				}
				if let Some(rows) = c.rows {
					map.serialize_entry("rows", &rows)?;
				}
			}
			PropertyType::Collection(c) => {
				if let Some(options) = &c.options {
					map.serialize_entry("options", options)?;
				}
				if !c.templates.is_empty() {
					map.serialize_entry("_templates", &c.templates)?;
				}
			}
			PropertyType::Object(o) => {
				if !o.templates.is_empty() {
					map.serialize_entry("_templates", &o.templates)?;
				}
			}
			details => {
				if let Some(c) = details.text_constraints() {
					serialize_text(&mut map, c)?;
				} else if let Some(c) = details.range_constraints() {
					serialize_range(&mut map, c)?;
				}
			}
		}
		map.end()
	}
}

fn serialize_text<M: SerializeMap>(map: &mut M, c: &TextConstraints) -> Result<(), M::Error> {
	if let Some(placeholder) = &c.placeholder {
		map.serialize_entry("placeholder", placeholder)?;
	}
	if let Some(regex) = &c.regex {
		map.serialize_entry("regex", regex)?;
	}
	if let Some(min_length) = c.min_length {
		map.serialize_entry("minLength", &min_length)?;
	}
	if let Some(max_length) = c.max_length {
		map.serialize_entry("maxLength", &max_length)?;
	}
	if let Some(options) = &c.options {
		map.serialize_entry("options", options)?;
	}
	Ok(())
}

fn serialize_range<M: SerializeMap>(map: &mut M, c: &RangeConstraints) -> Result<(), M::Error> {
	if let Some(placeholder) = &c.placeholder {
		map.serialize_entry("placeholder", placeholder)?;
	}
	if let Some(min) = &c.min {
		map.serialize_entry("min", min)?;
	}
	if let Some(max) = &c.max {
		map.serialize_entry("max", max)?;
	}
	if let Some(step) = c.step {
		map.serialize_entry("step", &step)?;
	}
	if let Some(options) = &c.options {
		map.serialize_entry("options", options)?;
	}
	Ok(())
}

/// Schema of a submittable form
///
/// Properties keep the declaration order of the source type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(
		serialize_with = "serialize_method",
		skip_serializing_if = "Option::is_none"
	)]
	pub method: Option<Method>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub target: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content_type: Option<String>,
	pub properties: Vec<Property>,
}

fn serialize_method<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
	match method {
		Some(method) => serializer.serialize_str(method.as_str()),
		None => serializer.serialize_none(),
	}
}

impl Template {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn with_property(mut self, property: Property) -> Self {
		self.properties.push(property);
		self
	}

	/// Looks a property up by name, ignoring ASCII case.
	pub fn property(&self, name: &str) -> Option<&Property> {
		self.properties.iter().find(|p| p.is_named(name))
	}

	pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
		self.properties.iter_mut().find(|p| p.is_named(name))
	}

	/// Removes a property by name and returns it.
	pub fn remove_property(&mut self, name: &str) -> Option<Property> {
		let index = self.properties.iter().position(|p| p.is_named(name))?;
		Some(self.properties.remove(index))
	}

	/// Property names in template order.
	pub fn property_names(&self) -> Vec<&str> {
		self.properties.iter().map(|p| p.name.as_str()).collect()
	}

	/// A template is addressable when a client knows where or how to submit it.
	pub fn is_addressable(&self) -> bool {
		self.target.is_some() || self.method.is_some()
	}
}

/// Named templates of a forms resource, in insertion order
///
/// HAL-Forms requires a `default` entry for a resource to be valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormTemplates(IndexMap<String, Template>);

impl FormTemplates {
	/// Name of the mandatory entry.
	pub const DEFAULT: &'static str = "default";

	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a map whose only entry is `template` under `default`.
	pub fn with_default(template: Template) -> Self {
		let mut templates = Self::new();
		templates.insert(Self::DEFAULT, template);
		templates
	}

	pub fn insert(&mut self, name: impl Into<String>, template: Template) -> Option<Template> {
		self.0.insert(name.into(), template)
	}

	pub fn get(&self, name: &str) -> Option<&Template> {
		self.0.get(name)
	}

	pub fn default_template(&self) -> Option<&Template> {
		self.get(Self::DEFAULT)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Template)> {
		self.0.iter()
	}

	/// Checks the HAL-Forms invariants: a `default` entry exists and every
	/// template has a target or a method.
	pub fn validate(&self) -> Result<(), HalError> {
		if self.default_template().is_none() {
			return Err(HalError::MissingDefaultTemplate);
		}
		for (name, template) in &self.0 {
			if !template.is_addressable() {
				return Err(HalError::UnaddressableTemplate(name.clone()));
			}
		}
		Ok(())
	}
}

impl IntoIterator for FormTemplates {
	type Item = (String, Template);
	type IntoIter = indexmap::map::IntoIter<String, Template>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
