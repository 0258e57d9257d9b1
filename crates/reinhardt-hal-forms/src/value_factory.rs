//! Form value factory
//!
//! Overlays a template with the values of a model instance. The template is
//! copied first, so a cached schema is never modified. Members missing from
//! the instance, or holding something the property's kind cannot take, leave
//! the property without a value instead of failing the fill.

use crate::customization::Customizations;
use crate::error::HalFormsResult;
use crate::settings::HalFormsSettings;
use crate::value::{FieldValue, FormModel};
use futures::FutureExt;
use futures::future::BoxFuture;
use reinhardt_hal_core::{Property, PropertyKind, Template};
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

/// A template whose properties carry the values of one instance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilledTemplate(Template);

impl FilledTemplate {
	pub fn template(&self) -> &Template {
		&self.0
	}

	pub fn into_template(self) -> Template {
		self.0
	}
}

impl Deref for FilledTemplate {
	type Target = Template;

	fn deref(&self) -> &Template {
		&self.0
	}
}

impl From<FilledTemplate> for Template {
	fn from(filled: FilledTemplate) -> Self {
		filled.0
	}
}

/// Fills templates with instance values
#[derive(Debug, Clone, Default)]
pub struct FormValueFactory {
	customizations: Customizations,
	settings: Arc<HalFormsSettings>,
}

impl FormValueFactory {
	pub fn new(settings: HalFormsSettings) -> Self {
		Self {
			customizations: Customizations::new(),
			settings: Arc::new(settings),
		}
	}

	pub fn with_customizations(mut self, customizations: Customizations) -> Self {
		self.customizations = customizations;
		self
	}

	/// Fills a copy of `template` with the members of `value`.
	///
	/// Without a value the copy is returned as a blank form.
	pub async fn fill_with(
		&self,
		template: &Template,
		value: Option<&dyn FormModel>,
	) -> HalFormsResult<FilledTemplate> {
		let mut filled = template.clone();
		if let Some(model) = value {
			tracing::debug!(
				model = model.model_name(),
				properties = filled.properties.len(),
				"Filling form template"
			);
			self.fill_properties(&mut filled.properties, model).await?;
		}
		Ok(FilledTemplate(filled))
	}

	/// Typed shorthand for [`fill_with`](Self::fill_with).
	pub async fn fill<T: FormModel>(
		&self,
		template: &Template,
		value: &T,
	) -> HalFormsResult<FilledTemplate> {
		self.fill_with(template, Some(value)).await
	}

	fn fill_properties<'a>(
		&'a self,
		properties: &'a mut [Property],
		model: &'a dyn FormModel,
	) -> BoxFuture<'a, HalFormsResult<()>> {
		async move {
			for property in properties.iter_mut() {
				let field = read_member(model, property);
				match property.kind() {
					PropertyKind::Object if self.has_nested_template(property) => {
						match field {
							Some(FieldValue::Object(nested)) => {
								if let Some(template) = self.nested_template_mut(property) {
									self.fill_properties(&mut template.properties, nested)
										.await?;
								}
							}
							Some(FieldValue::Null) | None => {}
							Some(other) => mismatch(model, property, &other),
						}
					}
					PropertyKind::Collection if self.has_nested_template(property) => {
						match field {
							Some(FieldValue::List(items)) => {
								self.fill_elements(property, &items).await?;
							}
							Some(FieldValue::Null) | None => {}
							Some(other) => mismatch(model, property, &other),
						}
					}
					_ => self.fill_leaf(model, property, field).await?,
				}
			}
			Ok(())
		}
		.boxed()
	}

	/// Adds one filled copy of the element template per item, keyed by index.
	async fn fill_elements(
		&self,
		property: &mut Property,
		items: &[FieldValue<'_>],
	) -> HalFormsResult<()> {
		let Some(element) = self.nested_template_mut(property).map(|t| t.clone()) else {
			return Ok(());
		};

		let mut filled = Vec::with_capacity(items.len());
		for (index, item) in items.iter().enumerate() {
			match item {
				FieldValue::Object(model) => {
					let mut template = element.clone();
					self.fill_properties(&mut template.properties, *model)
						.await?;
					filled.push((index.to_string(), template));
				}
				other => {
					tracing::trace!(
						property = %property.name,
						index,
						item = ?other,
						"Collection item is not an object, skipped"
					);
				}
			}
		}
		if let Some(templates) = property.templates_mut() {
			templates.extend(filled);
		}
		Ok(())
	}

	async fn fill_leaf(
		&self,
		model: &dyn FormModel,
		property: &mut Property,
		field: Option<FieldValue<'_>>,
	) -> HalFormsResult<()> {
		let extracted = field.filter(|f| !f.is_null()).map(|f| f.to_json());
		let value = self
			.customizations
			.apply_value(model.model_name(), property, extracted)
			.await?;
		if let Some(options) = property.details.options_mut() {
			options.select(value.as_ref());
		}
		property.value = value;
		Ok(())
	}

	fn has_nested_template(&self, property: &Property) -> bool {
		property
			.templates()
			.is_some_and(|t| t.contains_key(&self.settings.nested_template_name))
	}

	fn nested_template_mut<'p>(&self, property: &'p mut Property) -> Option<&'p mut Template> {
		property
			.templates_mut()
			.and_then(|t| t.get_mut(&self.settings.nested_template_name))
	}
}

/// Finds the member behind `property`: by recorded source name first, then
/// by name ignoring case, `_` and `-`.
fn read_member<'a>(model: &'a dyn FormModel, property: &Property) -> Option<FieldValue<'a>> {
	if let Some(source) = &property.source
		&& let Some(value) = model.field(source)
	{
		return Some(value);
	}
	let wanted = normalize(&property.name);
	model
		.field_names()
		.iter()
		.find(|name| normalize(name) == wanted)
		.and_then(|name| model.field(name))
}

fn normalize(name: &str) -> String {
	name.chars()
		.filter(|c| *c != '_' && *c != '-')
		.map(|c| c.to_ascii_lowercase())
		.collect()
}

fn mismatch(model: &dyn FormModel, property: &Property, found: &FieldValue<'_>) {
	tracing::trace!(
		model = model.model_name(),
		property = %property.name,
		kind = %property.kind(),
		found = ?found,
		"Member does not match property kind, value left absent"
	);
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("firstName", "first_name")]
	#[case("FIRST-NAME", "first_name")]
	#[case("age", "Age")]
	fn test_normalized_names_match(#[case] left: &str, #[case] right: &str) {
		assert_eq!(normalize(left), normalize(right));
	}
}
