//! Customization hook chains
//!
//! Hooks are registered explicitly on a [`Customizations`] value and run in
//! registration order:
//!
//! - property-template hooks see every generated property and may rewrite it,
//!   drop it ([`Customized::Skip`]) or end the chain ([`Customized::Stop`]);
//! - property-value hooks see every extracted leaf value and may replace it;
//! - forms-resource hooks see the finished top-level template once.
//!
//! When two hooks touch the same constraint, the later one wins. A failing
//! hook aborts the whole construction.

use crate::error::{BoxError, HalFormsError, HalFormsResult};
use crate::schema::{MemberInfo, TypeInfo};
use async_trait::async_trait;
use reinhardt_hal_core::{Property, Template};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The member a property is being generated from
#[derive(Debug, Clone, Copy)]
pub struct MemberContext<'a> {
	/// Name of the owning type
	pub type_name: &'static str,
	pub member: &'a MemberInfo,
	/// Nesting depth, 0 for top-level members
	pub depth: usize,
}

/// Outcome of a property-template hook
#[derive(Debug, Clone, PartialEq)]
pub enum Customized {
	/// Hand the property to the next hook
	Continue(Property),
	/// Keep the property and skip the remaining hooks
	Stop(Property),
	/// Remove the property from the template
	Skip,
}

/// Adjusts generated properties
#[async_trait]
pub trait PropertyTemplateCustomization: Send + Sync {
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	async fn customize(
		&self,
		property: Property,
		context: &MemberContext<'_>,
	) -> Result<Customized, BoxError>;
}

/// Adjusts extracted property values
#[async_trait]
pub trait PropertyValueCustomization: Send + Sync {
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Returns the final value of `property`, given the extracted `value`.
	async fn customize(
		&self,
		property: &Property,
		value: Option<Value>,
	) -> Result<Option<Value>, BoxError>;
}

/// Adjusts a finished top-level template
#[async_trait]
pub trait FormsResourceCustomization: Send + Sync {
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	async fn customize(&self, template: Template, type_info: &TypeInfo)
	-> Result<Template, BoxError>;
}

/// Property-template hook from a closure
pub struct FnTemplateCustomization<F> {
	name: String,
	f: F,
}

#[async_trait]
impl<F> PropertyTemplateCustomization for FnTemplateCustomization<F>
where
	F: Fn(Property, &MemberContext<'_>) -> Result<Customized, BoxError> + Send + Sync,
{
	fn name(&self) -> &str {
		&self.name
	}

	async fn customize(
		&self,
		property: Property,
		context: &MemberContext<'_>,
	) -> Result<Customized, BoxError> {
		(self.f)(property, context)
	}
}

/// Property-value hook from a closure
pub struct FnValueCustomization<F> {
	name: String,
	f: F,
}

#[async_trait]
impl<F> PropertyValueCustomization for FnValueCustomization<F>
where
	F: Fn(&Property, Option<Value>) -> Result<Option<Value>, BoxError> + Send + Sync,
{
	fn name(&self) -> &str {
		&self.name
	}

	async fn customize(
		&self,
		property: &Property,
		value: Option<Value>,
	) -> Result<Option<Value>, BoxError> {
		(self.f)(property, value)
	}
}

/// Forms-resource hook from a closure
pub struct FnResourceCustomization<F> {
	name: String,
	f: F,
}

#[async_trait]
impl<F> FormsResourceCustomization for FnResourceCustomization<F>
where
	F: Fn(Template, &TypeInfo) -> Result<Template, BoxError> + Send + Sync,
{
	fn name(&self) -> &str {
		&self.name
	}

	async fn customize(
		&self,
		template: Template,
		type_info: &TypeInfo,
	) -> Result<Template, BoxError> {
		(self.f)(template, type_info)
	}
}

/// Registered hook chains
///
/// # Examples
///
/// ```
/// use reinhardt_hal_forms::{Customizations, Customized};
///
/// let customizations = Customizations::new()
/// 	.template_fn("hide-internal", |property, context| {
/// 		if context.member.name.starts_with("internal_") {
/// 			Ok(Customized::Skip)
/// 		} else {
/// 			Ok(Customized::Continue(property))
/// 		}
/// 	})
/// 	.value_fn("redact-password", |property, value| {
/// 		Ok(if property.name == "password" { None } else { value })
/// 	});
///
/// assert_eq!(customizations.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Customizations {
	templates: Vec<Arc<dyn PropertyTemplateCustomization>>,
	values: Vec<Arc<dyn PropertyValueCustomization>>,
	resources: Vec<Arc<dyn FormsResourceCustomization>>,
}

impl fmt::Debug for Customizations {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names = |hooks: Vec<&str>| hooks.join(", ");
		f.debug_struct("Customizations")
			.field(
				"templates",
				&names(self.templates.iter().map(|h| h.name()).collect()),
			)
			.field(
				"values",
				&names(self.values.iter().map(|h| h.name()).collect()),
			)
			.field(
				"resources",
				&names(self.resources.iter().map(|h| h.name()).collect()),
			)
			.finish()
	}
}

impl Customizations {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_template(mut self, hook: impl PropertyTemplateCustomization + 'static) -> Self {
		self.templates.push(Arc::new(hook));
		self
	}

	pub fn with_value(mut self, hook: impl PropertyValueCustomization + 'static) -> Self {
		self.values.push(Arc::new(hook));
		self
	}

	pub fn with_resource(mut self, hook: impl FormsResourceCustomization + 'static) -> Self {
		self.resources.push(Arc::new(hook));
		self
	}

	pub fn template_fn<F>(self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(Property, &MemberContext<'_>) -> Result<Customized, BoxError>
			+ Send
			+ Sync
			+ 'static,
	{
		self.with_template(FnTemplateCustomization {
			name: name.into(),
			f,
		})
	}

	pub fn value_fn<F>(self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&Property, Option<Value>) -> Result<Option<Value>, BoxError> + Send + Sync + 'static,
	{
		self.with_value(FnValueCustomization {
			name: name.into(),
			f,
		})
	}

	pub fn resource_fn<F>(self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(Template, &TypeInfo) -> Result<Template, BoxError> + Send + Sync + 'static,
	{
		self.with_resource(FnResourceCustomization {
			name: name.into(),
			f,
		})
	}

	/// Total number of registered hooks.
	pub fn len(&self) -> usize {
		self.templates.len() + self.values.len() + self.resources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Runs the property-template chain. `None` means the property was skipped.
	pub async fn apply_template(
		&self,
		mut property: Property,
		context: &MemberContext<'_>,
	) -> HalFormsResult<Option<Property>> {
		for hook in &self.templates {
			let property_name = property.name.clone();
			let outcome = hook.customize(property, context).await.map_err(|source| {
				HalFormsError::Customization {
					hook: hook.name().to_string(),
					type_name: context.type_name.to_string(),
					property: property_name,
					source,
				}
			})?;
			property = match outcome {
				Customized::Continue(property) => property,
				Customized::Stop(property) => return Ok(Some(property)),
				Customized::Skip => {
					tracing::trace!(
						hook = hook.name(),
						member = %context.member.name,
						"Property skipped by customization"
					);
					return Ok(None);
				}
			};
		}
		Ok(Some(property))
	}

	/// Runs the property-value chain.
	pub async fn apply_value(
		&self,
		type_name: &str,
		property: &Property,
		mut value: Option<Value>,
	) -> HalFormsResult<Option<Value>> {
		for hook in &self.values {
			value = hook
				.customize(property, value)
				.await
				.map_err(|source| HalFormsError::Customization {
					hook: hook.name().to_string(),
					type_name: type_name.to_string(),
					property: property.name.clone(),
					source,
				})?;
		}
		Ok(value)
	}

	/// Runs the forms-resource chain.
	pub async fn apply_resource(
		&self,
		mut template: Template,
		type_info: &TypeInfo,
	) -> HalFormsResult<Template> {
		for hook in &self.resources {
			template = hook.customize(template, type_info).await.map_err(|source| {
				HalFormsError::ResourceCustomization {
					hook: hook.name().to_string(),
					type_name: type_info.name.to_string(),
					source,
				}
			})?;
		}
		Ok(template)
	}
}
