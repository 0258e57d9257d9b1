//! Form factory
//!
//! Entry point composing the template factory, the value factory and a link
//! factory into the operations handlers call: a schema-only template, a filled
//! form, and a HAL-Forms resource whose `default` template is bound to an
//! endpoint.

use crate::cache::TemplateCache;
use crate::classifier::PropertyTypeClassifier;
use crate::customization::Customizations;
use crate::error::{HalFormsError, HalFormsResult};
use crate::link::{Endpoint, LinkFactory, ReversingLinkFactory};
use crate::options::ForeignKeyLinkProvider;
use crate::settings::HalFormsSettings;
use crate::template_factory::{FormTemplateFactory, TemplateRequest};
use crate::value::FormModel;
use crate::value_factory::{FilledTemplate, FormValueFactory};
use reinhardt_hal_core::{FormTemplates, FormsResource, HalResource, SELF_REL, Template};
use std::sync::Arc;

/// Builds templates, filled forms and forms resources
///
/// # Examples
///
/// ```
/// use http::Method;
/// use reinhardt_hal_forms::{FormFactory, FormModel, TemplateRequest};
///
/// #[derive(FormModel)]
/// struct Login {
/// 	username: String,
/// 	#[form(kind = "password", min_length = 8)]
/// 	password: String,
/// }
///
/// # tokio_test::block_on(async {
/// let factory = FormFactory::default();
/// let request = TemplateRequest::new(Method::POST).with_target("/login");
/// let template = factory.create_template_for::<Login>(&request).await.unwrap();
///
/// assert_eq!(template.property_names(), vec!["username", "password"]);
/// # });
/// ```
#[derive(Clone)]
pub struct FormFactory {
	templates: FormTemplateFactory,
	values: FormValueFactory,
	links: Arc<dyn LinkFactory>,
}

impl Default for FormFactory {
	fn default() -> Self {
		Self::new(HalFormsSettings::default())
	}
}

impl FormFactory {
	pub fn new(settings: HalFormsSettings) -> Self {
		Self {
			templates: FormTemplateFactory::new(settings.clone()),
			values: FormValueFactory::new(settings),
			links: Arc::new(ReversingLinkFactory::default()),
		}
	}

	/// Installs the hook chains on both the template and the value factory.
	pub fn with_customizations(mut self, customizations: Customizations) -> Self {
		self.values = self.values.with_customizations(customizations.clone());
		self.templates = self.templates.with_customizations(customizations);
		self
	}

	pub fn with_link_factory(mut self, links: Arc<dyn LinkFactory>) -> Self {
		self.links = links;
		self
	}

	pub fn with_foreign_key_links(mut self, provider: Arc<dyn ForeignKeyLinkProvider>) -> Self {
		self.templates = self.templates.with_foreign_key_links(provider);
		self
	}

	pub fn with_classifier(mut self, classifier: PropertyTypeClassifier) -> Self {
		self.templates = self.templates.with_classifier(classifier);
		self
	}

	pub fn with_cache(mut self, cache: Arc<dyn TemplateCache>) -> Self {
		self.templates = self.templates.with_cache(cache);
		self
	}

	pub fn template_factory(&self) -> &FormTemplateFactory {
		&self.templates
	}

	pub fn value_factory(&self) -> &FormValueFactory {
		&self.values
	}

	/// Schema-only template of `T`.
	pub async fn create_template_for<T: FormModel + 'static>(
		&self,
		request: &TemplateRequest,
	) -> HalFormsResult<Template> {
		self.templates.create_template_for::<T>(request).await
	}

	/// Template of `T` filled with `value`, or left blank without one.
	pub async fn create_form<T: FormModel + 'static>(
		&self,
		request: &TemplateRequest,
		value: Option<&T>,
	) -> HalFormsResult<FilledTemplate> {
		let template = self.templates.create_template_for::<T>(request).await?;
		self.values
			.fill_with(&template, value.map(|v| v as &dyn FormModel))
			.await
	}

	/// Wraps `template` as the `default` entry of a template map.
	///
	/// Fails with [`HalFormsError::MissingTarget`] when the template has
	/// neither a target nor a method.
	pub fn create_templates_with_default_entry(
		&self,
		template: Template,
	) -> HalFormsResult<FormTemplates> {
		if !template.is_addressable() {
			return Err(HalFormsError::MissingTarget(
				template
					.title
					.clone()
					.unwrap_or_else(|| FormTemplates::DEFAULT.to_string()),
			));
		}
		Ok(FormTemplates::with_default(template))
	}

	/// Wraps `resource` with the filled `default` template of `T`.
	///
	/// The template's target comes from `request`; a template left with
	/// neither target nor method after all hooks is a configuration error.
	pub async fn create_resource<T, S>(
		&self,
		resource: HalResource<S>,
		request: &TemplateRequest,
		value: Option<&T>,
	) -> HalFormsResult<FormsResource<S>>
	where
		T: FormModel + 'static,
		S: Send,
	{
		let form = self.create_form::<T>(request, value).await?.into_template();
		if !form.is_addressable() {
			return Err(HalFormsError::MissingTarget(T::type_name().to_string()));
		}
		let templates = self.create_templates_with_default_entry(form)?;
		Ok(FormsResource::new(resource, templates)?)
	}

	/// Like [`create_resource`](Self::create_resource), with method and target
	/// bound from `endpoint`.
	///
	/// The endpoint's method, when set, overrides the request's. The resolved
	/// link also becomes the resource's self link unless it already has one.
	pub async fn create_resource_for_endpoint<T, S>(
		&self,
		mut resource: HalResource<S>,
		endpoint: &Endpoint,
		request: &TemplateRequest,
		value: Option<&T>,
	) -> HalFormsResult<FormsResource<S>>
	where
		T: FormModel + 'static,
		S: Send,
	{
		let link = self
			.links
			.create_link(endpoint, None, request.title.as_deref())
			.await?;

		let mut request = request.clone();
		request.target = Some(link.href.clone());
		if let Some(method) = endpoint.method() {
			request.method = Some(method.clone());
		}
		tracing::debug!(
			type_name = T::type_name(),
			%endpoint,
			target = %link.href,
			"Binding form to endpoint"
		);

		if resource.self_link().is_none() {
			resource.add_link(SELF_REL, link);
		}
		self.create_resource::<T, S>(resource, &request, value).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{MemberInfo, TypeInfo};
	use crate::value::FieldValue;
	use http::Method;
	use rstest::rstest;

	struct Empty;

	impl FormModel for Empty {
		fn type_info() -> TypeInfo {
			TypeInfo::new("Empty")
		}

		fn type_name() -> &'static str {
			"Empty"
		}

		fn field(&self, _member: &str) -> Option<FieldValue<'_>> {
			None
		}

		fn field_names(&self) -> &'static [&'static str] {
			&[]
		}
	}

	struct Tag {
		label: String,
	}

	impl FormModel for Tag {
		fn type_info() -> TypeInfo {
			TypeInfo::new("Tag").member(MemberInfo::of::<String>("label"))
		}

		fn type_name() -> &'static str {
			"Tag"
		}

		fn field(&self, member: &str) -> Option<FieldValue<'_>> {
			match member {
				"label" => Some(FieldValue::Scalar(self.label.clone().into())),
				_ => None,
			}
		}

		fn field_names(&self) -> &'static [&'static str] {
			&["label"]
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_type_without_members_yields_empty_template() {
		let template = FormFactory::default()
			.create_template_for::<Empty>(&TemplateRequest::new(Method::POST))
			.await
			.unwrap();
		assert!(template.properties.is_empty());
	}

	#[rstest]
	fn test_default_entry_requires_target_or_method() {
		let factory = FormFactory::default();
		assert!(matches!(
			factory.create_templates_with_default_entry(Template::new()),
			Err(HalFormsError::MissingTarget(_))
		));

		let templates = factory
			.create_templates_with_default_entry(Template::new().with_target("/tags"))
			.unwrap();
		assert_eq!(templates.len(), 1);
		assert!(templates.default_template().is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_resource_without_method_or_target_is_rejected() {
		let error = FormFactory::default()
			.create_resource::<Tag, _>(HalResource::empty(), &TemplateRequest::default(), None)
			.await
			.unwrap_err();
		assert!(matches!(error, HalFormsError::MissingTarget(name) if name == "Tag"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_endpoint_binds_target_method_and_self_link() {
		let tag = Tag {
			label: "urgent".to_string(),
		};
		let endpoint = Endpoint::href("/tags/1").with_method(Method::PUT);
		let resource = FormFactory::default()
			.create_resource_for_endpoint(
				HalResource::empty(),
				&endpoint,
				&TemplateRequest::new(Method::POST),
				Some(&tag),
			)
			.await
			.unwrap();

		let template = resource.default_template().unwrap();
		assert_eq!(template.method, Some(Method::PUT));
		assert_eq!(template.target.as_deref(), Some("/tags/1"));
		assert_eq!(
			template.property("label").unwrap().value,
			Some(serde_json::json!("urgent"))
		);
		assert_eq!(resource.resource.self_link().unwrap().href, "/tags/1");
	}
}
