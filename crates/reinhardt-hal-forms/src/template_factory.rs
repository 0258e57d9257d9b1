//! Form template factory
//!
//! Builds the schema-only [`Template`] of a [`FormModel`] type:
//!
//! 1. look the template up in the cache by type, method, title and content type;
//! 2. on a miss, walk the type's members in declaration order, classifying
//!    each one, copying its annotations into constraints, deriving options and
//!    recursing into nested objects and collections of objects;
//! 3. run the property-template hooks on every property and the
//!    forms-resource hooks once on the top-level template;
//! 4. store the result and hand the caller a copy.
//!
//! Recursion is bounded twice: a type already on the current path is not
//! expanded again, and nesting stops at `max_depth`. Both cases yield an
//! `Object` property without nested templates.

use crate::cache::{MokaTemplateCache, TemplateCache, TemplateKey};
use crate::classifier::PropertyTypeClassifier;
use crate::customization::{Customizations, MemberContext};
use crate::error::{HalFormsError, HalFormsResult};
use crate::options::{ForeignKeyLinkProvider, NoForeignKeyLinks, OptionsBuilder};
use crate::schema::{Annotations, MemberInfo, TypeInfo, TypeRef};
use crate::settings::HalFormsSettings;
use crate::value::FormModel;
use futures::FutureExt;
use futures::future::BoxFuture;
use http::Method;
use reinhardt_hal_core::{Property, PropertyKind, PropertyType, Template};
use std::any::TypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// Attempts before giving up on a build cancelled by another request.
const MAX_BUILD_ATTEMPTS: usize = 3;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
	NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Template-level parameters of a build
///
/// # Examples
///
/// ```
/// use http::Method;
/// use reinhardt_hal_forms::TemplateRequest;
///
/// let request = TemplateRequest::new(Method::PUT)
/// 	.with_title("Edit order")
/// 	.with_target("/orders/7");
///
/// assert_eq!(request.method, Some(Method::PUT));
/// assert!(!request.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateRequest {
	pub method: Option<Method>,
	pub title: Option<String>,
	/// Defaults to the configured content type
	pub content_type: Option<String>,
	/// Applied to the returned copy, never cached
	pub target: Option<String>,
	pub cancellation: Option<CancellationToken>,
}

impl TemplateRequest {
	pub fn new(method: Method) -> Self {
		Self {
			method: Some(method),
			..Self::default()
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancellation = Some(token);
		self
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancellation
			.as_ref()
			.is_some_and(CancellationToken::is_cancelled)
	}
}

/// Builds schema-only templates from type descriptions
///
/// Clones share the cache and its entries. Every `with_*` call starts a new
/// cache namespace, so a reconfigured clone never serves templates to the
/// factory it was cloned from, or the other way round.
#[derive(Clone)]
pub struct FormTemplateFactory {
	generation: u64,
	classifier: Arc<PropertyTypeClassifier>,
	options: OptionsBuilder,
	customizations: Customizations,
	cache: Arc<dyn TemplateCache>,
	settings: Arc<HalFormsSettings>,
}

impl Default for FormTemplateFactory {
	fn default() -> Self {
		Self::new(HalFormsSettings::default())
	}
}

impl FormTemplateFactory {
	/// Creates a factory with a `moka` cache sized from `settings`, no
	/// foreign-key links and no customizations.
	pub fn new(settings: HalFormsSettings) -> Self {
		let cache = MokaTemplateCache::new(settings.cache_capacity, settings.cache_ttl());
		let options = OptionsBuilder::new(Arc::new(NoForeignKeyLinks))
			.with_camel_case_prompts(settings.camel_case_option_prompts);
		Self {
			generation: next_generation(),
			classifier: Arc::new(PropertyTypeClassifier::new()),
			options,
			customizations: Customizations::new(),
			cache: Arc::new(cache),
			settings: Arc::new(settings),
		}
	}

	pub fn with_classifier(mut self, classifier: PropertyTypeClassifier) -> Self {
		self.classifier = Arc::new(classifier);
		self.generation = next_generation();
		self
	}

	pub fn with_foreign_key_links(mut self, provider: Arc<dyn ForeignKeyLinkProvider>) -> Self {
		self.options = OptionsBuilder::new(provider)
			.with_camel_case_prompts(self.settings.camel_case_option_prompts);
		self.generation = next_generation();
		self
	}

	/// Replaces the hook chains.
	pub fn with_customizations(mut self, customizations: Customizations) -> Self {
		self.customizations = customizations;
		self.generation = next_generation();
		self
	}

	pub fn with_cache(mut self, cache: Arc<dyn TemplateCache>) -> Self {
		self.cache = cache;
		self.generation = next_generation();
		self
	}

	pub fn settings(&self) -> &HalFormsSettings {
		&self.settings
	}

	pub fn customizations(&self) -> &Customizations {
		&self.customizations
	}

	pub fn options_builder(&self) -> &OptionsBuilder {
		&self.options
	}

	pub fn invalidate_cache(&self) {
		self.cache.invalidate_all();
	}

	/// Builds (or fetches from cache) the template of `T`.
	pub async fn create_template_for<T: FormModel + 'static>(
		&self,
		request: &TemplateRequest,
	) -> HalFormsResult<Template> {
		self.create_template_for_type(TypeRef::of::<T>(), request)
			.await
	}

	/// Builds (or fetches from cache) the template of a described type.
	pub async fn create_template_for_type(
		&self,
		type_ref: TypeRef,
		request: &TemplateRequest,
	) -> HalFormsResult<Template> {
		let content_type = request
			.content_type
			.clone()
			.unwrap_or_else(|| self.settings.default_content_type.clone());
		let key = TemplateKey {
			generation: self.generation,
			type_id: type_ref.id,
			type_name: type_ref.name,
			method: request.method.clone(),
			title: request.title.clone(),
			content_type: Some(content_type.clone()),
		};

		let mut attempt = 1;
		let cached = loop {
			let build = self
				.build_root(type_ref, request, content_type.clone())
				.boxed();
			match self.cache.get_or_create(key.clone(), build).await {
				Ok(template) => break template,
				// Another request computing the same entry was cancelled.
				Err(error)
					if error.is_cancelled()
						&& !request.is_cancelled()
						&& attempt < MAX_BUILD_ATTEMPTS =>
				{
					tracing::debug!(
						type_name = type_ref.name,
						attempt,
						"Retrying template build cancelled by another request"
					);
					attempt += 1;
				}
				Err(error) => return Err(error),
			}
		};
		checkpoint(request.cancellation.as_ref(), type_ref.name)?;

		let mut template = Template::clone(&cached);
		if let Some(target) = &request.target {
			template.target = Some(target.clone());
		}
		Ok(template)
	}

	async fn build_root(
		&self,
		type_ref: TypeRef,
		request: &TemplateRequest,
		content_type: String,
	) -> HalFormsResult<Template> {
		let info = type_ref.describe();
		tracing::debug!(
			type_name = info.name,
			members = info.members.len(),
			"Building form template"
		);

		let cancellation = request.cancellation.as_ref();
		let properties = self
			.build_properties(&info, vec![type_ref.id], 0, cancellation)
			.await?;
		checkpoint(cancellation, info.name)?;

		let template = Template {
			title: request.title.clone(),
			method: request.method.clone(),
			target: None,
			content_type: Some(content_type),
			properties,
		};
		self.customizations.apply_resource(template, &info).await
	}

	fn build_properties<'a>(
		&'a self,
		info: &'a TypeInfo,
		path: Vec<TypeId>,
		depth: usize,
		cancellation: Option<&'a CancellationToken>,
	) -> BoxFuture<'a, HalFormsResult<Vec<Property>>> {
		async move {
			let mut properties: Vec<Property> = Vec::with_capacity(info.members.len());
			for member in &info.members {
				checkpoint(cancellation, info.name)?;

				let property = self
					.build_property(member, &path, depth, cancellation)
					.await?;
				let context = MemberContext {
					type_name: info.name,
					member,
					depth,
				};
				let Some(property) = self.customizations.apply_template(property, &context).await?
				else {
					continue;
				};

				if properties.iter().any(|p| p.is_named(&property.name)) {
					return Err(HalFormsError::DuplicateProperty {
						type_name: info.name.to_string(),
						property: property.name,
					});
				}
				tracing::trace!(
					type_name = info.name,
					property = %property.name,
					kind = %property.kind(),
					"Generated property"
				);
				properties.push(property);
			}
			Ok(properties)
		}
		.boxed()
	}

	async fn build_property(
		&self,
		member: &MemberInfo,
		path: &[TypeId],
		depth: usize,
		cancellation: Option<&CancellationToken>,
	) -> HalFormsResult<Property> {
		let annotations = &member.annotations;
		let kind = self.classifier.classify_member(member);
		let name = annotations
			.rename
			.clone()
			.unwrap_or_else(|| self.settings.property_naming.apply(&member.name));

		let mut property = Property::new(name, kind);
		property.source = Some(member.name.clone());
		property.required = annotations
			.required
			.unwrap_or_else(|| member.shape.is_required_by_default());
		property.read_only = annotations.read_only;
		property.prompt = annotations.prompt.clone();
		property.templated = annotations.templated;
		apply_constraints(&mut property.details, annotations);

		if kind.accepts_options()
			&& let Some(options) = self.options.build_options(member, None).await?
		{
			property.templated |= options.is_templated();
			if property.details.set_options(Some(options)).is_err() {
				tracing::warn!(member = %member.name, %kind, "Options dropped for kind");
			}
		}

		let nested = match kind {
			PropertyKind::Object => member.shape.object(),
			PropertyKind::Collection => member.shape.element().and_then(|e| e.object()),
			_ => None,
		};
		if let Some(nested) = nested
			&& let Some(template) = self
				.nested_template(*nested, path, depth, cancellation)
				.await?
			&& let Some(templates) = property.templates_mut()
		{
			templates.insert(self.settings.nested_template_name.clone(), template);
		}

		Ok(property)
	}

	async fn nested_template(
		&self,
		type_ref: TypeRef,
		path: &[TypeId],
		depth: usize,
		cancellation: Option<&CancellationToken>,
	) -> HalFormsResult<Option<Template>> {
		if path.contains(&type_ref.id) {
			tracing::debug!(
				type_name = type_ref.name,
				"Type already on the current path, not expanding"
			);
			return Ok(None);
		}
		if depth + 1 >= self.settings.max_depth {
			tracing::warn!(
				type_name = type_ref.name,
				max_depth = self.settings.max_depth,
				"Nested template truncated at maximum depth"
			);
			return Ok(None);
		}

		let info = type_ref.describe();
		let mut nested_path = path.to_vec();
		nested_path.push(type_ref.id);
		let properties = self
			.build_properties(&info, nested_path, depth + 1, cancellation)
			.await?;
		Ok(Some(Template {
			properties,
			..Template::default()
		}))
	}
}

fn checkpoint(cancellation: Option<&CancellationToken>, type_name: &str) -> HalFormsResult<()> {
	match cancellation {
		Some(token) if token.is_cancelled() => {
			tracing::debug!(type_name, "Template construction cancelled");
			Err(HalFormsError::Cancelled(type_name.to_string()))
		}
		_ => Ok(()),
	}
}

/// Copies the annotations meaningful for the property's kind.
fn apply_constraints(details: &mut PropertyType, annotations: &Annotations) {
	if let Some(text) = details.text_constraints_mut() {
		text.regex = annotations.regex.clone();
		text.min_length = annotations.min_length;
		text.max_length = annotations.max_length;
		text.placeholder = annotations.placeholder.clone();
	}
	if let Some(range) = details.range_constraints_mut() {
		range.min = annotations.min.clone();
		range.max = annotations.max.clone();
		range.step = annotations.step;
		range.placeholder = annotations.placeholder.clone();
	}
	if let PropertyType::Textarea(textarea) = details {
		textarea.cols = annotations.cols;
		textarea.rows = annotations.rows;
	}
}
