//! Options derivation
//!
//! Enum members become inline options. Foreign keys become a link to a
//! remote list endpoint when the [`ForeignKeyLinkProvider`] knows one, and
//! otherwise get no options at all so the property degrades to its raw kind.

use crate::error::{BoxError, HalFormsError, HalFormsResult};
use crate::schema::{EnumRef, ForeignKey, MemberInfo, TypeShape};
use async_trait::async_trait;
use convert_case::{Case, Casing};
use parking_lot::RwLock;
use reinhardt_hal_core::{InlineOption, Options, OptionsLink};
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Remote options returned by a foreign-key-link provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsLinkDescriptor {
	pub link: OptionsLink,
	/// Field of remote entries shown to the user
	pub prompt_field: Option<String>,
	/// Field of remote entries submitted as value
	pub value_field: Option<String>,
}

impl OptionsLinkDescriptor {
	pub fn new(link: OptionsLink) -> Self {
		Self {
			link,
			prompt_field: None,
			value_field: None,
		}
	}

	/// Creates a descriptor for `href`, templated when it contains a URI
	/// template expression.
	pub fn href(href: impl Into<String>) -> Self {
		let href = href.into();
		let templated = href.contains('{');
		Self::new(OptionsLink::new(href).templated(templated))
	}

	pub fn with_prompt_field(mut self, field: impl Into<String>) -> Self {
		self.prompt_field = Some(field.into());
		self
	}

	pub fn with_value_field(mut self, field: impl Into<String>) -> Self {
		self.value_field = Some(field.into());
		self
	}

	fn into_options(self) -> Options {
		let mut options = Options::link(self.link);
		options.prompt_field = self.prompt_field;
		options.value_field = self.value_field;
		options
	}
}

/// Resolves the remote list endpoint of a referenced entity
#[async_trait]
pub trait ForeignKeyLinkProvider: Send + Sync {
	fn can_create_link(&self, target: &ForeignKey) -> bool;

	/// Creates the options link. `Ok(None)` declines, which is not an error.
	async fn create_link(
		&self,
		target: &ForeignKey,
	) -> Result<Option<OptionsLinkDescriptor>, BoxError>;
}

/// Provider that never creates links
#[derive(Debug, Clone, Copy, Default)]
pub struct NoForeignKeyLinks;

#[async_trait]
impl ForeignKeyLinkProvider for NoForeignKeyLinks {
	fn can_create_link(&self, _target: &ForeignKey) -> bool {
		false
	}

	async fn create_link(
		&self,
		_target: &ForeignKey,
	) -> Result<Option<OptionsLinkDescriptor>, BoxError> {
		Ok(None)
	}
}

/// Provider backed by explicitly registered endpoints
///
/// # Examples
///
/// ```
/// use reinhardt_hal_forms::{ForeignKeyLinkProvider, OptionsLinkDescriptor, RegisteredForeignKeyLinks};
/// use reinhardt_hal_forms::schema::ForeignKey;
///
/// struct Category;
///
/// let links = RegisteredForeignKeyLinks::new();
/// links.register::<Category>(OptionsLinkDescriptor::href("/categories").with_value_field("id"));
///
/// assert!(links.can_create_link(&ForeignKey::of::<Category>()));
/// assert!(!links.can_create_link(&ForeignKey::of::<String>()));
/// ```
#[derive(Debug, Default)]
pub struct RegisteredForeignKeyLinks {
	links: RwLock<HashMap<TypeId, OptionsLinkDescriptor>>,
}

impl RegisteredForeignKeyLinks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the list endpoint of entity `T`.
	pub fn register<T: ?Sized + 'static>(&self, descriptor: OptionsLinkDescriptor) {
		self.register_key(ForeignKey::of::<T>(), descriptor);
	}

	pub fn register_key(&self, target: ForeignKey, descriptor: OptionsLinkDescriptor) {
		tracing::debug!(entity = target.name, href = %descriptor.link.href, "Registered foreign key link");
		self.links.write().insert(target.id, descriptor);
	}

	pub fn len(&self) -> usize {
		self.links.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.links.read().is_empty()
	}
}

#[async_trait]
impl ForeignKeyLinkProvider for RegisteredForeignKeyLinks {
	fn can_create_link(&self, target: &ForeignKey) -> bool {
		self.links.read().contains_key(&target.id)
	}

	async fn create_link(
		&self,
		target: &ForeignKey,
	) -> Result<Option<OptionsLinkDescriptor>, BoxError> {
		Ok(self.links.read().get(&target.id).cloned())
	}
}

/// Builds options descriptors for members
#[derive(Clone)]
pub struct OptionsBuilder {
	provider: Arc<dyn ForeignKeyLinkProvider>,
	camel_case_prompts: bool,
}

impl Default for OptionsBuilder {
	fn default() -> Self {
		Self::new(Arc::new(NoForeignKeyLinks))
	}
}

impl OptionsBuilder {
	pub fn new(provider: Arc<dyn ForeignKeyLinkProvider>) -> Self {
		Self {
			provider,
			camel_case_prompts: false,
		}
	}

	/// Camel-cases the prompts of inline enum options.
	pub fn with_camel_case_prompts(mut self, enabled: bool) -> Self {
		self.camel_case_prompts = enabled;
		self
	}

	/// Builds the options of `member`, selecting `existing` when given.
	///
	/// Returns `None` when the member has no enumerable value domain, or when
	/// it is a foreign key the provider has no endpoint for.
	pub async fn build_options(
		&self,
		member: &MemberInfo,
		existing: Option<&Value>,
	) -> HalFormsResult<Option<Options>> {
		let shape = member.shape.unwrap_optional();
		let (element, multi) = match shape.element() {
			Some(element) => (element.unwrap_optional(), true),
			None => (shape, false),
		};

		// An enum that is also marked as a foreign key keeps its inline options.
		let options = if let TypeShape::Enum(enum_ref) = element {
			Some(self.inline_options(enum_ref))
		} else if let Some(target) = &member.annotations.references {
			self.link_options(member, target).await?
		} else {
			None
		};

		Ok(options.map(|mut options| {
			if multi {
				options.min_items = member.annotations.min_items;
				options.max_items = member.annotations.max_items;
			} else {
				options.max_items = Some(1);
			}
			options.select(existing);
			options
		}))
	}

	fn inline_options(&self, enum_ref: &EnumRef) -> Options {
		Options::inline(
			enum_ref
				.variants
				.iter()
				.map(|variant| {
					let prompt = if self.camel_case_prompts {
						variant.display.to_case(Case::Camel)
					} else {
						variant.display.to_string()
					};
					InlineOption::new(prompt, variant.value)
				})
				.collect(),
		)
	}

	async fn link_options(
		&self,
		member: &MemberInfo,
		target: &ForeignKey,
	) -> HalFormsResult<Option<Options>> {
		if !self.provider.can_create_link(target) {
			tracing::debug!(
				member = %member.name,
				entity = target.name,
				"No foreign key link available, keeping raw value"
			);
			return Ok(None);
		}
		let descriptor = self.provider.create_link(target).await.map_err(|source| {
			HalFormsError::ForeignKeyLink {
				member: member.name.clone(),
				target: target.name.to_string(),
				source,
			}
		})?;
		Ok(descriptor.map(OptionsLinkDescriptor::into_options))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{EnumVariant, NumberShape};
	use rstest::rstest;
	use serde_json::json;

	static STATUS: [EnumVariant; 2] = [
		EnumVariant {
			value: "in_stock",
			display: "InStock",
		},
		EnumVariant {
			value: "sold_out",
			display: "SoldOut",
		},
	];

	fn status() -> TypeShape {
		TypeShape::Enum(EnumRef {
			id: TypeId::of::<u16>(),
			name: "Status",
			variants: &STATUS,
		})
	}

	struct Category;

	#[rstest]
	#[tokio::test]
	async fn test_enum_options_in_declaration_order() {
		let member = MemberInfo::new("status", status());
		let options = OptionsBuilder::default()
			.build_options(&member, Some(&json!("sold_out")))
			.await
			.unwrap()
			.unwrap();

		let inline = options.inline_options().unwrap();
		assert_eq!(inline.len(), 2);
		assert_eq!(inline[0], InlineOption::new("InStock", "in_stock"));
		assert_eq!(inline[1], InlineOption::new("SoldOut", "sold_out"));
		assert_eq!(options.max_items, Some(1));
		assert_eq!(options.selected_values, vec![json!("sold_out")]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_camel_case_prompts() {
		let member = MemberInfo::new("status", status());
		let options = OptionsBuilder::default()
			.with_camel_case_prompts(true)
			.build_options(&member, None)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(options.inline_options().unwrap()[0].prompt, "inStock");
	}

	#[rstest]
	#[tokio::test]
	async fn test_multi_select_enum_collection_uses_item_bounds() {
		let member = MemberInfo::new("statuses", TypeShape::collection(status()))
			.min_items(1)
			.max_items(2);
		let options = OptionsBuilder::default()
			.build_options(&member, Some(&json!(["in_stock", "sold_out"])))
			.await
			.unwrap()
			.unwrap();

		assert_eq!(options.min_items, Some(1));
		assert_eq!(options.max_items, Some(2));
		assert_eq!(options.selected_values.len(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_foreign_key_without_provider_has_no_options() {
		let member = MemberInfo::new("category_id", TypeShape::Number(NumberShape::Integer))
			.references(ForeignKey::of::<Category>());

		let options = OptionsBuilder::default()
			.build_options(&member, None)
			.await
			.unwrap();
		assert!(options.is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_foreign_key_with_registered_link() {
		let links = RegisteredForeignKeyLinks::new();
		links.register::<Category>(
			OptionsLinkDescriptor::href("/categories{?q}")
				.with_prompt_field("name")
				.with_value_field("id"),
		);
		let member = MemberInfo::new("category_id", TypeShape::Number(NumberShape::Integer))
			.references(ForeignKey::of::<Category>());

		let options = OptionsBuilder::new(Arc::new(links))
			.build_options(&member, None)
			.await
			.unwrap()
			.unwrap();

		assert_eq!(options.options_link().unwrap().href, "/categories{?q}");
		assert!(options.is_templated());
		assert_eq!(options.value_field.as_deref(), Some("id"));
	}

	struct Unreachable;

	#[async_trait]
	impl ForeignKeyLinkProvider for Unreachable {
		fn can_create_link(&self, _target: &ForeignKey) -> bool {
			true
		}

		async fn create_link(
			&self,
			_target: &ForeignKey,
		) -> Result<Option<OptionsLinkDescriptor>, BoxError> {
			Err("catalog service unavailable".into())
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_provider_failure_names_member_and_target() {
		let member = MemberInfo::new("category_id", TypeShape::Number(NumberShape::Integer))
			.references(ForeignKey::of::<Category>());

		let error = OptionsBuilder::new(Arc::new(Unreachable))
			.build_options(&member, None)
			.await
			.unwrap_err();

		match error {
			HalFormsError::ForeignKeyLink { member, target, source } => {
				assert_eq!(member, "category_id");
				assert_eq!(target, ForeignKey::of::<Category>().name);
				assert_eq!(source.to_string(), "catalog service unavailable");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_enum_marked_as_foreign_key_keeps_inline_options() {
		let links = RegisteredForeignKeyLinks::new();
		links.register::<Category>(OptionsLinkDescriptor::href("/categories"));
		let member = MemberInfo::new("status", status()).references(ForeignKey::of::<Category>());

		let options = OptionsBuilder::new(Arc::new(links))
			.build_options(&member, None)
			.await
			.unwrap()
			.unwrap();

		assert!(options.inline_options().is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_plain_members_have_no_options() {
		let member = MemberInfo::new("name", TypeShape::String);
		assert!(
			OptionsBuilder::default()
				.build_options(&member, None)
				.await
				.unwrap()
				.is_none()
		);
	}
}
