//! HAL and HAL-Forms resources
//!
//! [`HalResource`] flattens its state next to the reserved `_links` and
//! `_embedded` members. [`FormsResource`] adds `_templates` and refuses to
//! exist without a valid `default` template.

use crate::error::{HalError, HalResult};
use crate::link::{Link, LinkObject};
use crate::template::{FormTemplates, Template};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Relation name of the self link.
pub const SELF_REL: &str = "self";

/// A HAL resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalResource<S = Map<String, Value>> {
	#[serde(flatten)]
	pub state: S,
	#[serde(rename = "_links", skip_serializing_if = "IndexMap::is_empty")]
	pub links: IndexMap<String, LinkObject>,
	#[serde(rename = "_embedded", skip_serializing_if = "IndexMap::is_empty")]
	pub embedded: IndexMap<String, Value>,
}

impl HalResource {
	/// A resource with no state.
	pub fn empty() -> Self {
		Self::new(Map::new())
	}
}

impl Default for HalResource {
	fn default() -> Self {
		Self::empty()
	}
}

impl<S> HalResource<S> {
	pub fn new(state: S) -> Self {
		Self {
			state,
			links: IndexMap::new(),
			embedded: IndexMap::new(),
		}
	}

	/// Adds a link under `rel`. A second link for the same relation turns the
	/// entry into an array.
	pub fn add_link(&mut self, rel: impl Into<String>, link: Link) -> &mut Self {
		match self.links.entry(rel.into()) {
			indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().push(link),
			indexmap::map::Entry::Vacant(entry) => {
				entry.insert(LinkObject::Single(link));
			}
		}
		self
	}

	pub fn with_link(mut self, rel: impl Into<String>, link: Link) -> Self {
		self.add_link(rel, link);
		self
	}

	pub fn self_link(&self) -> Option<&Link> {
		self.links.get(SELF_REL).and_then(LinkObject::first)
	}

	/// Embeds a serializable resource (or array of resources) under `rel`.
	pub fn embed<E: Serialize>(&mut self, rel: impl Into<String>, resource: &E) -> HalResult<()> {
		let value =
			serde_json::to_value(resource).map_err(|e| HalError::InvalidState(e.to_string()))?;
		self.embedded.insert(rel.into(), value);
		Ok(())
	}
}

/// A HAL-Forms resource
///
/// # Examples
///
/// ```
/// use http::Method;
/// use reinhardt_hal_core::{FormTemplates, FormsResource, HalResource, Template};
///
/// let template = Template::new().with_method(Method::POST).with_target("/orders");
/// let resource =
/// 	FormsResource::new(HalResource::empty(), FormTemplates::with_default(template)).unwrap();
/// assert!(resource.default_template().is_some());
///
/// let unaddressable = FormTemplates::with_default(Template::new());
/// assert!(FormsResource::new(HalResource::empty(), unaddressable).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormsResource<S = Map<String, Value>> {
	#[serde(flatten)]
	pub resource: HalResource<S>,
	#[serde(rename = "_templates")]
	templates: FormTemplates,
}

impl<S> FormsResource<S> {
	/// Wraps `resource` with `templates`, validating the template map.
	pub fn new(resource: HalResource<S>, templates: FormTemplates) -> HalResult<Self> {
		templates.validate()?;
		Ok(Self {
			resource,
			templates,
		})
	}

	/// Wraps a single template as the `default` entry.
	pub fn with_default(resource: HalResource<S>, template: Template) -> HalResult<Self> {
		Self::new(resource, FormTemplates::with_default(template))
	}

	/// Adds a named template. The template must be addressable.
	pub fn add_template(&mut self, name: impl Into<String>, template: Template) -> HalResult<()> {
		let name = name.into();
		if !template.is_addressable() {
			return Err(HalError::UnaddressableTemplate(name));
		}
		self.templates.insert(name, template);
		Ok(())
	}

	pub fn templates(&self) -> &FormTemplates {
		&self.templates
	}

	pub fn default_template(&self) -> Option<&Template> {
		self.templates.default_template()
	}

	pub fn template(&self, name: &str) -> Option<&Template> {
		self.templates.get(name)
	}

	pub fn into_parts(self) -> (HalResource<S>, FormTemplates) {
		(self.resource, self.templates)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::kind::PropertyKind;
	use crate::template::Property;
	use http::Method;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Serialize)]
	struct Order {
		id: u32,
		status: &'static str,
	}

	#[rstest]
	fn test_resource_flattens_state_next_to_links() {
		let resource = HalResource::new(Order {
			id: 7,
			status: "open",
		})
		.with_link(SELF_REL, Link::new("/orders/7"));

		assert_eq!(
			serde_json::to_value(&resource).unwrap(),
			json!({
				"id": 7,
				"status": "open",
				"_links": {"self": {"href": "/orders/7"}}
			})
		);
	}

	#[rstest]
	fn test_embedded_resources() {
		let mut resource = HalResource::empty();
		resource
			.embed("items", &vec![HalResource::new(json!({"sku": "A-1"}))])
			.unwrap();

		assert_eq!(
			serde_json::to_value(&resource).unwrap(),
			json!({"_embedded": {"items": [{"sku": "A-1"}]}})
		);
	}

	#[rstest]
	fn test_forms_resource_serializes_templates() {
		let template = Template::new()
			.with_method(Method::POST)
			.with_property(Property::new("name", PropertyKind::Text).required(true));
		let resource = FormsResource::with_default(HalResource::empty(), template).unwrap();

		assert_eq!(
			serde_json::to_value(&resource).unwrap(),
			json!({
				"_templates": {
					"default": {
						"method": "POST",
						"properties": [
							{"name": "name", "type": "text", "required": true, "readOnly": false}
						]
					}
				}
			})
		);
	}

	#[rstest]
	fn test_add_template_rejects_unaddressable() {
		let mut resource = FormsResource::with_default(
			HalResource::empty(),
			Template::new().with_target("/orders"),
		)
		.unwrap();

		let result = resource.add_template("edit", Template::new());
		assert!(matches!(result, Err(HalError::UnaddressableTemplate(name)) if name == "edit"));
		assert_eq!(resource.templates().len(), 1);
	}
}
