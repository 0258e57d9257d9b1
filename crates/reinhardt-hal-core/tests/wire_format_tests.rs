//! HAL-Forms wire format tests

use assert_json_diff::assert_json_eq;
use http::Method;
use reinhardt_hal_core::{
	FormTemplates, FormsResource, HalResource, InlineOption, Link, Options, OptionsLink, Property,
	PropertyKind, PropertyType, Template, SELF_REL,
};
use rstest::rstest;
use serde_json::json;

// ============================================================================
// Properties
// ============================================================================

#[rstest]
fn test_number_property_with_range_constraints() {
	let mut property = Property::new("age", PropertyKind::Number)
		.required(true)
		.with_value(42);
	let range = property.details.range_constraints_mut().unwrap();
	range.min = Some(json!(0));
	range.max = Some(json!(150));
	range.step = Some(1.0);

	assert_json_eq!(
		serde_json::to_value(&property).unwrap(),
		json!({
			"name": "age",
			"type": "number",
			"value": 42,
			"required": true,
			"readOnly": false,
			"min": 0,
			"max": 150,
			"step": 1.0
		})
	);
}

#[rstest]
fn test_text_property_with_inline_options() {
	let mut property = Property::new("flag", PropertyKind::Text).prompt("Flag");
	property
		.details
		.set_options(Some(Options::inline(vec![
			InlineOption::new("Flag1", "Flag1"),
			InlineOption::new("Flag2", "Flag2"),
		])))
		.unwrap();
	property.options_mut().unwrap().select(Some(&json!("Flag2")));

	assert_json_eq!(
		serde_json::to_value(&property).unwrap(),
		json!({
			"name": "flag",
			"type": "text",
			"prompt": "Flag",
			"required": false,
			"readOnly": false,
			"options": {
				"inline": [
					{"prompt": "Flag1", "value": "Flag1"},
					{"prompt": "Flag2", "value": "Flag2"}
				],
				"selectedValues": ["Flag2"]
			}
		})
	);
}

#[rstest]
fn test_collection_with_link_options_and_nested_template() {
	let mut property = Property::new("tags", PropertyKind::Collection);
	property
		.details
		.set_options(Some(
			Options::link(OptionsLink::new("/tags{?q}").templated(true)).with_max_items(3),
		))
		.unwrap();
	property.templated = true;
	property.templates_mut().unwrap().insert(
		"default".to_string(),
		Template::new().with_property(Property::new("id", PropertyKind::Number)),
	);

	assert_json_eq!(
		serde_json::to_value(&property).unwrap(),
		json!({
			"name": "tags",
			"type": "collection",
			"required": false,
			"readOnly": false,
			"templated": true,
			"options": {
				"link": {"href": "/tags{?q}", "templated": true},
				"maxItems": 3
			},
			"_templates": {
				"default": {
					"properties": [
						{"name": "id", "type": "number", "required": false, "readOnly": false}
					]
				}
			}
		})
	);
}

#[rstest]
#[case(PropertyKind::Bool)]
#[case(PropertyKind::Hidden)]
#[case(PropertyKind::File)]
fn test_unit_kinds_serialize_without_constraints(#[case] kind: PropertyKind) {
	let property = Property::new("x", kind);
	assert!(matches!(
		property.details,
		PropertyType::Bool | PropertyType::Hidden | PropertyType::File
	));
	assert_json_eq!(
		serde_json::to_value(&property).unwrap(),
		json!({"name": "x", "type": kind.as_str(), "required": false, "readOnly": false})
	);
}

// ============================================================================
// Resources
// ============================================================================

#[rstest]
fn test_forms_resource_document() {
	let template = Template::new()
		.with_title("Create order")
		.with_method(Method::POST)
		.with_target("/orders")
		.with_content_type("application/json")
		.with_property(Property::new("name", PropertyKind::Text).required(true));
	let mut templates = FormTemplates::with_default(template);
	templates.insert(
		"delete",
		Template::new().with_method(Method::DELETE).with_target("/orders/1"),
	);
	let resource = FormsResource::new(
		HalResource::new(json!({"id": 1})).with_link(SELF_REL, Link::new("/orders/1")),
		templates,
	)
	.unwrap();

	assert_json_eq!(
		serde_json::to_value(&resource).unwrap(),
		json!({
			"id": 1,
			"_links": {"self": {"href": "/orders/1"}},
			"_templates": {
				"default": {
					"title": "Create order",
					"method": "POST",
					"target": "/orders",
					"contentType": "application/json",
					"properties": [
						{"name": "name", "type": "text", "required": true, "readOnly": false}
					]
				},
				"delete": {
					"method": "DELETE",
					"target": "/orders/1",
					"properties": []
				}
			}
		})
	);
}
