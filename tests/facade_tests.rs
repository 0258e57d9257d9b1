//! Facade re-exports reach both member crates

use http::Method;
use reinhardt_hal::prelude::*;
use reinhardt_hal::{HAL_FORMS_JSON, forms};
use rstest::rstest;
use serde_json::json;

#[derive(FormModel)]
struct Signup {
	#[form(kind = "email", required)]
	email: String,
	#[form(kind = "password", min_length = 12)]
	password: String,
}

#[rstest]
#[tokio::test]
async fn test_prelude_builds_a_forms_resource() {
	let routes = std::sync::Arc::new(RouteTable::new().with_route("signup", "/signup"));
	let factory = FormFactory::default()
		.with_link_factory(std::sync::Arc::new(ReversingLinkFactory::new(routes)));

	let resource = factory
		.create_resource_for_endpoint::<Signup, _>(
			HalResource::empty(),
			&Endpoint::route("signup").with_method(Method::POST),
			&TemplateRequest::default().with_title("Sign up"),
			None,
		)
		.await
		.unwrap();

	let json = serde_json::to_value(&resource).unwrap();
	assert_eq!(json["_links"]["self"]["href"], "/signup");
	assert_eq!(json["_templates"]["default"]["title"], "Sign up");
	assert_eq!(json["_templates"]["default"]["target"], "/signup");
	assert_eq!(
		json["_templates"]["default"]["properties"][0],
		json!({"name": "email", "type": "email", "required": true, "readOnly": false})
	);
}

#[rstest]
fn test_modules_expose_member_crates() {
	let link = reinhardt_hal::core::Link::new("/orders/{id}");
	assert!(link.templated);

	let settings = forms::HalFormsSettings::default();
	assert_eq!(settings.nested_template_name, "default");
	assert_eq!(HAL_FORMS_JSON, "application/prs.hal-forms+json");
}
