//! HAL-Forms template generation for the Reinhardt HAL crates.
//!
//! Given a Rust type that describes itself through [`FormModel`], this crate
//! produces the HAL-Forms `_templates` entries a hypermedia API sends to its
//! clients:
//!
//! - **Classification**: [`PropertyTypeClassifier`] maps member shapes to
//!   HAL-Forms property types.
//! - **Options**: [`OptionsBuilder`] turns enums into inline options and
//!   foreign keys into remote option links.
//! - **Templates**: [`FormTemplateFactory`] builds cached, schema-only
//!   templates and runs the customization hooks.
//! - **Values**: [`FormValueFactory`] overlays an instance on a copy of a
//!   template.
//! - **Resources**: [`FormFactory`] binds a filled template to an endpoint
//!   and wraps it in a [`FormsResource`].
//!
//! # Features
//!
//! - `macros` - `#[derive(FormModel)]` and `#[derive(FormEnum)]` (enabled by default)
//!
//! # Quick Start
//!
//! ```
//! use http::Method;
//! use reinhardt_hal_forms::prelude::*;
//!
//! #[derive(FormEnum)]
//! enum Priority {
//! 	Low,
//! 	High,
//! }
//!
//! #[derive(FormModel)]
//! struct Ticket {
//! 	#[form(max_length = 80)]
//! 	summary: String,
//! 	priority: Priority,
//! 	due: Option<chrono::NaiveDate>,
//! }
//!
//! # tokio_test::block_on(async {
//! let factory = FormFactory::default();
//! let ticket = Ticket {
//! 	summary: "Printer on fire".into(),
//! 	priority: Priority::High,
//! 	due: None,
//! };
//!
//! let resource = factory
//! 	.create_resource_for_endpoint(
//! 		HalResource::empty(),
//! 		&Endpoint::href("/tickets/1").with_method(Method::PUT),
//! 		&TemplateRequest::default(),
//! 		Some(&ticket),
//! 	)
//! 	.await
//! 	.unwrap();
//!
//! let template = resource.default_template().unwrap();
//! assert_eq!(template.property("priority").unwrap().value, Some("High".into()));
//! assert!(!template.property("due").unwrap().required);
//! # });
//! ```

extern crate self as reinhardt_hal_forms;

pub mod cache;
pub mod classifier;
pub mod customization;
pub mod error;
pub mod form_factory;
pub mod link;
pub mod options;
pub mod prelude;
pub mod schema;
pub mod settings;
pub mod template_factory;
pub mod value;
pub mod value_factory;

pub use cache::{MokaTemplateCache, NoTemplateCache, TemplateCache, TemplateKey};
pub use classifier::PropertyTypeClassifier;
pub use customization::{
	Customizations, Customized, FormsResourceCustomization, MemberContext,
	PropertyTemplateCustomization, PropertyValueCustomization,
};
pub use error::{BoxError, HalFormsError, HalFormsResult};
pub use form_factory::FormFactory;
pub use link::{Endpoint, LinkFactory, ReversingLinkFactory, RouteTable, UrlReverser};
pub use options::{
	ForeignKeyLinkProvider, NoForeignKeyLinks, OptionsBuilder, OptionsLinkDescriptor,
	RegisteredForeignKeyLinks,
};
pub use settings::{HalFormsSettings, NamingPolicy};
pub use template_factory::{FormTemplateFactory, TemplateRequest};
pub use value::{FieldValue, FormEnum, FormModel, FormType, IntoFieldValue};
pub use value_factory::{FilledTemplate, FormValueFactory};

pub use reinhardt_hal_core::{
	FormTemplates, FormsResource, HalResource, Link, Options, Property, PropertyKind,
	PropertyType, Template,
};

#[cfg(feature = "macros")]
pub use reinhardt_hal_forms_macros::{FormEnum, FormModel};

// Paths used by derive-generated code
#[doc(hidden)]
pub mod __private {
	pub use serde_json;
}
