//! # Reinhardt HAL
//!
//! HAL and HAL-Forms hypermedia generation for Rust web APIs.
//!
//! A handler describes its resource types once, with `#[derive(FormModel)]`,
//! and gets back the HAL-Forms `_templates` its clients need to render and
//! submit forms: property types, constraints, options, current values and the
//! submission target.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - Template generation and value filling
//! - `macros` (default) - `#[derive(FormModel)]` and `#[derive(FormEnum)]`
//! - `full` - All features enabled
//!
//! Without `forms` only the document model in [`core`] is available.
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "macros")]
//! # {
//! use reinhardt_hal::prelude::*;
//! use http::Method;
//!
//! #[derive(FormModel)]
//! struct Comment {
//! 	#[form(kind = "textarea", max_length = 2000)]
//! 	body: String,
//! 	#[form(read_only)]
//! 	author: String,
//! }
//!
//! # tokio_test::block_on(async {
//! let factory = FormFactory::default();
//! let comment = Comment {
//! 	body: "First!".into(),
//! 	author: "ada".into(),
//! };
//!
//! let resource = factory
//! 	.create_resource_for_endpoint(
//! 		HalResource::empty(),
//! 		&Endpoint::href("/comments/1").with_method(Method::PUT),
//! 		&TemplateRequest::default(),
//! 		Some(&comment),
//! 	)
//! 	.await
//! 	.unwrap();
//!
//! let json = serde_json::to_value(&resource).unwrap();
//! assert_eq!(json["_templates"]["default"]["method"], "PUT");
//! assert_eq!(json["_templates"]["default"]["properties"][1]["readOnly"], true);
//! # });
//! # }
//! ```
//!
//! ## Deriving through the facade
//!
//! The derives emit paths rooted at `::reinhardt_hal_forms`. A crate that
//! depends only on `reinhardt-hal` points them at the facade instead:
//!
//! ```rust
//! # #[cfg(feature = "macros")]
//! # {
//! use reinhardt_hal::forms::{FormEnum, FormModel};
//!
//! #[derive(FormEnum)]
//! #[form(crate = "reinhardt_hal::forms")]
//! enum Visibility {
//! 	Public,
//! 	Private,
//! }
//!
//! #[derive(FormModel)]
//! #[form(crate = "reinhardt_hal::forms")]
//! struct Album {
//! 	title: String,
//! 	visibility: Visibility,
//! }
//!
//! let info = <Album as FormModel>::type_info();
//! assert_eq!(info.members.len(), 2);
//! # }
//! ```

pub mod core;
#[cfg(feature = "forms")]
pub mod forms;

// Media types
pub use reinhardt_hal_core::{HAL_FORMS_JSON, HAL_JSON};

// Re-export the document model
pub use reinhardt_hal_core::{
	FormTemplates, FormsResource, HalError, HalResource, HalResult, Link, LinkObject, Options,
	Property, PropertyKind, Template,
};

// Re-export the generation layer
#[cfg(feature = "forms")]
pub use reinhardt_hal_forms::{
	Customizations, Customized, Endpoint, FilledTemplate, FormFactory, FormModel,
	FormTemplateFactory, FormValueFactory, HalFormsError, HalFormsResult, HalFormsSettings,
	TemplateRequest,
};

/// Prelude module for convenient imports
///
/// Import everything commonly needed with:
/// ```rust
/// use reinhardt_hal::prelude::*;
/// ```
pub mod prelude {
	pub use reinhardt_hal_core::{
		FormTemplates, FormsResource, HalResource, Link, Property, PropertyKind, Template,
	};

	#[cfg(feature = "forms")]
	pub use reinhardt_hal_forms::prelude::*;
}
