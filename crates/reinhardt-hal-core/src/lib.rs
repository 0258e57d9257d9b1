//! # Reinhardt HAL Core
//!
//! HAL and HAL-Forms document model: property kinds, templates, options,
//! links and resources, serialized to the `application/prs.hal-forms+json`
//! wire shape.

pub mod error;
pub mod kind;
pub mod link;
pub mod options;
pub mod resource;
pub mod template;

pub use error::{HalError, HalResult};
pub use kind::{PropertyKind, UnknownPropertyKind};
pub use link::{Link, LinkObject};
pub use options::{InlineOption, Options, OptionsLink, OptionsSource};
pub use resource::{FormsResource, HalResource, SELF_REL};
pub use template::{
	CollectionDetails, FormTemplates, ObjectDetails, Property, PropertyType, RangeConstraints,
	Template, TextConstraints, TextareaConstraints,
};

/// Media type of HAL documents.
pub const HAL_JSON: &str = "application/hal+json";
/// Media type of HAL-Forms documents.
pub const HAL_FORMS_JSON: &str = "application/prs.hal-forms+json";
