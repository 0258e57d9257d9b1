//! Convenience re-exports for common usage.
//!
//! ```
//! use reinhardt_hal_forms::prelude::*;
//!
//! let factory = FormFactory::new(HalFormsSettings::default());
//! assert_eq!(factory.template_factory().settings().max_depth, 8);
//! ```

// Factories
pub use crate::form_factory::FormFactory;
pub use crate::template_factory::{FormTemplateFactory, TemplateRequest};
pub use crate::value_factory::{FilledTemplate, FormValueFactory};

// Model description
pub use crate::schema::{ForeignKey, MemberInfo, TypeInfo, TypeShape};
pub use crate::value::{FieldValue, FormEnum, FormModel, FormType, IntoFieldValue};

// Collaborators and hooks
pub use crate::customization::{Customizations, Customized, MemberContext};
pub use crate::link::{Endpoint, LinkFactory, ReversingLinkFactory, RouteTable};
pub use crate::options::{ForeignKeyLinkProvider, OptionsLinkDescriptor, RegisteredForeignKeyLinks};

// Configuration and errors
pub use crate::error::{HalFormsError, HalFormsResult};
pub use crate::settings::{HalFormsSettings, NamingPolicy};

// Document model
pub use reinhardt_hal_core::{
	FormTemplates, FormsResource, HalResource, Link, Property, PropertyKind, Template,
};

#[cfg(feature = "macros")]
pub use reinhardt_hal_forms_macros::{FormEnum, FormModel};
