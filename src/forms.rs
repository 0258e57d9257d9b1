//! HAL-Forms generation module.
//!
//! Template, value and resource factories plus the model description traits.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_hal::forms::{HalFormsSettings, NamingPolicy};
//!
//! let settings = HalFormsSettings::default().with_property_naming(NamingPolicy::AsIs);
//! assert_eq!(settings.property_naming.apply("first_name"), "first_name");
//! ```

pub use reinhardt_hal_forms::*;
