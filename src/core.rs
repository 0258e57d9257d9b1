//! HAL document model module.
//!
//! Links, resources, templates and properties as they appear on the wire.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_hal::core::{HalResource, Link};
//!
//! let resource = HalResource::empty().with_link("self", Link::new("/orders/1"));
//! assert_eq!(resource.self_link().unwrap().href, "/orders/1");
//! ```

pub use reinhardt_hal_core::*;
