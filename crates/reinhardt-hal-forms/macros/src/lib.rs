//! Procedural macros for reinhardt-hal-forms.
//!
//! This crate provides `#[derive(FormModel)]` and `#[derive(FormEnum)]`,
//! which describe a type's members for HAL-Forms template generation.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod form_enum_derive;
mod form_model_derive;

/// Derives `FormModel`, `FormType` and `IntoFieldValue` for a struct with
/// named fields.
///
/// Members are described in declaration order.
///
/// # Attributes
///
/// ## Struct-level attributes
///
/// - `#[form(rename = "Name")]` - Type name used in logs, errors and cache keys
/// - `#[form(crate = "path")]` - Path of the `reinhardt_hal_forms` crate
///
/// ## Field-level attributes
///
/// - `#[form(skip)]` - Leave the field out of the form
/// - `#[form(required)]`, `#[form(required = false)]`, `#[form(optional)]` - Override nullability inference
/// - `#[form(read_only)]`, `#[form(templated)]`
/// - `#[form(kind = "email")]` - Explicit property kind (`hidden` is a shorthand for `kind = "hidden"`)
/// - `#[form(regex = "...")]`, `#[form(min_length = 1)]`, `#[form(max_length = 80)]`
/// - `#[form(min = 0)]`, `#[form(max = 10)]`, `#[form(step = 0.5)]`
/// - `#[form(prompt = "...")]`, `#[form(placeholder = "...")]`
/// - `#[form(references = Customer)]` - Foreign key to a collection of `Customer`
/// - `#[form(min_items = 1)]`, `#[form(max_items = 3)]` - Multi-select bounds
/// - `#[form(cols = 40)]`, `#[form(rows = 5)]` - Textarea size
/// - `#[form(rename = "...")]` - Property name, bypassing the naming policy
///
/// # Example
///
/// ```ignore
/// use reinhardt_hal_forms::FormModel;
///
/// #[derive(FormModel)]
/// struct Order {
///     #[form(hidden)]
///     id: i64,
///     #[form(references = Customer)]
///     customer_id: i64,
///     #[form(kind = "textarea", rows = 4, max_length = 500)]
///     notes: Option<String>,
/// }
/// ```
#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	form_model_derive::derive_form_model_impl(input)
		.unwrap_or_else(|err| err.to_compile_error())
		.into()
}

/// Derives `FormEnum`, `FormType` and `IntoFieldValue` for a fieldless enum.
///
/// Each variant becomes one inline option. The raw value defaults to the
/// variant name and the display text to the raw value.
///
/// # Attributes
///
/// - `#[form(rename = "Name")]`, `#[form(crate = "path")]` on the enum
/// - `#[form(value = "...")]`, `#[form(display = "...")]` on a variant
///
/// # Example
///
/// ```ignore
/// use reinhardt_hal_forms::FormEnum;
///
/// #[derive(FormEnum)]
/// enum Status {
///     #[form(value = "open", display = "Open")]
///     Open,
///     #[form(value = "closed", display = "Closed")]
///     Closed,
/// }
/// ```
#[proc_macro_derive(FormEnum, attributes(form))]
pub fn derive_form_enum(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	form_enum_derive::derive_form_enum_impl(input)
		.unwrap_or_else(|err| err.to_compile_error())
		.into()
}
