//! `#[derive(FormEnum)]`

use crate::attrs::{ContainerAttrs, VariantAttrs, unraw};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub(crate) fn derive_form_enum_impl(input: DeriveInput) -> Result<TokenStream> {
	let enum_name = &input.ident;

	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"FormEnum cannot be derived for generic types",
		));
	}

	let Data::Enum(data) = &input.data else {
		return Err(syn::Error::new_spanned(
			enum_name,
			"FormEnum can only be derived for enums",
		));
	};

	let container = ContainerAttrs::from_attrs(&input.attrs)?;
	let krate = &container.krate;
	let type_name = container.rename.unwrap_or_else(|| unraw(enum_name));

	let mut variants = Vec::new();
	let mut value_arms = Vec::new();

	for variant in &data.variants {
		if !matches!(variant.fields, Fields::Unit) {
			return Err(syn::Error::new_spanned(
				variant,
				"FormEnum variants cannot carry data",
			));
		}
		let config = VariantAttrs::from_attrs(&variant.attrs)?;
		let ident = &variant.ident;
		let value = config.value.unwrap_or_else(|| unraw(ident));
		let display = config.display.unwrap_or_else(|| value.clone());

		variants.push(quote! {
			#krate::schema::EnumVariant { value: #value, display: #display }
		});
		value_arms.push(quote! {
			Self::#ident => #value,
		});
	}

	let expanded = quote! {
		impl #krate::FormEnum for #enum_name {
			fn enum_name() -> &'static str {
				#type_name
			}

			fn variants() -> &'static [#krate::schema::EnumVariant] {
				const VARIANTS: &[#krate::schema::EnumVariant] = &[#(#variants),*];
				VARIANTS
			}

			fn variant_value(&self) -> &'static str {
				match *self {
					#(#value_arms)*
				}
			}
		}

		impl #krate::FormType for #enum_name {
			fn shape() -> #krate::schema::TypeShape {
				#krate::schema::TypeShape::Enum(#krate::schema::EnumRef::of::<Self>())
			}
		}

		impl #krate::IntoFieldValue for #enum_name {
			fn to_field_value(&self) -> #krate::FieldValue<'_> {
				#krate::FieldValue::Scalar(
					#krate::__private::serde_json::Value::from(#krate::FormEnum::variant_value(self)),
				)
			}
		}
	};

	Ok(expanded)
}
