//! `#[derive(FormModel)]`

use crate::attrs::{ContainerAttrs, FieldAttrs, unraw};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub(crate) fn derive_form_model_impl(input: DeriveInput) -> Result<TokenStream> {
	let struct_name = &input.ident;

	if !input.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(
			&input.generics,
			"FormModel cannot be derived for generic types",
		));
	}

	let fields = match &input.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(fields) => &fields.named,
			_ => {
				return Err(syn::Error::new_spanned(
					struct_name,
					"FormModel can only be derived for structs with named fields",
				));
			}
		},
		_ => {
			return Err(syn::Error::new_spanned(
				struct_name,
				"FormModel can only be derived for structs",
			));
		}
	};

	let container = ContainerAttrs::from_attrs(&input.attrs)?;
	let krate = &container.krate;
	let type_name = container.rename.unwrap_or_else(|| unraw(struct_name));

	let mut members = Vec::new();
	let mut field_arms = Vec::new();
	let mut field_names = Vec::new();

	for field in fields {
		let config = FieldAttrs::from_attrs(&field.attrs)?;
		if config.skip {
			continue;
		}
		let Some(ident) = &field.ident else {
			continue;
		};
		let name = unraw(ident);
		let ty = &field.ty;
		let builders = config.builder_calls(krate);

		members.push(quote! {
			.member(#krate::schema::MemberInfo::of::<#ty>(#name) #builders)
		});
		field_arms.push(quote! {
			#name => ::core::option::Option::Some(#krate::IntoFieldValue::to_field_value(&self.#ident)),
		});
		field_names.push(name);
	}

	let expanded = quote! {
		impl #krate::FormModel for #struct_name {
			fn type_info() -> #krate::schema::TypeInfo {
				#krate::schema::TypeInfo::new(#type_name)
					#(#members)*
			}

			fn type_name() -> &'static str {
				#type_name
			}

			fn field(&self, member: &str) -> ::core::option::Option<#krate::FieldValue<'_>> {
				match member {
					#(#field_arms)*
					_ => ::core::option::Option::None,
				}
			}

			fn field_names(&self) -> &'static [&'static str] {
				&[#(#field_names),*]
			}

			fn model_name(&self) -> &'static str {
				#type_name
			}
		}

		impl #krate::FormType for #struct_name {
			fn shape() -> #krate::schema::TypeShape {
				#krate::schema::TypeShape::Object(#krate::schema::TypeRef::of::<Self>())
			}
		}

		impl #krate::IntoFieldValue for #struct_name {
			fn to_field_value(&self) -> #krate::FieldValue<'_> {
				#krate::FieldValue::Object(self)
			}
		}
	};

	Ok(expanded)
}
