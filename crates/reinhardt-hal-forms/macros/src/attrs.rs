//! `#[form(...)]` attribute parsing

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Lit, LitBool, LitInt, LitStr, Path, Result};

/// Wire name → `PropertyKind` variant
const KINDS: &[(&str, &str)] = &[
	("hidden", "Hidden"),
	("text", "Text"),
	("textarea", "Textarea"),
	("search", "Search"),
	("tel", "Tel"),
	("url", "Url"),
	("email", "Email"),
	("password", "Password"),
	("date", "Date"),
	("month", "Month"),
	("week", "Week"),
	("time", "Time"),
	("datetime-local", "DateTimeLocal"),
	("number", "Number"),
	("range", "Range"),
	("color", "Color"),
	("bool", "Bool"),
	("datetime-offset", "DateTimeOffset"),
	("duration", "Duration"),
	("image", "Image"),
	("file", "File"),
	("collection", "Collection"),
	("object", "Object"),
];

/// Struct- or enum-level `#[form(...)]`
pub(crate) struct ContainerAttrs {
	pub rename: Option<String>,
	pub krate: Path,
}

impl ContainerAttrs {
	pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
		let mut rename = None;
		let mut krate = None;

		for attr in attrs {
			if !attr.path().is_ident("form") {
				continue;
			}

			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("rename") {
					let value: LitStr = meta.value()?.parse()?;
					rename = Some(value.value());
					Ok(())
				} else if meta.path.is_ident("crate") {
					let value: LitStr = meta.value()?.parse()?;
					krate = Some(value.parse::<Path>()?);
					Ok(())
				} else {
					Err(meta.error("unsupported form attribute"))
				}
			})?;
		}

		Ok(Self {
			rename,
			krate: krate.unwrap_or_else(|| syn::parse_quote!(::reinhardt_hal_forms)),
		})
	}
}

/// Field-level `#[form(...)]`
#[derive(Default)]
pub(crate) struct FieldAttrs {
	pub skip: bool,
	pub required: Option<bool>,
	pub read_only: bool,
	pub regex: Option<LitStr>,
	pub min: Option<Expr>,
	pub max: Option<Expr>,
	pub step: Option<f64>,
	pub min_length: Option<LitInt>,
	pub max_length: Option<LitInt>,
	pub prompt: Option<LitStr>,
	pub placeholder: Option<LitStr>,
	pub kind: Option<syn::Ident>,
	pub references: Option<Path>,
	pub min_items: Option<LitInt>,
	pub max_items: Option<LitInt>,
	pub cols: Option<LitInt>,
	pub rows: Option<LitInt>,
	pub templated: bool,
	pub rename: Option<LitStr>,
}

impl FieldAttrs {
	pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
		let mut config = Self::default();

		for attr in attrs {
			if !attr.path().is_ident("form") {
				continue;
			}

			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("skip") {
					config.skip = true;
					Ok(())
				} else if meta.path.is_ident("required") {
					// `required` alone or `required = false`
					config.required = Some(if meta.input.peek(syn::Token![=]) {
						meta.value()?.parse::<LitBool>()?.value
					} else {
						true
					});
					Ok(())
				} else if meta.path.is_ident("optional") {
					config.required = Some(false);
					Ok(())
				} else if meta.path.is_ident("read_only") {
					config.read_only = true;
					Ok(())
				} else if meta.path.is_ident("templated") {
					config.templated = true;
					Ok(())
				} else if meta.path.is_ident("hidden") {
					config.kind = Some(syn::Ident::new("Hidden", meta.path.span()));
					Ok(())
				} else if meta.path.is_ident("regex") {
					config.regex = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("min") {
					config.min = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("max") {
					config.max = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("step") {
					let value: Lit = meta.value()?.parse()?;
					config.step = Some(match &value {
						Lit::Int(int) => int.base10_parse::<f64>()?,
						Lit::Float(float) => float.base10_parse::<f64>()?,
						_ => return Err(syn::Error::new_spanned(value, "step must be a number")),
					});
					Ok(())
				} else if meta.path.is_ident("min_length") {
					config.min_length = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("max_length") {
					config.max_length = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("min_items") {
					config.min_items = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("max_items") {
					config.max_items = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("cols") {
					config.cols = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("rows") {
					config.rows = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("prompt") {
					config.prompt = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("placeholder") {
					config.placeholder = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("rename") {
					config.rename = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("references") {
					config.references = Some(meta.value()?.parse()?);
					Ok(())
				} else if meta.path.is_ident("kind") {
					let value: LitStr = meta.value()?.parse()?;
					config.kind = Some(kind_variant(&value)?);
					Ok(())
				} else {
					Err(meta.error("unsupported form field attribute"))
				}
			})?;
		}

		Ok(config)
	}

	/// Builder calls appended to `MemberInfo::of::<T>(name)`.
	pub(crate) fn builder_calls(&self, krate: &Path) -> TokenStream {
		let mut calls = Vec::new();

		if let Some(required) = self.required {
			calls.push(quote!(.required(#required)));
		}
		if self.read_only {
			calls.push(quote!(.read_only()));
		}
		if let Some(regex) = &self.regex {
			calls.push(quote!(.regex(#regex)));
		}
		if let Some(min) = &self.min {
			calls.push(quote!(.min(#min)));
		}
		if let Some(max) = &self.max {
			calls.push(quote!(.max(#max)));
		}
		if let Some(step) = self.step {
			calls.push(quote!(.step(#step)));
		}
		if let Some(min_length) = &self.min_length {
			calls.push(quote!(.min_length(#min_length)));
		}
		if let Some(max_length) = &self.max_length {
			calls.push(quote!(.max_length(#max_length)));
		}
		if let Some(prompt) = &self.prompt {
			calls.push(quote!(.prompt(#prompt)));
		}
		if let Some(placeholder) = &self.placeholder {
			calls.push(quote!(.placeholder(#placeholder)));
		}
		if let Some(kind) = &self.kind {
			calls.push(quote!(.kind(#krate::PropertyKind::#kind)));
		}
		if let Some(target) = &self.references {
			calls.push(quote!(.references(#krate::schema::ForeignKey::of::<#target>())));
		}
		if let Some(min_items) = &self.min_items {
			calls.push(quote!(.min_items(#min_items)));
		}
		if let Some(max_items) = &self.max_items {
			calls.push(quote!(.max_items(#max_items)));
		}
		if let Some(cols) = &self.cols {
			calls.push(quote!(.cols(#cols)));
		}
		if let Some(rows) = &self.rows {
			calls.push(quote!(.rows(#rows)));
		}
		if self.templated {
			calls.push(quote!(.templated()));
		}
		if let Some(rename) = &self.rename {
			calls.push(quote!(.rename(#rename)));
		}

		quote!(#(#calls)*)
	}
}

/// Variant-level `#[form(value = "...", display = "...")]`
#[derive(Default)]
pub(crate) struct VariantAttrs {
	pub value: Option<String>,
	pub display: Option<String>,
}

impl VariantAttrs {
	pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
		let mut config = Self::default();

		for attr in attrs {
			if !attr.path().is_ident("form") {
				continue;
			}

			attr.parse_nested_meta(|meta| {
				if meta.path.is_ident("value") {
					let value: LitStr = meta.value()?.parse()?;
					config.value = Some(value.value());
					Ok(())
				} else if meta.path.is_ident("display") {
					let value: LitStr = meta.value()?.parse()?;
					config.display = Some(value.value());
					Ok(())
				} else {
					Err(meta.error("unsupported form variant attribute"))
				}
			})?;
		}

		Ok(config)
	}
}

fn kind_variant(name: &LitStr) -> Result<syn::Ident> {
	let wanted = name.value().to_ascii_lowercase();
	KINDS
		.iter()
		.find(|(wire, _)| *wire == wanted)
		.map(|(_, variant)| syn::Ident::new(variant, name.span()))
		.ok_or_else(|| {
			let known: Vec<&str> = KINDS.iter().map(|(wire, _)| *wire).collect();
			syn::Error::new(
				name.span(),
				format!("unknown property kind `{}`, expected one of: {}", wanted, known.join(", ")),
			)
		})
}

/// Strips the raw identifier prefix.
pub(crate) fn unraw(ident: &syn::Ident) -> String {
	let name = ident.to_string();
	name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}
