//! `#[derive(Unmarshal)]` for named-field structs.
//!
//! # Design
//! The derive enumerates a struct's fields at build time and emits two
//! impls: `unjson::Unmarshal` (the object-walking conversion) and
//! `unjson::Record` (per-field tag and expected-kind metadata, in
//! declaration order). Each field binds to the JSON key matching its name;
//! `#[json(tag = "...")]` overrides the key, which is how fields map to
//! keys that are Rust keywords (e.g. `type`).
//!
//! Shape constraints are enforced here, at compile time: enums, unions,
//! tuple structs, unit structs, and structs with zero named fields are
//! rejected with a spanned error. A field whose type does not implement
//! `Unmarshal` fails to compile inside the generated impl.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, LitStr};

#[proc_macro_derive(Unmarshal, attributes(json))]
pub fn derive_unmarshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "#[derive(Unmarshal)] requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Unmarshal)] only supports structs",
            ));
        }
    };

    if fields.is_empty() {
        return Err(Error::new_spanned(
            &input.ident,
            "#[derive(Unmarshal)] requires at least one field",
        ));
    }

    let mut idents = Vec::with_capacity(fields.len());
    let mut tags = Vec::with_capacity(fields.len());
    let mut types = Vec::with_capacity(fields.len());
    for field in fields {
        idents.push(field.ident.clone().expect("named field"));
        tags.push(field_tag(field)?);
        types.push(field.ty.clone());
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::unjson::Unmarshal for #name #ty_generics #where_clause {
            const EXPECTED: ::unjson::Kind = ::unjson::Kind::Object;

            fn unmarshal_value(
                value: &::unjson::Value,
                path: &str,
                diags: &mut ::unjson::Diagnostics,
            ) -> Self {
                let Some(obj) = value.as_object() else {
                    diags.mismatch(path, ::unjson::Kind::Object, ::unjson::Kind::of(value));
                    return Self::default();
                };
                Self {
                    #( #idents: ::unjson::unmarshal_field(obj, #tags, path, diags), )*
                }
            }
        }

        impl #impl_generics ::unjson::Record for #name #ty_generics #where_clause {
            const FIELDS: &'static [::unjson::Field] = &[
                #( ::unjson::Field {
                    tag: #tags,
                    kind: <#types as ::unjson::Unmarshal>::EXPECTED,
                }, )*
            ];
        }
    })
}

/// Resolve the JSON key a field binds to: an explicit `#[json(tag = "...")]`
/// if present, otherwise the field name (with any raw-identifier prefix
/// stripped).
fn field_tag(field: &syn::Field) -> syn::Result<String> {
    let mut tag = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let lit: LitStr = meta.value()?.parse()?;
                tag = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported #[json(...)] attribute; expected `tag = \"...\"`"))
            }
        })?;
    }
    Ok(tag.unwrap_or_else(|| {
        let name = field.ident.as_ref().expect("named field").to_string();
        name.trim_start_matches("r#").to_string()
    }))
}

#[cfg(test)]
mod tests {
    use super::expand;
    use syn::parse_quote;

    #[test]
    fn named_struct_expands_with_field_tags() {
        let input = parse_quote! {
            struct Flows {
                flows: Vec<FlowEntry>,
            }
        };
        let output = expand(input).unwrap().to_string();
        assert!(output.contains("\"flows\""));
        assert!(output.contains("Unmarshal"));
        assert!(output.contains("FIELDS"));
    }

    #[test]
    fn tag_attribute_overrides_field_name() {
        let input = parse_quote! {
            struct FlowEntry {
                #[json(tag = "type")]
                kind: String,
            }
        };
        let output = expand(input).unwrap().to_string();
        assert!(output.contains("\"type\""));
        assert!(!output.contains("\"kind\""));
    }

    #[test]
    fn raw_identifier_strips_prefix() {
        let input = parse_quote! {
            struct FlowEntry {
                r#type: String,
            }
        };
        let output = expand(input).unwrap().to_string();
        assert!(output.contains("\"type\""));
    }

    #[test]
    fn enum_is_rejected() {
        let input = parse_quote! {
            enum Nope {
                A,
            }
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("only supports structs"));
    }

    #[test]
    fn tuple_struct_is_rejected() {
        let input = parse_quote! {
            struct Nope(String);
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn unit_struct_is_rejected() {
        let input = parse_quote! {
            struct Nope;
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn empty_struct_is_rejected() {
        let input = parse_quote! {
            struct Nope {}
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("at least one field"));
    }

    #[test]
    fn unknown_json_attribute_is_rejected() {
        let input = parse_quote! {
            struct Nope {
                #[json(rename = "x")]
                a: String,
            }
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
