use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, FieldsNamed};

mod read;
mod write;

/// Shared per-field view used by both derives: the Rust field identifier, its type, and the
/// wire name it is encoded under (`#[cbor(rename = "...")]`, defaulting to the field name).
pub(crate) struct FieldInfo {
    pub(crate) ident: syn::Ident,
    pub(crate) ty: syn::Type,
    pub(crate) wire_name: String,
    pub(crate) optional: bool,
}

fn rename_of(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if !attr.path.is_ident("cbor") {
            continue;
        }
        if let syn::Meta::List(list) = attr.parse_meta()? {
            for nested in list.nested {
                if let syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) = nested {
                    if nv.path.is_ident("rename") {
                        if let syn::Lit::Str(s) = nv.lit {
                            return Ok(Some(s.value()));
                        }
                    }
                }
            }
        }
    }
    Ok(None)
}

fn tag_of(attrs: &[syn::Attribute]) -> syn::Result<Option<u64>> {
    for attr in attrs {
        if !attr.path.is_ident("cbor") {
            continue;
        }
        if let syn::Meta::List(list) = attr.parse_meta()? {
            for nested in list.nested {
                if let syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) = nested {
                    if nv.path.is_ident("tag") {
                        if let syn::Lit::Int(n) = nv.lit {
                            return Ok(Some(n.base10_parse()?));
                        }
                    }
                }
            }
        }
    }
    Ok(None)
}

fn is_option(ty: &syn::Type) -> bool {
    if let syn::Type::Path(p) = ty {
        p.path
            .segments
            .last()
            .map(|seg| seg.ident == "Option")
            .unwrap_or(false)
    } else {
        false
    }
}

fn named_fields(data: &Data, call_site: proc_macro2::Span) -> syn::Result<Vec<FieldInfo>> {
    let fields = match data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(FieldsNamed { named, .. }) => named,
            _ => {
                return Err(Error::new(
                    call_site,
                    "cbor-codable derives only support structs with named fields",
                ))
            }
        },
        Data::Enum(e) => {
            return Err(Error::new(
                e.enum_token.span,
                "cbor-codable derives do not support enums",
            ))
        }
        Data::Union(u) => {
            return Err(Error::new(
                u.union_token.span,
                "cbor-codable derives do not support unions",
            ))
        }
    };

    fields
        .iter()
        .map(|f| {
            let ident = f.ident.clone().expect("named field always has an ident");
            let wire_name = rename_of(&f.attrs)?.unwrap_or_else(|| ident.to_string());
            Ok(FieldInfo {
                ident,
                ty: f.ty.clone(),
                wire_name,
                optional: is_option(&f.ty),
            })
        })
        .collect()
}

#[proc_macro_derive(Encodable, attributes(cbor))]
pub fn derive_encodable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident.clone();
    let (g_impl, g_type, g_where) = input.generics.split_for_impl();

    let fields = match named_fields(&input.data, name.span()) {
        Ok(f) => f,
        Err(e) => return e.to_compile_error().into(),
    };
    let tag = match tag_of(&input.attrs) {
        Ok(t) => t,
        Err(e) => return e.to_compile_error().into(),
    };

    let body = write::encode_body(&fields);
    let tag_const = write::tag_const(tag);

    let expanded = quote! {
        impl #g_impl ::cbor_codable::Encodable for #name #g_type #g_where {
            #tag_const

            fn encode(&self, encoder: &mut ::cbor_codable::ValueEncoder) -> ::std::result::Result<(), ::cbor_codable::EncodingError> {
                #body
            }
        }
    };
    expanded.into()
}

#[proc_macro_derive(Decodable, attributes(cbor))]
pub fn derive_decodable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident.clone();
    let (g_impl, g_type, g_where) = input.generics.split_for_impl();

    let fields = match named_fields(&input.data, name.span()) {
        Ok(f) => f,
        Err(e) => return e.to_compile_error().into(),
    };
    let tag = match tag_of(&input.attrs) {
        Ok(t) => t,
        Err(e) => return e.to_compile_error().into(),
    };

    let body = read::decode_body(&name, &fields);
    let tag_const = write::tag_const(tag);

    let expanded = quote! {
        impl #g_impl ::cbor_codable::Decodable for #name #g_type #g_where {
            #tag_const

            fn decode(decoder: &mut ::cbor_codable::ValueDecoder) -> ::std::result::Result<Self, ::cbor_codable::DecodingError> {
                #body
            }
        }
    };
    expanded.into()
}
