use proc_macro2::TokenStream;
use quote::quote;

use crate::FieldInfo;

/// The `const TAG: Option<u64> = ...;` item emitted into both the `Encodable` and `Decodable`
/// impls when the struct carries `#[cbor(tag = N)]`.
pub(crate) fn tag_const(tag: Option<u64>) -> TokenStream {
    match tag {
        Some(n) => quote! { const TAG: ::std::option::Option<u64> = ::std::option::Option::Some(#n); },
        None => TokenStream::new(),
    }
}

/// Body of the generated `Encodable::encode`: open a keyed container and write one entry per
/// field, honoring `#[cbor(rename = "...")]` and treating `Option<T>` fields as optional.
pub(crate) fn encode_body(fields: &[FieldInfo]) -> TokenStream {
    let writes = fields.iter().map(|f| {
        let ident = &f.ident;
        let wire_name = &f.wire_name;
        if f.optional {
            quote! {
                map.encode_if_present(&#wire_name, self.#ident.as_ref())?;
            }
        } else {
            quote! {
                map.encode(&#wire_name, &self.#ident)?;
            }
        }
    });

    quote! {
        let mut map = encoder.keyed_container::<&str>();
        #(#writes)*
        Ok(())
    }
}
