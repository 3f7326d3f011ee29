use proc_macro2::TokenStream;
use quote::quote;

use crate::FieldInfo;

/// Body of the generated `Decodable::decode`: open a keyed container, read one entry per
/// field by its wire name, then assemble the struct literal.
pub(crate) fn decode_body(name: &syn::Ident, fields: &[FieldInfo]) -> TokenStream {
    let reads = fields.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        let wire_name = &f.wire_name;
        if f.optional {
            quote! {
                let #ident: #ty = map.decode_if_present(&#wire_name)?;
            }
        } else {
            quote! {
                let #ident: #ty = map.decode(&#wire_name)?;
            }
        }
    });
    let idents = fields.iter().map(|f| &f.ident);

    quote! {
        let map = decoder.keyed_container::<&str>()?;
        #(#reads)*
        Ok(#name { #(#idents),* })
    }
}
