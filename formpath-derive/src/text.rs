use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, Generics, Ident};

use crate::attrs::{ensure_no_form_attrs, ContainerMode};
use crate::util::static_generics;

/// `FormValue` and `Zero` for a text-decodable type, plus `TextDecode` in `from_str` mode.
///
/// The zero value is `Default::default()`.
pub(crate) fn derive_text(
    name: &Ident,
    generics: &Generics,
    data: &Data,
    mode: ContainerMode,
) -> syn::Result<TokenStream> {
    match data {
        Data::Struct(s) => {
            for field in &s.fields {
                ensure_no_form_attrs(&field.attrs, "fields of text-decodable types")?;
            }
        }
        Data::Enum(e) => {
            for variant in &e.variants {
                ensure_no_form_attrs(&variant.attrs, "enum variants")?;
            }
        }
        Data::Union(_) => {}
    }

    let generics = static_generics(generics)?;
    let (impl_generics, ty_generics, _) = generics.split_for_impl();

    let text_decode = if mode == ContainerMode::FromStr {
        let mut parse_generics = generics.clone();
        parse_generics.make_where_clause().predicates.push(syn::parse_quote! {
            <#name #ty_generics as ::core::str::FromStr>::Err: ::core::fmt::Display
        });
        let (_, _, parse_where) = parse_generics.split_for_impl();
        quote! {
            impl #impl_generics ::formpath::TextDecode for #name #ty_generics #parse_where {
                fn decode_text(&mut self, text: &str) -> ::core::result::Result<(), ::formpath::BoxError> {
                    *self = <Self as ::core::str::FromStr>::from_str(text)
                        .map_err(|err| ::formpath::BoxError::from(err.to_string()))?;
                    ::core::result::Result::Ok(())
                }
            }
        }
    } else {
        TokenStream::new()
    };

    let mut cell_generics = generics.clone();
    cell_generics
        .make_where_clause()
        .predicates
        .push(syn::parse_quote!(Self: ::formpath::TextDecode));
    let (_, _, cell_where) = cell_generics.split_for_impl();

    let mut default_generics = generics.clone();
    default_generics
        .make_where_clause()
        .predicates
        .push(syn::parse_quote!(Self: ::core::default::Default));
    let (_, _, default_where) = default_generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::formpath::FormValue for #name #ty_generics #cell_where {
            fn cell(&mut self) -> ::formpath::Cell<'_> {
                ::formpath::Cell::Text(self)
            }
        }

        impl #impl_generics ::formpath::Zero for #name #ty_generics #default_where {
            fn zero() -> Self {
                <Self as ::core::default::Default>::default()
            }
        }

        #text_decode
    })
}
