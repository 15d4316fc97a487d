use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, spanned::Spanned, DataStruct, Fields, Generics, Ident, LitStr};

use crate::attrs::parse_form_field_attrs;
use crate::types::type_mentions_self;
use crate::util::{add_where_bound, static_generics};

/// `FormValue`, `Record`, `RecordShape` and `Zero` for a struct with named fields.
pub(crate) fn derive_record(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let fields = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new(
                fields.span(),
                "`Form` records need named fields; use `#[form(text)]` or `#[form(from_str)]` for newtypes",
            ))
        }
    };

    let mut generics = static_generics(generics)?;
    let wc = generics.make_where_clause();

    let mut infos = Vec::new();
    let mut arms = Vec::new();
    let mut zeros = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let attr = parse_form_field_attrs(&field.attrs)?;
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
        let ty = &field.ty;
        let key = LitStr::new(&ident.unraw().to_string(), ident.span());

        if attr.skip {
            add_where_bound(wc, ty, quote!(::core::default::Default));
            zeros.push(quote!(#ident: ::core::default::Default::default()));
        } else {
            if !type_mentions_self(ty, name) {
                add_where_bound(wc, ty, quote!(::formpath::FormValue + ::formpath::Zero));
            }
            zeros.push(quote!(#ident: ::formpath::Zero::zero()));
            arms.push(quote!(#index => ::core::option::Option::Some(&mut self.#ident)));
        }

        let embedded = if attr.flatten {
            if type_mentions_self(ty, name) {
                return Err(syn::Error::new(
                    ty.span(),
                    "`form(flatten)` cannot embed the record into itself",
                ));
            }
            add_where_bound(wc, ty, quote!(::formpath::RecordShape));
            quote!(::core::option::Option::Some(<#ty as ::formpath::RecordShape>::FIELDS))
        } else {
            quote!(::core::option::Option::None)
        };
        let aliases = attr.aliases.iter().map(|(tag, alias)| quote!((#tag, #alias)));
        let skip = attr.skip;
        infos.push(quote! {
            ::formpath::FieldInfo {
                name: #key,
                aliases: &[#(#aliases),*],
                skip: #skip,
                embedded: #embedded,
            }
        });
    }

    let zero = if matches!(data.fields, Fields::Unit) {
        quote!(Self)
    } else {
        quote!(Self { #(#zeros),* })
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::formpath::RecordShape for #name #ty_generics #where_clause {
            const FIELDS: &'static [::formpath::FieldInfo] = &[#(#infos),*];
        }

        impl #impl_generics ::formpath::Record for #name #ty_generics #where_clause {
            fn fields(&self) -> &'static [::formpath::FieldInfo] {
                <Self as ::formpath::RecordShape>::FIELDS
            }

            #[allow(unreachable_patterns)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn ::formpath::FormValue> {
                match index {
                    #(#arms,)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::formpath::FormValue for #name #ty_generics #where_clause {
            fn cell(&mut self) -> ::formpath::Cell<'_> {
                ::formpath::Cell::Record(self)
            }
        }

        impl #impl_generics ::formpath::Zero for #name #ty_generics #where_clause {
            fn zero() -> Self {
                #zero
            }
        }
    })
}
