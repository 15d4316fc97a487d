//! Derive macro for `formpath`.
//!
//! `#[derive(Form)]` on a struct with named fields makes it a record destination.
//! With `#[form(text)]` or `#[form(from_str)]` on the container, the type is decoded from
//! text instead.

extern crate proc_macro;

mod attrs;
mod record;
mod text;
mod types;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput};

use crate::attrs::{parse_form_container_attrs, ContainerMode};

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let mode = parse_form_container_attrs(&input.attrs)?;
    match (&input.data, mode) {
        (Data::Union(u), _) => Err(syn::Error::new(
            u.union_token.span(),
            "`Form` is not supported for unions",
        )),
        (Data::Struct(data), ContainerMode::Record) => {
            record::derive_record(&input.ident, &input.generics, data)
        }
        (Data::Enum(e), ContainerMode::Record) => Err(syn::Error::new(
            e.enum_token.span(),
            "`Form` on enums requires `#[form(text)]` or `#[form(from_str)]`",
        )),
        (data, mode) => text::derive_text(&input.ident, &input.generics, data, mode),
    }
}

/// Derive `formpath::FormValue` and its companion traits.
///
/// Field attributes (records):
/// - `#[form(alias = "name")]`: also match `name` under the default tag `form`.
/// - `#[form(tag(json = "name"))]`: alias under another tag name.
/// - `#[form(skip)]`, or an alias of `"-"`: never decode the field.
/// - `#[form(flatten)]`: search the fields of this embedded record as if declared here.
///
/// Container attributes:
/// - `#[form(text)]`: decode through a hand-written `TextDecode` impl.
/// - `#[form(from_str)]`: decode through `FromStr`.
#[proc_macro_derive(Form, attributes(form))]
pub fn derive_form(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = expand(&input).unwrap_or_else(syn::Error::into_compile_error);
    TokenStream::from(out)
}
