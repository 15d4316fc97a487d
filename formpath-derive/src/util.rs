use proc_macro2::TokenStream;
use syn::{parse_quote, GenericParam, Generics, Type, WhereClause, WherePredicate};

pub(crate) fn add_where_bound(wc: &mut WhereClause, ty: &Type, bound: TokenStream) {
    let pred: WherePredicate = parse_quote!(#ty: #bound);
    wc.predicates.push(pred);
}

/// Reject lifetime parameters and require `'static` on type parameters.
///
/// Every destination is reached through `Any`, so borrowed types cannot be decoded into.
pub(crate) fn static_generics(generics: &Generics) -> syn::Result<Generics> {
    if let Some(lt) = generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lt,
            "`Form` cannot be derived for types with lifetime parameters",
        ));
    }
    let mut out = generics.clone();
    let params: Vec<_> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(tp) => Some(tp.ident.clone()),
            _ => None,
        })
        .collect();
    let wc = out.make_where_clause();
    for ident in params {
        wc.predicates.push(parse_quote!(#ident: 'static));
    }
    Ok(out)
}
