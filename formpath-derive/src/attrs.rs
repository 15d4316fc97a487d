use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, LitStr};

/// Tag that `#[form(alias = "...")]` is recorded under.
pub(crate) const DEFAULT_TAG: &str = "form";

#[derive(Default, Clone)]
pub(crate) struct FormFieldAttr {
    /// `(tag, alias)` pairs in declaration order.
    pub(crate) aliases: Vec<(String, LitStr)>,
    pub(crate) skip: bool,
    pub(crate) flatten: bool,
}

/// How a container without named record semantics is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum ContainerMode {
    #[default]
    Record,
    /// The type implements `TextDecode` by hand.
    Text,
    /// `TextDecode` is derived from `FromStr`.
    FromStr,
}

pub(crate) fn ensure_no_form_attrs(attrs: &[Attribute], ctx: &str) -> syn::Result<()> {
    for a in attrs {
        if a.path().is_ident("form") {
            return Err(syn::Error::new(
                a.span(),
                format!("`#[form(...)]` is not supported on {ctx}"),
            ));
        }
    }
    Ok(())
}

fn push_alias(out: &mut FormFieldAttr, tag: String, lit: LitStr) -> syn::Result<()> {
    if out.aliases.iter().any(|(t, _)| *t == tag) {
        return Err(syn::Error::new(
            lit.span(),
            format!("duplicate alias for tag `{tag}`"),
        ));
    }
    out.aliases.push((tag, lit));
    Ok(())
}

pub(crate) fn parse_form_field_attrs(attrs: &[Attribute]) -> syn::Result<FormFieldAttr> {
    let mut out = FormFieldAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                if out.skip {
                    return Err(meta.error("duplicate `form(skip)`"));
                }
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("flatten") {
                if out.flatten {
                    return Err(meta.error("duplicate `form(flatten)`"));
                }
                out.flatten = true;
                return Ok(());
            }
            if meta.path.is_ident("alias") {
                let lit: LitStr = meta.value()?.parse()?;
                return push_alias(&mut out, DEFAULT_TAG.to_owned(), lit);
            }
            if meta.path.is_ident("tag") {
                return meta.parse_nested_meta(|inner| {
                    let Some(tag) = inner.path.get_ident() else {
                        return Err(inner.error("expected `tag(name = \"alias\")`"));
                    };
                    let lit: LitStr = inner.value()?.parse()?;
                    push_alias(&mut out, tag.to_string(), lit)
                });
            }
            Err(meta.error(
                "unsupported `form(...)` field attribute (allowed: alias, tag, skip, flatten)",
            ))
        })?;
    }

    if out.skip && out.flatten {
        return Err(syn::Error::new(
            Span::call_site(),
            "`form(skip)` cannot be combined with `flatten`",
        ));
    }

    Ok(out)
}

pub(crate) fn parse_form_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerMode> {
    let mut mode = None;
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("text") {
                ContainerMode::Text
            } else if meta.path.is_ident("from_str") {
                ContainerMode::FromStr
            } else {
                return Err(
                    meta.error("unsupported `form(...)` container attribute (allowed: text, from_str)")
                );
            };
            if mode.is_some() {
                return Err(meta.error("`form(text)` and `form(from_str)` may appear only once"));
            }
            mode = Some(next);
            Ok(())
        })?;
    }
    Ok(mode.unwrap_or_default())
}
