use crate::cell::FieldInfo;

/// Alias marking a field as never decoded.
pub(crate) const IGNORE_ALIAS: &str = "-";

/// Outcome of looking a field segment up in a record's field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Field indices from the record down through embedded records to the target field.
    Found(Vec<usize>),
    /// The name matches an ignored field.
    Skip,
    /// Nothing matches.
    Missing,
}

/// Resolve `name` against `fields`.
///
/// Exact names win over aliases, and both win over matches inside embedded records, so a
/// field declared on the outer record shadows an embedded field of the same name. The
/// search only reads static field tables; unknown-key tolerance is decided by the caller.
pub(crate) fn resolve(fields: &'static [FieldInfo], name: &str, tag: &str) -> Resolution {
    let mut fallback = None;
    for (index, field) in fields.iter().enumerate() {
        if field.name == name {
            return if is_ignored(field, tag) {
                Resolution::Skip
            } else {
                Resolution::Found(vec![index])
            };
        }
        let Some(inner) = field.embedded else {
            continue;
        };
        if fallback.is_some() || is_ignored(field, tag) {
            continue;
        }
        match resolve(inner, name, tag) {
            Resolution::Found(mut route) => {
                route.insert(0, index);
                fallback = Some(Resolution::Found(route));
            }
            Resolution::Skip => fallback = Some(Resolution::Skip),
            Resolution::Missing => {}
        }
    }

    for (index, field) in fields.iter().enumerate() {
        match field.alias(tag) {
            Some(alias) if alias != IGNORE_ALIAS && alias == name => {
                return if field.skip {
                    Resolution::Skip
                } else {
                    Resolution::Found(vec![index])
                };
            }
            _ => {}
        }
    }

    fallback.unwrap_or(Resolution::Missing)
}

fn is_ignored(field: &FieldInfo, tag: &str) -> bool {
    field.skip || field.alias(tag) == Some(IGNORE_ALIAS)
}
