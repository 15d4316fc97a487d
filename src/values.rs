use std::collections::HashMap;

/// An insertion-ordered multimap of form paths to their raw string values.
///
/// Decoding visits paths in the order they were first inserted; the values of one path keep
/// the order in which they were appended.
///
/// ```
/// use formpath::FormValues;
///
/// let values: FormValues = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
/// assert_eq!(values.len(), 2);
/// assert_eq!(values.get("a"), Some(&["1".to_owned(), "3".to_owned()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl FormValues {
    /// An empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the list stored under `path`.
    pub fn append(&mut self, path: impl Into<String>, value: impl Into<String>) {
        let path = path.into();
        let value = value.into();
        if let Some(&at) = self.index.get(&path) {
            self.entries[at].1.push(value);
            return;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, vec![value]));
    }

    /// Replace the list stored under `path`, keeping its original position if present.
    pub fn insert<I, V>(&mut self, path: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let path = path.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if let Some(&at) = self.index.get(&path) {
            self.entries[at].1 = values;
            return;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, values));
    }

    /// Values stored under `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.index.get(path).map(|&at| self.entries[at].1.as_slice())
    }

    /// Iterate `(path, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(path, values)| (path.as_str(), values.as_slice()))
    }

    /// Number of distinct paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<K, V> Extend<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (path, value) in iter {
            self.append(path, value);
        }
    }
}

/// Paths are ordered lexicographically, since `HashMap` iteration order is unspecified.
impl From<HashMap<String, Vec<String>>> for FormValues {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        let mut pairs: Vec<_> = map.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let mut out = Self::new();
        for (path, values) in pairs {
            out.insert(path, values);
        }
        out
    }
}
