//! Construction macros.
//!
//! - [`form_values!`](crate::form_values!) builds a [`crate::FormValues`] multimap from literal
//!   `path => value` or `path => [values...]` pairs, preserving the written order.
//! - [`options!`](crate::options!) builds [`crate::DecodeOptions`] from the defaults plus field
//!   assignments.
//!
//! ```
//! let values = formpath::form_values! {
//!     "Name" => "Homer",
//!     "Tags[]" => ["a", "b"],
//! };
//! assert_eq!(values.get("Tags[]"), Some(&["a".to_owned(), "b".to_owned()][..]));
//! ```

/// Construct a [`crate::FormValues`] from `path => value` pairs.
///
/// A value is a literal or variable convertible into `String`, or a bracketed list of
/// expressions. Repeated paths append in order.
#[macro_export]
macro_rules! form_values {
    () => {
        $crate::FormValues::new()
    };
    ( $( $path:expr => $value:tt ),+ $(,)? ) => {{
        let mut values = $crate::FormValues::new();
        $( $crate::__form_values_entry!(values, $path, $value); )+
        values
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __form_values_entry {
    ($values:ident, $path:expr, [ $( $item:expr ),* $(,)? ]) => {
        $( $values.append($path, $item); )*
    };
    ($values:ident, $path:expr, $item:expr) => {
        $values.append($path, $item);
    };
}

/// Construct [`crate::DecodeOptions`] from `Default` and a list of field assignments.
///
/// ```
/// let options = formpath::options! {
///     ignore_unknown_keys: true,
///     max_container_size: None,
/// };
/// assert!(options.ignore_unknown_keys);
/// assert_eq!(options.tag_name, "form");
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut opt = $crate::DecodeOptions::default();
        $( opt.$field = $value; )*
        opt
    }};
}
