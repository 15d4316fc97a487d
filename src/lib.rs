//! # formpath
//!
//! Decode flat form submissions and query strings into typed, nested Rust values.
//!
//! Each key of the input is a **path** such as `Nest.Children[0].Name` or `Map[key1][key2]`.
//! The decoder walks the path against the destination's shape, creating sequence slots,
//! optional values and map entries on the way, and converts the raw string value(s) into the
//! type found at the end.
//!
//! ```
//! use std::collections::HashMap;
//! use formpath::{Form, FormValues};
//!
//! #[derive(Form, Default)]
//! struct Address {
//!     city: String,
//! }
//!
//! #[derive(Form, Default)]
//! struct Signup {
//!     #[form(alias = "n")]
//!     name: String,
//!     age: u8,
//!     subscribed: bool,
//!     addresses: Vec<Address>,
//!     scores: HashMap<u32, f64>,
//! }
//!
//! let values: FormValues = [
//!     ("n", "Marge"),
//!     ("age", "36"),
//!     ("subscribed", "on"),
//!     ("addresses[1].city", "Springfield"),
//!     ("scores[7]", "9.5"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut signup = Signup::default();
//! formpath::decode(&values, &mut signup).unwrap();
//! assert_eq!(signup.name, "Marge");
//! assert_eq!(signup.age, 36);
//! assert!(signup.subscribed);
//! assert_eq!(signup.addresses.len(), 2);
//! assert_eq!(signup.addresses[1].city, "Springfield");
//! assert_eq!(signup.scores[&7], 9.5);
//! ```
//!
//! ## Path grammar
//!
//! - `a.b` selects field `b` of record field `a`; on a mapping it selects the key `b`.
//! - `a[3]` indexes a `Vec` (growing it to 4 elements if needed) or a fixed array
//!   (bounds-checked); `a[key]` selects a mapping entry.
//! - A `.` right after `]` is optional: `a[0].b` and `a[0]b` are the same path.
//! - Inside brackets the first `]` closes the segment, except on mappings, where brackets
//!   nest: `m[a[b]]` is the key `a[b]`.
//! - `a[]` marks a list: every raw value is used, and a [`TextDecode`] target sees each one.
//!
//! ## Decoding
//!
//! For the value at the end of a path, in order:
//!
//! 1. a custom decoder registered on the [`Decoder`] for that type (field-specific first);
//! 2. [`TextDecode`], unless disabled (use `prefer_text_decode` to swap 1 and 2);
//! 3. the built-in kinds: `String`, `bool` (`true`/`on`/`1`/`checked`), integers (with a
//!    distinct [`ErrorCode::Range`] on overflow), floats, `chrono::NaiveDate` (`%Y-%m-%d`),
//!    `url::Url`, [`Dynamic`], and whole-list assignment for `Vec`/arrays.
//!
//! An empty raw value resets a scalar to its zero value.
//!
//! Mapping keys of any type other than `String` are decoded after every path was walked,
//! through the same steps.
//!
//! ## Feature flags
//!
//! - `chrono` *(default)*: `chrono::NaiveDate` fields and keys.
//! - `url` *(default)*: `url::Url` fields and keys.
//! - `serde`: serializes [`FormError`] as its message and (de)serializes [`DecodeOptions`].
//!
//! ## Logging
//!
//! Decoding emits `tracing` events: `debug` per decode call, skipped path and deferred-key
//! flush; `trace` per path and sequence growth.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod assign;
mod cell;
mod decoder;
mod deferred;
mod dynamic;
mod error;
mod impls;
mod macros;
mod options;
mod path;
mod registry;
mod resolve;
mod scalar;
mod traverse;
mod values;

pub use crate::cell::{
    AsAny, Cell, FieldInfo, FixedSequence, FormValue, Mapping, Pointer, Record, RecordShape,
    Sequence, TextDecode, Zero,
};
pub use crate::decoder::{decode, decode_with, Decoder};
pub use crate::dynamic::Dynamic;
pub use crate::error::{BoxError, ErrorCode, FormError};
pub use crate::options::{CustomPrecedence, DecodeOptions};
pub use crate::path::{Brackets, PathTokens, Segment};
pub use crate::registry::FieldAddr;
pub use crate::scalar::{parse_bool, Scalar, DATE_FORMAT};
pub use crate::values::FormValues;

pub use formpath_derive::Form;
