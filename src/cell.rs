//! The destination model: every decodable type exposes itself as one [`Cell`] variant.

use std::any::Any;

use crate::dynamic::Dynamic;
use crate::error::BoxError;
use crate::scalar::Scalar;

/// Object-safe access to `Any` for every `'static` type.
///
/// Implemented automatically; it lets trait objects of this crate hand out their concrete
/// type to custom decoders and downcasts.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Convert a boxed value into `Box<dyn Any>`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A type that form paths can be decoded into.
///
/// Implemented for `String`, `bool`, integers, floats, `Vec<T>`, `[T; N]`, `HashMap`,
/// `BTreeMap`, `Option<T>`, `Box<T>`, [`Dynamic`], `chrono::NaiveDate` and `url::Url`.
/// Records and text-decodable types get it from `#[derive(Form)]`.
pub trait FormValue: AsAny {
    /// Expose this value as a cell.
    fn cell(&mut self) -> Cell<'_>;
}

/// The value a freshly allocated cell starts from.
///
/// Used for new `Option` pointees, grown sequence slots, mapping keys and values, and for
/// resetting a scalar when its raw value is empty.
pub trait Zero {
    /// The zero value.
    fn zero() -> Self;
}

/// A type decodable from a single piece of text.
///
/// When a path ends in `[]`, `decode_text` is called once per raw value, in order, on the
/// same instance; otherwise it is called once with the first raw value.
pub trait TextDecode: AsAny {
    /// Decode `text` into `self`.
    ///
    /// # Errors
    ///
    /// Any error is reported as [`ErrorCode::Conversion`](crate::ErrorCode::Conversion) with
    /// this error as its source.
    fn decode_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Declared Rust field name.
    pub name: &'static str,
    /// `(tag, alias)` pairs; an alias of `"-"` ignores the field under that tag.
    pub aliases: &'static [(&'static str, &'static str)],
    /// The field is never decoded.
    pub skip: bool,
    /// Field table of an embedded record whose fields are searched as if declared here.
    pub embedded: Option<&'static [FieldInfo]>,
}

impl FieldInfo {
    /// Alias of this field under `tag`, if any.
    #[must_use]
    pub fn alias(&self, tag: &str) -> Option<&'static str> {
        self.aliases
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|&(_, alias)| alias)
    }
}

/// A record (struct) with named fields.
pub trait Record: AsAny {
    /// The field table, in declaration order.
    fn fields(&self) -> &'static [FieldInfo];
    /// The field at `index` of [`Record::fields`]; `None` for skipped fields.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn FormValue>;
}

/// Compile-time access to a record's field table, used to describe embedded records.
pub trait RecordShape {
    /// The field table, in declaration order.
    const FIELDS: &'static [FieldInfo];
}

/// A growable ordered sequence.
pub trait Sequence: AsAny {
    /// Current length.
    fn len(&self) -> usize;
    /// Whether the sequence is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Grow to at least `len` elements with zero values; never shrinks.
    fn grow(&mut self, len: usize);
    /// The element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn FormValue>;
}

/// A fixed-size sequence.
pub trait FixedSequence: AsAny {
    /// Declared length.
    fn len(&self) -> usize;
    /// Whether the declared length is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// The element at `index`.
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn FormValue>;
}

/// A key-value mapping.
pub trait Mapping: AsAny {
    /// Number of entries.
    fn len(&self) -> usize;
    /// Whether the mapping is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// For `String`-keyed mappings, the entry for `key`, inserted with a zero value if absent.
    ///
    /// Mappings with any other key type hand themselves back; their keys are decoded after
    /// the main pass.
    fn text_entry(&mut self, key: &str) -> Result<&mut dyn FormValue, &mut dyn Mapping>;
    /// A zero value of the key type.
    fn blank_key(&self) -> Box<dyn FormValue>;
    /// A zero value of the value type.
    fn blank_value(&self) -> Box<dyn FormValue>;
    /// Insert a key and value produced by [`Mapping::blank_key`] and [`Mapping::blank_value`].
    ///
    /// Returns `false` if either has the wrong concrete type.
    fn insert_boxed(&mut self, key: Box<dyn FormValue>, value: Box<dyn FormValue>) -> bool;
}

/// A cell that may be empty and is allocated on first use (`Option<T>`, `Box<T>`).
pub trait Pointer: AsAny {
    /// The pointee, allocating a zero value first if empty.
    fn pointee(&mut self) -> &mut dyn FormValue;
}

/// A mutable view of one destination location, by kind.
pub enum Cell<'a> {
    /// A struct with named fields.
    Record(&'a mut dyn Record),
    /// A `Vec<T>`.
    Sequence(&'a mut dyn Sequence),
    /// A `[T; N]`.
    Array(&'a mut dyn FixedSequence),
    /// A `HashMap` or `BTreeMap`.
    Mapping(&'a mut dyn Mapping),
    /// An `Option<T>` or `Box<T>`.
    Pointer(&'a mut dyn Pointer),
    /// An empty open value.
    Dynamic(&'a mut Dynamic),
    /// A type implementing [`TextDecode`].
    Text(&'a mut dyn TextDecode),
    /// A built-in scalar.
    Scalar(Scalar<'a>),
}

impl Cell<'_> {
    /// Human-readable kind name, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::Array(_) => "array",
            Self::Mapping(_) => "mapping",
            Self::Pointer(_) => "pointer",
            Self::Dynamic(_) => "dynamic value",
            Self::Text(_) => "text-decodable value",
            Self::Scalar(s) => s.kind(),
        }
    }

    pub(crate) fn any_ref(&self) -> &dyn Any {
        match self {
            Self::Record(v) => (**v).as_any(),
            Self::Sequence(v) => (**v).as_any(),
            Self::Array(v) => (**v).as_any(),
            Self::Mapping(v) => (**v).as_any(),
            Self::Pointer(v) => (**v).as_any(),
            Self::Dynamic(v) => &**v,
            Self::Text(v) => (**v).as_any(),
            Self::Scalar(s) => s.any_ref(),
        }
    }

    pub(crate) fn any_mut(&mut self) -> &mut dyn Any {
        match self {
            Self::Record(v) => (**v).as_any_mut(),
            Self::Sequence(v) => (**v).as_any_mut(),
            Self::Array(v) => (**v).as_any_mut(),
            Self::Mapping(v) => (**v).as_any_mut(),
            Self::Pointer(v) => (**v).as_any_mut(),
            Self::Dynamic(v) => &mut **v,
            Self::Text(v) => (**v).as_any_mut(),
            Self::Scalar(s) => s.any_mut(),
        }
    }

    /// Address of the underlying value, for field-specific custom decoders.
    pub(crate) fn addr(&self) -> usize {
        (self.any_ref() as *const dyn Any).cast::<()>() as usize
    }
}

/// Follow `Option`/`Box` cells to their pointee, allocating empty ones on the way.
pub(crate) fn indirect(mut cell: Cell<'_>) -> Cell<'_> {
    loop {
        cell = match cell {
            Cell::Pointer(p) => p.pointee().cell(),
            other => return other,
        };
    }
}
