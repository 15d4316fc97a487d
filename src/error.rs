use std::error::Error as StdError;
use std::fmt;

/// Boxed error returned by custom decoders and [`TextDecode`](crate::TextDecode) implementations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A structured error code identifying why a path could not be decoded.
///
/// Codes are stable and string-free; use [`ErrorCode::as_str`] for a machine-readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The root destination is neither a record nor a `Vec`.
    NotAPointer,
    /// A bracket index is malformed, out of bounds, or applied to a non-container.
    ArrayIndex,
    /// Growing a sequence would exceed the configured maximum size.
    ArraySize,
    /// A raw value could not be converted to the destination type.
    Conversion,
    /// A numeric raw value overflows the destination width.
    Range,
    /// No field matches the path segment.
    UnknownField,
    /// The terminal destination type cannot be decoded from text.
    UnknownType,
}

impl ErrorCode {
    /// Stable snake-case name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAPointer => "not_a_pointer",
            Self::ArrayIndex => "array_index",
            Self::ArraySize => "array_size",
            Self::Conversion => "conversion",
            Self::Range => "range",
            Self::UnknownField => "unknown_field",
            Self::UnknownType => "unknown_type",
        }
    }

    const fn default_message(self) -> &'static str {
        match self {
            Self::NotAPointer => "destination must be a record or a sequence",
            Self::ArrayIndex => "invalid array index",
            Self::ArraySize => "array size exceeds the configured maximum",
            Self::Conversion => "value could not be converted",
            Self::Range => "value out of range",
            Self::UnknownField => "unknown field",
            Self::UnknownType => "unsupported type",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decode error with its code, the field and path being decoded, and a message.
///
/// The destination may be partially populated when a decode call returns this error.
#[derive(Debug)]
pub struct FormError {
    code: ErrorCode,
    field: String,
    path: String,
    message: String,
    source: Option<BoxError>,
    skippable: bool,
}

impl FormError {
    /// Construct an error with an explicit message and no location.
    #[cold]
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            field: String::new(),
            path: String::new(),
            message: message.into(),
            source: None,
            skippable: false,
        }
    }

    /// Construct an error wrapping the failure of a custom or text decoder.
    #[cold]
    #[must_use]
    pub fn with_source(code: ErrorCode, source: BoxError) -> Self {
        let mut err = Self::new(code, source.to_string());
        err.source = Some(source);
        err
    }

    /// The error code.
    #[inline]
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The last field segment seen before the failure (empty when unknown).
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The full input path being decoded (empty when unknown).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        if self.message.is_empty() {
            self.code.default_message()
        } else {
            &self.message
        }
    }

    /// Mark the error as one that `ignore_unknown_keys` may swallow.
    pub(crate) fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    pub(crate) const fn is_skippable(&self) -> bool {
        self.skippable
    }

    /// Attach location context unless the error already carries one.
    pub(crate) fn locate(mut self, field: &str, path: &str) -> Self {
        if self.path.is_empty() {
            field.clone_into(&mut self.field);
            path.clone_into(&mut self.path);
        }
        self
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "form decode failed: {}", self.message())
        } else {
            write!(
                f,
                "form decode failed: field={}; path={}: {}",
                self.field,
                self.path,
                self.message()
            )
        }
    }
}

impl StdError for FormError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FormError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cold]
pub(crate) fn unknown_field(name: &str) -> FormError {
    FormError::new(ErrorCode::UnknownField, format!("unknown field `{name}`")).skippable()
}

#[cold]
pub(crate) fn unknown_type(what: &str) -> FormError {
    FormError::new(ErrorCode::UnknownType, format!("unsupported type: {what}")).skippable()
}

#[cold]
pub(crate) fn bad_index(text: &str) -> FormError {
    FormError::new(ErrorCode::ArrayIndex, format!("invalid array index `{text}`"))
}

#[cold]
pub(crate) fn out_of_bounds() -> FormError {
    FormError::new(ErrorCode::ArrayIndex, "array index is out of bounds")
}

#[cold]
pub(crate) fn too_large(len: usize, max: usize) -> FormError {
    FormError::new(
        ErrorCode::ArraySize,
        format!("array size {len} is longer than MaxSize {max}"),
    )
}
