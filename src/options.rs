/// Which custom decoder wins when both a field-specific and a type-wide one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CustomPrecedence {
    /// Field-specific registrations are consulted before the type-wide one.
    #[default]
    FieldFirst,
    /// The type-wide registration is consulted before field-specific ones.
    TypeFirst,
}

/// Decoder configuration.
///
/// Construct with struct-update syntax over [`DecodeOptions::default`] or with
/// [`options!`](crate::options!).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    /// Attribute tag under which field aliases are looked up.
    pub tag_name: String,
    /// Try [`TextDecode`](crate::TextDecode) before registered custom decoders.
    pub prefer_text_decode: bool,
    /// Never use [`TextDecode`](crate::TextDecode); only custom decoders and built-in kinds.
    pub disable_text_decode: bool,
    /// Skip paths naming unknown fields or unsupported types instead of failing.
    pub ignore_unknown_keys: bool,
    /// Maximum length a sequence may grow to; `None` removes the bound.
    pub max_container_size: Option<usize>,
    /// Order of field-specific and type-wide custom decoders.
    pub custom_precedence: CustomPrecedence,
}

impl DecodeOptions {
    /// Default alias tag name.
    pub const DEFAULT_TAG_NAME: &'static str = "form";

    /// Default maximum sequence length.
    ///
    /// This is a safety limit against `Items[99999999]`-style inputs; adjust explicitly
    /// for your deployment.
    pub const DEFAULT_MAX_CONTAINER_SIZE: usize = 16_000;

    /// Check `len` against the configured bound.
    pub(crate) fn check_len(&self, len: usize) -> Result<(), crate::FormError> {
        match self.max_container_size {
            Some(max) if len > max => Err(crate::error::too_large(len, max)),
            _ => Ok(()),
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            tag_name: Self::DEFAULT_TAG_NAME.to_owned(),
            prefer_text_decode: false,
            disable_text_decode: false,
            ignore_unknown_keys: false,
            max_container_size: Some(Self::DEFAULT_MAX_CONTAINER_SIZE),
            custom_precedence: CustomPrecedence::FieldFirst,
        }
    }
}
