use std::any::Any;

use tracing::{debug, trace};

use crate::assign::Env;
use crate::cell::{Cell, FormValue};
use crate::error::{BoxError, ErrorCode, FormError};
use crate::options::DecodeOptions;
use crate::registry::{CustomTypes, FieldAddr};
use crate::traverse::Session;
use crate::values::FormValues;

/// A configured decoder with its own custom-decoder registry.
///
/// Register custom decoders first, then share the decoder freely: decoding only needs
/// `&self`.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
    custom: CustomTypes,
}

impl Decoder {
    /// A decoder with `options` and no custom decoders.
    #[must_use]
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            custom: CustomTypes::default(),
        }
    }

    /// The decoder's options.
    #[must_use]
    pub const fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode every `T` from its raw values with `decode`, replacing the built-in behaviour.
    ///
    /// The function receives every raw value of the path. A later registration for the same
    /// type replaces the earlier one.
    pub fn register<T, F>(&mut self, decode: F) -> &mut Self
    where
        T: Any,
        F: Fn(&[String]) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.custom.register(decode, &[]);
        self
    }

    /// Like [`Decoder::register`], but only for the fields at `fields`.
    ///
    /// Take the addresses with [`FieldAddr::of`] from the instance that will be decoded.
    /// Whether these win over a type-wide registration is set by
    /// [`DecodeOptions::custom_precedence`].
    pub fn register_for<T, F>(&mut self, decode: F, fields: &[FieldAddr]) -> &mut Self
    where
        T: Any,
        F: Fn(&[String]) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.custom.register(decode, fields);
        self
    }

    /// Decode `values` into `dst`.
    ///
    /// Paths are applied in the order of `values`. Sequences only ever grow, so decoding
    /// into a previously populated destination can leave stale trailing elements.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not skipped under
    /// [`DecodeOptions::ignore_unknown_keys`]. Paths applied before the failure stay
    /// applied, so `dst` may be partially populated.
    pub fn decode<T: FormValue>(&self, values: &FormValues, dst: &mut T) -> Result<(), FormError> {
        if !matches!(dst.cell(), Cell::Record(_) | Cell::Sequence(_)) {
            return Err(FormError::new(
                ErrorCode::NotAPointer,
                format!(
                    "destination {} must be a record or a Vec",
                    std::any::type_name::<T>()
                ),
            ));
        }
        debug!(keys = values.len(), "decoding form values");

        let mut session = Session::new(Env {
            options: &self.options,
            custom: &self.custom,
        });
        for (path, raw) in values.iter() {
            trace!(path, values = raw.len(), "decoding path");
            match session.decode_path(&mut *dst, path, raw) {
                Ok(()) => {}
                Err(err) if err.is_skippable() && self.options.ignore_unknown_keys => {
                    debug!(path, reason = %err, "skipping path");
                }
                Err(err) => return Err(err),
            }
        }
        session.finish(&mut *dst)
    }
}

/// Decode `values` into `dst` with default options.
///
/// ```
/// use formpath::Form;
///
/// #[derive(Form, Default)]
/// struct Child {
///     name: String,
/// }
///
/// #[derive(Form, Default)]
/// struct Family {
///     surname: String,
///     children: Vec<Child>,
/// }
///
/// let values = formpath::form_values! {
///     "surname" => "Simpson",
///     "children[0].name" => "Bart",
///     "children[2].name" => "Maggie",
/// };
/// let mut family = Family::default();
/// formpath::decode(&values, &mut family).unwrap();
/// assert_eq!(family.children.len(), 3);
/// assert_eq!(family.children[1].name, "");
/// assert_eq!(family.children[2].name, "Maggie");
/// ```
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn decode<T: FormValue>(values: &FormValues, dst: &mut T) -> Result<(), FormError> {
    Decoder::default().decode(values, dst)
}

/// Decode `values` into `dst` with `options` and no custom decoders.
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn decode_with<T: FormValue>(
    values: &FormValues,
    dst: &mut T,
    options: DecodeOptions,
) -> Result<(), FormError> {
    Decoder::new(options).decode(values, dst)
}
