use std::any::Any;
use std::num::IntErrorKind;

use crate::error::{ErrorCode, FormError};

/// Layout of date values, e.g. `2006-01-02`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

macro_rules! scalars {
    ($( $variant:ident($ty:ty) => $kind:literal ),* $(,)?) => {
        /// A built-in scalar destination.
        pub enum Scalar<'a> {
            $(
                #[doc = concat!("A `", stringify!($ty), "`.")]
                $variant(&'a mut $ty),
            )*
            /// A calendar date, parsed with [`DATE_FORMAT`].
            #[cfg(feature = "chrono")]
            Date(&'a mut chrono::NaiveDate),
            /// An absolute URL.
            #[cfg(feature = "url")]
            Url(&'a mut url::Url),
        }

        impl Scalar<'_> {
            /// Human-readable kind name.
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => $kind, )*
                    #[cfg(feature = "chrono")]
                    Self::Date(_) => "date",
                    #[cfg(feature = "url")]
                    Self::Url(_) => "url",
                }
            }

            pub(crate) fn any_ref(&self) -> &dyn Any {
                match self {
                    $( Self::$variant(v) => &**v, )*
                    #[cfg(feature = "chrono")]
                    Self::Date(v) => &**v,
                    #[cfg(feature = "url")]
                    Self::Url(v) => &**v,
                }
            }

            pub(crate) fn any_mut(&mut self) -> &mut dyn Any {
                match self {
                    $( Self::$variant(v) => &mut **v, )*
                    #[cfg(feature = "chrono")]
                    Self::Date(v) => &mut **v,
                    #[cfg(feature = "url")]
                    Self::Url(v) => &mut **v,
                }
            }

            /// Reset to the zero value.
            pub(crate) fn reset(self) {
                match self {
                    $( Self::$variant(v) => *v = <$ty as crate::Zero>::zero(), )*
                    #[cfg(feature = "chrono")]
                    Self::Date(v) => *v = <chrono::NaiveDate as crate::Zero>::zero(),
                    #[cfg(feature = "url")]
                    Self::Url(v) => *v = <url::Url as crate::Zero>::zero(),
                }
            }
        }

        $(
            impl crate::FormValue for $ty {
                fn cell(&mut self) -> crate::Cell<'_> {
                    crate::Cell::Scalar(Scalar::$variant(self))
                }
            }
        )*
    };
}

scalars! {
    Str(String) => "string",
    Bool(bool) => "bool",
    I8(i8) => "i8",
    I16(i16) => "i16",
    I32(i32) => "i32",
    I64(i64) => "i64",
    I128(i128) => "i128",
    Isize(isize) => "isize",
    U8(u8) => "u8",
    U16(u16) => "u16",
    U32(u32) => "u32",
    U64(u64) => "u64",
    U128(u128) => "u128",
    Usize(usize) => "usize",
    F32(f32) => "f32",
    F64(f64) => "f64",
}

impl Scalar<'_> {
    /// Parse `raw` into the scalar; an empty `raw` resets it to zero.
    pub(crate) fn assign(self, raw: &str) -> Result<(), FormError> {
        if raw.is_empty() {
            self.reset();
            return Ok(());
        }
        match self {
            Self::Str(v) => raw.clone_into(v),
            Self::Bool(v) => *v = parse_bool(raw),
            Self::I8(v) => *v = parse_int(raw)?,
            Self::I16(v) => *v = parse_int(raw)?,
            Self::I32(v) => *v = parse_int(raw)?,
            Self::I64(v) => *v = parse_int(raw)?,
            Self::I128(v) => *v = parse_int(raw)?,
            Self::Isize(v) => *v = parse_int(raw)?,
            Self::U8(v) => *v = parse_int(raw)?,
            Self::U16(v) => *v = parse_int(raw)?,
            Self::U32(v) => *v = parse_int(raw)?,
            Self::U64(v) => *v = parse_int(raw)?,
            Self::U128(v) => *v = parse_int(raw)?,
            Self::Usize(v) => *v = parse_int(raw)?,
            Self::F32(v) => *v = parse_float(raw)?,
            Self::F64(v) => *v = parse_float(raw)?,
            #[cfg(feature = "chrono")]
            Self::Date(v) => {
                *v = chrono::NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|err| conversion(raw, "date", &err))?;
            }
            #[cfg(feature = "url")]
            Self::Url(v) => *v = url::Url::parse(raw).map_err(|err| conversion(raw, "url", &err))?,
        }
        Ok(())
    }
}

/// `true`, `on`, `1` and `checked` are true; anything else is false.
#[must_use]
pub fn parse_bool(raw: &str) -> bool {
    matches!(raw, "true" | "on" | "1" | "checked")
}

fn parse_int<T>(raw: &str) -> Result<T, FormError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    raw.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => FormError::new(
            ErrorCode::Range,
            format!("`{raw}` is out of range for {}", std::any::type_name::<T>()),
        ),
        _ => conversion(raw, std::any::type_name::<T>(), &err),
    })
}

fn parse_float<T>(raw: &str) -> Result<T, FormError>
where
    T: std::str::FromStr<Err = std::num::ParseFloatError>,
{
    raw.parse::<T>()
        .map_err(|err| conversion(raw, std::any::type_name::<T>(), &err))
}

#[cold]
fn conversion(raw: &str, target: &str, err: &dyn std::fmt::Display) -> FormError {
    FormError::new(
        ErrorCode::Conversion,
        format!("cannot decode `{raw}` as {target}: {err}"),
    )
}
