use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::options::CustomPrecedence;

pub(crate) type DecodeFn = Arc<dyn Fn(&[String], &mut dyn Any) -> Result<(), BoxError> + Send + Sync>;

/// Address of one field of a destination instance, for field-specific custom decoders.
///
/// Take it from the same instance that is later passed to `decode`:
///
/// ```
/// use formpath::{Decoder, DecodeOptions, FieldAddr, Form};
///
/// #[derive(Form, Default)]
/// struct Event {
///     start: u32,
///     end: u32,
/// }
///
/// let mut event = Event::default();
/// let mut decoder = Decoder::new(DecodeOptions::default());
/// decoder.register_for::<u32, _>(
///     |raw| Ok(raw[0].trim_end_matches('h').parse::<u32>()? * 60),
///     &[FieldAddr::of(&event.start)],
/// );
/// let values = formpath::form_values! { "start" => "2h", "end" => "30" };
/// decoder.decode(&values, &mut event).unwrap();
/// assert_eq!((event.start, event.end), (120, 30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAddr(usize);

impl FieldAddr {
    /// The address of `field`.
    #[must_use]
    pub fn of<T: ?Sized>(field: &T) -> Self {
        Self((field as *const T).cast::<()>() as usize)
    }

    pub(crate) const fn from_raw(addr: usize) -> Self {
        Self(addr)
    }
}

#[derive(Default, Clone)]
struct CustomType {
    default: Option<DecodeFn>,
    fields: Vec<(FieldAddr, DecodeFn)>,
}

/// Custom decoders keyed by destination type.
#[derive(Default, Clone)]
pub(crate) struct CustomTypes {
    types: HashMap<TypeId, CustomType>,
}

impl CustomTypes {
    pub(crate) fn register<T, F>(&mut self, decode: F, fields: &[FieldAddr])
    where
        T: Any,
        F: Fn(&[String]) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let decode: DecodeFn = Arc::new(move |raw: &[String], dst: &mut dyn Any| {
            let value = decode(raw)?;
            match dst.downcast_mut::<T>() {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(format!(
                    "custom decoder for {} applied to another type",
                    std::any::type_name::<T>()
                )
                .into()),
            }
        });
        let entry = self.types.entry(TypeId::of::<T>()).or_default();
        if fields.is_empty() {
            entry.default = Some(decode);
            return;
        }
        for &addr in fields {
            entry.fields.retain(|(existing, _)| *existing != addr);
            entry.fields.push((addr, Arc::clone(&decode)));
        }
    }

    pub(crate) fn lookup(
        &self,
        ty: TypeId,
        addr: FieldAddr,
        precedence: CustomPrecedence,
    ) -> Option<&DecodeFn> {
        let custom = self.types.get(&ty)?;
        let by_field = || {
            custom
                .fields
                .iter()
                .find(|(field, _)| *field == addr)
                .map(|(_, decode)| decode)
        };
        match precedence {
            CustomPrecedence::FieldFirst => by_field().or(custom.default.as_ref()),
            CustomPrecedence::TypeFirst => custom.default.as_ref().or_else(by_field),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for CustomTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTypes")
            .field("types", &self.types.len())
            .finish()
    }
}
