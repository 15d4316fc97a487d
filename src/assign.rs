use std::any::Any;
use std::slice;

use tracing::trace;

use crate::cell::{indirect, Cell, TextDecode};
use crate::error::{out_of_bounds, unknown_type, ErrorCode, FormError};
use crate::options::DecodeOptions;
use crate::registry::{CustomTypes, FieldAddr};

/// Configuration shared by every assignment of one decode call.
#[derive(Clone, Copy)]
pub(crate) struct Env<'d> {
    pub(crate) options: &'d DecodeOptions,
    pub(crate) custom: &'d CustomTypes,
}

impl Env<'_> {
    /// Assign `raw` to the terminal `cell`.
    ///
    /// Custom decoders, then [`TextDecode`], then the cell kind decide how; with
    /// `prefer_text_decode` the first two swap. `per_value` is set for paths ending in `[]`.
    pub(crate) fn assign(self, cell: Cell<'_>, raw: &[String], per_value: bool) -> Result<(), FormError> {
        let mut cell = indirect(cell);
        let Some(first) = raw.first() else {
            return Ok(());
        };
        let text_enabled = !self.options.disable_text_decode;

        if text_enabled && self.options.prefer_text_decode {
            if let Cell::Text(target) = cell {
                return decode_text(target, raw, per_value);
            }
        }
        if self.custom_decode(&mut cell, raw)? {
            return Ok(());
        }
        if text_enabled {
            if let Cell::Text(target) = cell {
                return decode_text(target, raw, per_value);
            }
        }

        match cell {
            Cell::Sequence(seq) => {
                if raw.len() > seq.len() {
                    self.options.check_len(raw.len())?;
                    trace!(from = seq.len(), to = raw.len(), "growing sequence");
                    seq.grow(raw.len());
                }
                for (index, value) in raw.iter().enumerate() {
                    let element = seq.element_mut(index).ok_or_else(out_of_bounds)?;
                    self.assign(element.cell(), slice::from_ref(value), false)?;
                }
                Ok(())
            }
            Cell::Array(array) => {
                if raw.len() > array.len() {
                    return Err(out_of_bounds());
                }
                for (index, value) in raw.iter().enumerate() {
                    let element = array.element_mut(index).ok_or_else(out_of_bounds)?;
                    self.assign(element.cell(), slice::from_ref(value), false)?;
                }
                Ok(())
            }
            Cell::Scalar(scalar) => scalar.assign(first),
            Cell::Dynamic(dynamic) => {
                if first.is_empty() {
                    dynamic.clear();
                } else {
                    dynamic.set(first.clone());
                }
                Ok(())
            }
            Cell::Pointer(pointer) => self.assign(pointer.pointee().cell(), raw, per_value),
            Cell::Mapping(_) => Err(unknown_type("mapping requires a key")),
            Cell::Record(_) => Err(unknown_type(
                "record has no text decoding and no registered custom decoder",
            )),
            Cell::Text(_) => Err(unknown_type("text decoding is disabled")),
        }
    }

    /// Run the registered custom decoder for `cell`, if any.
    fn custom_decode(self, cell: &mut Cell<'_>, raw: &[String]) -> Result<bool, FormError> {
        if self.custom.is_empty() {
            return Ok(false);
        }
        let ty = Any::type_id(cell.any_ref());
        let addr = FieldAddr::from_raw(cell.addr());
        let Some(decode) = self
            .custom
            .lookup(ty, addr, self.options.custom_precedence)
        else {
            return Ok(false);
        };
        decode(raw, cell.any_mut()).map_err(|err| FormError::with_source(ErrorCode::Conversion, err))?;
        Ok(true)
    }
}

fn decode_text(target: &mut dyn TextDecode, raw: &[String], per_value: bool) -> Result<(), FormError> {
    let values = if per_value { raw } else { &raw[..1] };
    for value in values {
        target
            .decode_text(value)
            .map_err(|err| FormError::with_source(ErrorCode::Conversion, err))?;
    }
    Ok(())
}
