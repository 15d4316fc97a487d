use std::fmt;

use crate::cell::{AsAny, Cell, FormValue, Zero};

/// An open value whose concrete type is fixed at decode time.
///
/// An empty `Dynamic` reached as a terminal stores the first raw value as a `String`.
/// A `Dynamic` that already holds a value is transparent: paths continue into, and values
/// are assigned to, the held value.
///
/// ```
/// use formpath::{Dynamic, Form};
///
/// #[derive(Form, Default)]
/// struct Inner {
///     name: String,
/// }
///
/// #[derive(Form, Default)]
/// struct Outer {
///     open: Dynamic,
///     preset: Dynamic,
/// }
///
/// let mut out = Outer { preset: Dynamic::new(Inner::default()), ..Outer::default() };
/// let values = formpath::form_values! { "open" => "text", "preset.name" => "x" };
/// formpath::decode(&values, &mut out).unwrap();
/// assert_eq!(out.open.downcast_ref::<String>().map(String::as_str), Some("text"));
/// assert_eq!(out.preset.downcast_ref::<Inner>().map(|i| i.name.as_str()), Some("x"));
/// ```
#[derive(Default)]
pub struct Dynamic(Option<Box<dyn FormValue>>);

impl Dynamic {
    /// A `Dynamic` holding `value`.
    #[must_use]
    pub fn new<T: FormValue>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// An empty `Dynamic`.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Whether no value is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Replace the held value.
    pub fn set<T: FormValue>(&mut self, value: T) {
        self.0 = Some(Box::new(value));
    }

    /// Drop the held value.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Borrow the held value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: FormValue>(&self) -> Option<&T> {
        self.0.as_deref()?.as_any().downcast_ref()
    }

    /// Mutably borrow the held value if it is a `T`.
    pub fn downcast_mut<T: FormValue>(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut()?.as_any_mut().downcast_mut()
    }

    /// Take the held value if it is a `T`; otherwise leave it in place.
    pub fn take<T: FormValue>(&mut self) -> Option<T> {
        if self.downcast_ref::<T>().is_none() {
            return None;
        }
        let held = self.0.take()?;
        AsAny::into_any(held).downcast().ok().map(|b| *b)
    }
}

impl FormValue for Dynamic {
    fn cell(&mut self) -> Cell<'_> {
        match self.0 {
            Some(ref mut held) => (**held).cell(),
            None => Cell::Dynamic(self),
        }
    }
}

impl Zero for Dynamic {
    fn zero() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_deref() {
            None => f.write_str("Dynamic(<empty>)"),
            Some(held) => match held.as_any().downcast_ref::<String>() {
                Some(text) => f.debug_tuple("Dynamic").field(text).finish(),
                None => f.write_str("Dynamic(..)"),
            },
        }
    }
}
