//! `FormValue` and `Zero` for std containers and the optional chrono/url scalars.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::cell::{
    AsAny, Cell, FieldInfo, FixedSequence, FormValue, Mapping, Pointer, RecordShape, Sequence,
    Zero,
};
use crate::scalar::Scalar;

macro_rules! zero_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Zero for $ty {
                #[inline]
                fn zero() -> Self {
                    <$ty>::default()
                }
            }
        )*
    };
}

zero_default!(
    String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T> Zero for Vec<T> {
    fn zero() -> Self {
        Self::new()
    }
}

impl<T: Zero, const N: usize> Zero for [T; N] {
    fn zero() -> Self {
        std::array::from_fn(|_| T::zero())
    }
}

impl<T> Zero for Option<T> {
    fn zero() -> Self {
        None
    }
}

impl<T: Zero> Zero for Box<T> {
    fn zero() -> Self {
        Self::new(T::zero())
    }
}

impl<K, V, S: Default> Zero for HashMap<K, V, S> {
    fn zero() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V> Zero for BTreeMap<K, V> {
    fn zero() -> Self {
        Self::new()
    }
}

impl<T: FormValue + Zero> FormValue for Vec<T> {
    fn cell(&mut self) -> Cell<'_> {
        Cell::Sequence(self)
    }
}

impl<T: FormValue + Zero> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn grow(&mut self, len: usize) {
        if len > Vec::len(self) {
            self.resize_with(len, T::zero);
        }
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn FormValue> {
        self.get_mut(index).map(|v| v as &mut dyn FormValue)
    }
}

impl<T: FormValue, const N: usize> FormValue for [T; N] {
    fn cell(&mut self) -> Cell<'_> {
        Cell::Array(self)
    }
}

impl<T: FormValue, const N: usize> FixedSequence for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn FormValue> {
        self.get_mut(index).map(|v| v as &mut dyn FormValue)
    }
}

impl<T: FormValue + Zero> FormValue for Option<T> {
    fn cell(&mut self) -> Cell<'_> {
        Cell::Pointer(self)
    }
}

impl<T: FormValue + Zero> Pointer for Option<T> {
    fn pointee(&mut self) -> &mut dyn FormValue {
        self.get_or_insert_with(T::zero)
    }
}

impl<T: FormValue> FormValue for Box<T> {
    fn cell(&mut self) -> Cell<'_> {
        Cell::Pointer(self)
    }
}

impl<T: FormValue> Pointer for Box<T> {
    fn pointee(&mut self) -> &mut dyn FormValue {
        &mut **self
    }
}

// Embedded records may sit behind a pointer; the pointee is allocated on first use.
impl<T: RecordShape> RecordShape for Option<T> {
    const FIELDS: &'static [FieldInfo] = T::FIELDS;
}

impl<T: RecordShape> RecordShape for Box<T> {
    const FIELDS: &'static [FieldInfo] = T::FIELDS;
}

/// Downcast a boxed value produced by `blank_key`/`blank_value` back to its concrete type.
fn unbox<T: Any>(value: Box<dyn FormValue>) -> Option<T> {
    AsAny::into_any(value).downcast::<T>().ok().map(|b| *b)
}

/// Build a `K` from `key` when `K` is `String`.
fn text_key<K: Any>(key: &str) -> Option<K> {
    let key: Box<dyn Any> = Box::new(key.to_owned());
    key.downcast::<K>().ok().map(|b| *b)
}

impl<K, V, S> FormValue for HashMap<K, V, S>
where
    K: FormValue + Zero + Eq + Hash,
    V: FormValue + Zero,
    S: BuildHasher + Default + 'static,
{
    fn cell(&mut self) -> Cell<'_> {
        Cell::Mapping(self)
    }
}

impl<K, V, S> Mapping for HashMap<K, V, S>
where
    K: FormValue + Zero + Eq + Hash,
    V: FormValue + Zero,
    S: BuildHasher + Default + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn text_entry(&mut self, key: &str) -> Result<&mut dyn FormValue, &mut dyn Mapping> {
        match text_key::<K>(key) {
            Some(key) => Ok(self.entry(key).or_insert_with(V::zero)),
            None => Err(self),
        }
    }

    fn blank_key(&self) -> Box<dyn FormValue> {
        Box::new(K::zero())
    }

    fn blank_value(&self) -> Box<dyn FormValue> {
        Box::new(V::zero())
    }

    fn insert_boxed(&mut self, key: Box<dyn FormValue>, value: Box<dyn FormValue>) -> bool {
        match (unbox::<K>(key), unbox::<V>(value)) {
            (Some(key), Some(value)) => {
                self.insert(key, value);
                true
            }
            _ => false,
        }
    }
}

impl<K, V> FormValue for BTreeMap<K, V>
where
    K: FormValue + Zero + Ord,
    V: FormValue + Zero,
{
    fn cell(&mut self) -> Cell<'_> {
        Cell::Mapping(self)
    }
}

impl<K, V> Mapping for BTreeMap<K, V>
where
    K: FormValue + Zero + Ord,
    V: FormValue + Zero,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn text_entry(&mut self, key: &str) -> Result<&mut dyn FormValue, &mut dyn Mapping> {
        match text_key::<K>(key) {
            Some(key) => Ok(self.entry(key).or_insert_with(V::zero)),
            None => Err(self),
        }
    }

    fn blank_key(&self) -> Box<dyn FormValue> {
        Box::new(K::zero())
    }

    fn blank_value(&self) -> Box<dyn FormValue> {
        Box::new(V::zero())
    }

    fn insert_boxed(&mut self, key: Box<dyn FormValue>, value: Box<dyn FormValue>) -> bool {
        match (unbox::<K>(key), unbox::<V>(value)) {
            (Some(key), Some(value)) => {
                self.insert(key, value);
                true
            }
            _ => false,
        }
    }
}

#[cfg(feature = "chrono")]
impl FormValue for chrono::NaiveDate {
    fn cell(&mut self) -> Cell<'_> {
        Cell::Scalar(Scalar::Date(self))
    }
}

/// The Unix epoch date.
#[cfg(feature = "chrono")]
impl Zero for chrono::NaiveDate {
    fn zero() -> Self {
        Self::default()
    }
}

#[cfg(feature = "url")]
impl FormValue for url::Url {
    fn cell(&mut self) -> Cell<'_> {
        Cell::Scalar(Scalar::Url(self))
    }
}

#[cfg(feature = "url")]
static ABOUT_BLANK: std::sync::OnceLock<url::Url> = std::sync::OnceLock::new();

/// `about:blank`, since `Url` has no empty value.
#[cfg(feature = "url")]
impl Zero for url::Url {
    // A fixed literal that always parses.
    #[allow(clippy::expect_used)]
    fn zero() -> Self {
        ABOUT_BLANK
            .get_or_init(|| Self::parse("about:blank").expect("`about:blank` is a valid absolute URL"))
            .clone()
    }
}
