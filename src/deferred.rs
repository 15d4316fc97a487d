//! Mapping keys that need type-directed decoding.
//!
//! Stepping into a mapping whose key type is not `String` creates a pending entry instead of
//! inserting. The entry's value is decoded into like any other cell; its key is decoded and
//! the pair inserted once every path has been walked.

use std::collections::HashMap;
use std::mem;
use std::slice;

use tracing::debug;

use crate::cell::{indirect, Cell, FormValue, Mapping};
use crate::dynamic::Dynamic;
use crate::error::{ErrorCode, FormError};

/// Where a route starts: the destination root or the value of a pending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Origin {
    Root,
    Pending(usize),
}

/// One resolved traversal step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum RouteStep {
    Field(usize),
    Index(usize),
    Key(String),
}

/// Identity of a cell as the steps leading to it.
///
/// Addresses are not stable across sequence growth, so mappings are identified by route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Location {
    pub(crate) origin: Origin,
    pub(crate) route: Vec<RouteStep>,
}

impl Location {
    pub(crate) const fn root() -> Self {
        Self {
            origin: Origin::Root,
            route: Vec::new(),
        }
    }

    const fn pending(id: usize) -> Self {
        Self {
            origin: Origin::Pending(id),
            route: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, step: RouteStep) {
        self.route.push(step);
    }
}

struct Pending {
    mapping: Location,
    raw_key: String,
    key: Box<dyn FormValue>,
    value: Box<dyn FormValue>,
    field: String,
    path: String,
}

/// Pending entries in creation order, plus a `(mapping, raw key)` index.
#[derive(Default)]
pub(crate) struct Deferred {
    entries: Vec<Pending>,
    lookup: HashMap<(Location, String), usize>,
}

impl Deferred {
    /// The pending entry for `raw_key` in `mapping`, created on first use.
    pub(crate) fn enter(
        &mut self,
        at: &Location,
        raw_key: &str,
        mapping: &dyn Mapping,
        field: &str,
        path: &str,
    ) -> usize {
        let lookup_key = (at.clone(), raw_key.to_owned());
        if let Some(&id) = self.lookup.get(&lookup_key) {
            return id;
        }
        let id = self.entries.len();
        self.entries.push(Pending {
            mapping: at.clone(),
            raw_key: raw_key.to_owned(),
            key: mapping.blank_key(),
            value: mapping.blank_value(),
            field: field.to_owned(),
            path: path.to_owned(),
        });
        self.lookup.insert(lookup_key, id);
        id
    }

    /// Take the value of entry `id` out for decoding; hand it back with [`Deferred::restore`].
    pub(crate) fn checkout(&mut self, id: usize) -> (Box<dyn FormValue>, Location) {
        let vacant: Box<dyn FormValue> = Box::new(Dynamic::empty());
        let value = mem::replace(&mut self.entries[id].value, vacant);
        (value, Location::pending(id))
    }

    pub(crate) fn restore(&mut self, id: usize, value: Box<dyn FormValue>) {
        self.entries[id].value = value;
    }

    /// Decode every pending key, then insert every entry.
    ///
    /// Keys are decoded in creation order so the first failure is deterministic. Entries
    /// are inserted in reverse, so entries nested in a pending value land in that value
    /// before it is moved into its own mapping.
    pub(crate) fn materialize<F>(mut self, root: &mut dyn FormValue, mut decode_key: F) -> Result<(), FormError>
    where
        F: FnMut(Cell<'_>, &[String]) -> Result<(), FormError>,
    {
        if self.entries.is_empty() {
            return Ok(());
        }
        debug!(pending = self.entries.len(), "materializing deferred mapping keys");

        for entry in &mut self.entries {
            decode_key((*entry.key).cell(), slice::from_ref(&entry.raw_key))
                .map_err(|err| err.locate(&entry.field, &entry.path))?;
        }

        while let Some(entry) = self.entries.pop() {
            let origin = match entry.mapping.origin {
                Origin::Root => root.cell(),
                Origin::Pending(parent) => match self.entries.get_mut(parent) {
                    Some(parent) => (*parent.value).cell(),
                    None => return Err(unreachable_mapping(&entry)),
                },
            };
            let Some(mapping) = follow(origin, &entry.mapping.route) else {
                return Err(unreachable_mapping(&entry));
            };
            if !mapping.insert_boxed(entry.key, entry.value) {
                return Err(FormError::new(
                    ErrorCode::UnknownType,
                    "mapping changed type during decoding",
                )
                .locate(&entry.field, &entry.path));
            }
        }
        Ok(())
    }
}

/// Re-walk `route` from `cell` to the mapping it names.
fn follow<'c>(cell: Cell<'c>, route: &[RouteStep]) -> Option<&'c mut dyn Mapping> {
    let mut cell = indirect(cell);
    for step in route {
        let next = match (step, cell) {
            (RouteStep::Field(index), Cell::Record(record)) => record.field_mut(*index)?,
            (RouteStep::Index(index), Cell::Sequence(seq)) => seq.element_mut(*index)?,
            (RouteStep::Index(index), Cell::Array(array)) => array.element_mut(*index)?,
            (RouteStep::Key(key), Cell::Mapping(mapping)) => mapping.text_entry(key).ok()?,
            _ => return None,
        };
        cell = indirect(next.cell());
    }
    match cell {
        Cell::Mapping(mapping) => Some(mapping),
        _ => None,
    }
}

#[cold]
fn unreachable_mapping(entry: &Pending) -> FormError {
    FormError::new(
        ErrorCode::UnknownType,
        "mapping is no longer reachable from its path",
    )
    .locate(&entry.field, &entry.path)
}
