use tracing::{debug, trace};

use crate::assign::Env;
use crate::cell::{indirect, Cell, FormValue, Mapping, Record};
use crate::deferred::{Deferred, Location, RouteStep};
use crate::error::{bad_index, out_of_bounds, unknown_field, unknown_type, ErrorCode, FormError};
use crate::path::{Brackets, PathTokens, Segment};
use crate::resolve::{resolve, Resolution};

/// Per-path context carried through traversal.
struct Walk<'p> {
    path: &'p str,
    raw: &'p [String],
    per_value: bool,
    field: &'p str,
}

/// Where a single traversal step leaves the cursor.
enum Step<'c> {
    Into(Cell<'c>),
    /// The rest of the path was handled (or skipped) already.
    Done,
}

/// State of one decode call: shared configuration plus pending mapping entries.
pub(crate) struct Session<'d> {
    env: Env<'d>,
    pending: Deferred,
}

impl<'d> Session<'d> {
    pub(crate) fn new(env: Env<'d>) -> Self {
        Self {
            env,
            pending: Deferred::default(),
        }
    }

    /// Walk `path` from `root` and assign `raw` at its end.
    pub(crate) fn decode_path(
        &mut self,
        root: &mut dyn FormValue,
        path: &str,
        raw: &[String],
    ) -> Result<(), FormError> {
        let mut tokens = PathTokens::new(path);
        let mut walk = Walk {
            path,
            raw,
            per_value: tokens.per_value(),
            field: "",
        };
        self.walk(root.cell(), &mut tokens, Location::root(), &mut walk)
            .map_err(|err| err.locate(walk.field, path))
    }

    /// Insert every pending mapping entry into `root`.
    pub(crate) fn finish(self, root: &mut dyn FormValue) -> Result<(), FormError> {
        let env = self.env;
        self.pending
            .materialize(root, |cell, raw| env.assign(cell, raw, false))
    }

    fn walk<'p>(
        &mut self,
        cell: Cell<'_>,
        tokens: &mut PathTokens<'p>,
        mut at: Location,
        walk: &mut Walk<'p>,
    ) -> Result<(), FormError> {
        let mut cell = indirect(cell);
        loop {
            let brackets = if matches!(cell, Cell::Mapping(_)) {
                Brackets::Balanced
            } else {
                Brackets::FirstClose
            };
            let Some(segment) = tokens.next_segment(brackets)? else {
                return self.env.assign(cell, walk.raw, walk.per_value);
            };

            let step = match segment {
                Segment::Index("") => Step::Into(cell),
                Segment::Field(name) => {
                    walk.field = name;
                    match cell {
                        Cell::Record(record) => self.enter_field(record, name, &mut at)?,
                        Cell::Mapping(mapping) => self.enter_key(mapping, name, tokens, &mut at, walk)?,
                        other => {
                            return Err(FormError::new(
                                ErrorCode::UnknownField,
                                format!("cannot select field `{name}` on a {}", other.kind()),
                            ))
                        }
                    }
                }
                Segment::Index(text) => match cell {
                    Cell::Array(array) => {
                        let index = parse_index(text)?;
                        let element = array.element_mut(index).ok_or_else(out_of_bounds)?;
                        at.push(RouteStep::Index(index));
                        Step::Into(element.cell())
                    }
                    Cell::Sequence(seq) => {
                        let index = parse_index(text)?;
                        let len = index.checked_add(1).ok_or_else(|| bad_index(text))?;
                        if len > seq.len() {
                            self.env.options.check_len(len)?;
                            trace!(from = seq.len(), to = len, "growing sequence");
                            seq.grow(len);
                        }
                        let element = seq.element_mut(index).ok_or_else(out_of_bounds)?;
                        at.push(RouteStep::Index(index));
                        Step::Into(element.cell())
                    }
                    Cell::Mapping(mapping) => self.enter_key(mapping, text, tokens, &mut at, walk)?,
                    Cell::Record(_) => return Err(unexpected_index("record").skippable()),
                    other => return Err(unexpected_index(other.kind())),
                },
            };

            cell = match step {
                Step::Into(next) => indirect(next),
                Step::Done => return Ok(()),
            };
        }
    }

    /// Resolve `name` on `record` and step into the field, through embedded records.
    fn enter_field<'c>(
        &self,
        record: &'c mut dyn Record,
        name: &str,
        at: &mut Location,
    ) -> Result<Step<'c>, FormError> {
        let route = match resolve(record.fields(), name, &self.env.options.tag_name) {
            Resolution::Found(route) => route,
            Resolution::Skip => {
                debug!(field = name, "field is ignored");
                return Ok(Step::Done);
            }
            Resolution::Missing => return Err(unknown_field(name)),
        };

        let mut current = record;
        let (&last, embedded) = route.split_last().ok_or_else(|| unknown_field(name))?;
        for &index in embedded {
            at.push(RouteStep::Field(index));
            let field = current.field_mut(index).ok_or_else(|| unknown_field(name))?;
            current = match indirect(field.cell()) {
                Cell::Record(inner) => inner,
                other => return Err(unknown_type(other.kind())),
            };
        }
        at.push(RouteStep::Field(last));
        let field = current.field_mut(last).ok_or_else(|| unknown_field(name))?;
        Ok(Step::Into(field.cell()))
    }

    /// Step into the entry `key` of `mapping`.
    ///
    /// `String` keys are inserted right away. Other keys get a pending entry, and the rest of
    /// the path is walked inside its value here.
    fn enter_key<'c, 'p>(
        &mut self,
        mapping: &'c mut dyn Mapping,
        key: &str,
        tokens: &mut PathTokens<'p>,
        at: &mut Location,
        walk: &mut Walk<'p>,
    ) -> Result<Step<'c>, FormError> {
        let mapping = match mapping.text_entry(key) {
            Ok(value) => {
                at.push(RouteStep::Key(key.to_owned()));
                return Ok(Step::Into(value.cell()));
            }
            Err(mapping) => mapping,
        };

        let id = self.pending.enter(at, key, mapping, walk.field, walk.path);
        let (mut value, inside) = self.pending.checkout(id);
        let result = self.walk((*value).cell(), tokens, inside, walk);
        self.pending.restore(id, value);
        result.map(|()| Step::Done)
    }
}

fn parse_index(text: &str) -> Result<usize, FormError> {
    text.parse::<usize>().map_err(|_| bad_index(text))
}

#[cold]
fn unexpected_index(kind: &str) -> FormError {
    FormError::new(
        ErrorCode::ArrayIndex,
        format!("has an array index but it is a {kind}"),
    )
}
