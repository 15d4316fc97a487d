use crate::error::{ErrorCode, FormError};

/// One unit of a form path.
///
/// `Tags[0].Name` yields `Field("Tags")`, `Index("0")`, `Field("Name")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'p> {
    /// A dot-delimited field name.
    Field(&'p str),
    /// The raw text between brackets; empty for the `name[]` marker.
    Index(&'p str),
}

/// How the closing bracket of an index/key segment is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Brackets {
    /// The first `]` closes the segment.
    #[default]
    FirstClose,
    /// Nested `[`/`]` pairs are balanced, so `Map[a[b]]` yields the key `a[b]`.
    ///
    /// Used when the cursor is a mapping, which is the only place a key may contain brackets.
    Balanced,
}

/// Pull-style tokenizer over a form path.
///
/// Segments are produced one at a time so the caller can choose the bracket rule for each
/// step from the cell it is currently positioned on. Iterating directly uses
/// [`Brackets::FirstClose`] throughout.
///
/// ```
/// use formpath::{PathTokens, Segment};
///
/// let segs: Vec<_> = PathTokens::new("A.B[0].C").collect::<Result<_, _>>().unwrap();
/// assert_eq!(
///     segs,
///     [Segment::Field("A"), Segment::Field("B"), Segment::Index("0"), Segment::Field("C")]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PathTokens<'p> {
    path: &'p str,
    pos: usize,
}

impl<'p> PathTokens<'p> {
    /// Tokenize `path`.
    #[must_use]
    pub const fn new(path: &'p str) -> Self {
        Self { path, pos: 0 }
    }

    /// The full path being tokenized.
    #[must_use]
    pub const fn path(&self) -> &'p str {
        self.path
    }

    /// Whether the path ends with the empty-index marker `[]`.
    #[must_use]
    pub fn per_value(&self) -> bool {
        self.path.ends_with("[]")
    }

    /// Produce the next segment, or `None` once the path is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::ArrayIndex`] when a `[` has no matching `]`. The tokenizer is
    /// exhausted afterwards.
    pub fn next_segment(&mut self, brackets: Brackets) -> Result<Option<Segment<'p>>, FormError> {
        let bytes = self.path.as_bytes();
        loop {
            let Some(&first) = bytes.get(self.pos) else {
                return Ok(None);
            };
            match first {
                b'.' => self.pos += 1,
                b'[' => return self.bracket(brackets).map(Some),
                _ => {
                    let start = self.pos;
                    let end = bytes[start..]
                        .iter()
                        .position(|&b| b == b'.' || b == b'[')
                        .map_or(bytes.len(), |off| start + off);
                    self.pos = if bytes.get(end) == Some(&b'.') {
                        end + 1
                    } else {
                        end
                    };
                    return Ok(Some(Segment::Field(&self.path[start..end])));
                }
            }
        }
    }

    fn bracket(&mut self, brackets: Brackets) -> Result<Segment<'p>, FormError> {
        let bytes = self.path.as_bytes();
        let open = self.pos + 1;
        let mut depth = 0usize;
        let mut at = open;
        loop {
            match bytes.get(at) {
                None => {
                    self.pos = bytes.len();
                    return Err(unclosed(&self.path[open..]));
                }
                Some(b'[') if brackets == Brackets::Balanced => depth += 1,
                Some(b']') if depth == 0 => break,
                Some(b']') => depth -= 1,
                Some(_) => {}
            }
            at += 1;
        }
        self.pos = at + 1;
        // `A[0].B` and `A[0]B` address the same cell.
        if bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
        }
        Ok(Segment::Index(&self.path[open..at]))
    }
}

impl<'p> Iterator for PathTokens<'p> {
    type Item = Result<Segment<'p>, FormError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_segment(Brackets::FirstClose).transpose()
    }
}

#[cold]
fn unclosed(rest: &str) -> FormError {
    FormError::new(
        ErrorCode::ArrayIndex,
        format!("unclosed bracket before `{rest}`"),
    )
    .skippable()
}
