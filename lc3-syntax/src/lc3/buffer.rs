//! Incremental re-tokenization
//!
//!     A [TokenizedBuffer] owns the text of a document together with one [LineEntry] per
//!     line. Line `n` is always tokenized with the exit context of line `n - 1` (or
//!     `start` for the first line).
//!
//! Propagation
//!
//!     After an edit only the touched lines are re-tokenized unconditionally. From there
//!     the driver keeps walking forward while the freshly computed exit context differs
//!     from the one cached before the edit. Once a line's exit context comes out
//!     unchanged, every later line would see the same entry context as before, so their
//!     cached entries are still exact and the walk stops. The result is always identical
//!     to tokenizing the whole buffer again from line 0.
//!
//!     Every mutating call returns the rows it re-tokenized so a renderer can repaint just
//!     those.

use crate::lc3::context::ContextStack;
use crate::lc3::lexing::{tokenize_line, LineTokens};
use crate::lc3::rules::RuleTable;
use crate::lc3::token::Token;
use log::trace;
use std::ops::Range;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEntry {
    pub entry: ContextStack,
    pub tokens: Vec<Token>,
    pub exit: ContextStack,
}

impl LineEntry {
    fn placeholder() -> Self {
        LineEntry {
            entry: ContextStack::start(),
            tokens: Vec::new(),
            exit: ContextStack::start(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("row {row} is out of range for a buffer of {len} lines")]
    RowOutOfRange { row: usize, len: usize },
    #[error("rows {start}..{end} are out of range for a buffer of {len} lines")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct TokenizedBuffer {
    table: Arc<RuleTable>,
    lines: Vec<String>,
    entries: Vec<LineEntry>,
}

impl TokenizedBuffer {
    pub fn new(table: Arc<RuleTable>) -> Self {
        TokenizedBuffer {
            table,
            lines: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn from_lines<I, S>(table: Arc<RuleTable>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buffer = Self::new(table);
        buffer.load(lines);
        buffer
    }

    /// Splits `source` on line breaks (`\n` or `\r\n`) and loads it.
    pub fn from_source(table: Arc<RuleTable>, source: &str) -> Self {
        Self::from_lines(table, source.lines())
    }

    /// Replaces the whole buffer and tokenizes every line from `start`.
    pub fn load<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self.retokenize_all();
    }

    pub fn retokenize_all(&mut self) {
        let mut entry = ContextStack::start();
        self.entries = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let LineTokens { tokens, exit } = tokenize_line(&self.table, line, &entry);
            self.entries.push(LineEntry {
                entry,
                tokens,
                exit: exit.clone(),
            });
            entry = exit;
        }
    }

    /// Replaces the text of `row` and re-tokenizes as far as the change reaches.
    pub fn edit_line(
        &mut self,
        row: usize,
        text: impl Into<String>,
    ) -> Result<Range<usize>, BufferError> {
        if row >= self.lines.len() {
            return Err(BufferError::RowOutOfRange {
                row,
                len: self.lines.len(),
            });
        }
        self.lines[row] = text.into();
        Ok(self.propagate(row, row + 1))
    }

    /// Inserts `lines` before `row` (`row == len` appends).
    pub fn insert_lines<I, S>(&mut self, row: usize, lines: I) -> Result<Range<usize>, BufferError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if row > self.lines.len() {
            return Err(BufferError::RowOutOfRange {
                row,
                len: self.lines.len(),
            });
        }
        let inserted: Vec<String> = lines.into_iter().map(Into::into).collect();
        let count = inserted.len();
        if count == 0 {
            return Ok(row..row);
        }
        self.lines.splice(row..row, inserted);
        self.entries
            .splice(row..row, std::iter::repeat_with(LineEntry::placeholder).take(count));
        Ok(self.propagate(row, row + count))
    }

    /// Removes `rows`. The line that moves up into `rows.start` is re-tokenized since its
    /// entry context may have changed.
    pub fn remove_lines(&mut self, rows: Range<usize>) -> Result<Range<usize>, BufferError> {
        if rows.start > rows.end || rows.end > self.lines.len() {
            return Err(BufferError::RangeOutOfBounds {
                start: rows.start,
                end: rows.end,
                len: self.lines.len(),
            });
        }
        let start = rows.start;
        self.lines.drain(rows.clone());
        self.entries.drain(rows);
        if start == self.lines.len() {
            return Ok(start..start);
        }
        Ok(self.propagate(start, start + 1))
    }

    /// Re-tokenizes `from..forced` unconditionally, then keeps going until the next line's
    /// cached entry context equals the exit context just computed. Returns the rows touched.
    ///
    /// The stop test looks at the next line's entry rather than this line's old exit:
    /// rows spliced in by `insert_lines` hold placeholder contexts, so an old exit can
    /// compare equal while the line after it was tokenized from something else.
    fn propagate(&mut self, from: usize, forced: usize) -> Range<usize> {
        let mut row = from;
        while row < self.lines.len() {
            let entry = if row == 0 {
                ContextStack::start()
            } else {
                self.entries[row - 1].exit.clone()
            };
            let LineTokens { tokens, exit } = tokenize_line(&self.table, &self.lines[row], &entry);
            let settled = row + 1 >= forced
                && self
                    .entries
                    .get(row + 1)
                    .map_or(true, |next| next.entry == exit);
            self.entries[row] = LineEntry {
                entry,
                tokens,
                exit,
            };
            row += 1;
            if settled {
                trace!("row {} already starts from this context, stopping", row);
                break;
            }
        }
        trace!("re-tokenized rows {}..{}", from, row);
        from..row
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn entry(&self, row: usize) -> Option<&LineEntry> {
        self.entries.get(row)
    }

    pub fn entries(&self) -> &[LineEntry] {
        &self.entries
    }

    pub fn tokens(&self, row: usize) -> Option<&[Token]> {
        self.entries.get(row).map(|e| e.tokens.as_slice())
    }
}
