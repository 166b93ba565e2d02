//! Fold providers
//!
//!     [NoFolding] is the minimal provider: no row ever folds. [ContextFolding] derives
//!     fold ranges from the context stack snapshots the buffer already keeps. A row whose
//!     exit context is deeper than its entry context opened a nested state (a bracket
//!     block, macro or struct body); the fold runs to the first later row whose exit
//!     context is back at or below that entry depth. An unterminated push folds to the
//!     last row, matching how those lines are highlighted.

use crate::lc3::buffer::TokenizedBuffer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    pub start_row: usize,
    pub end_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldWidget {
    #[default]
    None,
    Start,
    End,
}

pub trait FoldProvider {
    fn fold_range(&self, buffer: &TokenizedBuffer, row: usize) -> Option<FoldRange>;
    fn fold_widget(&self, buffer: &TokenizedBuffer, row: usize) -> FoldWidget;

    /// Every fold range in the buffer, in row order.
    fn fold_ranges(&self, buffer: &TokenizedBuffer) -> Vec<FoldRange> {
        (0..buffer.len())
            .filter_map(|row| self.fold_range(buffer, row))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoFolding;

impl FoldProvider for NoFolding {
    fn fold_range(&self, _buffer: &TokenizedBuffer, _row: usize) -> Option<FoldRange> {
        None
    }

    fn fold_widget(&self, _buffer: &TokenizedBuffer, _row: usize) -> FoldWidget {
        FoldWidget::None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFolding;

impl FoldProvider for ContextFolding {
    fn fold_range(&self, buffer: &TokenizedBuffer, row: usize) -> Option<FoldRange> {
        let opened = buffer.entry(row)?;
        let base = opened.entry.depth();
        if opened.exit.depth() <= base {
            return None;
        }
        let entries = buffer.entries();
        let end_row = entries[row + 1..]
            .iter()
            .position(|e| e.exit.depth() <= base)
            .map_or(entries.len() - 1, |offset| row + 1 + offset);
        (end_row > row).then_some(FoldRange {
            start_row: row,
            end_row,
        })
    }

    fn fold_widget(&self, buffer: &TokenizedBuffer, row: usize) -> FoldWidget {
        let Some(line) = buffer.entry(row) else {
            return FoldWidget::None;
        };
        if self.fold_range(buffer, row).is_some() {
            FoldWidget::Start
        } else if line.exit.depth() < line.entry.depth() {
            FoldWidget::End
        } else {
            FoldWidget::None
        }
    }
}

/// Which fold provider a language uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldStrategy {
    #[default]
    None,
    Context,
}

impl FoldStrategy {
    pub fn provider(self) -> &'static dyn FoldProvider {
        match self {
            FoldStrategy::None => &NoFolding,
            FoldStrategy::Context => &ContextFolding,
        }
    }
}
