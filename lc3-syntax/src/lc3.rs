//! LC-3 assembly tokenization
//!
//!     The editor hands us one line at a time together with the context stack that was
//!     active at the end of the previous line. The line tokenizer scans left to right,
//!     asking the matching engine for the first rule (in declaration order) of the state
//!     on top of the stack that matches at the current offset. Rules may push or pop
//!     states, which is how bracket blocks, macro bodies and struct bodies get their own
//!     highlighting.
//!
//!     Tokenization is total: characters no rule claims fall back to the state's default
//!     class (`text` unless the state says otherwise), and unterminated nesting simply
//!     leaves later lines in the nested state.
//!
//!     The buffer driver caches one [LineEntry](buffer::LineEntry) per line and, after an
//!     edit, re-tokenizes forward only until a line's exit context stops changing.

pub mod buffer;
pub mod context;
pub mod dialects;
pub mod folding;
pub mod lexing;
pub mod matching;
pub mod registry;
pub mod rules;
pub mod testing;
pub mod theme;
pub mod token;

pub use buffer::{BufferError, LineEntry, TokenizedBuffer};
pub use context::{ContextStack, StateId};
pub use dialects::{CasePolicy, Dialect, DialectOptions};
pub use folding::{ContextFolding, FoldProvider, FoldRange, FoldStrategy, FoldWidget, NoFolding};
pub use lexing::{tokenize_line, LineTokens};
pub use registry::{LanguageDescriptor, LanguageRegistry};
pub use rules::{RuleTable, RuleTableError, RuleTableSpec};
pub use theme::{Color, Style, Theme, ThemeError};
pub use token::{classes, Token, TokenClass};
