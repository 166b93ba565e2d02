//! # lc3-syntax
//!
//! Syntax highlighting and folding support for LC-3 assembly source.
//!
//! File Layout
//!
//! The tokenizer is table driven. A dialect is nothing more than a rule table, so the
//! minimal LC-3 grammar and the extended NASM-like grammar live side by side as data and
//! share every other piece of machinery:
//!
//! src/lc3
//!   ├── rules        Rule table description (serializable) and its compiled form
//!   ├── matching     First-match-wins rule selection at a scan position
//!   ├── context      Context stack of active lexer states
//!   ├── lexing       Line tokenizer (text + entry context -> tokens + exit context)
//!   ├── buffer       Per-line cache and incremental re-tokenization
//!   ├── folding      Fold providers
//!   ├── theme        Token class -> display style
//!   ├── registry     Language descriptors and their registry
//!   └── dialects     The built-in rule tables
//!
//! For test helpers shared by unit and integration tests, see the [testing module](lc3::testing).

pub mod lc3;
