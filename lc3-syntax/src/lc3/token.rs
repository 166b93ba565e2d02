//! Token types
//!
//!     A token is a classified span of a single line. Offsets are byte offsets into the
//!     line text and always fall on char boundaries; the tokens of a line partition it
//!     exactly, with no gaps and no overlaps.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Well-known token classes used by the built-in dialects.
///
/// Classes are dotted scope names so themes can style them by prefix.
pub mod classes {
    pub const KEYWORD: &str = "keyword.control.assembly";
    pub const REGISTER: &str = "variable.parameter.register.assembly";
    pub const MACRO_PARAMETER: &str = "variable.parameter.macro.assembly";
    pub const DECIMAL: &str = "constant.character.decimal.assembly";
    pub const HEXADECIMAL: &str = "constant.character.hexadecimal.assembly";
    pub const CONSTANT: &str = "constant.character.assembly";
    pub const STRING: &str = "string.assembly";
    pub const DIRECTIVE: &str = "support.function.directive.assembly";
    pub const LABEL: &str = "entity.name.function.assembly";
    pub const IDENTIFIER: &str = "identifier";
    pub const COMMENT: &str = "comment.assembly";
    pub const TEXT: &str = "text";
}

/// A semantic category assigned to a lexical span.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenClass(Arc<str>);

impl TokenClass {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        TokenClass(name.into())
    }

    /// The fallback class for characters no rule claims.
    pub fn text() -> Self {
        TokenClass::new(classes::TEXT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_text(&self) -> bool {
        &*self.0 == classes::TEXT
    }

    /// The class name followed by each shorter dotted prefix.
    ///
    /// `keyword.control.assembly` yields `keyword.control.assembly`, `keyword.control`,
    /// `keyword`.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        let name: &str = &self.0;
        std::iter::successors(Some(name), |current| {
            current.rfind('.').map(|dot| &current[..dot])
        })
    }
}

impl fmt::Debug for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenClass {
    fn from(name: &str) -> Self {
        TokenClass::new(name)
    }
}

impl From<String> for TokenClass {
    fn from(name: String) -> Self {
        TokenClass::new(name)
    }
}

impl PartialEq<str> for TokenClass {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TokenClass {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for TokenClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TokenClass::from)
    }
}

/// A classified span of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub class: TokenClass,
    pub start: usize,
    pub len: usize,
}

impl Token {
    pub fn new(class: TokenClass, start: usize, len: usize) -> Self {
        Token { class, start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The slice of `line` this token covers.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.span()]
    }
}
