//! Built-in dialects
//!
//!     Two rule tables ship with the crate and are kept as separate configurations:
//!
//!         - `lc3`: the minimal LC-3 grammar, a single `start` state.
//!         - `lc3-nasm`: the LC-3 grammar extended with NASM-style bracket blocks,
//!           `%macro`/`%endmacro`, `struc`/`endstruc`, data directives and labels, using
//!           pushed states for the nested bodies.
//!
//!     Opcodes, registers and hex literals are always case-insensitive. Whether dot
//!     directives (`.ORIG`, `.FILL`, ...) are is a per-table choice, see [CasePolicy].

mod extended;
mod minimal;

use crate::lc3::folding::FoldStrategy;
use crate::lc3::registry::LanguageDescriptor;
use crate::lc3::rules::{RuleTable, RuleTableError, RuleTableSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// LC-3 operation mnemonics, including every `BR` condition combination.
pub const OPCODES: &[&str] = &[
    "add", "and", "br", "brn", "brz", "brp", "brnz", "brnp", "brzp", "brnzp", "jmp", "jsr",
    "jsrr", "ld", "ldi", "ldr", "lea", "not", "ret", "rti", "st", "sti", "str", "trap",
];

pub const TRAP_ALIASES: &[&str] = &["getc", "out", "putc", "puts", "in", "putsp", "halt"];

/// Canonical spelling of the assembler directives. Under [CasePolicy::Sensitive] only
/// this spelling is recognised.
pub const DIRECTIVES: &[&str] = &[".ORIG", ".END", ".FILL", ".BLKW", ".STRINGZ", ".EXTERNAL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
    #[default]
    Insensitive,
    Sensitive,
}

impl CasePolicy {
    pub fn is_insensitive(self) -> bool {
        self == CasePolicy::Insensitive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialectOptions {
    pub directive_case: CasePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    Lc3,
    Lc3Nasm,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Lc3, Dialect::Lc3Nasm];

    pub fn id(self) -> &'static str {
        match self {
            Dialect::Lc3 => "lc3",
            Dialect::Lc3Nasm => "lc3-nasm",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Dialect::Lc3 => "LC3",
            Dialect::Lc3Nasm => "LC3 (NASM extensions)",
        }
    }

    pub fn spec(self, options: &DialectOptions) -> RuleTableSpec {
        match self {
            Dialect::Lc3 => minimal::spec(options),
            Dialect::Lc3Nasm => extended::spec(options),
        }
    }

    pub fn rule_table(self, options: &DialectOptions) -> Result<RuleTable, RuleTableError> {
        self.spec(options).compile()
    }

    /// The registration record for this dialect: `.asm` files, `;` comments, the light
    /// theme. Only the extended dialect folds, since only it has nested states.
    pub fn descriptor(self, options: &DialectOptions) -> Result<LanguageDescriptor, RuleTableError> {
        let folding = match self {
            Dialect::Lc3 => FoldStrategy::None,
            Dialect::Lc3Nasm => FoldStrategy::Context,
        };
        Ok(LanguageDescriptor::new(self.id(), self.rule_table(options)?)
            .with_name(self.display_name())
            .with_extensions(["asm"])
            .with_line_comment(";")
            .with_folding(folding))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.id() == s)
            .ok_or_else(|| format!("unknown dialect `{s}` (expected lc3 or lc3-nasm)"))
    }
}
