//! The LC-3 rule table with NASM-style extensions.
//!
//!     `start` handles ordinary code. Three constructs push a nested state:
//!
//!         [ ... ]                  block    body styled as a directive, `]` at line end pops
//!         %macro NAME N ... %endmacro  macro  body styled like code, `%1` parameters
//!         struc NAME ... endstruc      struct body styled like code
//!
//!     The macro and struct states check their own close directive first and then include
//!     `start`, so they nest inside each other. A close directive met in `start` is still
//!     styled as a directive but leaves the stack alone.

use super::{Dialect, DialectOptions, OPCODES, TRAP_ALIASES};
use crate::lc3::rules::{MatchSpec, RuleTableSpec, StateSpec, START_STATE};
use crate::lc3::token::classes;

const BLOCK: &str = "block";
const MACRO: &str = "macro";
const STRUCT: &str = "struct";

const DATA_DIRECTIVES: &[&str] = &[
    "db", "dw", "dd", "dq", "dt", "do", "dy", "resb", "resw", "resd", "resq", "rest", "reso",
    "equ", "times", "align", "alignb", "sectalign", "section", "ptr", "byte", "word", "dword",
    "qword", "incbin",
];

const IDENT: &str = r"[_a-zA-Z][_a-zA-Z0-9]*";

pub(super) fn spec(options: &DialectOptions) -> RuleTableSpec {
    let instructions: Vec<&str> = OPCODES.iter().chain(TRAP_ALIASES).copied().collect();
    let directive_line = format!(
        r"(\s*)(\.(?:BLKW|END|EXTERNAL|FILL|ORIG|STRINGZ))\b( ?)((?:{IDENT})?)"
    );

    let start = StateSpec::new(START_STATE)
        .rule(MatchSpec::words(classes::KEYWORD, &instructions).ignore_case())
        .rule(MatchSpec::regex(classes::REGISTER, r"\bR[0-7]\b").ignore_case())
        .rule(MatchSpec::regex(classes::DECIMAL, r"#-?[0-9]+\b"))
        .rule(MatchSpec::regex(classes::HEXADECIMAL, r"\bx-?[0-9A-F]+\b").ignore_case())
        .rule(MatchSpec::regex(classes::STRING, r#"'(?:[^\\']|\\.)*'"#))
        .rule(MatchSpec::regex(classes::STRING, r#""(?:[^\\"]|\\.)*""#))
        .rule(MatchSpec::regex(classes::DIRECTIVE, r"^\[").push(BLOCK))
        .rule(
            MatchSpec::regex(classes::DIRECTIVE, &format!(r"^(struc)(\s+)({IDENT})"))
                .captures(&[classes::DIRECTIVE, classes::DIRECTIVE, classes::LABEL])
                .push(STRUCT),
        )
        .rule(MatchSpec::regex(classes::DIRECTIVE, r"^endstruc\b"))
        .rule(
            MatchSpec::regex(
                classes::DIRECTIVE,
                &format!(r"^(%macro\s+)({IDENT})(\s+)([0-9]+)"),
            )
            .captures(&[
                classes::DIRECTIVE,
                classes::LABEL,
                classes::DIRECTIVE,
                classes::CONSTANT,
            ])
            .push(MACRO),
        )
        .rule(MatchSpec::regex(classes::DIRECTIVE, r"^%endmacro\b"))
        .rule(
            MatchSpec::regex(classes::DIRECTIVE, &directive_line)
                .captures(&[classes::TEXT, classes::DIRECTIVE, classes::TEXT, classes::LABEL])
                .case_insensitive(options.directive_case.is_insensitive()),
        )
        .rule(MatchSpec::words(classes::DIRECTIVE, DATA_DIRECTIVES).ignore_case())
        .rule(MatchSpec::regex(classes::LABEL, r"^\s*%%[\w.]+?:$"))
        .rule(MatchSpec::regex(classes::LABEL, r"^\s*%\$[\w.]+?:$"))
        .rule(MatchSpec::regex(classes::LABEL, r"^[\w.]+?:"))
        .rule(MatchSpec::regex(classes::LABEL, r"^[\w.]+?\b"))
        .rule(MatchSpec::regex(classes::COMMENT, ";.*").comment());

    let block = StateSpec::new(BLOCK)
        .default_class(classes::DIRECTIVE)
        .rule(MatchSpec::regex(classes::DIRECTIVE, r"\]$").pop());

    let macro_body = StateSpec::new(MACRO)
        .rule(MatchSpec::regex(classes::DIRECTIVE, r"^%endmacro\b").pop())
        .rule(MatchSpec::regex(classes::MACRO_PARAMETER, r"%[0-9]+"))
        .include(START_STATE);

    let struct_body = StateSpec::new(STRUCT)
        .rule(MatchSpec::regex(classes::DIRECTIVE, r"^endstruc\b").pop())
        .include(START_STATE);

    RuleTableSpec::new(Dialect::Lc3Nasm.id())
        .state(start)
        .state(block)
        .state(macro_body)
        .state(struct_body)
}
