//! Highlighting behaviour of the built-in dialects
//!
//! Each check runs against both rule tables unless the construct only exists in one.

use lc3_syntax::lc3::testing::{assert_partition, class_at, full_entries, pieces};
use lc3_syntax::lc3::{
    classes, CasePolicy, ContextStack, Dialect, DialectOptions, RuleTable, TokenizedBuffer,
};
use rstest::rstest;
use std::sync::Arc;

fn table(dialect: Dialect, directive_case: CasePolicy) -> RuleTable {
    dialect
        .rule_table(&DialectOptions { directive_case })
        .unwrap()
}

#[rstest]
fn test_add_is_a_keyword_not_an_identifier(
    #[values(Dialect::Lc3, Dialect::Lc3Nasm)] dialect: Dialect,
) {
    let table = table(dialect, CasePolicy::Insensitive);
    assert_eq!(class_at(&table, "add", 0).as_deref(), Some(classes::KEYWORD));
    assert_eq!(
        class_at(&table, "    add r0, r0, r1", 4).as_deref(),
        Some(classes::KEYWORD)
    );
}

#[test]
fn test_identifier_containing_opcode_is_not_a_keyword() {
    let table = table(Dialect::Lc3, CasePolicy::Insensitive);
    assert_eq!(
        class_at(&table, "address", 0).as_deref(),
        Some(classes::IDENTIFIER)
    );
}

#[rstest]
fn test_opcode_case_is_ignored(
    #[values(Dialect::Lc3, Dialect::Lc3Nasm)] dialect: Dialect,
    #[values(CasePolicy::Insensitive, CasePolicy::Sensitive)] policy: CasePolicy,
    #[values("ADD", "Add", "add")] opcode: &str,
) {
    let table = table(dialect, policy);
    let line = format!("{opcode} R0, R0, #1");
    assert_eq!(class_at(&table, &line, 0).as_deref(), Some(classes::KEYWORD));
    assert_eq!(class_at(&table, &line, 4).as_deref(), Some(classes::REGISTER));
}

#[rstest]
#[case(Dialect::Lc3, CasePolicy::Insensitive, ".FILL x10", true)]
#[case(Dialect::Lc3, CasePolicy::Insensitive, ".fill x10", true)]
#[case(Dialect::Lc3, CasePolicy::Sensitive, ".FILL x10", true)]
#[case(Dialect::Lc3, CasePolicy::Sensitive, ".fill x10", false)]
#[case(Dialect::Lc3Nasm, CasePolicy::Insensitive, ".FILL x10", true)]
#[case(Dialect::Lc3Nasm, CasePolicy::Insensitive, ".fill x10", true)]
#[case(Dialect::Lc3Nasm, CasePolicy::Sensitive, ".FILL x10", true)]
#[case(Dialect::Lc3Nasm, CasePolicy::Sensitive, ".fill x10", false)]
fn test_directive_case_policy(
    #[case] dialect: Dialect,
    #[case] policy: CasePolicy,
    #[case] line: &str,
    #[case] is_directive: bool,
) {
    let table = table(dialect, policy);
    let class = class_at(&table, line, 1);
    assert_eq!(class.as_deref() == Some(classes::DIRECTIVE), is_directive);
}

#[rstest]
fn test_comment_runs_to_end_of_line(#[values(Dialect::Lc3, Dialect::Lc3Nasm)] dialect: Dialect) {
    let table = table(dialect, CasePolicy::Insensitive);
    let line = "add r0, r1, r2 ; comment with add and r0";
    let out = table.tokenize_line(line, &ContextStack::start());
    assert_partition(&out.tokens, line);

    let comment = out.tokens.last().unwrap();
    assert_eq!(comment.class, classes::COMMENT);
    assert_eq!(comment.start, line.find(';').unwrap());
    assert_eq!(comment.text(line), "; comment with add and r0");
    assert!(out.tokens[..out.tokens.len() - 1]
        .iter()
        .all(|t| t.class != classes::COMMENT));
}

#[test]
fn test_bracket_block_round_trip() {
    let table = Arc::new(table(Dialect::Lc3Nasm, CasePolicy::Insensitive));
    let lines = ["[section .data", "  .FILL x10", "]"];
    let buffer = TokenizedBuffer::from_lines(table.clone(), lines);

    assert_eq!(buffer.entry(0).unwrap().exit.names(&table), vec!["start", "block"]);
    assert_eq!(buffer.entry(2).unwrap().exit, ContextStack::start());

    // The body belongs to the block, so none of the top-level directive splitting applies.
    let body = buffer.entry(1).unwrap();
    assert_eq!(
        pieces(&body.tokens, lines[1]),
        vec![(classes::DIRECTIVE, "  .FILL x10")]
    );
    let top_level = table.tokenize_line(lines[1], &ContextStack::start());
    assert_ne!(top_level.tokens, body.tokens);
}

#[test]
fn test_macro_and_struct_bodies() {
    let table = Arc::new(table(Dialect::Lc3Nasm, CasePolicy::Insensitive));
    let lines = [
        "%macro PUSH 1",
        "  ADD R6, R6, #-1",
        "  STR %1, R6, #0",
        "%endmacro",
        "struc point",
        "  .x resw 1",
        "endstruc",
        "HALT",
    ];
    let buffer = TokenizedBuffer::from_lines(table.clone(), lines);
    let names: Vec<Vec<&str>> = buffer
        .entries()
        .iter()
        .map(|e| e.exit.names(&table))
        .collect();
    assert_eq!(
        names,
        vec![
            vec!["start", "macro"],
            vec!["start", "macro"],
            vec!["start", "macro"],
            vec!["start"],
            vec!["start", "struct"],
            vec!["start", "struct"],
            vec!["start"],
            vec!["start"],
        ]
    );

    let param = pieces(buffer.tokens(2).unwrap(), lines[2]);
    assert!(param.contains(&(classes::MACRO_PARAMETER, "%1")));
    assert!(param.contains(&(classes::KEYWORD, "STR")));
}

#[test]
fn test_unterminated_block_keeps_trailing_lines_nested() {
    let table = Arc::new(table(Dialect::Lc3Nasm, CasePolicy::Insensitive));
    let buffer = TokenizedBuffer::from_lines(table.clone(), ["[bits 16", "add", "halt"]);
    for entry in buffer.entries() {
        assert_eq!(entry.exit.names(&table), vec!["start", "block"]);
    }
    assert_eq!(buffer.tokens(2).unwrap()[0].class, classes::DIRECTIVE);
}

#[test]
fn test_stray_close_directives_never_pop_start() {
    let table = table(Dialect::Lc3Nasm, CasePolicy::Insensitive);
    for line in ["]", "%endmacro", "endstruc"] {
        let out = table.tokenize_line(line, &ContextStack::start());
        assert!(out.exit.is_start(), "{line} left {:?}", out.exit);
    }
}

#[test]
fn test_inserting_block_close_rehighlights_following_code() {
    let table = Arc::new(table(Dialect::Lc3Nasm, CasePolicy::Insensitive));
    let mut buffer =
        TokenizedBuffer::from_lines(table.clone(), ["[bits 16", "add r0, r0, r0", "halt"]);
    buffer.insert_lines(1, ["]"]).unwrap();

    let lines: Vec<String> = buffer.lines().map(str::to_string).collect();
    assert_eq!(buffer.entries(), full_entries(&table, &lines).as_slice());
    let add = buffer.entry(2).unwrap();
    assert!(add.entry.is_start());
    assert_eq!(pieces(&add.tokens, "add r0, r0, r0")[0], (classes::KEYWORD, "add"));
}

#[test]
fn test_stack_from_another_table_tokenizes_as_start() {
    let nasm = table(Dialect::Lc3Nasm, CasePolicy::Insensitive);
    let lc3 = table(Dialect::Lc3, CasePolicy::Insensitive);
    let block = nasm.state_id("block").unwrap();
    assert!(lc3.state_id("block").is_none());

    let line = "add r0, r0, r0";
    let foreign = lc3.tokenize_line(line, &ContextStack::nested([block, block, block]));
    let native = lc3.tokenize_line(line, &ContextStack::start());
    assert_eq!(foreign.tokens, native.tokens);
    assert_partition(&foreign.tokens, line);
}

#[rstest]
#[case("putc")]
#[case("PUTC")]
#[case("getc")]
#[case("halt")]
fn test_trap_aliases_are_keywords(
    #[values(Dialect::Lc3, Dialect::Lc3Nasm)] dialect: Dialect,
    #[case] alias: &str,
) {
    let table = table(dialect, CasePolicy::Insensitive);
    assert_eq!(class_at(&table, alias, 0).as_deref(), Some(classes::KEYWORD));
}
