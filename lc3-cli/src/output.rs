//! Renderers for a tokenized buffer.
//!
//! - simple: one token per output line, `row:start..end class "text"`
//! - json: per-line entry/exit contexts and tokens
//! - styled: the source itself, coloured with the language's theme

use colored::{ColoredString, Colorize};
use lc3_syntax::lc3::{FoldRange, Style, Theme, TokenizedBuffer};
use serde::Serialize;

#[derive(Serialize)]
struct LineReport<'a> {
    row: usize,
    entry: Vec<&'a str>,
    exit: Vec<&'a str>,
    tokens: Vec<TokenReport<'a>>,
}

#[derive(Serialize)]
struct TokenReport<'a> {
    class: &'a str,
    start: usize,
    len: usize,
    text: &'a str,
}

#[derive(Serialize)]
struct Report<'a> {
    language: &'a str,
    lines: Vec<LineReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folds: Option<&'a [FoldRange]>,
}

pub fn to_simple(buffer: &TokenizedBuffer, folds: Option<&[FoldRange]>) -> String {
    let mut out = String::new();
    for (row, (line, entry)) in buffer.lines().zip(buffer.entries()).enumerate() {
        for token in &entry.tokens {
            out.push_str(&format!(
                "{}:{}..{} {} {:?}\n",
                row + 1,
                token.start,
                token.end(),
                token.class,
                token.text(line)
            ));
        }
    }
    push_folds(&mut out, folds);
    out
}

pub fn to_json(
    buffer: &TokenizedBuffer,
    folds: Option<&[FoldRange]>,
) -> Result<String, serde_json::Error> {
    let table = buffer.table();
    let lines = buffer
        .lines()
        .zip(buffer.entries())
        .enumerate()
        .map(|(row, (line, entry))| LineReport {
            row: row + 1,
            entry: entry.entry.names(table),
            exit: entry.exit.names(table),
            tokens: entry
                .tokens
                .iter()
                .map(|t| TokenReport {
                    class: t.class.as_str(),
                    start: t.start,
                    len: t.len,
                    text: t.text(line),
                })
                .collect(),
        })
        .collect();
    let report = Report {
        language: table.name(),
        lines,
        folds,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

pub fn to_styled(buffer: &TokenizedBuffer, theme: &Theme, folds: Option<&[FoldRange]>) -> String {
    let mut out = String::new();
    for (line, entry) in buffer.lines().zip(buffer.entries()) {
        for token in &entry.tokens {
            let style = theme.style_for(&token.class);
            out.push_str(&paint(token.text(line), style).to_string());
        }
        out.push('\n');
    }
    push_folds(&mut out, folds);
    out
}

fn paint(text: &str, style: &Style) -> ColoredString {
    let mut painted = text.normal();
    if let Some(fg) = style.foreground {
        painted = painted.truecolor(fg.r, fg.g, fg.b);
    }
    if let Some(bg) = style.background {
        painted = painted.on_truecolor(bg.r, bg.g, bg.b);
    }
    if style.bold {
        painted = painted.bold();
    }
    if style.italic {
        painted = painted.italic();
    }
    painted
}

/// Fold ranges are reported with 1-based rows, like the token rows.
fn push_folds(out: &mut String, folds: Option<&[FoldRange]>) {
    let Some(folds) = folds else {
        return;
    };
    for fold in folds {
        out.push_str(&format!("fold {}-{}\n", fold.start_row + 1, fold.end_row + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc3_syntax::lc3::{Dialect, DialectOptions};

    fn buffer(dialect: Dialect, source: &str) -> TokenizedBuffer {
        dialect
            .descriptor(&DialectOptions::default())
            .unwrap()
            .open(source)
    }

    #[test]
    fn simple_lists_every_token() {
        let out = to_simple(&buffer(Dialect::Lc3, "add r0, r0, #1"), None);
        assert_eq!(
            out.lines().next(),
            Some("1:0..3 keyword.control.assembly \"add\"")
        );
        assert_eq!(out.lines().count(), 7);
    }

    #[test]
    fn json_carries_contexts_and_folds() {
        let buffer = buffer(Dialect::Lc3Nasm, "[bits 16\n]\n");
        let folds = [FoldRange {
            start_row: 0,
            end_row: 1,
        }];
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&buffer, Some(&folds)).unwrap()).unwrap();
        assert_eq!(json["language"], "lc3-nasm");
        assert_eq!(json["lines"][0]["exit"], serde_json::json!(["start", "block"]));
        assert_eq!(json["lines"][1]["exit"], serde_json::json!(["start"]));
        assert_eq!(json["folds"][0]["end_row"], 1);
    }

    #[test]
    fn folds_are_one_based_in_text_output() {
        let folds = [FoldRange {
            start_row: 2,
            end_row: 5,
        }];
        let out = to_simple(&buffer(Dialect::Lc3, ""), Some(&folds));
        assert_eq!(out, "fold 3-6\n");
    }
}
