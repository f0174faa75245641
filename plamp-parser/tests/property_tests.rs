//! Property-based tests for the tokenizer and the fork/merge model.
//!
//! Uses proptest to check invariants across randomly generated source text.

use plamp_parser::*;
use proptest::prelude::*;

/// Position of every character in `text`, plus the position just past the end
fn char_positions(text: &str) -> (Vec<FilePosition>, FilePosition) {
    let chars: Vec<char> = text.chars().collect();
    let mut positions = Vec::with_capacity(chars.len());
    let mut location = FilePosition::START;
    for (i, &ch) in chars.iter().enumerate() {
        positions.push(location);
        let line_break = ch == '\n' || (ch == '\r' && chars.get(i + 1) != Some(&'\n'));
        location = if line_break { location.next_line() } else { location.shifted(1) };
    }
    (positions, location)
}

fn source_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-z0-9 \t\r\n;:(){}\[\]+\-*/=<>!&|^"'\\$#@.,_]{0,60}"#)
        .expect("valid regex")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Token spans and unexpected-character spans tile the input exactly
    #[test]
    fn prop_tokens_cover_every_character(text in source_text()) {
        let (tokens, diagnostics) = tokenize(&text, "p.plp");
        let mut spans: Vec<(FilePosition, FilePosition)> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::EndOfFile)
            .map(|t| (t.start, t.end))
            .chain(
                diagnostics
                    .iter()
                    .filter(|d| d.code() == "TOK1003")
                    .map(|d| (d.start, d.end)),
            )
            .collect();
        spans.sort();

        let (positions, end) = char_positions(&text);
        let mut expected = FilePosition::START;
        for (start, stop) in &spans {
            prop_assert_eq!(*start, expected);
            prop_assert!(start < stop, "empty span at {}", start);
            expected = *stop;
        }
        prop_assert_eq!(expected, end);
        prop_assert!(spans.len() <= positions.len());
    }

    /// Tokenizing never panics and always ends with one end-of-file token
    #[test]
    fn prop_token_sequence_ends_with_eof(text in source_text()) {
        let (tokens, _) = tokenize(&text, "p.plp");
        let eof_count = tokens.iter().filter(|t| t.kind == TokenKind::EndOfFile).count();
        prop_assert_eq!(eof_count, 1);
        prop_assert_eq!(&tokens.as_slice()[tokens.len() - 1].kind, &TokenKind::EndOfFile);
    }

    /// A failed production run in a fork leaves the parent untouched
    #[test]
    fn prop_failed_fork_is_isolated(text in source_text(), skip in 0usize..8) {
        let (tokens, _) = tokenize(&text, "p.plp");
        let mut ctx = ParsingContext::new(&tokens, "p.plp");
        for _ in 0..skip {
            ctx.advance();
        }
        ctx.report_here(DiagnosticKind::InvalidStatement);
        let position = ctx.position();
        let diagnostics = ctx.diagnostics().to_vec();

        let mut parser = Parser::new();
        let mut fork = ctx.fork();
        let parsed = parser.parse_expression_public(&mut fork).unwrap();
        if parsed.is_none() {
            drop(fork);
            prop_assert_eq!(ctx.position(), position);
            prop_assert_eq!(ctx.diagnostics(), diagnostics.as_slice());
        } else {
            let forked_position = fork.position();
            ctx.merge(fork);
            prop_assert_eq!(ctx.position(), forked_position);
            prop_assert!(ctx.diagnostics().len() >= diagnostics.len());
        }
    }

    /// Parsing any input completes without an internal error
    #[test]
    fn prop_parse_never_fails_internally(text in source_text()) {
        let output = parse(&text, "p.plp");
        prop_assert!(output.is_ok());
        let output = output.unwrap();
        for node in output.ast.descendants(output.root) {
            prop_assert!(output.symbols.contains(node));
        }
    }
}
