//! Lexer for plamp
//!
//! Tokenizes source text into a flat token sequence. Lexical problems never
//! stop the scan: they become diagnostics and the lexer produces a best-effort
//! token (or, for characters it cannot classify, skips exactly one character).

use crate::{
    cursor::TokenSequence,
    diagnostic::{Diagnostic, DiagnosticKind},
    position::FilePosition,
    symbol::Symbol,
    token::{keyword_from_word, LiteralValue, Punctuation, Token, TokenKind, OPERATOR_SPELLINGS},
    types::PlampType,
};
use tracing::debug;

/// Spaces that make up one indentation step
const SPACES_PER_SCOPE: usize = 4;

/// Tokenize `text`, attributing diagnostics to `file_name`
pub fn tokenize(text: &str, file_name: &str) -> (TokenSequence, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(text, file_name);
    lexer.run();
    debug!(
        tokens = lexer.tokens.len(),
        diagnostics = lexer.diagnostics.len(),
        file = file_name,
        "tokenized source"
    );
    (TokenSequence::new(lexer.tokens), lexer.diagnostics)
}

/// Lexical analyzer
struct Lexer<'a> {
    chars: Vec<char>,
    position: usize,
    location: FilePosition,
    at_line_start: bool,
    file_name: &'a str,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn new(input: &str, file_name: &'a str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
            location: FilePosition::START,
            at_line_start: true,
            file_name,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.current_char().is_some() {
            if self.at_line_start {
                self.read_indentation();
                self.at_line_start = false;
                continue;
            }
            self.next_token();
        }
        let end = self.location;
        self.tokens.push(Token::new(TokenKind::EndOfFile, end, end));
    }

    /// Get current character
    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Peek ahead n characters without advancing
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.chars.get(self.position + n).copied()
    }

    /// Advance to next character, keeping row and column in step. `\n`,
    /// `\r\n` and a lone `\r` each end a line.
    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            let line_break = ch == '\n' || (ch == '\r' && self.current_char() != Some('\n'));
            if line_break {
                self.location = self.location.next_line();
            } else {
                self.location = self.location.shifted(1);
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: FilePosition) {
        self.tokens.push(Token::new(kind, start, self.location));
    }

    fn report(&mut self, kind: DiagnosticKind, start: FilePosition, end: FilePosition) {
        self.diagnostics.push(Diagnostic::new(kind, start, end, self.file_name));
    }

    fn read_indentation(&mut self) {
        loop {
            let start = self.location;
            if self.current_char() == Some('\t') {
                self.advance();
                self.push(TokenKind::Scope, start);
            } else if (0..SPACES_PER_SCOPE).all(|i| self.peek_ahead(i) == Some(' ')) {
                for _ in 0..SPACES_PER_SCOPE {
                    self.advance();
                }
                self.push(TokenKind::Scope, start);
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) {
        let start = self.location;
        let Some(ch) = self.current_char() else {
            return;
        };

        match ch {
            '\n' => {
                self.advance();
                self.push(TokenKind::EndOfLine, start);
                self.at_line_start = true;
            }
            '\r' => {
                self.advance();
                if self.current_char() == Some('\n') {
                    self.advance();
                }
                self.push(TokenKind::EndOfLine, start);
                self.at_line_start = true;
            }
            c if c.is_whitespace() => {
                while matches!(self.current_char(), Some(c) if c.is_whitespace() && c != '\n' && c != '\r') {
                    self.advance();
                }
                self.push(TokenKind::WhiteSpace, start);
            }
            '/' if self.peek_ahead(1) == Some('/') => {
                while matches!(self.current_char(), Some(c) if c != '\n' && c != '\r') {
                    self.advance();
                }
                self.push(TokenKind::Comment, start);
            }
            ';' => {
                self.advance();
                self.push(TokenKind::EndOfStatement, start);
            }
            '"' => self.read_string(),
            '\'' => self.read_char(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_word(),
            c => {
                if let Some(punctuation) = Punctuation::from_char(c) {
                    self.advance();
                    self.push(TokenKind::Punctuation(punctuation), start);
                } else if !self.read_operator() {
                    self.advance();
                    self.report(DiagnosticKind::UnexpectedToken(c), start, self.location);
                }
            }
        }
    }

    fn read_operator(&mut self) -> bool {
        let start = self.location;
        for (spelling, operator) in OPERATOR_SPELLINGS {
            let matches = spelling
                .chars()
                .enumerate()
                .all(|(i, expected)| self.peek_ahead(i) == Some(expected));
            if matches {
                for _ in 0..spelling.chars().count() {
                    self.advance();
                }
                self.push(TokenKind::Operator(*operator), start);
                return true;
            }
        }
        false
    }

    /// Decode the escape whose backslash is the current character
    fn read_escape(&mut self, value: &mut String) {
        let escape_start = self.location;
        self.advance(); // Skip backslash
        let Some(escaped) = self.current_char() else {
            return;
        };
        let decoded = match escaped {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '0' => Some('\0'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            _ => None,
        };
        self.advance();
        match decoded {
            Some(c) => value.push(c),
            None => {
                value.push(escaped);
                self.report(DiagnosticKind::InvalidEscapeSequence(escaped), escape_start, self.location);
            }
        }
    }

    fn read_string(&mut self) {
        let start = self.location;
        self.advance(); // Skip opening quote

        let mut value = String::new();
        loop {
            match self.current_char() {
                Some('"') => {
                    self.advance();
                    self.push(TokenKind::Literal(LiteralValue::String(value)), start);
                    return;
                }
                Some('\\') => self.read_escape(&mut value),
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
                None => break,
            }
        }

        self.report(DiagnosticKind::UnterminatedString, start, self.location);
        self.push(TokenKind::Literal(LiteralValue::String(value)), start);
    }

    fn read_char(&mut self) {
        let start = self.location;
        self.advance(); // Skip opening quote

        let mut value = String::new();
        let mut terminated = false;
        while let Some(ch) = self.current_char() {
            match ch {
                '\'' => {
                    self.advance();
                    terminated = true;
                    break;
                }
                '\n' | '\r' => break,
                '\\' => self.read_escape(&mut value),
                _ => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        let mut chars = value.chars();
        let decoded = match (chars.next(), chars.next()) {
            (Some(c), None) if terminated => c,
            _ => {
                self.report(DiagnosticKind::InvalidCharLiteral, start, self.location);
                '\0'
            }
        };
        self.push(TokenKind::Literal(LiteralValue::Char(decoded)), start);
    }

    fn read_number(&mut self) {
        let start = self.location;
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            let fraction_dot =
                ch == '.' && !seen_dot && matches!(self.peek_ahead(1), Some(c) if c.is_ascii_digit());
            if ch.is_alphanumeric() || ch == '_' || fraction_dot {
                seen_dot |= ch == '.';
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = match parse_number(&text) {
            Ok(value) => value,
            Err(fallback) => {
                self.report(DiagnosticKind::InvalidNumberLiteral(text.clone()), start, self.location);
                fallback
            }
        };
        self.push(TokenKind::Literal(value), start);
    }

    fn read_word(&mut self) {
        let start = self.location;
        let mut word = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match word.as_str() {
            "true" => TokenKind::Literal(LiteralValue::Bool(true)),
            "false" => TokenKind::Literal(LiteralValue::Bool(false)),
            "null" => TokenKind::Literal(LiteralValue::Null),
            _ => match keyword_from_word(&word) {
                Some(keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Word(Symbol::intern(&word)),
            },
        };
        self.push(kind, start);
    }
}

/// Decode a numeric literal. On failure the error carries the zero value of
/// the type the suffix asked for, so parsing can continue with a typed node.
fn parse_number(text: &str) -> Result<LiteralValue, LiteralValue> {
    let digits_end = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let (digits, suffix) = text.split_at(digits_end);
    let is_decimal = digits.contains('.');

    let ty = match suffix {
        "" if is_decimal => PlampType::Double,
        "" | "i" => PlampType::Int,
        "u" => PlampType::UInt,
        "l" => PlampType::Long,
        "ul" => PlampType::ULong,
        "b" => PlampType::Byte,
        "f" => PlampType::Float,
        "d" => PlampType::Double,
        _ => return Err(LiteralValue::Int(0)),
    };
    let fallback = || LiteralValue::zero_of(&ty).unwrap_or(LiteralValue::Int(0));

    if digits.is_empty() || digits.contains('_') {
        return Err(fallback());
    }

    let parsed = match ty {
        PlampType::Int => digits.parse().ok().map(LiteralValue::Int),
        PlampType::UInt => digits.parse().ok().map(LiteralValue::UInt),
        PlampType::Long => digits.parse().ok().map(LiteralValue::Long),
        PlampType::ULong => digits.parse().ok().map(LiteralValue::ULong),
        PlampType::Byte => digits.parse().ok().map(LiteralValue::Byte),
        PlampType::Float => digits.parse().ok().map(LiteralValue::Float),
        PlampType::Double => digits.parse().ok().map(LiteralValue::Double),
        _ => None,
    };
    parsed.ok_or_else(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Keyword, Operator};

    fn lex_kinds(input: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = tokenize(input, "test.plp");
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::WhiteSpace))
            .map(|t| t.kind.clone())
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = lex_kinds("( ) + - ;");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Punctuation(Punctuation::OpenParen),
                TokenKind::Punctuation(Punctuation::CloseParen),
                TokenKind::Operator(Operator::Plus),
                TokenKind::Operator(Operator::Minus),
                TokenKind::EndOfStatement,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_longest_match() {
        let tokens = lex_kinds("a := b == c = d <= e ++");
        let operators: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t {
                TokenKind::Operator(op) => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(
            operators,
            vec![
                Operator::Assign,
                Operator::Equal,
                Operator::Equal,
                Operator::LessEqual,
                Operator::Increment
            ]
        );
    }

    #[test]
    fn test_keywords_and_words() {
        let tokens = lex_kinds("fn int sum");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Keyword(Keyword::Fn),
                TokenKind::Word(Symbol::intern("int")),
                TokenKind::Word(Symbol::intern("sum")),
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_number_suffixes() {
        let tokens = lex_kinds("10i 1b 1l 1ul 7u 2.5f 2.5 3d 42");
        let literals: Vec<_> = tokens
            .into_iter()
            .filter_map(|t| match t {
                TokenKind::Literal(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(
            literals,
            vec![
                LiteralValue::Int(10),
                LiteralValue::Byte(1),
                LiteralValue::Long(1),
                LiteralValue::ULong(1),
                LiteralValue::UInt(7),
                LiteralValue::Float(2.5),
                LiteralValue::Double(2.5),
                LiteralValue::Double(3.0),
                LiteralValue::Int(42),
            ]
        );
    }

    #[test]
    fn test_boolean_and_null_literals() {
        let tokens = lex_kinds("true false null");
        assert_eq!(tokens[0], TokenKind::Literal(LiteralValue::Bool(true)));
        assert_eq!(tokens[1], TokenKind::Literal(LiteralValue::Bool(false)));
        assert_eq!(tokens[2], TokenKind::Literal(LiteralValue::Null));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex_kinds(r#""a\tb\n""#);
        assert_eq!(tokens[0], TokenKind::Literal(LiteralValue::String("a\tb\n".to_string())));
    }

    #[test]
    fn test_unterminated_string_reaches_end_of_input() {
        let (tokens, diagnostics) = tokenize("x := \"abc\ndef", "t.plp");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), "TOK1001");
        let literal = tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Literal(_)))
            .unwrap();
        assert_eq!(literal.kind, TokenKind::Literal(LiteralValue::String("abc\ndef".to_string())));
        assert_eq!(literal.end, FilePosition::new(1, 3));
    }

    #[test]
    fn test_invalid_escape_is_kept() {
        let (tokens, diagnostics) = tokenize(r#""a\qb""#, "t.plp");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), "TOK1002");
        assert_eq!(tokens.get(0).kind, TokenKind::Literal(LiteralValue::String("aqb".to_string())));
    }

    #[test]
    fn test_unexpected_character_is_skipped() {
        let (tokens, diagnostics) = tokenize("a $ b", "t.plp");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), "TOK1003");
        assert_eq!(diagnostics[0].start, FilePosition::new(0, 2));
        assert_eq!(diagnostics[0].end, FilePosition::new(0, 3));
        let words = tokens.iter().filter(|t| matches!(t.kind, TokenKind::Word(_))).count();
        assert_eq!(words, 2);
    }

    #[test]
    fn test_invalid_number_keeps_suffix_type() {
        let (tokens, diagnostics) = tokenize("300b", "t.plp");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), "TOK1004");
        assert_eq!(tokens.get(0).kind, TokenKind::Literal(LiteralValue::Byte(0)));
    }

    #[test]
    fn test_char_literals() {
        let tokens = lex_kinds(r"'a' '\n'");
        assert_eq!(tokens[0], TokenKind::Literal(LiteralValue::Char('a')));
        assert_eq!(tokens[1], TokenKind::Literal(LiteralValue::Char('\n')));

        let (_, diagnostics) = tokenize("'ab'", "t.plp");
        assert_eq!(diagnostics[0].code(), "TOK1005");
    }

    #[test]
    fn test_indentation_becomes_scope_tokens() {
        let (tokens, _) = tokenize("a\n\t\tb\n        c\n      d", "t.plp");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        let scopes_before = |word: &str| {
            let index = kinds
                .iter()
                .position(|k| *k == TokenKind::Word(Symbol::intern(word)))
                .unwrap();
            kinds[..index]
                .iter()
                .rev()
                .take_while(|k| matches!(k, TokenKind::Scope | TokenKind::WhiteSpace))
                .filter(|k| matches!(k, TokenKind::Scope))
                .count()
        };
        assert_eq!(scopes_before("b"), 2);
        assert_eq!(scopes_before("c"), 2);
        assert_eq!(scopes_before("d"), 1);
    }

    #[test]
    fn test_positions_track_rows() {
        let (tokens, _) = tokenize("a\r\nbb", "t.plp");
        let b = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Word(Symbol::intern("bb")))
            .unwrap();
        assert_eq!(b.start, FilePosition::new(1, 0));
        assert_eq!(b.end, FilePosition::new(1, 2));
    }

    #[test]
    fn test_comments() {
        let (tokens, _) = tokenize("a // note\nb", "t.plp");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Comment));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Word(Symbol::intern("b"))));
    }
}
