//! Token sequence and the forking cursor over it
//!
//! A `Cursor` is nothing but a borrowed slice and an index, so forking it is a
//! copy and restoring it is an assignment. Speculative parses rely on that.

use crate::position::FilePosition;
use crate::token::{Token, TokenKind};

/// The tokens of one source file; always ends with an end-of-file token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::EndOfFile) {
            let end = tokens.last().map(|t| t.end).unwrap_or_default();
            tokens.push(Token::new(TokenKind::EndOfFile, end, end));
        }
        TokenSequence { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    /// Token at `index`, clamped to the trailing end-of-file token
    pub fn get(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens)
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// A position in a token sequence
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Cursor<'t> {
    /// `tokens` must end with an end-of-file token
    pub fn new(tokens: &'t [Token]) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::EndOfFile));
        Cursor { tokens, position: 0 }
    }

    fn at(&self, index: usize) -> &'t Token {
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn restore(&mut self, position: usize) {
        self.position = position.min(self.tokens.len() - 1);
    }

    /// Snapshot of this cursor; advancing the fork leaves `self` untouched
    pub fn fork(&self) -> Cursor<'t> {
        *self
    }

    pub fn current(&self) -> &'t Token {
        self.at(self.position)
    }

    pub fn peek_next(&self) -> &'t Token {
        self.at(self.position + 1)
    }

    /// The `offset`-th significant token after the current one, skipping
    /// inline whitespace and comments (offset 0 is the first one at or after
    /// the current position)
    pub fn peek_next_non_white_space(&self, offset: usize) -> &'t Token {
        let mut index = self.position;
        let mut remaining = offset;
        loop {
            let token = self.at(index);
            if token.kind == TokenKind::EndOfFile {
                return token;
            }
            if !token.kind.is_inline_trivia() {
                if remaining == 0 {
                    return token;
                }
                remaining -= 1;
            }
            index += 1;
        }
    }

    pub fn advance(&mut self) {
        if self.current().kind != TokenKind::EndOfFile {
            self.position += 1;
        }
    }

    /// Advance past the current token and any inline whitespace that follows
    pub fn advance_non_white_space(&mut self) {
        self.advance();
        self.skip_white_space();
    }

    /// Skip inline whitespace and comments
    pub fn skip_white_space(&mut self) {
        while self.current().kind.is_inline_trivia() {
            self.advance();
        }
    }

    /// Skip whitespace, comments, indentation and line breaks
    pub fn skip_lines(&mut self) {
        while self.current().is_trivia() {
            self.advance();
        }
    }

    /// Number of indentation tokens that open the current line
    pub fn scope_depth(&self) -> usize {
        let mut line_start = self.position;
        while line_start > 0 && self.at(line_start - 1).kind != TokenKind::EndOfLine {
            line_start -= 1;
        }
        self.tokens[line_start..]
            .iter()
            .take_while(|t| t.kind == TokenKind::Scope)
            .count()
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::EndOfFile
    }

    /// End of the last significant token before the cursor
    pub fn previous_end(&self) -> FilePosition {
        let mut index = self.position;
        while index > 0 {
            index -= 1;
            let token = self.at(index);
            if !token.is_trivia() {
                return token.end;
            }
        }
        self.current().start
    }
}
