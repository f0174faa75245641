//! Parsing context with fork/merge transactions
//!
//! A context is a cursor, the diagnostics reported so far and the file name.
//! `fork` gives a child with the same position and an empty diagnostics list;
//! `merge` folds a successful child back. A failed child is simply dropped,
//! which leaves the parent exactly as it was.

use crate::cursor::{Cursor, TokenSequence};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::position::FilePosition;
use crate::token::{Keyword, Operator, Punctuation, Token, TokenKind};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct ParsingContext<'t> {
    cursor: Cursor<'t>,
    diagnostics: Vec<Diagnostic>,
    file_name: &'t str,
}

impl<'t> ParsingContext<'t> {
    pub fn new(tokens: &'t TokenSequence, file_name: &'t str) -> Self {
        ParsingContext {
            cursor: tokens.cursor(),
            diagnostics: Vec::new(),
            file_name,
        }
    }

    /// A child context at the same position with no diagnostics of its own
    pub fn fork(&self) -> ParsingContext<'t> {
        ParsingContext {
            cursor: self.cursor.fork(),
            diagnostics: Vec::new(),
            file_name: self.file_name,
        }
    }

    /// Adopt the child's position and append its diagnostics
    pub fn merge(&mut self, child: ParsingContext<'t>) {
        trace!(from = self.cursor.position(), to = child.cursor.position(), "merge fork");
        self.cursor.restore(child.cursor.position());
        self.diagnostics.extend(child.diagnostics);
    }

    pub fn file_name(&self) -> &'t str {
        self.file_name
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn current(&self) -> &'t Token {
        self.cursor.current()
    }

    /// The `offset`-th significant token on this line, counting the current one as 0
    pub fn peek(&self, offset: usize) -> &'t Token {
        self.cursor.peek_next_non_white_space(offset)
    }

    /// Consume the current token and any inline whitespace after it
    pub fn advance(&mut self) {
        self.cursor.advance_non_white_space();
    }

    pub fn skip_white_space(&mut self) {
        self.cursor.skip_white_space();
    }

    pub fn skip_lines(&mut self) {
        self.cursor.skip_lines();
    }

    pub fn scope_depth(&self) -> usize {
        self.cursor.scope_depth()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// End of the last token consumed
    pub fn previous_end(&self) -> FilePosition {
        self.cursor.previous_end()
    }

    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().kind.is_keyword(keyword)
    }

    pub fn check_operator(&self, operator: Operator) -> bool {
        self.current().kind.is_operator(operator)
    }

    pub fn check_punctuation(&self, punctuation: Punctuation) -> bool {
        self.current().kind.is_punctuation(punctuation)
    }

    /// Consume the current token if it is `punctuation`
    pub fn match_punctuation(&mut self, punctuation: Punctuation) -> bool {
        if self.check_punctuation(punctuation) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True at `;`, a line break, `}` or the end of input
    pub fn at_statement_end(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::EndOfStatement | TokenKind::EndOfLine | TokenKind::EndOfFile
        ) || self.check_punctuation(Punctuation::CloseBrace)
    }

    pub fn report(&mut self, kind: DiagnosticKind, start: FilePosition, end: FilePosition) {
        let diagnostic = Diagnostic::new(kind, start, end, self.file_name);
        self.diagnostics.push(diagnostic);
    }

    /// Report at the span of the current token
    pub fn report_here(&mut self, kind: DiagnosticKind) {
        let token = self.current();
        self.report(kind, token.start, token.end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_dropped_fork_leaves_parent_untouched() {
        let (tokens, _) = tokenize("a b c", "t.plp");
        let ctx = ParsingContext::new(&tokens, "t.plp");

        let mut child = ctx.fork();
        child.advance();
        child.report_here(DiagnosticKind::ExpectedExpression);
        drop(child);

        assert_eq!(ctx.position(), 0);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_merge_adopts_position_and_diagnostics() {
        let (tokens, _) = tokenize("a b c", "t.plp");
        let mut ctx = ParsingContext::new(&tokens, "t.plp");
        ctx.report_here(DiagnosticKind::InvalidStatement);

        let mut child = ctx.fork();
        child.advance();
        child.report_here(DiagnosticKind::ExpectedExpression);
        let child_position = child.position();
        ctx.merge(child);

        assert_eq!(ctx.position(), child_position);
        let codes: Vec<_> = ctx.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec!["PRS1011", "PRS1002"]);
    }

    #[test]
    fn test_statement_end() {
        let (tokens, _) = tokenize("a;}", "t.plp");
        let mut ctx = ParsingContext::new(&tokens, "t.plp");
        assert!(!ctx.at_statement_end());
        ctx.advance();
        assert!(ctx.at_statement_end());
        ctx.advance();
        assert!(ctx.at_statement_end());
        assert!(ctx.match_punctuation(Punctuation::CloseBrace));
        assert!(ctx.is_at_end());
    }
}
