//! Statements and bodies

use super::Parser;
use crate::ast::{AssignOp, NodeId, NodeKind, UnaryOp};
use crate::context::ParsingContext;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::token::{Keyword, Operator, Punctuation, TokenKind, PREFIX_BINDING_POWER};
use tracing::trace;

impl Parser {
    /// Parse one statement. A failure may leave nothing in `ctx`; callers run
    /// this in a fork and report the invalid statement themselves.
    pub(super) fn try_parse_statement(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        match ctx.current().kind {
            TokenKind::Keyword(Keyword::If) => return self.try_parse_condition(ctx),
            TokenKind::Keyword(Keyword::While) => return self.try_parse_while(ctx),
            TokenKind::Keyword(Keyword::Return) => return self.try_parse_return(ctx),
            TokenKind::Keyword(Keyword::Break) => return self.try_parse_jump(ctx, NodeKind::Break),
            TokenKind::Keyword(Keyword::Continue) => return self.try_parse_jump(ctx, NodeKind::Continue),
            TokenKind::Punctuation(Punctuation::OpenBrace) => return self.try_parse_block(ctx),
            _ => {}
        }

        let mut fork = ctx.fork();
        if let Some(node) = self.try_parse_definition(&mut fork)? {
            ctx.merge(fork);
            return self.end_statement(ctx, node);
        }
        let mut fork = ctx.fork();
        if let Some(node) = self.try_parse_assignment(&mut fork)? {
            ctx.merge(fork);
            return self.end_statement(ctx, node);
        }
        let mut fork = ctx.fork();
        if let Some(node) = self.try_parse_expression_statement(&mut fork)? {
            ctx.merge(fork);
            return self.end_statement(ctx, node);
        }
        Ok(None)
    }

    /// A brace block, `;` for an empty body, or a single statement. The
    /// statement may sit on the next line when it is indented deeper.
    pub(super) fn try_parse_body(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let mut lookahead = ctx.fork();
        lookahead.skip_lines();
        if lookahead.check_punctuation(Punctuation::OpenBrace) {
            ctx.merge(lookahead);
            return self.try_parse_block(ctx);
        }

        match ctx.current().kind {
            TokenKind::EndOfStatement => {
                let start = ctx.current().start;
                ctx.advance();
                return self.finish(ctx, NodeKind::Body { statements: Vec::new() }, start).map(Some);
            }
            TokenKind::EndOfLine | TokenKind::EndOfFile => {
                let depth = ctx.scope_depth();
                let mut lookahead = ctx.fork();
                lookahead.skip_lines();
                if lookahead.is_at_end() || lookahead.scope_depth() <= depth {
                    ctx.report_here(DiagnosticKind::ExpectedToken("{".to_string()));
                    let at = ctx.previous_end();
                    return self.finish_at(NodeKind::Body { statements: Vec::new() }, at, at).map(Some);
                }
                ctx.merge(lookahead);
            }
            _ => {}
        }

        let start = ctx.current().start;
        let mut fork = ctx.fork();
        match self.try_parse_statement(&mut fork)? {
            Some(statement) => {
                ctx.merge(fork);
                self.finish(ctx, NodeKind::Body { statements: vec![statement] }, start).map(Some)
            }
            None => {
                ctx.report_here(DiagnosticKind::InvalidStatement);
                Ok(None)
            }
        }
    }

    /// `{ statements }`. A statement that fails is skipped one token at a
    /// time; a run of failures is reported once. A missing `}` is reported and
    /// the statements parsed so far are kept.
    pub(super) fn try_parse_block(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();

        let mut statements = Vec::new();
        let mut failing = false;
        loop {
            ctx.skip_lines();
            if ctx.match_punctuation(Punctuation::CloseBrace) {
                break;
            }
            if ctx.is_at_end() {
                ctx.report_here(DiagnosticKind::ExpectedToken("}".to_string()));
                break;
            }
            if ctx.current().kind == TokenKind::EndOfStatement {
                ctx.advance();
                continue;
            }

            let mut fork = ctx.fork();
            match self.try_parse_statement(&mut fork)? {
                Some(statement) => {
                    ctx.merge(fork);
                    statements.push(statement);
                    failing = false;
                }
                None => {
                    if !failing {
                        trace!(position = ctx.position(), "invalid statement, skipping");
                        ctx.report_here(DiagnosticKind::InvalidStatement);
                        failing = true;
                    }
                    ctx.advance();
                }
            }
        }

        self.finish(ctx, NodeKind::Body { statements }, start).map(Some)
    }

    /// `if (predicate) body [else body]`
    fn try_parse_condition(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let Some(predicate) = self.try_parse_predicate(ctx)? else {
            return Ok(None);
        };
        let Some(if_clause) = self.try_parse_body(ctx)? else {
            return Ok(None);
        };

        let mut else_clause = None;
        let mut lookahead = ctx.fork();
        lookahead.skip_lines();
        if lookahead.check_keyword(Keyword::Else) {
            ctx.merge(lookahead);
            ctx.advance();
            let Some(clause) = self.try_parse_body(ctx)? else {
                return Ok(None);
            };
            else_clause = Some(clause);
        }

        let kind = NodeKind::Condition { predicate, if_clause, else_clause };
        self.finish(ctx, kind, start).map(Some)
    }

    /// `while (predicate) body`
    fn try_parse_while(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let Some(predicate) = self.try_parse_predicate(ctx)? else {
            return Ok(None);
        };
        let Some(body) = self.try_parse_body(ctx)? else {
            return Ok(None);
        };
        self.finish(ctx, NodeKind::While { predicate, body }, start).map(Some)
    }

    /// A predicate, usually parenthesised. A missing `)` is reported and the
    /// predicate kept.
    fn try_parse_predicate(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        if !ctx.match_punctuation(Punctuation::OpenParen) {
            return self.try_parse_expression(ctx, 0);
        }
        ctx.skip_lines();
        let Some(predicate) = self.try_parse_expression(ctx, 0)? else {
            return Ok(None);
        };
        ctx.skip_lines();
        if !ctx.match_punctuation(Punctuation::CloseParen) {
            ctx.report_here(DiagnosticKind::ExpectedCloseParen);
        }
        Ok(Some(predicate))
    }

    fn try_parse_return(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let value = if ctx.at_statement_end() {
            None
        } else {
            let Some(value) = self.try_parse_expression(ctx, 0)? else {
                return Ok(None);
            };
            Some(value)
        };
        let node = self.finish(ctx, NodeKind::Return { value }, start)?;
        self.end_statement(ctx, node)
    }

    fn try_parse_jump(&mut self, ctx: &mut ParsingContext<'_>, kind: NodeKind) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let node = self.finish(ctx, kind, start)?;
        self.end_statement(ctx, node)
    }

    /// `type name` or `type name := value`
    fn try_parse_definition(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        let Some(ty) = self.try_parse_type(ctx)? else {
            return Ok(None);
        };
        let Some(name) = ctx.current().kind.word() else {
            return Ok(None);
        };
        ctx.advance();
        let definition = self.finish(ctx, NodeKind::VariableDefinition { ty: Some(ty), name }, start)?;

        if ctx.at_statement_end() {
            return Ok(Some(definition));
        }
        if !ctx.check_operator(Operator::Assign) {
            return Ok(None);
        }
        ctx.advance();
        let Some(value) = self.try_parse_expression(ctx, 0)? else {
            return Ok(None);
        };
        let kind = NodeKind::Assign { op: AssignOp::Assign, target: definition, value };
        self.finish(ctx, kind, start).map(Some)
    }

    /// `target := value` and the compound forms
    fn try_parse_assignment(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        let Some(target) = self.try_parse_expression(ctx, PREFIX_BINDING_POWER)? else {
            return Ok(None);
        };
        if !matches!(
            self.ast.kind(target),
            NodeKind::Member { .. } | NodeKind::MemberAccess { .. } | NodeKind::IndexAccess { .. }
        ) {
            return Ok(None);
        }
        let TokenKind::Operator(operator) = ctx.current().kind else {
            return Ok(None);
        };
        let Some(op) = assign_op(operator) else {
            return Ok(None);
        };
        ctx.advance();
        let Some(value) = self.try_parse_expression(ctx, 0)? else {
            return Ok(None);
        };
        self.finish(ctx, NodeKind::Assign { op, target, value }, start).map(Some)
    }

    /// Calls, constructor calls and increments are the only expressions that
    /// stand alone as statements
    fn try_parse_expression_statement(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let Some(expression) = self.try_parse_expression(ctx, 0)? else {
            return Ok(None);
        };
        let allowed = match self.ast.kind(expression) {
            NodeKind::Call { .. } | NodeKind::ConstructorCall { .. } => true,
            NodeKind::Unary { op, .. } => !matches!(op, UnaryOp::Negate | UnaryOp::Not),
            _ => false,
        };
        Ok(allowed.then_some(expression))
    }

    /// Consume the terminator of a simple statement. Anything else before the
    /// end of the line is reported and skipped.
    pub(super) fn end_statement(&mut self, ctx: &mut ParsingContext<'_>, node: NodeId) -> Result<Option<NodeId>> {
        if ctx.current().kind == TokenKind::EndOfStatement {
            ctx.advance();
            return Ok(Some(node));
        }
        if ctx.at_statement_end() {
            return Ok(Some(node));
        }

        let start = ctx.current().start;
        while !ctx.at_statement_end() {
            ctx.advance();
        }
        let end = ctx.previous_end().max(start);
        ctx.report(DiagnosticKind::ExpectedEndOfStatement, start, end);
        if ctx.current().kind == TokenKind::EndOfStatement {
            ctx.advance();
        }
        Ok(Some(node))
    }
}

fn assign_op(operator: Operator) -> Option<AssignOp> {
    let op = match operator {
        Operator::Assign => AssignOp::Assign,
        Operator::PlusAssign => AssignOp::Plus,
        Operator::MinusAssign => AssignOp::Minus,
        Operator::StarAssign => AssignOp::Multiply,
        Operator::SlashAssign => AssignOp::Divide,
        Operator::PercentAssign => AssignOp::Modulo,
        Operator::AndAssign => AssignOp::BitwiseAnd,
        Operator::OrAssign => AssignOp::BitwiseOr,
        Operator::XorAssign => AssignOp::Xor,
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::printer::print_node;

    fn parse(text: &str) -> (String, Vec<&'static str>) {
        let (tokens, _) = tokenize(text, "t.plp");
        let mut ctx = ParsingContext::new(&tokens, "t.plp");
        let mut parser = Parser::new();
        let node = parser.try_parse_block(&mut ctx).unwrap();
        let printed = node.map(|n| print_node(parser.ast(), n)).unwrap_or_default();
        let codes = ctx.diagnostics().iter().map(|d| d.code()).collect();
        (printed, codes)
    }

    #[test]
    fn test_definitions_and_assignments() {
        let (printed, codes) = parse("{ int a; long b := 1l; c := a; xs[0] += 2 }");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(
            printed,
            "{ Def(int a); Assign(Def(long b), 1l); Assign(c, a); PlusAssign(Index(xs, 0i), 2i) }"
        );
    }

    #[test]
    fn test_expression_statements() {
        let (printed, codes) = parse("{\n    print(1)\n    i++\n}");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(printed, "{ Call(print, 1i); PostfixIncrement(i) }");
    }

    #[test]
    fn test_condition_with_else_on_next_line() {
        let (printed, codes) = parse("{ if (a) return 1;\n else return 2; }");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(printed, "{ If(a, { Return(1i) }, { Return(2i) }) }");
    }

    #[test]
    fn test_indented_body_on_next_line() {
        let (printed, codes) = parse("{\nwhile (i < 3)\n    i++\n}");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(printed, "{ While(Less(i, 3i), { PostfixIncrement(i) }) }");
    }

    #[test]
    fn test_failure_run_is_reported_once() {
        let (printed, codes) = parse("{ 1 2 3; print(x) }");
        assert_eq!(codes, vec!["PRS1011"]);
        assert_eq!(printed, "{ Call(print, x) }");
    }

    #[test]
    fn test_missing_close_brace_keeps_statements() {
        let (printed, codes) = parse("{ a := 1;\n b := 2;");
        assert_eq!(codes, vec!["PRS1001"]);
        assert_eq!(printed, "{ Assign(a, 1i); Assign(b, 2i) }");
    }

    #[test]
    fn test_junk_after_statement() {
        let (printed, codes) = parse("{ break 1 2\n}");
        assert_eq!(codes, vec!["PRS1010"]);
        assert_eq!(printed, "{ Break }");
    }

    #[test]
    fn test_assignment_is_not_an_expression() {
        let (_, codes) = parse("{ a := b := c }");
        assert_eq!(codes, vec!["PRS1010"]);
    }
}
