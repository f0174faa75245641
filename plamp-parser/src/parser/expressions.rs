//! Pratt expression engine
//!
//! A null denotation (literal, name, call, `new`, cast, parenthesised
//! expression or prefix operator) is followed by postfix operators and then
//! by binary operators whose binding power beats the caller's minimum.

use super::Parser;
use crate::ast::{BinaryOp, NodeId, NodeKind, UnaryOp};
use crate::context::ParsingContext;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::position::FilePosition;
use crate::token::{Keyword, Operator, Punctuation, TokenKind, PREFIX_BINDING_POWER};
use tracing::trace;

impl Parser {
    /// Parse an expression whose binary operators all bind tighter than `min_binding_power`
    pub(super) fn try_parse_expression(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        min_binding_power: u8,
    ) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        let Some(nud) = self.try_parse_prefix(ctx)? else {
            return Ok(None);
        };
        let Some(mut left) = self.try_parse_postfix(ctx, nud, start)? else {
            return Ok(None);
        };

        loop {
            let TokenKind::Operator(operator) = ctx.current().kind else {
                break;
            };
            let Some(binding_power) = operator.binding_power() else {
                break;
            };
            if binding_power <= min_binding_power {
                break;
            }
            let Some(op) = binary_op(operator) else {
                break;
            };

            ctx.advance();
            ctx.skip_lines();
            let Some(right) = self.try_parse_expression(ctx, binding_power)? else {
                return Ok(None);
            };
            left = self.finish(ctx, NodeKind::Binary { op, left, right }, start)?;
        }

        Ok(Some(left))
    }

    fn try_parse_prefix(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let token = ctx.current();
        let start = token.start;
        match &token.kind {
            TokenKind::Literal(value) => {
                let value = value.clone();
                ctx.advance();
                self.finish(ctx, NodeKind::Literal { value }, start).map(Some)
            }
            TokenKind::Word(name) => {
                let name = *name;
                ctx.advance();
                if ctx.check_punctuation(Punctuation::OpenParen) {
                    let Some(args) = self.try_parse_arguments(ctx)? else {
                        return Ok(None);
                    };
                    self.finish(ctx, NodeKind::Call { name, args }, start).map(Some)
                } else {
                    self.finish(ctx, NodeKind::Member { name }, start).map(Some)
                }
            }
            TokenKind::Keyword(Keyword::New) => self.try_parse_new(ctx),
            TokenKind::Operator(operator) => {
                let op = match operator {
                    Operator::Minus => UnaryOp::Negate,
                    Operator::Bang => UnaryOp::Not,
                    Operator::Increment => UnaryOp::PrefixIncrement,
                    Operator::Decrement => UnaryOp::PrefixDecrement,
                    _ => {
                        ctx.report_here(DiagnosticKind::ExpectedExpression);
                        return Ok(None);
                    }
                };
                ctx.advance();
                let Some(operand) = self.try_parse_expression(ctx, PREFIX_BINDING_POWER)? else {
                    return Ok(None);
                };
                self.finish(ctx, NodeKind::Unary { op, operand }, start).map(Some)
            }
            TokenKind::Punctuation(Punctuation::OpenParen) => {
                let mut fork = ctx.fork();
                if let Some(cast) = self.try_parse_cast(&mut fork)? {
                    ctx.merge(fork);
                    return Ok(Some(cast));
                }
                trace!(position = ctx.position(), "not a cast, parsing parenthesized expression");
                self.try_parse_parenthesized(ctx)
            }
            _ => {
                ctx.report_here(DiagnosticKind::ExpectedExpression);
                Ok(None)
            }
        }
    }

    /// Member access, indexers and postfix increments applied to `target`
    fn try_parse_postfix(
        &mut self,
        ctx: &mut ParsingContext<'_>,
        mut target: NodeId,
        start: FilePosition,
    ) -> Result<Option<NodeId>> {
        loop {
            if ctx.check_punctuation(Punctuation::Dot) {
                ctx.advance();
                let Some(member) = ctx.current().kind.word() else {
                    ctx.report_here(DiagnosticKind::ExpectedToken("member name".to_string()));
                    return Ok(None);
                };
                ctx.advance();
                target = self.finish(ctx, NodeKind::MemberAccess { from: target, member }, start)?;
            } else if ctx.check_punctuation(Punctuation::OpenBracket) {
                ctx.advance();
                let Some(index) = self.try_parse_expression(ctx, 0)? else {
                    return Ok(None);
                };
                if !ctx.match_punctuation(Punctuation::CloseBracket) {
                    ctx.report_here(DiagnosticKind::ExpectedCloseBracket);
                }
                target = self.finish(ctx, NodeKind::IndexAccess { target, index }, start)?;
            } else if ctx.check_operator(Operator::Increment) || ctx.check_operator(Operator::Decrement) {
                let op = if ctx.check_operator(Operator::Increment) {
                    UnaryOp::PostfixIncrement
                } else {
                    UnaryOp::PostfixDecrement
                };
                ctx.advance();
                target = self.finish(ctx, NodeKind::Unary { op, operand: target }, start)?;
            } else {
                return Ok(Some(target));
            }
        }
    }

    /// `(a, b, ...)`; a missing `)` is reported and the arguments are kept
    pub(super) fn try_parse_arguments(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<Vec<NodeId>>> {
        if !ctx.match_punctuation(Punctuation::OpenParen) {
            ctx.report_here(DiagnosticKind::ExpectedToken("(".to_string()));
            return Ok(None);
        }
        ctx.skip_lines();

        let mut args = Vec::new();
        if ctx.match_punctuation(Punctuation::CloseParen) {
            return Ok(Some(args));
        }
        loop {
            let Some(arg) = self.try_parse_expression(ctx, 0)? else {
                return Ok(None);
            };
            args.push(arg);
            ctx.skip_lines();
            if ctx.match_punctuation(Punctuation::Comma) {
                ctx.skip_lines();
                continue;
            }
            if !ctx.match_punctuation(Punctuation::CloseParen) {
                ctx.report_here(DiagnosticKind::ExpectedCloseParen);
            }
            return Ok(Some(args));
        }
    }

    /// `new T(args)` or `new T[length]`
    fn try_parse_new(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();

        let type_start = ctx.current().start;
        let Some(name) = ctx.current().kind.word() else {
            ctx.report_here(DiagnosticKind::ExpectedTypeName);
            return Ok(None);
        };
        ctx.advance();
        let ty = self.finish(ctx, NodeKind::TypeRef { name, dims: Vec::new() }, type_start)?;

        if ctx.check_punctuation(Punctuation::OpenBracket) {
            ctx.advance();
            let Some(length) = self.try_parse_expression(ctx, 0)? else {
                return Ok(None);
            };
            if !ctx.match_punctuation(Punctuation::CloseBracket) {
                ctx.report_here(DiagnosticKind::ExpectedCloseBracket);
            }
            return self
                .finish(ctx, NodeKind::ArrayInit { element_ty: ty, length }, start)
                .map(Some);
        }

        let Some(args) = self.try_parse_arguments(ctx)? else {
            return Ok(None);
        };
        self.finish(ctx, NodeKind::ConstructorCall { ty, args }, start).map(Some)
    }

    /// `(type) operand`. Accepted when the type is built in, or when the
    /// token after `)` can only start an operand.
    fn try_parse_cast(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let Some(to) = self.try_parse_type(ctx)? else {
            return Ok(None);
        };
        if !ctx.match_punctuation(Punctuation::CloseParen) {
            return Ok(None);
        }
        let operand_follows = matches!(
            ctx.current().kind,
            TokenKind::Word(_) | TokenKind::Literal(_) | TokenKind::Punctuation(Punctuation::OpenParen)
        );
        if !self.is_builtin_type(to) && !operand_follows {
            return Ok(None);
        }

        let Some(inner) = self.try_parse_expression(ctx, PREFIX_BINDING_POWER)? else {
            return Ok(None);
        };
        self.finish(ctx, NodeKind::Cast { to, inner, from: None }, start).map(Some)
    }

    /// `( expression )`; a missing `)` is reported and the inner expression kept
    fn try_parse_parenthesized(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        ctx.advance();
        ctx.skip_lines();
        let Some(inner) = self.try_parse_expression(ctx, 0)? else {
            return Ok(None);
        };
        ctx.skip_lines();
        if !ctx.match_punctuation(Punctuation::CloseParen) {
            ctx.report_here(DiagnosticKind::ExpectedCloseParen);
        }
        Ok(Some(inner))
    }
}

fn binary_op(operator: Operator) -> Option<BinaryOp> {
    let op = match operator {
        Operator::Plus => BinaryOp::Plus,
        Operator::Minus => BinaryOp::Minus,
        Operator::Star => BinaryOp::Multiply,
        Operator::Slash => BinaryOp::Divide,
        Operator::Percent => BinaryOp::Modulo,
        Operator::Less => BinaryOp::Less,
        Operator::LessEqual => BinaryOp::LessOrEqual,
        Operator::Greater => BinaryOp::Greater,
        Operator::GreaterEqual => BinaryOp::GreaterOrEqual,
        Operator::Equal => BinaryOp::Equal,
        Operator::NotEqual => BinaryOp::NotEqual,
        Operator::AndAnd => BinaryOp::And,
        Operator::OrOr => BinaryOp::Or,
        Operator::Ampersand => BinaryOp::BitwiseAnd,
        Operator::Pipe => BinaryOp::BitwiseOr,
        Operator::Caret => BinaryOp::Xor,
        _ => return None,
    };
    Some(op)
}
