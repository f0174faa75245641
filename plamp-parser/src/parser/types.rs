//! Type references: a word followed by array suffixes

use super::Parser;
use crate::ast::{NodeId, NodeKind};
use crate::context::ParsingContext;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::token::{Punctuation, TokenKind};
use crate::types::PlampType;

impl Parser {
    /// `name`, `name[]`, `name[][]`, `name[,]`
    pub(super) fn try_parse_type(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let token = ctx.current();
        let Some(name) = token.kind.word() else {
            ctx.report_here(DiagnosticKind::ExpectedTypeName);
            return Ok(None);
        };
        let start = token.start;
        ctx.advance();

        let mut dims = Vec::new();
        while ctx.check_punctuation(Punctuation::OpenBracket) && is_rank_suffix(ctx) {
            let open = ctx.current().start;
            ctx.advance();
            let mut commas = 0usize;
            while ctx.match_punctuation(Punctuation::Comma) {
                commas += 1;
            }
            if !ctx.match_punctuation(Punctuation::CloseBracket) {
                ctx.report_here(DiagnosticKind::ExpectedCloseBracket);
                return Ok(None);
            }
            let Ok(rank) = u8::try_from(commas + 1) else {
                let end = ctx.previous_end();
                ctx.report(DiagnosticKind::ArrayRankTooLarge(commas + 1), open, end);
                return Ok(None);
            };
            dims.push(rank);
        }

        self.finish(ctx, NodeKind::TypeRef { name, dims }, start).map(Some)
    }

    /// Whether a type node names a built-in type
    pub(super) fn is_builtin_type(&self, node: NodeId) -> bool {
        matches!(self.ast.kind(node), NodeKind::TypeRef { name, .. } if PlampType::builtin(name.as_str()).is_some())
    }
}

/// `[` followed by `]` or `,` opens an array suffix rather than an indexer
fn is_rank_suffix(ctx: &ParsingContext<'_>) -> bool {
    matches!(
        ctx.peek(1).kind,
        TokenKind::Punctuation(Punctuation::CloseBracket) | TokenKind::Punctuation(Punctuation::Comma)
    )
}
