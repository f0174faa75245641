//! Top-level declarations: module definitions, imports and functions

use super::Parser;
use crate::ast::{ModulePath, NodeId, NodeKind};
use crate::context::ParsingContext;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::position::FilePosition;
use crate::symbol::Symbol;
use crate::token::{Keyword, Punctuation, TokenKind};
use crate::types::PlampType;
use tracing::{debug, trace};

impl Parser {
    /// Parse a whole source file. Each top-level item commits on its own; a
    /// failed item is skipped up to the next `fn`, `module` or `use`.
    pub fn parse_root(&mut self, ctx: &mut ParsingContext<'_>) -> Result<NodeId> {
        let mut modules = Vec::new();
        let mut imports = Vec::new();
        let mut functions = Vec::new();

        loop {
            ctx.skip_lines();
            let item_position = ctx.position();
            let parsed = match ctx.current().kind {
                TokenKind::EndOfFile => break,
                TokenKind::EndOfStatement => {
                    ctx.advance();
                    continue;
                }
                TokenKind::Keyword(Keyword::Module) => self.try_parse_module_def(ctx)?.map(|n| modules.push(n)),
                TokenKind::Keyword(Keyword::Use) => self.try_parse_import(ctx)?.map(|n| imports.push(n)),
                TokenKind::Keyword(Keyword::Fn) => self.try_parse_function(ctx)?.map(|n| functions.push(n)),
                _ => {
                    skip_top_level_run(ctx);
                    continue;
                }
            };
            if parsed.is_none() {
                recover_top_level(ctx, item_position);
            }
        }

        debug!(
            modules = modules.len(),
            imports = imports.len(),
            functions = functions.len(),
            "parsed top-level items"
        );
        let end = ctx.current().end;
        self.finish_at(NodeKind::Root { modules, imports, functions }, FilePosition::START, end)
    }

    /// `module a.b;`
    fn try_parse_module_def(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let Some(path) = parse_module_path(ctx) else {
            return Ok(None);
        };
        let node = self.finish(ctx, NodeKind::ModuleDef { path }, start)?;
        self.end_statement(ctx, node)
    }

    /// `use a.b;`
    fn try_parse_import(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();
        let Some(path) = parse_module_path(ctx) else {
            return Ok(None);
        };
        let node = self.finish(ctx, NodeKind::Import { path }, start)?;
        self.end_statement(ctx, node)
    }

    /// `fn [type] name(type a, ...) body`
    fn try_parse_function(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        ctx.advance();

        let mut fork = ctx.fork();
        let (return_type, name) = match self.try_parse_typed_header(&mut fork)? {
            Some((return_type, name)) => {
                ctx.merge(fork);
                (Some(return_type), name)
            }
            None => {
                trace!(position = ctx.position(), "function header without return type");
                match ctx.current().kind.word() {
                    Some(name) if PlampType::builtin(name.as_str()).is_none() => {
                        ctx.advance();
                        (None, name)
                    }
                    _ => {
                        ctx.report_here(DiagnosticKind::ExpectedFunctionName);
                        return Ok(None);
                    }
                }
            }
        };

        let Some(params) = self.try_parse_parameters(ctx)? else {
            return Ok(None);
        };
        let Some(body) = self.try_parse_body(ctx)? else {
            return Ok(None);
        };

        let kind = NodeKind::FuncDef { return_type, name, params, body };
        self.finish(ctx, kind, start).map(Some)
    }

    /// `type name` directly followed by `(`
    fn try_parse_typed_header(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<(NodeId, Symbol)>> {
        let Some(return_type) = self.try_parse_type(ctx)? else {
            return Ok(None);
        };
        let Some(name) = ctx.current().kind.word() else {
            return Ok(None);
        };
        ctx.advance();
        if !ctx.check_punctuation(Punctuation::OpenParen) {
            return Ok(None);
        }
        Ok(Some((return_type, name)))
    }

    /// `(type a, type b)`. A parameter that fails to parse aborts the list; a
    /// missing `)` after a valid list is reported and the list kept.
    fn try_parse_parameters(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<Vec<NodeId>>> {
        if !ctx.match_punctuation(Punctuation::OpenParen) {
            ctx.report_here(DiagnosticKind::ExpectedToken("(".to_string()));
            return Ok(None);
        }
        ctx.skip_lines();

        let mut params = Vec::new();
        if ctx.match_punctuation(Punctuation::CloseParen) {
            return Ok(Some(params));
        }
        loop {
            let mut fork = ctx.fork();
            match self.try_parse_parameter(&mut fork)? {
                Some(param) => {
                    ctx.merge(fork);
                    params.push(param);
                }
                None => {
                    ctx.report_here(DiagnosticKind::ExpectedArgumentDefinition);
                    return Ok(None);
                }
            }
            ctx.skip_lines();
            if ctx.match_punctuation(Punctuation::Comma) {
                ctx.skip_lines();
                continue;
            }
            if !ctx.match_punctuation(Punctuation::CloseParen) {
                ctx.report_here(DiagnosticKind::ExpectedCloseParen);
            }
            return Ok(Some(params));
        }
    }

    fn try_parse_parameter(&mut self, ctx: &mut ParsingContext<'_>) -> Result<Option<NodeId>> {
        let start = ctx.current().start;
        let Some(ty) = self.try_parse_type(ctx)? else {
            return Ok(None);
        };
        let Some(name) = ctx.current().kind.word() else {
            return Ok(None);
        };
        ctx.advance();
        self.finish(ctx, NodeKind::Parameter { ty, name }, start).map(Some)
    }
}

fn parse_module_path(ctx: &mut ParsingContext<'_>) -> Option<ModulePath> {
    let mut segments = Vec::new();
    loop {
        let Some(segment) = ctx.current().kind.word() else {
            ctx.report_here(DiagnosticKind::ExpectedModuleName);
            return None;
        };
        segments.push(segment);
        ctx.advance();
        if !ctx.match_punctuation(Punctuation::Dot) {
            return Some(ModulePath::new(segments));
        }
    }
}

fn starts_top_level_item(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Keyword(Keyword::Fn | Keyword::Module | Keyword::Use) | TokenKind::EndOfFile
    )
}

/// Skip tokens that cannot start a top-level item, reporting the run once
fn skip_top_level_run(ctx: &mut ParsingContext<'_>) {
    let start = ctx.current().start;
    while !starts_top_level_item(&ctx.current().kind) {
        ctx.advance();
    }
    let end = ctx.previous_end().max(start);
    ctx.report(DiagnosticKind::UnexpectedTopLevelToken, start, end);
}

/// Move past a failed item without reporting again
fn recover_top_level(ctx: &mut ParsingContext<'_>, item_position: usize) {
    if ctx.position() == item_position {
        ctx.advance();
    }
    while !starts_top_level_item(&ctx.current().kind) {
        ctx.advance();
    }
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
        let root = parser.parse_root(&mut ctx).unwrap();
        let codes = ctx.diagnostics().iter().map(|d| d.code()).collect();
        (print_node(parser.ast(), root), codes)
    }

    #[test]
    fn test_parse_module_and_imports() {
        let (printed, codes) = parse("module demo.math;\nuse std.io;\n");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(printed, "Root[Module(demo.math); Use(std.io)]");
    }

    #[test]
    fn test_function_with_and_without_return_type() {
        let (printed, codes) = parse("fn int sum(int a, int b) { return a + b; }\nfn log(string s) println(s);");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(
            printed,
            "Root[Fn(int sum(int a, int b) { Return(Plus(a, b)) }); Fn(log(string s) { Call(println, s) })]"
        );
    }

    #[test]
    fn test_empty_body() {
        let (printed, codes) = parse("fn dup(int a, string a);");
        assert!(codes.is_empty(), "{codes:?}");
        assert_eq!(printed, "Root[Fn(dup(int a, string a) {})]");
    }

    #[test]
    fn test_bad_parameter_aborts_the_function() {
        let (printed, codes) = parse("fn f(int a, 5) {}\nfn g() {}");
        assert_eq!(codes, vec!["PRS1003"]);
        assert_eq!(printed, "Root[Fn(g() {})]");
    }

    #[test]
    fn test_missing_close_paren_keeps_parameters() {
        let (printed, codes) = parse("fn f(int a {}");
        assert_eq!(codes, vec!["PRS1004"]);
        assert_eq!(printed, "Root[Fn(f(int a) {})]");
    }

    #[test]
    fn test_builtin_type_is_not_a_function_name() {
        let (_, codes) = parse("fn int() {}");
        assert_eq!(codes, vec!["PRS1006"]);
    }

    #[test]
    fn test_top_level_junk_is_one_diagnostic_per_run() {
        let (printed, codes) = parse("x y z\nfn f();\n1 2");
        assert_eq!(codes, vec!["PRS1009", "PRS1009"]);
        assert_eq!(printed, "Root[Fn(f() {})]");
    }

    #[test]
    fn test_missing_module_name() {
        let (printed, codes) = parse("module ;\nfn f();");
        assert_eq!(codes, vec!["PRS1007"]);
        assert_eq!(printed, "Root[Fn(f() {})]");
    }
}
