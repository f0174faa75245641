use plamp_parser::*;

const SAMPLE: &str = r#"module demo.math;          // module definition
use std.io;

fn int sum(int a, int b) { return a + b; }
fn greet(string who) println(who);
fn nothing();

fn long f(int[] xs) {
    total := 0l;
    int i;
    while (i < 10) {
        total += (long) xs[i];
        i++;
    }
    if (total > 100l) return total; else return 0l;
}
"#;

#[cfg(test)]
mod parser_tests {
    use super::*;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(|d| d.code()).collect()
    }

    fn expression(text: &str) -> String {
        let output = parse_expression(text).unwrap();
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        print_node(&output.ast, output.root.unwrap())
    }

    #[test]
    fn test_sample_module_parses_cleanly() {
        let output = parse(SAMPLE, "demo.plp").unwrap();
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

        let NodeKind::Root { modules, imports, functions } = output.ast.kind(output.root) else {
            panic!("root is not a Root node");
        };
        assert_eq!(modules.len(), 1);
        assert_eq!(imports.len(), 1);
        assert_eq!(functions.len(), 4);

        let printed = print_node(&output.ast, functions[3]);
        assert_eq!(
            printed,
            "Fn(long f(int[] xs) { Assign(total, 0l); Def(int i); \
             While(Less(i, 10i), { PlusAssign(total, Cast(long, Index(xs, i))); PostfixIncrement(i) }); \
             If(Greater(total, 100l), { Return(total) }, { Return(0l) }) })"
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(expression("1+2*3"), "Plus(1i, Multiply(2i, 3i))");
        assert_eq!(expression("(1+2)*3"), "Multiply(Plus(1i, 2i), 3i)");
        assert_eq!(expression("a | b ^ c & d"), "BitwiseOr(a, Xor(b, BitwiseAnd(c, d)))");
        assert_eq!(expression("a + b < c * d"), "Less(Plus(a, b), Multiply(c, d))");
    }

    #[test]
    fn test_every_reachable_node_has_a_span() {
        let output = parse(SAMPLE, "demo.plp").unwrap();
        for node in output.ast.descendants(output.root) {
            assert!(output.symbols.try_symbol(node).is_some(), "{node:?} has no span");
        }
    }

    #[test]
    fn test_spans_are_source_ranges() {
        let output = parse("fn f() {\n    x := 1 + 22;\n}", "f.plp").unwrap();
        let plus = output
            .ast
            .descendants(output.root)
            .into_iter()
            .find(|n| matches!(output.ast.kind(*n), NodeKind::Binary { .. }))
            .unwrap();
        assert_eq!(
            output.symbols.try_symbol(plus),
            Some((FilePosition::new(1, 9), FilePosition::new(1, 15)))
        );
    }

    #[test]
    fn test_duplicate_parameters_still_parse() {
        let output = parse("fn dup(int a, string a);", "dup.plp").unwrap();
        assert!(output.diagnostics.is_empty());
        assert_eq!(print_node(&output.ast, output.root), "Root[Fn(dup(int a, string a) {})]");
    }

    #[test]
    fn test_recovery_keeps_later_functions() {
        let source = "module m;\nfn f() {\n    ) ) )\n    ok()\n}\nfn g() {}\n";
        let output = parse(source, "m.plp").unwrap();
        assert_eq!(codes(&output.diagnostics), vec!["PRS1011"]);
        assert_eq!(
            print_node(&output.ast, output.root),
            "Root[Module(m); Fn(f() { Call(ok) }); Fn(g() {})]"
        );
    }

    #[test]
    fn test_failed_fork_leaves_parent_unchanged() {
        let (tokens, _) = tokenize("(1 + ", "x.plp");
        let ctx = ParsingContext::new(&tokens, "x.plp");
        let mut parser = Parser::new();

        let before_position = ctx.position();
        let before_diagnostics = ctx.diagnostics().to_vec();
        let mut fork = ctx.fork();
        let result = parser.parse_expression_public(&mut fork).unwrap();
        assert!(result.is_none());
        assert!(!fork.diagnostics().is_empty());
        drop(fork);

        assert_eq!(ctx.position(), before_position);
        assert_eq!(ctx.diagnostics(), before_diagnostics.as_slice());
    }
}
