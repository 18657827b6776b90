//! blc-par - Recursive-descent parsing.
//!
//! Consumes the token sequence from `blc-lex` and produces the AST in
//! `ast`. The parser has exactly one error-recovery
//! posture: the first syntax error abandons the parse of the enclosing
//! function, and a bad top-level item makes `parse_program` return `None`
//! rather than a partial tree — there is no partial-program compilation
//! mode.

mod ast;
mod parser;

pub use ast::{BinOp, Expr, Function, Program, Stmt};
pub use parser::Parser;

#[cfg(test)]
mod tests {
    use blc_lex::Lexer;
    use blc_util::{Handler, Interner};

    use super::*;

    fn parse(src: &str) -> (Option<Program>, bool) {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut interner, &mut handler).tokenize();
        let program = Parser::new(tokens, &mut handler).parse_program();
        (program, handler.has_errors())
    }

    #[test]
    fn empty_source_parses_to_an_empty_program() {
        let (program, has_errors) = parse("");
        let program = program.expect("empty source is a valid program");
        assert!(!has_errors);
        assert!(program.globals.is_empty());
        assert!(program.functions.is_empty());
    }

    #[test]
    fn a_bare_trailing_semicolon_declares_a_global() {
        let (program, has_errors) = parse("count;");
        let program = program.unwrap();
        assert!(!has_errors);
        assert_eq!(program.globals.len(), 1);
        assert!(program.functions.is_empty());
    }

    #[test]
    fn a_minimal_function_parses_with_no_parameters() {
        let (program, has_errors) = parse("main() { return 0; }");
        let program = program.unwrap();
        assert!(!has_errors);
        assert_eq!(program.functions.len(), 1);
        let main = &program.functions[0];
        assert_eq!(main.body.len(), 1);
        match &main.body[0] {
            Stmt::Return(Some(Expr::IntLiteral(0))) => {},
            other => panic!("expected `return 0;`, got {other:?}"),
        }
    }

    #[test]
    fn auto_and_extern_accept_comma_separated_names() {
        let (program, has_errors) = parse("main() { auto a, b, c; extern x, y; return; }");
        let program = program.unwrap();
        assert!(!has_errors);
        match &program.functions[0].body[0] {
            Stmt::Auto(names) => assert_eq!(names.len(), 3),
            other => panic!("expected auto decl, got {other:?}"),
        }
        match &program.functions[0].body[1] {
            Stmt::Extern(names) => assert_eq!(names.len(), 2),
            other => panic!("expected extern decl, got {other:?}"),
        }
    }

    #[test]
    fn assignment_and_call_statements_are_disambiguated_by_the_next_token() {
        let (program, has_errors) = parse("main() { x = 1; foo(x); bar(); return; }");
        let program = program.unwrap();
        assert!(!has_errors);
        let body = &program.functions[0].body;
        assert!(matches!(body[0], Stmt::Assign(_, _, Expr::IntLiteral(1))));
        assert!(matches!(body[1], Stmt::FuncCall(_, Some(Expr::Ident(_, _)))));
        assert!(matches!(body[2], Stmt::FuncCall(_, None)));
    }

    #[test]
    fn binary_operators_left_fold_with_no_precedence_climbing() {
        // 2 + 3 * 4 parses as ((2 + 3) * 4), not (2 + (3 * 4)), because
        // there is exactly one precedence level.
        let (program, has_errors) = parse("main() { auto x; x = 2 + 3 * 4; return x; }");
        let program = program.unwrap();
        assert!(!has_errors);
        match &program.functions[0].body[1] {
            Stmt::Assign(_, _, Expr::Binary(BinOp::Mul, lhs, rhs)) => {
                assert!(matches!(**lhs, Expr::Binary(BinOp::Add, _, _)));
                assert!(matches!(**rhs, Expr::IntLiteral(4)));
            },
            other => panic!("expected a left-folded multiplication, got {other:?}"),
        }
    }

    #[test]
    fn if_without_an_else_leaves_the_else_branch_empty() {
        let (program, has_errors) = parse("main() { if (x) return 1; return 0; }");
        let program = program.unwrap();
        assert!(!has_errors);
        match &program.functions[0].body[0] {
            Stmt::If(_, _, None) => {},
            other => panic!("expected an if with no else, got {other:?}"),
        }
    }

    #[test]
    fn if_else_and_while_nest_through_single_statement_bodies() {
        let (program, has_errors) = parse(
            "main() { if (x) { y = 1; } else { y = 2; } while (y) { y = y - 1; } return; }",
        );
        let program = program.unwrap();
        assert!(!has_errors);
        assert!(matches!(program.functions[0].body[0], Stmt::If(_, _, Some(_))));
        assert!(matches!(program.functions[0].body[1], Stmt::While(_, _)));
    }

    #[test]
    fn a_missing_closing_paren_is_a_syntax_error_and_yields_no_program() {
        let (program, has_errors) = parse("main() { if (x return 1; }");
        assert!(program.is_none());
        assert!(has_errors);
    }

    #[test]
    fn a_dangling_identifier_statement_is_a_syntax_error() {
        let (program, has_errors) = parse("main() { x + 1; return; }");
        assert!(program.is_none());
        assert!(has_errors);
    }

    #[test]
    fn an_unterminated_function_body_is_a_syntax_error() {
        let (program, has_errors) = parse("main() { return 0;");
        assert!(program.is_none());
        assert!(has_errors);
    }
}
