// SPDX-License-Identifier: Unlicense
use crate::ast;
use anyhow::{anyhow, Result};
use std::{cell::RefCell, collections::BTreeMap};

#[derive(Debug)]
pub struct Context {
    pub arena: RefCell<ast::Arena>,
    // keyed by start offset; backtracking may visit a comment more than once
    pub comments: RefCell<BTreeMap<usize, (usize, String)>>,
}

impl Context {
    fn new() -> Self {
        Self {
            arena: RefCell::new(ast::Arena::new()),
            comments: RefCell::new(BTreeMap::new()),
        }
    }

    fn comment(&self, start: usize, end: usize, text: &str) {
        self.comments
            .borrow_mut()
            .entry(start)
            .or_insert_with(|| (end, text.to_string()));
    }

    fn alloc(&self, kind: ast::NodeKind, start: usize, end: usize) -> ast::Id {
        let mut arena = self.arena.borrow_mut();
        arena.alloc(ast::Node {
            kind,
            span: ast::Span::new(start, end),
        })
    }
}

peg::parser! {
    grammar main_parser(context: &Context) for str {
        #[cache]
        rule _() = quiet!{([' '|'\t'|'\r'|'\n'] / comment())*{}}

        rule comment() = s:position!() t:$("//" (!['\r' | '\n'] [_])*) e:position!() {
            context.comment(s, e, t)
        }

        rule node(r: rule<ast::NodeKind>) -> ast::Id = s:position!() n:r() e:position!() {
            context.alloc(n, s, e)
        }

        rule ident_char() = ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']

        rule keyword() = "let" !ident_char()

        rule ident() -> String = quiet!{
            !keyword() s:$(['a'..='z' | 'A'..='Z' | '_'] ident_char()*) { s.to_string() }
        } / expected!("identifier")

        rule int_lit() -> ast::NodeKind = n:$(['0'..='9']+) {?
            match n.parse::<i64>() {
                Ok(_) => Ok(ast::NodeKind::Lit(ast::LitKind::Int(n.to_string()))),
                Err(_) => Err("integer literal within 64-bit range"),
            }
        }

        rule call() -> ast::NodeKind = name:ident() _ "(" _ args:(expr() ** (_ "," _)) _ ")" {
            ast::NodeKind::Call(name, args)
        }

        rule expr() -> ast::Id = precedence! {
            s:position!() p:@ e:position!() { context.alloc(p, s, e) }
            --
            x:(@) _ "|" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::BitOr, x, y) }
            --
            x:(@) _ "^" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::BitXor, x, y) }
            --
            x:(@) _ "&" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::BitAnd, x, y) }
            --
            x:(@) _ "<<" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Shl, x, y) }
            x:(@) _ ">>" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Shr, x, y) }
            --
            x:(@) _ "+" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Add, x, y) }
            x:(@) _ "-" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Sub, x, y) }
            --
            x:(@) _ "*" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Mul, x, y) }
            x:(@) _ "/" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Div, x, y) }
            x:(@) _ "%" _ y:@ { ast::NodeKind::BiOp(ast::BiOpKind::Rem, x, y) }
            --
            "-" _ e:@ { ast::NodeKind::Unary(ast::UnOpKind::Neg, e) }
            "~" _ e:@ { ast::NodeKind::Unary(ast::UnOpKind::Not, e) }
            --
            n:int_lit() { n }
            c:call() { c }
            name:ident() { ast::NodeKind::Ident(name) }
            "(" _ e:expr() _ ")" { ast::NodeKind::Paren(e) }
        }

        rule let_stmt() -> ast::NodeKind = keyword() _ name:ident() _ "=" _ e:expr() _ ";" {
            ast::NodeKind::Let(name, e)
        }

        rule expr_stmt() -> ast::NodeKind = e:expr() _ ";" { ast::NodeKind::ExprStmt(e) }

        rule stmt() -> ast::Id = node(<let_stmt()>) / node(<expr_stmt()>)

        rule program() -> ast::NodeKind = stmts:(s:stmt() _ { s })* { ast::NodeKind::Program(stmts) }

        pub rule parse() -> ast::Id = _ n:node(<program()>) { n }
    }
}

pub fn parse(source: &str) -> Result<(ast::Arena, ast::Id)> {
    let (arena, root, _) = parse_with_comments(source)?;
    Ok((arena, root))
}

pub fn parse_with_comments(source: &str) -> Result<(ast::Arena, ast::Id, Vec<ast::Comment>)> {
    let context = Context::new();
    let root =
        main_parser::parse(source, &context).map_err(|e| anyhow!("failed to parse: {}", e))?;

    let comments = context
        .comments
        .take()
        .into_iter()
        .map(|(start, (end, text))| {
            let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
            ast::Comment {
                span: ast::Span::new(start, end),
                text,
                own_line: source[line_start..start].trim().is_empty(),
            }
        })
        .collect();

    Ok((context.arena.take(), root, comments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer;

    fn roundtrip(source: &str) -> Result<String> {
        let (arena, root) = parse(source)?;
        Ok(printer::print(&arena, root))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() -> Result<()> {
        let (arena, root) = parse("a + b * 2;")?;
        let ast::NodeKind::Program(stmts) = &arena[root].kind else {
            panic!("root is not a program");
        };
        let ast::NodeKind::ExprStmt(e) = arena[stmts[0]].kind else {
            panic!("expected an expression statement");
        };
        let ast::NodeKind::BiOp(ast::BiOpKind::Add, _, rhs) = arena[e].kind else {
            panic!("expected an addition at the top");
        };
        assert!(matches!(
            arena[rhs].kind,
            ast::NodeKind::BiOp(ast::BiOpKind::Mul, _, _)
        ));
        assert_eq!(arena[e].span, ast::Span::new(0, 9));
        assert_eq!(arena[rhs].span, ast::Span::new(4, 9));
        Ok(())
    }

    #[test]
    fn operators_are_left_associative() -> Result<()> {
        let (arena, root) = parse("a - b - c;")?;
        let ast::NodeKind::Program(stmts) = &arena[root].kind else {
            panic!("root is not a program");
        };
        let ast::NodeKind::ExprStmt(e) = arena[stmts[0]].kind else {
            panic!("expected an expression statement");
        };
        let ast::NodeKind::BiOp(ast::BiOpKind::Sub, lhs, _) = arena[e].kind else {
            panic!("expected a subtraction at the top");
        };
        assert!(matches!(
            arena[lhs].kind,
            ast::NodeKind::BiOp(ast::BiOpKind::Sub, _, _)
        ));
        Ok(())
    }

    #[test]
    fn keeps_parentheses_and_ignores_comments_in_the_tree() -> Result<()> {
        let src = "// header\nlet  x=(a*2)*b ; // trailing\n  f( x ,1 );\n";
        assert_eq!(roundtrip(src)?, "let x = (a * 2) * b;\nf(x, 1);\n");
        Ok(())
    }

    #[test]
    fn parses_every_operator() -> Result<()> {
        let src = "a | b ^ c & d << 1 >> 2 + e - f * g / h % i;";
        assert_eq!(roundtrip(src)?, "a | b ^ c & d << 1 >> 2 + e - f * g / h % i;\n");
        Ok(())
    }

    #[test]
    fn unary_operators() -> Result<()> {
        assert_eq!(roundtrip("-a * ~b;")?, "-a * ~b;\n");
        Ok(())
    }

    #[test]
    fn empty_program() -> Result<()> {
        assert_eq!(roundtrip("  // nothing here\n")?, "");
        Ok(())
    }

    #[test]
    fn records_comments_with_their_placement() -> Result<()> {
        let src = "// head\nlet x = a * 4; // tail\r\n  // body\nx;";
        let (_, _, comments) = parse_with_comments(src)?;
        assert_eq!(
            comments,
            vec![
                ast::Comment {
                    span: ast::Span::new(0, 7),
                    text: "// head".into(),
                    own_line: true,
                },
                ast::Comment {
                    span: ast::Span::new(23, 30),
                    text: "// tail".into(),
                    own_line: false,
                },
                ast::Comment {
                    span: ast::Span::new(34, 41),
                    text: "// body".into(),
                    own_line: true,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn rejects_missing_semicolon() {
        assert!(parse("a * 4").is_err());
    }

    #[test]
    fn rejects_let_as_identifier() {
        assert!(parse("let let = 1;").is_err());
    }

    #[test]
    fn rejects_out_of_range_literal() {
        let err = parse("a * 9223372036854775808;").unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn accepts_largest_literal() -> Result<()> {
        assert_eq!(
            roundtrip("a * 9223372036854775807;")?,
            "a * 9223372036854775807;\n"
        );
        Ok(())
    }
}
