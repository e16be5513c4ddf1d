// SPDX-License-Identifier: Unlicense
use crate::ast;

enum Step<'a> {
    Visit(ast::Id),
    Text(&'a str),
}

struct Printer<'a> {
    arena: &'a ast::Arena,
    comments: &'a [ast::Comment],
    next_comment: usize,
    out: String,
}

impl<'a> Printer<'a> {
    fn new(arena: &'a ast::Arena, comments: &'a [ast::Comment]) -> Self {
        Self {
            arena,
            comments,
            next_comment: 0,
            out: String::new(),
        }
    }

    fn pending_comment(&self, before: usize) -> Option<&'a ast::Comment> {
        self.comments
            .get(self.next_comment)
            .filter(|c| c.span.start < before)
    }

    fn print_comment_lines(&mut self, before: usize) {
        while let Some(comment) = self.pending_comment(before) {
            self.out.push_str(&comment.text);
            self.out.push('\n');
            self.next_comment += 1;
        }
    }

    fn print_program(&mut self, stmts: &[ast::Id]) {
        for (i, stmt) in stmts.iter().enumerate() {
            let span = self.arena[*stmt].span;
            let next_start = stmts
                .get(i + 1)
                .map_or(usize::MAX, |next| self.arena[*next].span.start);

            self.print_comment_lines(span.start);
            self.print_impl(*stmt);
            // comments inside the statement or after it on the same line
            while let Some(comment) = self
                .pending_comment(next_start)
                .filter(|c| c.span.start < span.end || !c.own_line)
            {
                self.out.push(' ');
                self.out.push_str(&comment.text);
                self.next_comment += 1;
            }
            self.out.push('\n');
        }
        self.print_comment_lines(usize::MAX);
    }

    fn print_impl(&mut self, id: ast::Id) {
        let arena = self.arena;
        let mut stack = vec![Step::Visit(id)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Text(text) => {
                    self.out.push_str(text);
                    continue;
                }
                Step::Visit(id) => id,
            };
            // pushed in reverse of output order
            match &arena[id].kind {
                ast::NodeKind::Program(stmts) => self.print_program(stmts),
                ast::NodeKind::Let(name, e) => stack.extend([
                    Step::Text(";"),
                    Step::Visit(*e),
                    Step::Text(" = "),
                    Step::Text(name),
                    Step::Text("let "),
                ]),
                ast::NodeKind::ExprStmt(e) => stack.extend([Step::Text(";"), Step::Visit(*e)]),
                ast::NodeKind::Lit(ast::LitKind::Int(text)) => self.out.push_str(text),
                ast::NodeKind::Ident(name) => self.out.push_str(name),
                ast::NodeKind::Paren(e) => {
                    stack.extend([Step::Text(")"), Step::Visit(*e), Step::Text("(")])
                }
                ast::NodeKind::Unary(op, e) => {
                    stack.extend([Step::Visit(*e), Step::Text(op.symbol())])
                }
                ast::NodeKind::Call(name, args) => {
                    stack.push(Step::Text(")"));
                    for (i, arg) in args.iter().enumerate().rev() {
                        stack.push(Step::Visit(*arg));
                        if i > 0 {
                            stack.push(Step::Text(", "));
                        }
                    }
                    stack.extend([Step::Text("("), Step::Text(name)]);
                }
                ast::NodeKind::BiOp(op, lhs, rhs) => stack.extend([
                    Step::Visit(*rhs),
                    Step::Text(" "),
                    Step::Text(op.symbol()),
                    Step::Text(" "),
                    Step::Visit(*lhs),
                ]),
            }
        }
    }
}

/// Renders the tree rooted at `root` back into source text. Grouping comes
/// only from `Paren` nodes.
pub fn print(arena: &ast::Arena, root: ast::Id) -> String {
    print_with_comments(arena, root, &[])
}

/// Like [`print`], placing each comment before the statement that follows it,
/// or at the end of the statement's line when code preceded it in the source.
/// `comments` must be ordered by position.
pub fn print_with_comments(
    arena: &ast::Arena,
    root: ast::Id,
    comments: &[ast::Comment],
) -> String {
    let mut printer = Printer::new(arena, comments);
    printer.print_impl(root);
    printer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser, rewrite};
    use anyhow::Result;
    use expect_test::expect;

    #[test]
    fn prints_statements_one_per_line() -> Result<()> {
        let (arena, root) = parser::parse("let a=1;let b = f(a,  2,g());  a+b;")?;
        expect![[r#"
            let a = 1;
            let b = f(a, 2, g());
            a + b;
        "#]]
        .assert_eq(&print(&arena, root));
        Ok(())
    }

    #[test]
    fn keeps_literal_text() -> Result<()> {
        let (arena, root) = parser::parse("x * 007;")?;
        expect![[r#"
            x * 007;
        "#]]
        .assert_eq(&print(&arena, root));
        Ok(())
    }

    #[test]
    fn keeps_comments_in_place() -> Result<()> {
        let src = r#"// header
let x = a * 4; // scaled
  // before y
let y = f(x,
    b / 2); // inside
x * 3;
// footer
"#;
        let (mut arena, root, comments) = parser::parse_with_comments(src)?;
        rewrite::rewrite(&mut arena, root);
        expect![[r#"
            // header
            let x = a << 2; // scaled
            // before y
            let y = f(x, b >> 1); // inside
            x * 3;
            // footer
        "#]]
        .assert_eq(&print_with_comments(&arena, root, &comments));
        Ok(())
    }

    #[test]
    fn comment_inside_a_statement_moves_to_its_line_end() -> Result<()> {
        let src = "let x = a // lhs\n    * 8;\nx;";
        let (mut arena, root, comments) = parser::parse_with_comments(src)?;
        rewrite::rewrite(&mut arena, root);
        expect![[r#"
            let x = a << 3; // lhs
            x;
        "#]]
        .assert_eq(&print_with_comments(&arena, root, &comments));
        Ok(())
    }

    #[test]
    fn comments_only() -> Result<()> {
        let src = "// one\n\n// two\n";
        let (arena, root, comments) = parser::parse_with_comments(src)?;
        assert_eq!(print_with_comments(&arena, root, &comments), "// one\n// two\n");
        Ok(())
    }

    #[test]
    fn prints_rewritten_program() -> Result<()> {
        let src = r#"
        let area = width * height;
        let bytes = words * 8;
        let half = (total + 1) / 2;
        let index = base + row * 16 + col;
        print(bytes / 4096, -area * 3);
        "#;
        let (mut arena, root) = parser::parse(src)?;
        rewrite::rewrite(&mut arena, root);
        expect![[r#"
            let area = width * height;
            let bytes = words << 3;
            let half = (total + 1) >> 1;
            let index = (base + (row << 4)) + col;
            print(bytes >> 12, -area * 3);
        "#]]
        .assert_eq(&print(&arena, root));
        Ok(())
    }
}
