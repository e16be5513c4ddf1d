// SPDX-License-Identifier: Unlicense
use crate::{ast, classify};
use tracing::{debug, trace};

struct Rewriter<'a> {
    arena: &'a mut ast::Arena,
    grouped: usize,
    shifted: usize,
}

impl<'a> Rewriter<'a> {
    fn new(arena: &'a mut ast::Arena) -> Self {
        Self {
            arena,
            grouped: 0,
            shifted: 0,
        }
    }

    fn new_node(&mut self, kind: ast::NodeKind, span: ast::Span) -> ast::Id {
        self.arena.alloc(ast::Node { kind, span })
    }

    fn is_biop(&self, id: ast::Id) -> bool {
        matches!(self.arena[id].kind, ast::NodeKind::BiOp(..))
    }

    fn group(&mut self, id: ast::Id) -> (ast::Id, bool) {
        if !self.is_biop(id) {
            return (id, false);
        }
        self.grouped += 1;
        let span = self.arena[id].span;
        (self.new_node(ast::NodeKind::Paren(id), span), true)
    }

    fn shift_kind(kind: ast::BiOpKind) -> Option<ast::BiOpKind> {
        match kind {
            ast::BiOpKind::Mul => Some(ast::BiOpKind::Shl),
            ast::BiOpKind::Div => Some(ast::BiOpKind::Shr),
            _ => None,
        }
    }

    fn rewrite_biop(
        &mut self,
        id: ast::Id,
        kind: ast::BiOpKind,
        lhs: ast::Id,
        rhs: ast::Id,
    ) -> (ast::Id, ast::Id) {
        let (lhs, _) = self.group(lhs);
        let (rhs, rhs_grouped) = self.group(rhs);
        self.arena[id].kind = ast::NodeKind::BiOp(kind, lhs, rhs);
        if rhs_grouped {
            return (lhs, rhs);
        }

        let exponent = match classify::classify_power_of_two(self.arena, rhs) {
            Ok(e) => e,
            Err(e) => {
                trace!(node = ?self.arena[id].span, "no shift rewrite: {}", e);
                return (lhs, rhs);
            }
        };
        let Some(shift) = Self::shift_kind(kind) else {
            return (lhs, rhs);
        };

        let span = self.arena[rhs].span;
        let amount = self.new_node(
            ast::NodeKind::Lit(ast::LitKind::Int(exponent.to_string())),
            span,
        );
        self.arena[id].kind = ast::NodeKind::BiOp(shift, lhs, amount);
        self.shifted += 1;
        debug!(
            start = span.start,
            end = span.end,
            "rewrote `{}` by 2^{} into `{}`",
            kind.symbol(),
            exponent,
            shift.symbol()
        );
        (lhs, amount)
    }

    fn rewrite_impl(&mut self, root: ast::Id) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let children = match self.arena[id].kind.clone() {
                ast::NodeKind::BiOp(kind, lhs, rhs) => {
                    let (lhs, rhs) = self.rewrite_biop(id, kind, lhs, rhs);
                    vec![lhs, rhs]
                }
                kind => kind.children(),
            };
            // reversed so the leftmost child is visited first
            stack.extend(children.into_iter().rev());
        }
    }
}

/// Rewrites every `x * 2^k` into `x << k` and every `x / 2^k` into `x >> k`
/// in the tree rooted at `root`, parenthesizing nested binary operands.
pub fn rewrite(arena: &mut ast::Arena, root: ast::Id) {
    let mut rewriter = Rewriter::new(arena);
    rewriter.rewrite_impl(root);
    debug!(
        grouped = rewriter.grouped,
        shifted = rewriter.shifted,
        "rewrite finished"
    );
}
