// SPDX-License-Identifier: Unlicense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A `//` comment. `own_line` is false when code precedes it on its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    pub text: String,
    pub own_line: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LitKind {
    Int(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOpKind {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

impl BiOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BiOpKind::Add => "+",
            BiOpKind::Sub => "-",
            BiOpKind::Mul => "*",
            BiOpKind::Div => "/",
            BiOpKind::Rem => "%",
            BiOpKind::Shl => "<<",
            BiOpKind::Shr => ">>",
            BiOpKind::BitAnd => "&",
            BiOpKind::BitOr => "|",
            BiOpKind::BitXor => "^",
        }
    }
}

impl UnOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOpKind::Neg => "-",
            UnOpKind::Not => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Vec<Id>),
    Let(String, Id),
    ExprStmt(Id),
    Lit(LitKind),
    Ident(String),
    Paren(Id),
    Unary(UnOpKind, Id),
    Call(String, Vec<Id>),
    BiOp(BiOpKind, Id, Id),
}

impl NodeKind {
    pub fn children(&self) -> Vec<Id> {
        match self {
            NodeKind::Program(stmts) => stmts.clone(),
            NodeKind::Let(_, e) | NodeKind::ExprStmt(e) | NodeKind::Paren(e) => vec![*e],
            NodeKind::Unary(_, e) => vec![*e],
            NodeKind::Call(_, args) => args.clone(),
            NodeKind::BiOp(_, lhs, rhs) => vec![*lhs, *rhs],
            NodeKind::Lit(_) | NodeKind::Ident(_) => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

pub type Id = id_arena::Id<Node>;
pub type Arena = id_arena::Arena<Node>;
