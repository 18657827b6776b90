//! Abstract syntax tree.
//!
//! Expressions and statements own their children directly (`Box`/`Vec`) —
//! there is no arena here, unlike a larger compiler's AST, because this
//! language has no cross-references between nodes (no types to resolve
//! against a declaration, no call graph) that would make arena indices worth
//! the indirection.

use blc_util::{Span, Symbol};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Shl,
    Shr,
}

impl BinOp {
    /// Name used by both the `-print-ir` dump and the optimizer's constant
    /// evaluator, so the two never drift apart on operator spelling.
    pub fn debug_name(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Mod => "mod",
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
            BinOp::Lt => "lt",
            BinOp::Le => "le",
            BinOp::Gt => "gt",
            BinOp::Ge => "ge",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Shl => "shl",
            BinOp::Shr => "shr",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Expr {
    IntLiteral(i64),
    Ident(Symbol, Span),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Auto(Vec<(Symbol, Span)>),
    Extern(Vec<(Symbol, Span)>),
    Assign(Symbol, Span, Expr),
    FuncCall(Symbol, Option<Expr>),
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),
    While(Expr, Box<Stmt>),
    Return(Option<Expr>),
    Block(Vec<Stmt>),
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: Symbol,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    pub globals: Vec<Symbol>,
    pub functions: Vec<Function>,
}
