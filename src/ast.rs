//! External AST shape consumed by the core (§6.1).
//!
//! The source AST is assumed to be produced by an external parser with a shape
//! equivalent to Python's `ast` module; this module only declares the node kinds
//! the compiler actually consumes. Nodes are `serde`-tagged on a `kind` field so
//! that the JSON boundary (see [`crate::module_driver::parse_ast`]) round-trips
//! losslessly regardless of which external parser produced the document.

use serde::{Deserialize, Serialize};

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// A type annotation: `int`, `tuple`, or (returns only) `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Annotation {
    Int,
    Tuple,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    #[serde(default)]
    pub annotation: Option<Annotation>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Stmt {
    FunctionDef {
        name: String,
        args: Vec<Arg>,
        body: Vec<Stmt>,
        #[serde(default)]
        returns: Option<Annotation>,
        #[serde(default)]
        span: Span,
    },
    Return {
        value: Option<Expr>,
        #[serde(default)]
        span: Span,
    },
    Assign {
        targets: Vec<Expr>,
        value: Expr,
        #[serde(default)]
        span: Span,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
        #[serde(default)]
        span: Span,
    },
    Expr {
        value: Expr,
        #[serde(default)]
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::FunctionDef { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::If { span, .. }
            | Stmt::Expr { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameCtx {
    Load,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOpKind {
    Add,
    Sub,
    Mult,
    Mod,
    FloorDiv,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Constant {
        value: i64,
        #[serde(default)]
        span: Span,
    },
    Name {
        id: String,
        ctx: NameCtx,
        #[serde(default)]
        span: Span,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOpKind,
        right: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Tuple {
        elts: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Constant { span, .. }
            | Expr::Name { span, .. }
            | Expr::BinOp { span, .. }
            | Expr::Compare { span, .. }
            | Expr::Call { span, .. }
            | Expr::Subscript { span, .. }
            | Expr::Tuple { span, .. } => *span,
        }
    }
}
