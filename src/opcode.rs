//! The CLAC opcode model (§3.1).
//!
//! Each variant carries a fixed `stack_delta` and knows how to assemble itself
//! to a CLAC token. `stack_delta` is a pure function of the variant and its
//! static payload, never of runtime data.

use crate::ir::FuncId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Mod,
    Div,
    Pow,
    Lt,
}

impl BinOp {
    fn token(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Mod => "%",
            BinOp::Div => "/",
            BinOp::Pow => "**",
            BinOp::Lt => "<",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpCode {
    Push(i64),
    BinOp(BinOp),
    Pick,
    Swap,
    Rot,
    Drop,
    If,
    Skip,
    Call(FuncId),
}

impl OpCode {
    /// Net change in compile-time stack height this opcode produces.
    pub fn stack_delta(&self, ret_count: impl Fn(FuncId) -> i64, arg_count: impl Fn(FuncId) -> usize) -> i64 {
        match self {
            OpCode::Push(_) => 1,
            OpCode::BinOp(_) => -1,
            OpCode::Pick => 0,
            OpCode::Swap => 0,
            OpCode::Rot => 0,
            OpCode::Drop => -1,
            OpCode::If => -1,
            OpCode::Skip => -1,
            OpCode::Call(id) => ret_count(*id) - arg_count(*id) as i64,
        }
    }

    /// Assemble to the CLAC token(s) for this opcode. `name` resolves a
    /// `Call` target to its word name.
    pub fn assemble(&self, name: impl Fn(FuncId) -> String) -> String {
        match self {
            OpCode::Push(n) => n.to_string(),
            OpCode::BinOp(op) => op.token().to_string(),
            OpCode::Pick => "pick".to_string(),
            OpCode::Swap => "swap".to_string(),
            OpCode::Rot => "rot".to_string(),
            OpCode::Drop => "drop".to_string(),
            OpCode::If => "if".to_string(),
            OpCode::Skip => "skip".to_string(),
            OpCode::Call(id) => name(*id),
        }
    }
}
