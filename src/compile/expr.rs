//! Expression lowerings (§4.1): `Constant`, `Name`, `BinOp`, `Compare`,
//! `Call`, `Subscript`, `Tuple`.

use super::{FunctionCompiler, ValueKind};
use crate::ast;
use crate::error::{CompileError, CompileResult};
use crate::opcode::{BinOp, OpCode};
use crate::value::Value;

impl<'a> FunctionCompiler<'a> {
    /// Record `stack_size` before, visit the expression (emitting opcodes),
    /// and map the net slot change to a [`ValueKind`]. A delta outside
    /// `{0, 1, 2}` is a [`CompileError::StackShapeError`].
    pub(super) fn eval_expr(&mut self, expr: &ast::Expr) -> CompileResult<ValueKind> {
        let before = self.stack_size;
        match expr {
            ast::Expr::Constant { value, .. } => {
                self.emit(OpCode::Push(*value));
            }
            ast::Expr::Name { id, ctx, span } => self.lower_name(id, *ctx, *span)?,
            ast::Expr::BinOp {
                left, op, right, span,
            } => {
                let left_kind = self.eval_expr(left)?;
                let right_kind = self.eval_expr(right)?;
                if left_kind != ValueKind::Int || right_kind != ValueKind::Int {
                    // §9 open question (b): tuple arithmetic has no lowering;
                    // reject it rather than silently corrupt the stack.
                    return Err(CompileError::type_error(
                        "arithmetic operands must be int; tuple arithmetic is unsupported",
                        *span,
                    ));
                }
                self.emit(OpCode::BinOp(lower_binop(*op)));
            }
            ast::Expr::Compare {
                left,
                ops,
                comparators,
                span,
            } => {
                if ops.len() != 1 || comparators.len() != 1 {
                    return Err(CompileError::shape(
                        "compare must have exactly one operator",
                        *span,
                    ));
                }
                let left_kind = self.eval_expr(left)?;
                let right_kind = self.eval_expr(&comparators[0])?;
                if left_kind != ValueKind::Int || right_kind != ValueKind::Int {
                    return Err(CompileError::type_error(
                        "compare operands must be int; tuple arithmetic is unsupported",
                        *span,
                    ));
                }
                self.emit(OpCode::BinOp(BinOp::Lt));
            }
            ast::Expr::Call { func, args, span } => self.lower_call(func, args, *span)?,
            ast::Expr::Subscript { value, slice, span } => {
                self.lower_subscript(value, slice, *span)?
            }
            ast::Expr::Tuple { elts, span } => {
                if elts.len() != 2 {
                    return Err(CompileError::shape(
                        "tuple literal must have exactly two elements",
                        *span,
                    ));
                }
                for elt in elts {
                    let kind = self.eval_expr(elt)?;
                    if kind != ValueKind::Int {
                        return Err(CompileError::type_error(
                            "tuple elements must be int",
                            *span,
                        ));
                    }
                }
            }
        }
        let delta = self.stack_size as i64 - before as i64;
        ValueKind::from_delta(delta, expr.span())
    }

    fn lower_name(
        &mut self,
        id: &str,
        ctx: ast::NameCtx,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        if ctx == ast::NameCtx::Store {
            // Handled by `Assign`; a bare Store-context reference has no load to perform.
            return Ok(());
        }
        let value = self
            .names
            .get(id)
            .copied()
            .ok_or_else(|| CompileError::name(id, span))?;
        match value {
            Value::Int { pos } => {
                let offset = self.pick_offset(pos);
                self.emit(OpCode::Push(offset));
                self.emit(OpCode::Pick);
            }
            Value::Tuple { pos } => {
                let offset0 = self.pick_offset(pos);
                self.emit(OpCode::Push(offset0));
                self.emit(OpCode::Pick);
                let offset1 = self.pick_offset(pos + 1);
                self.emit(OpCode::Push(offset1));
                self.emit(OpCode::Pick);
            }
            Value::Func(_) | Value::Void => {}
        }
        Ok(())
    }

    fn lower_call(
        &mut self,
        func: &ast::Expr,
        args: &[ast::Expr],
        span: crate::span::Span,
    ) -> CompileResult<()> {
        let name = match func {
            ast::Expr::Name { id, .. } => id.clone(),
            _ => return Err(CompileError::shape("call target must be a name", span)),
        };
        let value = self
            .names
            .get(&name)
            .copied()
            .ok_or_else(|| CompileError::name(&name, span))?;
        let fid = match value {
            Value::Func(id) => id,
            _ => {
                return Err(CompileError::type_error(
                    format!("'{name}' is not callable"),
                    span,
                ))
            }
        };
        let expected = self.registry.param_count(fid);
        if args.len() != expected {
            return Err(CompileError::arity(
                format!(
                    "'{name}' expects {expected} argument(s), got {}",
                    args.len()
                ),
                span,
            ));
        }
        for arg in args {
            self.eval_expr(arg)?;
        }
        self.emit(OpCode::Call(fid));
        Ok(())
    }

    fn lower_subscript(
        &mut self,
        value: &ast::Expr,
        slice: &ast::Expr,
        span: crate::span::Span,
    ) -> CompileResult<()> {
        let base_kind = self.eval_expr(value)?;
        if base_kind != ValueKind::Tuple {
            return Err(CompileError::type_error(
                "subscript base must be a tuple",
                span,
            ));
        }
        let index_kind = self.eval_expr(slice)?;
        if index_kind != ValueKind::Int {
            return Err(CompileError::type_error(
                "subscript index must be an int",
                span,
            ));
        }
        self.emit(OpCode::Push(2));
        self.emit(OpCode::BinOp(BinOp::Sub));
        self.emit(OpCode::Pick);
        self.emit(OpCode::Rot);
        self.emit(OpCode::Rot);
        self.emit(OpCode::Drop);
        self.emit(OpCode::Drop);
        Ok(())
    }
}

fn lower_binop(op: ast::BinOpKind) -> BinOp {
    match op {
        ast::BinOpKind::Add => BinOp::Add,
        ast::BinOpKind::Sub => BinOp::Sub,
        ast::BinOpKind::Mult => BinOp::Mul,
        ast::BinOpKind::Mod => BinOp::Mod,
        ast::BinOpKind::FloorDiv => BinOp::Div,
        ast::BinOpKind::Pow => BinOp::Pow,
    }
}
