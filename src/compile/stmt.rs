//! Statement-level lowerings (§4.1): `Return`, `Assign`, `If`, nested
//! `FunctionDef`, and bare `Expr` statements.

use tracing::{debug, warn};

use super::{FunctionCompiler, ValueKind};
use crate::ast;
use crate::error::{CompileError, CompileResult};
use crate::ir::{ClacFunc, FuncSignature};
use crate::opcode::OpCode;
use crate::span::Span;
use crate::value::Value;

impl<'a> FunctionCompiler<'a> {
    pub(super) fn lower_stmt(&mut self, stmt: &ast::Stmt) -> CompileResult<()> {
        match stmt {
            ast::Stmt::FunctionDef {
                name,
                args,
                body,
                returns,
                span,
            } => self.lower_nested_function_def(name, args, body, *returns, *span),
            ast::Stmt::Return { value, span } => self.lower_return(value.as_ref(), *span),
            ast::Stmt::Assign {
                targets,
                value,
                span,
            } => self.lower_assign(targets, value, *span),
            ast::Stmt::If {
                test,
                body,
                orelse,
                span,
            } => self.lower_if(test, body, orelse, *span),
            ast::Stmt::Expr { value, span } => {
                let before = self.stack_size;
                self.eval_expr(value)?;
                if self.stack_size != before {
                    warn!(
                        residue = self.stack_size - before,
                        "expression statement left residue on the stack"
                    );
                }
                let _ = span;
                Ok(())
            }
        }
    }

    fn lower_nested_function_def(
        &mut self,
        name: &str,
        args: &[ast::Arg],
        body: &[ast::Stmt],
        returns: Option<ast::Annotation>,
        span: Span,
    ) -> CompileResult<()> {
        // Qualify the assembled word name with the enclosing function's own
        // (already-qualified) name so two unrelated parents nesting a helper of
        // the same name never collide in the flattened CLAC namespace (§9 open
        // question d).
        let emitted_name = format!("{}__{}", self.own_name, name);
        let compiled = FunctionCompiler::compile_function(
            &mut *self.registry,
            &self.names,
            self.stack_size,
            name,
            &emitted_name,
            args,
            body,
            returns,
            span,
        )?;
        self.names.insert(name.to_string(), Value::Func(compiled.id));
        self.children.push(compiled);
        Ok(())
    }

    fn lower_return(&mut self, value: Option<&ast::Expr>, span: Span) -> CompileResult<()> {
        let kind = match value {
            Some(expr) => self.eval_expr(expr)?,
            None => ValueKind::Void,
        };
        let _ = span;
        match kind {
            ValueKind::Void => {
                while self.stack_size > self.return_target.stack_size {
                    self.emit(OpCode::Drop);
                }
            }
            ValueKind::Int => {
                while self.stack_size > self.return_target.stack_size + 1 {
                    self.emit(OpCode::Swap);
                    self.emit(OpCode::Drop);
                }
            }
            ValueKind::Tuple => {
                while self.stack_size > self.return_target.stack_size + 2 {
                    self.emit(OpCode::Rot);
                    self.emit(OpCode::Drop);
                }
            }
        }
        Ok(())
    }

    fn lower_assign(&mut self, targets: &[ast::Expr], value: &ast::Expr, span: Span) -> CompileResult<()> {
        if targets.len() != 1 {
            return Err(CompileError::shape(
                "assignment must have exactly one target",
                span,
            ));
        }
        let name = match &targets[0] {
            ast::Expr::Name {
                id,
                ctx: ast::NameCtx::Store,
                ..
            } => id.clone(),
            _ => {
                return Err(CompileError::shape(
                    "assignment target must be a name in store context",
                    span,
                ))
            }
        };

        let kind = self.eval_expr(value)?;
        let bound = match kind {
            ValueKind::Int => Value::Int {
                pos: self.stack_size,
            },
            ValueKind::Tuple => Value::Tuple {
                pos: self.stack_size - 1,
            },
            ValueKind::Void => {
                return Err(CompileError::shape("cannot assign a void expression", span))
            }
        };
        self.names.insert(name, bound);
        Ok(())
    }

    fn lower_if(
        &mut self,
        test: &ast::Expr,
        body: &[ast::Stmt],
        orelse: &[ast::Stmt],
        span: Span,
    ) -> CompileResult<()> {
        if body.is_empty() || orelse.is_empty() {
            return Err(CompileError::shape("if branches must be non-empty", span));
        }

        let test_kind = self.eval_expr(test)?;
        if test_kind != ValueKind::Int {
            return Err(CompileError::type_error("if test must be an int", span));
        }
        self.emit(OpCode::If);
        let entry = self.stack_size;
        let return_target = self.return_target;
        self.synthetic_counter += 1;
        let tag = self.synthetic_counter;
        let body_name = format!("{}__if{}_then", self.own_name, tag);
        let orelse_name = format!("{}__if{}_else", self.own_name, tag);

        let (body_queue, body_children, body_final) =
            self.compile_branch(&body_name, entry, return_target, body)?;
        let (orelse_queue, orelse_children, orelse_final) =
            self.compile_branch(&orelse_name, entry, return_target, orelse)?;

        if body_final != orelse_final {
            return Err(CompileError::arity(
                "if and else branches produce different result widths",
                span,
            ));
        }

        let body_id = self.registry.reserve(FuncSignature {
            name: body_name,
            arg_slots: 0,
            param_count: 0,
            ret_count: body_final - entry as i64,
        });
        let orelse_id = self.registry.reserve(FuncSignature {
            name: orelse_name,
            arg_slots: 0,
            param_count: 0,
            ret_count: orelse_final - entry as i64,
        });

        self.children.push(ClacFunc::new(
            body_id,
            self.registry.name(body_id).to_string(),
            0,
            body_final - entry as i64,
            body_queue,
            body_children,
        ));
        self.children.push(ClacFunc::new(
            orelse_id,
            self.registry.name(orelse_id).to_string(),
            0,
            orelse_final - entry as i64,
            orelse_queue,
            orelse_children,
        ));

        self.emit(OpCode::Call(body_id));
        self.emit(OpCode::Push(1));
        self.emit(OpCode::Skip);
        self.queue.push(OpCode::Call(orelse_id));

        Ok(())
    }

    /// Compile one `if`/`else` branch as a synthetic child sharing a snapshot
    /// of the current name table and the real return target; returns its
    /// opcode queue, any functions it nested, and its final `stack_size`.
    fn compile_branch(
        &mut self,
        branch_name: &str,
        entry: usize,
        return_target: super::ReturnTarget,
        stmts: &[ast::Stmt],
    ) -> CompileResult<(Vec<OpCode>, Vec<ClacFunc>, i64)> {
        let names = self.names.clone();
        debug!(branch_name, entry, "compiling if/else branch");
        let mut branch = FunctionCompiler::new_synthetic(
            &mut *self.registry,
            branch_name.to_string(),
            names,
            entry,
            return_target,
        );
        branch.compile_body(stmts)?;
        Ok((branch.queue, branch.children, branch.stack_size as i64))
    }
}
