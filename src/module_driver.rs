//! The `ModuleDriver` (§4.2): walks the top-level AST statements, compiling
//! each `FunctionDef` against a name table that grows as it goes, so a
//! function can call any sibling already compiled before it (and itself, for
//! recursion), but not one defined later in source order.

use tracing::info;

use crate::ast;
use crate::builtins;
use crate::compile::FunctionCompiler;
use crate::error::{CompileError, CompileResult};
use crate::ir::{ClacFunc, FuncRegistry};
use crate::value::Value;

/// Compile an entire module: every top-level statement must be a
/// `FunctionDef` (§6.1's `Module{body: [Stmt]}` at the top level only ever
/// holds function definitions in the worked scenarios; anything else is
/// `UnsupportedNode`).
pub fn compile_module(module: &ast::Module) -> CompileResult<(Vec<ClacFunc>, FuncRegistry)> {
    let mut registry = FuncRegistry::new();
    let mut names = builtins::seed(&mut registry);
    let mut functions = Vec::new();

    for stmt in &module.body {
        match stmt {
            ast::Stmt::FunctionDef {
                name,
                args,
                body,
                returns,
                span,
            } => {
                info!(name, "compiling top-level function");
                let compiled = FunctionCompiler::compile_function(
                    &mut registry,
                    &names,
                    0,
                    name,
                    name,
                    args,
                    body,
                    *returns,
                    *span,
                )?;
                names.insert(name.clone(), Value::Func(compiled.id));
                functions.push(compiled);
            }
            other => {
                return Err(CompileError::unsupported_node(
                    stmt_kind_name(other),
                    other.span(),
                ))
            }
        }
    }

    Ok((functions, registry))
}

fn stmt_kind_name(stmt: &ast::Stmt) -> &'static str {
    match stmt {
        ast::Stmt::FunctionDef { .. } => "FunctionDef",
        ast::Stmt::Return { .. } => "Return",
        ast::Stmt::Assign { .. } => "Assign",
        ast::Stmt::If { .. } => "If",
        ast::Stmt::Expr { .. } => "Expr",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::span::Span;

    fn int_arg(name: &str) -> Arg {
        Arg {
            name: name.to_string(),
            annotation: Some(Annotation::Int),
            span: Span::synthetic(),
        }
    }

    fn name_load(id: &str) -> Expr {
        Expr::Name {
            id: id.to_string(),
            ctx: NameCtx::Load,
            span: Span::synthetic(),
        }
    }

    #[test]
    fn add_two_integers() {
        let module = Module {
            body: vec![Stmt::FunctionDef {
                name: "add".to_string(),
                args: vec![int_arg("a"), int_arg("b")],
                returns: Some(Annotation::Int),
                span: Span::synthetic(),
                body: vec![Stmt::Return {
                    value: Some(Expr::BinOp {
                        left: Box::new(name_load("a")),
                        op: BinOpKind::Add,
                        right: Box::new(name_load("b")),
                        span: Span::synthetic(),
                    }),
                    span: Span::synthetic(),
                }],
            }],
        };

        let (functions, _registry) = compile_module(&module).unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].ret_count, 1);
    }

    #[test]
    fn forward_reference_is_a_name_error() {
        let module = Module {
            body: vec![Stmt::FunctionDef {
                name: "caller".to_string(),
                args: vec![],
                returns: Some(Annotation::None),
                span: Span::synthetic(),
                body: vec![Stmt::Expr {
                    value: Expr::Call {
                        func: Box::new(name_load("callee")),
                        args: vec![],
                        span: Span::synthetic(),
                    },
                    span: Span::synthetic(),
                }],
            }],
        };

        let err = compile_module(&module).unwrap_err();
        assert!(matches!(err, CompileError::NameError { .. }));
    }
}
