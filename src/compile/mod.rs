//! The per-function compiler (§4.1) — one instance per source function,
//! walking the AST while maintaining a precise compile-time model of the
//! runtime stack.

mod expr;
mod stmt;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ast;
use crate::error::{CompileError, CompileResult};
use crate::ir::{ClacFunc, FuncId, FuncRegistry, FuncSignature};
use crate::opcode::OpCode;
use crate::span::Span;
use crate::value::Value;

/// What an expression evaluated to, in terms of net stack-slot width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Void,
    Int,
    Tuple,
}

impl ValueKind {
    fn from_delta(delta: i64, span: Span) -> CompileResult<Self> {
        match delta {
            0 => Ok(ValueKind::Void),
            1 => Ok(ValueKind::Int),
            2 => Ok(ValueKind::Tuple),
            _ => Err(CompileError::stack_shape(delta, span)),
        }
    }
}

/// The `(stack_size, ret_count)` pair that `Return` normalizes toward. Fixed
/// at construction for a real, annotated function; propagated unchanged into
/// every synthetic `if`/`else` child compiled underneath it, however deeply
/// nested, since a `Return` reached inside a branch is a return from that
/// enclosing real function, not from the branch itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnTarget {
    pub stack_size: usize,
    pub ret_count: usize,
}

/// Translates one source function (or one synthetic `if`/`else` branch) into
/// opcodes, tracking `stack_size` — the compile-time model of current stack
/// height — and `names` — the mapping from identifier to compile-time
/// [`Value`] — as it walks the body.
#[derive(Debug)]
pub struct FunctionCompiler<'a> {
    registry: &'a mut FuncRegistry,
    queue: Vec<OpCode>,
    stack_size: usize,
    names: HashMap<String, Value>,
    return_target: ReturnTarget,
    children: Vec<ClacFunc>,
    synthetic_counter: u32,
    own_name: String,
}

impl<'a> FunctionCompiler<'a> {
    /// Construct a compiler for a real, annotated function. `parent_stack_size`
    /// is the stack height the caller has before pushing this function's
    /// arguments; `arg_slots` is the total slot width of its parameters.
    pub fn new_real(
        registry: &'a mut FuncRegistry,
        own_name: String,
        names: HashMap<String, Value>,
        parent_stack_size: usize,
        arg_slots: usize,
        ret_count: usize,
    ) -> Self {
        Self {
            registry,
            queue: Vec::new(),
            stack_size: parent_stack_size + arg_slots,
            names,
            return_target: ReturnTarget {
                stack_size: parent_stack_size,
                ret_count,
            },
            children: Vec::new(),
            synthetic_counter: 0,
            own_name,
        }
    }

    /// Construct a compiler for a synthetic `if`/`else` branch body: it takes
    /// no fresh arguments (it operates in place on the enclosing stack) and
    /// shares the enclosing compiler's real return target unchanged.
    fn new_synthetic(
        registry: &'a mut FuncRegistry,
        own_name: String,
        names: HashMap<String, Value>,
        entry_stack_size: usize,
        return_target: ReturnTarget,
    ) -> Self {
        Self {
            registry,
            queue: Vec::new(),
            stack_size: entry_stack_size,
            names,
            return_target,
            children: Vec::new(),
            synthetic_counter: 0,
            own_name,
        }
    }

    pub fn compile_body(&mut self, body: &[ast::Stmt]) -> CompileResult<()> {
        for stmt in body {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    /// Append `op` to the opcode queue and update the compile-time
    /// `stack_size` model by its delta (§8.1 invariant 1).
    fn emit(&mut self, op: OpCode) {
        let delta = {
            let registry = &*self.registry;
            op.stack_delta(|id| registry.ret_count(id), |id| registry.arg_slots(id))
        };
        trace!(?op, delta, stack_size = self.stack_size, "emit");
        self.queue.push(op);
        if delta >= 0 {
            self.stack_size += delta as usize;
        } else {
            self.stack_size -= (-delta) as usize;
        }
        debug!(stack_size = self.stack_size, "stack size after emit");
    }

    /// Converts an absolute stack position to the "distance from top"
    /// operand `pick` needs (§3.2).
    fn pick_offset(&self, pos: usize) -> i64 {
        self.stack_size as i64 - pos as i64 + 1
    }

    /// Compile one source `FunctionDef` (top-level or nested) into a
    /// [`ClacFunc`], reserving its [`FuncId`] first so the body can call
    /// itself recursively.
    pub fn compile_function(
        registry: &mut FuncRegistry,
        enclosing_names: &HashMap<String, Value>,
        parent_stack_size: usize,
        name: &str,
        emitted_name: &str,
        args: &[ast::Arg],
        body: &[ast::Stmt],
        returns: Option<ast::Annotation>,
        span: Span,
    ) -> CompileResult<ClacFunc> {
        let mut pos = parent_stack_size;
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            let annotation = arg
                .annotation
                .ok_or_else(|| CompileError::annotation(arg.name.clone(), arg.span))?;
            let value = match annotation {
                ast::Annotation::Int => {
                    pos += 1;
                    Value::Int { pos }
                }
                ast::Annotation::Tuple => {
                    pos += 2;
                    Value::Tuple { pos: pos - 1 }
                }
                ast::Annotation::None => {
                    return Err(CompileError::annotation(arg.name.clone(), arg.span));
                }
            };
            arg_values.push((arg.name.clone(), value));
        }
        let arg_slots = pos - parent_stack_size;
        let param_count = args.len();

        let ret_count = match returns {
            Some(ast::Annotation::Int) => 1,
            Some(ast::Annotation::Tuple) => 2,
            Some(ast::Annotation::None) => 0,
            None => return Err(CompileError::annotation(name.to_string(), span)),
        };

        let id = registry.reserve(FuncSignature {
            name: emitted_name.to_string(),
            arg_slots,
            param_count,
            ret_count: ret_count as i64,
        });

        let mut names = enclosing_names.clone();
        for (arg_name, value) in arg_values {
            names.insert(arg_name, value);
        }
        // Self-recursion binds the *source* name, since the body calls itself by
        // the name written in source (e.g. `sqrt_inner(...)`), never by the
        // qualified name the assembler ultimately emits.
        names.insert(name.to_string(), Value::Func(id));

        debug!(name, emitted_name, arg_slots, ret_count, "compiling function");

        let mut compiler = FunctionCompiler::new_real(
            registry,
            emitted_name.to_string(),
            names,
            parent_stack_size,
            arg_slots,
            ret_count,
        );
        compiler.compile_body(body)?;

        Ok(ClacFunc::new(
            id,
            emitted_name.to_string(),
            arg_slots,
            ret_count as i64,
            compiler.queue,
            compiler.children,
        ))
    }
}
