//! The IR model: `ClacFunc` and the function arena (§3.3, §9 "No cyclic IR graph").
//!
//! The source prototype models a function table by index (the teacher's own
//! `vm::instr::Instr::DefineFunction(usize)` does the same for its bytecode);
//! that handle-by-index pattern is what sidesteps a cyclic ownership graph here.
//! A `FuncId` is a small opaque handle into a [`FuncRegistry`]; `Call` opcodes
//! carry a `FuncId` rather than a reference or a name, so a function can call
//! itself (recursion) or a sibling before that sibling's `ClacFunc` body has
//! been fully assembled, as long as its *signature* has been reserved.

use crate::opcode::OpCode;

/// Opaque handle into a [`FuncRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub usize);

/// The calling-convention facts about a function that must be known before its
/// body is compiled: how many stack slots its arguments occupy, how many
/// source-level parameters that is, and its declared return arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSignature {
    pub name: String,
    /// Total stack-slot width of the arguments (an `int` contributes 1, a
    /// `tuple` contributes 2). This is the `arg_count` of §3.1's `Call` delta
    /// formula and §3.3's `ClacFunc.arg_count`.
    pub arg_slots: usize,
    /// Source-level parameter count, used for call-site arity checking
    /// (distinct from `arg_slots` because a single `tuple` parameter is one
    /// parameter but two slots).
    pub param_count: usize,
    /// Declared return arity. For a real, annotated function this is always
    /// in `{0, 1, 2}`. A synthetic `if`/`else` branch function (§9) has no
    /// source-level arity of its own; its `ret_count` is instead the signed
    /// delta its body produces relative to its entry height, so that the
    /// ordinary `Call` formula (`ret_count - arg_slots`) reproduces that
    /// delta at the call site. `arg_slots` is `0` for every synthetic child,
    /// since it consumes no freshly pushed arguments.
    pub ret_count: i64,
}

/// Append-only table of function signatures, indexed by [`FuncId`].
///
/// Signatures are reserved before a body is compiled (so self-recursive and
/// forward calls can resolve), and never mutated afterward.
#[derive(Debug, Default)]
pub struct FuncRegistry {
    signatures: Vec<FuncSignature>,
}

impl FuncRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, signature: FuncSignature) -> FuncId {
        let id = FuncId(self.signatures.len());
        self.signatures.push(signature);
        id
    }

    pub fn signature(&self, id: FuncId) -> &FuncSignature {
        &self.signatures[id.0]
    }

    pub fn arg_slots(&self, id: FuncId) -> usize {
        self.signature(id).arg_slots
    }

    pub fn ret_count(&self, id: FuncId) -> i64 {
        self.signature(id).ret_count
    }

    pub fn param_count(&self, id: FuncId) -> usize {
        self.signature(id).param_count
    }

    pub fn name(&self, id: FuncId) -> &str {
        &self.signature(id).name
    }
}

/// A compiled function: its signature, its opcode sequence, and any synthetic
/// or nested functions it owns.
///
/// Invariant (§3.3): executing `code` on a caller stack whose top `arg_slots`
/// slots are the arguments yields a stack whose top `ret_count` slots are the
/// results, with no other slots modified. `children` names are unique within a
/// parent and are emitted before the parent by the [`crate::assembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClacFunc {
    pub id: FuncId,
    pub name: String,
    pub arg_slots: usize,
    pub ret_count: i64,
    pub code: Vec<OpCode>,
    pub children: Vec<ClacFunc>,
}

impl ClacFunc {
    pub fn new(id: FuncId, name: String, arg_slots: usize, ret_count: i64, code: Vec<OpCode>, children: Vec<ClacFunc>) -> Self {
        Self {
            id,
            name,
            arg_slots,
            ret_count,
            code,
            children,
        }
    }
}
