//! Compile-time value descriptors (§3.2).
//!
//! A `Value` describes what a source name currently denotes, not a runtime
//! quantity. Position fields are absolute: measured from the stack bottom,
//! counting from 1. A pick offset is derived from a position only at the
//! moment of use, via `stack_size - pos + 1`, since `stack_size` keeps
//! changing as the function body compiles.

use crate::ir::FuncId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// One stack slot at absolute depth `pos`.
    Int { pos: usize },
    /// Two contiguous slots at `pos` and `pos + 1`; element 0 is the deeper
    /// slot, element 1 the shallower.
    Tuple { pos: usize },
    /// A callable; denotes no stack datum.
    Func(FuncId),
    /// No stack slot — a type indicator only, used for `Void`-typed
    /// expression results.
    Void,
}
