//! blc-ir - Flat three-address IR and AST lowering.
//!
//! The IR is a single program-wide `Vec<Instr>`, not a control-flow graph:
//! there is no basic-block layer, no phi nodes, and control flow is
//! expressed with `Label`/`Jump`/`JumpIfFalse` as ordinary instructions.
//! This matches the scale of the source language — one entry function,
//! no register allocation — rather than a general-purpose compiler's IR.

mod ir;
mod lower;

pub use ir::{Arg, Instr, LabelKind};
pub use lower::lower_program;
