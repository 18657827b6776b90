//! Instruction and operand types for the flat three-address IR.
//!
//! There is no per-function boundary marker: `main` is the only entry point
//! the language recognizes, so lowering simply concatenates every
//! function's instructions into one program-wide stream.

use blc_par::BinOp;
use blc_util::Symbol;

/// An IR operand: a literal, a reference to a local slot, or a reference to
/// a global slot. There is no register-allocation layer, so this is the
/// only operand shape that ever appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arg {
    Literal(i64),
    Var(u32),
    Global(u32),
}

impl Arg {
    pub fn as_literal(self) -> Option<i64> {
        match self {
            Arg::Literal(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Instr {
    /// Reserve `count` fresh local slots (lowering always emits `count == 1`,
    /// one per declared `auto` name).
    AutoVar(u32),
    /// Declare `count` globals, emitted once at program start.
    GlobalVar(u32),
    /// Declare an external symbol by name.
    ExternVar(Symbol),
    AutoAssign(u32, Arg),
    GlobalAssign(u32, Arg),
    BinOp {
        dest: u32,
        lhs: Arg,
        rhs: Arg,
        op: BinOp,
    },
    FunCall(Symbol, Option<Arg>),
    Label(String),
    Jump(String),
    JumpIfFalse(String, Arg),
    Ret(Option<Arg>),
}

/// The label-name convention the WAT backend relies on to reconstruct
/// structured control flow. Parsing is centralized here so the fragile
/// `starts_with` checks live in exactly one place instead of scattered
/// through `blc-target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    IfElse,
    IfEnd,
    WhileStart,
    WhileEnd,
}

impl LabelKind {
    const PREFIXES: [(&'static str, LabelKind); 4] = [
        ("if_else_", LabelKind::IfElse),
        ("if_end_", LabelKind::IfEnd),
        ("while_start_", LabelKind::WhileStart),
        ("while_end_", LabelKind::WhileEnd),
    ];

    pub fn parse(label: &str) -> Option<LabelKind> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| label.starts_with(prefix))
            .map(|(_, kind)| *kind)
    }

    pub fn make(self, id: u32) -> String {
        let prefix = match self {
            LabelKind::IfElse => "if_else_",
            LabelKind::IfEnd => "if_end_",
            LabelKind::WhileStart => "while_start_",
            LabelKind::WhileEnd => "while_end_",
        };
        format!("{prefix}{id}")
    }
}
