//! Shared stack-slot scan for the native backends.
//!
//! Both the x86-64 and AArch64 backends need the same answer to "where does
//! local N live on the stack", so the scan lives here once instead of in
//! each backend, keeping the layout convention from drifting between them.

use std::collections::{BTreeSet, HashMap};

use blc_ir::Instr;
use blc_util::Interner;

#[derive(Debug, Default)]
pub struct Layout {
    pub var_offsets: HashMap<u32, u32>,
    pub stack_size: u32,
    pub externs: BTreeSet<String>,
    pub global_count: u32,
}

/// Walks `ir` once, assigning byte offsets to declared `AutoVar` locals
/// first, in declaration order, then to any local first seen only as a
/// `BinOp` destination (a temporary), appended as it is encountered.
pub fn scan(ir: &[Instr], interner: &Interner) -> Layout {
    let mut layout = Layout::default();
    layout.externs.insert("exit".to_string());

    let mut next_var: u32 = 0;
    for instr in ir {
        match instr {
            Instr::GlobalVar(count) => layout.global_count = *count,
            Instr::ExternVar(name) => {
                layout.externs.insert(interner.resolve(*name).to_string());
            },
            Instr::AutoVar(count) => {
                for _ in 0..*count {
                    layout.stack_size += 8;
                    layout.var_offsets.insert(next_var, layout.stack_size);
                    next_var += 1;
                }
            },
            Instr::BinOp { dest, .. } => {
                layout.var_offsets.entry(*dest).or_insert_with(|| {
                    layout.stack_size += 8;
                    layout.stack_size
                });
            },
            Instr::Ret(_) => {
                layout.externs.insert("exit".to_string());
            },
            _ => {},
        }
    }

    layout
}

/// Rounds `size` up to the next multiple of 16, as the AArch64 backend
/// requires for its stack frame.
pub fn align16(size: u32) -> u32 {
    if size % 16 == 0 {
        size
    } else {
        size + (16 - size % 16)
    }
}

#[cfg(test)]
mod tests {
    use blc_ir::Arg;
    use blc_par::BinOp as Op;

    use super::*;

    #[test]
    fn declared_locals_get_sequential_offsets_from_eight() {
        let interner = Interner::new();
        let ir = vec![Instr::AutoVar(1), Instr::AutoVar(1), Instr::AutoVar(1)];
        let layout = scan(&ir, &interner);
        assert_eq!(layout.var_offsets[&0], 8);
        assert_eq!(layout.var_offsets[&1], 16);
        assert_eq!(layout.var_offsets[&2], 24);
        assert_eq!(layout.stack_size, 24);
    }

    #[test]
    fn a_binop_temporary_is_appended_after_declared_locals() {
        let interner = Interner::new();
        let ir = vec![
            Instr::AutoVar(1),
            Instr::BinOp { dest: 1000, lhs: Arg::Var(0), rhs: Arg::Literal(1), op: Op::Add },
        ];
        let layout = scan(&ir, &interner);
        assert_eq!(layout.var_offsets[&0], 8);
        assert_eq!(layout.var_offsets[&1000], 16);
    }

    #[test]
    fn align16_rounds_up_non_multiples_and_leaves_multiples_alone() {
        assert_eq!(align16(0), 0);
        assert_eq!(align16(16), 16);
        assert_eq!(align16(17), 32);
        assert_eq!(align16(24), 32);
    }

    #[test]
    fn exit_is_always_in_the_extern_set() {
        let interner = Interner::new();
        let layout = scan(&[], &interner);
        assert!(layout.externs.contains("exit"));
    }
}
