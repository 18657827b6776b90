//! Fixed-point constant propagation and folding.
//!
//! Repeats up to 10 times over the whole IR, using a "changed ||
//! iterations < max" fixed-point shape. Each pass resets its own
//! constant tables; loop-modified-local sets are
//! computed once up front and shared across every pass.

use std::collections::HashMap;

use blc_ir::{Arg, Instr};

use crate::fold;
use crate::loops::{find_loops, LoopSpan};

const MAX_PASSES: u32 = 10;

pub fn optimize(ir: &mut Vec<Instr>) {
    let loops = find_loops(ir);
    let dirty_at_start: HashMap<usize, Vec<u32>> = {
        let mut map: HashMap<usize, Vec<u32>> = HashMap::new();
        for span in &loops {
            map.entry(span.start_index).or_default().extend(span.modified.iter().copied());
        }
        map
    };

    let mut changed = true;
    let mut iterations = 0;
    while changed && iterations < MAX_PASSES {
        changed = run_pass(ir, &dirty_at_start);
        iterations += 1;
    }
}

/// Resizes `v` if needed and returns a mutable reference to slot `idx`.
fn slot<T: Clone + Default>(v: &mut Vec<T>, idx: usize) -> &mut T {
    if idx >= v.len() {
        v.resize(idx + 1, T::default());
    }
    &mut v[idx]
}

fn run_pass(ir: &mut [Instr], dirty_at_start: &HashMap<usize, Vec<u32>>) -> bool {
    let mut changed = false;
    let mut consts: Vec<Option<i64>> = Vec::new();
    let mut dirty: Vec<bool> = Vec::new();

    for (i, instr) in ir.iter_mut().enumerate() {
        if let Some(locals) = dirty_at_start.get(&i) {
            for &local in locals {
                *slot(&mut dirty, local as usize) = true;
            }
        }

        match instr {
            Instr::AutoAssign(dest, arg) => {
                changed |= resolve(arg, &consts, &dirty);
                if !is_dirty(&dirty, *dest) {
                    publish(&mut consts, *dest, arg.as_literal());
                }
            },
            Instr::BinOp { dest, lhs, rhs, op } => {
                changed |= resolve(lhs, &consts, &dirty);
                changed |= resolve(rhs, &consts, &dirty);
                if let (Some(l), Some(r)) = (lhs.as_literal(), rhs.as_literal()) {
                    let result = fold::eval(*op, l, r);
                    let dest = *dest;
                    *instr = Instr::AutoAssign(dest, Arg::Literal(result));
                    if !is_dirty(&dirty, dest) {
                        publish(&mut consts, dest, Some(result));
                    }
                    changed = true;
                } else if !is_dirty(&dirty, *dest) {
                    publish(&mut consts, *dest, None);
                }
            },
            Instr::FunCall(_, Some(arg)) => changed |= resolve(arg, &consts, &dirty),
            Instr::JumpIfFalse(_, cond) => changed |= resolve(cond, &consts, &dirty),
            _ => {},
        }
    }

    changed
}

fn is_dirty(dirty: &[bool], idx: u32) -> bool {
    dirty.get(idx as usize).copied().unwrap_or(false)
}

fn publish(consts: &mut Vec<Option<i64>>, idx: u32, value: Option<i64>) {
    *slot(consts, idx as usize) = value;
}

/// Rewrites `arg` to a literal in place when it refers to a known, clean
/// constant. Returns whether a rewrite happened.
fn resolve(arg: &mut Arg, consts: &[Option<i64>], dirty: &[bool]) -> bool {
    if let Arg::Var(idx) = *arg {
        if !is_dirty(dirty, idx) {
            if let Some(Some(v)) = consts.get(idx as usize) {
                *arg = Arg::Literal(*v);
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use blc_lex::Lexer;
    use blc_par::Parser;
    use blc_util::{Handler, Interner};

    use super::*;

    fn optimized_ir(src: &str) -> Vec<Instr> {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut interner, &mut handler).tokenize();
        let program = Parser::new(tokens, &mut handler).parse_program().expect("valid program");
        let mut ir = blc_ir::lower_program(&program, &interner, &mut handler);
        optimize(&mut ir);
        ir
    }

    #[test]
    fn straight_line_arithmetic_folds_away_every_binop() {
        let ir = optimized_ir("main() { auto x; x = 2 + 3 * 4; return x; }");
        assert!(!ir.iter().any(|i| matches!(i, Instr::BinOp { .. })));
        assert!(ir.iter().any(|i| matches!(i, Instr::AutoAssign(0, Arg::Literal(20)))));
    }

    #[test]
    fn a_chain_of_plain_assignments_folds_end_to_end() {
        let ir = optimized_ir("main() { auto a, b; a = 5; b = a + 1; return b; }");
        assert!(ir.iter().any(|i| matches!(i, Instr::AutoAssign(1, Arg::Literal(6)))));
    }

    #[test]
    fn a_local_written_inside_a_loop_is_never_propagated_into_its_condition() {
        let ir = optimized_ir("main() { auto x; x = 1; while (x) { x = x; } }");
        let cond_is_literal = ir.iter().any(|i| matches!(i, Instr::JumpIfFalse(_, Arg::Literal(_))));
        assert!(!cond_is_literal);
    }

    #[test]
    fn globals_fold_the_same_way_as_locals() {
        let ir = optimized_ir("g; main() { g = 7; }");
        assert!(ir.iter().any(|i| matches!(i, Instr::GlobalAssign(0, Arg::Literal(7)))));
    }

    #[test]
    fn optimizing_an_already_optimized_program_is_a_no_op() {
        let mut ir = optimized_ir("main() { auto a, b; a = 5; b = a + 1; return b; }");
        let before = format!("{ir:?}");
        optimize(&mut ir);
        assert_eq!(format!("{ir:?}"), before);
    }
}
