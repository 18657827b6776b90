//! Loop discovery and loop-carried invalidation sets.
//!
//! Identifies `while` spans purely by the `while_start_`/`while_end_` label
//! convention and records, for each span, every local
//! index an `AutoAssign` writes inside it. These sets feed the dirtiness
//! check that keeps constant propagation from publishing stale values
//! across loop iterations.

use std::collections::HashSet;

use blc_ir::{Instr, LabelKind};

#[derive(Clone, Debug)]
pub struct LoopSpan {
    pub start_index: usize,
    pub end_index: usize,
    pub modified: HashSet<u32>,
}

/// Matches nested `while_start_`/`while_end_` pairs with a stack, the same
/// way the WAT backend pairs them for structured-control reconstruction.
/// An unmatched end (no open start) is ignored; an unmatched start at the
/// end of the function never closes and contributes no span.
pub fn find_loops(ir: &[Instr]) -> Vec<LoopSpan> {
    let mut stack: Vec<usize> = Vec::new();
    let mut spans = Vec::new();

    for (i, instr) in ir.iter().enumerate() {
        let Instr::Label(name) = instr else { continue };
        match LabelKind::parse(name) {
            Some(LabelKind::WhileStart) => stack.push(i),
            Some(LabelKind::WhileEnd) => {
                if let Some(start_index) = stack.pop() {
                    spans.push(LoopSpan {
                        start_index,
                        end_index: i,
                        modified: HashSet::new(),
                    });
                }
            },
            _ => {},
        }
    }

    for span in &mut spans {
        for instr in &ir[span.start_index..=span.end_index] {
            if let Instr::AutoAssign(idx, _) = instr {
                span.modified.insert(*idx);
            }
        }
    }

    spans
}
