//! `-print-ir` debug dump.
//!
//! One instruction per line, with args printed as `v(i)`/`g(i)`/the literal
//! value and binary ops suffixed with their operator's `debug_name()` so
//! this never drifts from the optimizer's own naming.

use std::fmt::Write as _;

use blc_ir::{Arg, Instr};
use blc_util::Interner;

pub fn dump(ir: &[Instr], interner: &Interner) -> String {
    let mut out = String::new();
    for instr in ir {
        writeln!(out, "{}", format_instr(instr, interner)).unwrap();
    }
    out
}

fn format_arg(arg: Arg) -> String {
    match arg {
        Arg::Literal(v) => v.to_string(),
        Arg::Var(i) => format!("v({i})"),
        Arg::Global(i) => format!("g({i})"),
    }
}

fn format_instr(instr: &Instr, interner: &Interner) -> String {
    match instr {
        Instr::AutoVar(n) => format!("Autovar({n})"),
        Instr::GlobalVar(n) => format!("Globalvar({n})"),
        Instr::ExternVar(name) => format!("Externvar({})", interner.resolve(*name)),
        Instr::AutoAssign(dest, arg) => format!("Autoassign v({dest}) = {}", format_arg(*arg)),
        Instr::GlobalAssign(dest, arg) => format!("Globalassign g({dest}) = {}", format_arg(*arg)),
        Instr::BinOp { dest, lhs, rhs, op } => {
            format!("Binop v({dest}) = {} {}() {}", format_arg(*lhs), op.debug_name(), format_arg(*rhs))
        },
        Instr::FunCall(name, arg) => match arg {
            Some(arg) => format!("Funcall {}({})", interner.resolve(*name), format_arg(*arg)),
            None => format!("Funcall {}()", interner.resolve(*name)),
        },
        Instr::Label(name) => format!("Label {name}:"),
        Instr::Jump(label) => format!("Jump {label}"),
        Instr::JumpIfFalse(label, cond) => format!("JumpIfFalse {label}, {}", format_arg(*cond)),
        Instr::Ret(value) => match value {
            Some(v) => format!("Return {}", format_arg(*v)),
            None => "Return".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use blc_par::BinOp;

    use super::*;

    #[test]
    fn a_binop_prints_its_operator_suffix() {
        let ir = vec![Instr::BinOp { dest: 1000, lhs: Arg::Var(0), rhs: Arg::Literal(1), op: BinOp::Add }];
        let text = dump(&ir, &Interner::new());
        assert_eq!(text.trim(), "Binop v(1000) = v(0) add() 1");
    }

    #[test]
    fn a_return_with_no_value_prints_bare() {
        let text = dump(&[Instr::Ret(None)], &Interner::new());
        assert_eq!(text.trim(), "Return");
    }

    #[test]
    fn funcall_names_resolve_through_the_interner() {
        let mut interner = Interner::new();
        let sym = interner.intern("exit");
        let text = dump(&[Instr::FunCall(sym, Some(Arg::Literal(0)))], &interner);
        assert_eq!(text.trim(), "Funcall exit(0)");
    }
}
