//! AArch64 backend: GAS-syntax assembly, assembled with `as -64` and linked
//! with `gcc`.

use std::fmt::Write as _;

use blc_ir::{Arg, Instr};
use blc_par::BinOp;
use blc_util::Interner;

use crate::backend::Backend;
use crate::scan::{align16, scan, Layout};

pub struct Aarch64Backend;

impl Backend for Aarch64Backend {
    fn name(&self) -> &'static str {
        "aarch64"
    }

    fn file_extension(&self) -> &'static str {
        "s"
    }

    fn codegen(&self, ir: &[Instr], interner: &Interner) -> String {
        let mut layout = scan(ir, interner);
        layout.stack_size = align16(layout.stack_size);
        let mut out = String::new();
        header(&mut out, &layout);
        prolog(&mut out, &layout);
        for instr in ir {
            emit(&mut out, instr, &layout, interner);
        }
        epilog(&mut out, &layout);
        out
    }

    fn asm_cmd(&self, asm_path: &str, obj_path: &str) -> String {
        format!("as -64 {asm_path} -o {obj_path}")
    }

    fn ld_cmd(&self, obj_path: &str, exe_path: &str) -> String {
        format!("gcc {obj_path} -o {exe_path}")
    }
}

fn header(out: &mut String, layout: &Layout) {
    writeln!(out, ".section .text").unwrap();
    writeln!(out, ".global _start").unwrap();
    for external in &layout.externs {
        writeln!(out, ".extern {external}").unwrap();
    }
    out.push('\n');
    if layout.global_count > 0 {
        writeln!(out, ".section .bss").unwrap();
        for i in 0..layout.global_count {
            writeln!(out, "global_{i}:").unwrap();
            writeln!(out, "    .skip 8").unwrap();
        }
    }
}

fn prolog(out: &mut String, layout: &Layout) {
    writeln!(out, "_start:").unwrap();
    writeln!(out, "    stp x29, x30, [sp, #-16]!").unwrap();
    writeln!(out, "    mov x29, sp").unwrap();
    if layout.stack_size > 0 {
        writeln!(out, "    sub sp, sp, #{}", layout.stack_size).unwrap();
    }
}

fn epilog(out: &mut String, layout: &Layout) {
    out.push('\n');
    if layout.stack_size > 0 {
        writeln!(out, "    add sp, sp, #{}", layout.stack_size).unwrap();
    }
    writeln!(out, "    mov x0, #0").unwrap();
    writeln!(out, "    bl exit").unwrap();
    writeln!(out, "    ldp x29, x30, [sp], #16").unwrap();
    writeln!(out, "    ret").unwrap();
}

fn slot(layout: &Layout, var: u32) -> u32 {
    layout.var_offsets[&var]
}

fn larg(out: &mut String, arg: Arg, reg: &str, layout: &Layout) {
    match arg {
        Arg::Literal(v) => writeln!(out, "    mov {reg}, #{v}").unwrap(),
        Arg::Var(idx) => writeln!(out, "    ldr {reg}, [x29, #-{}]", slot(layout, idx)).unwrap(),
        Arg::Global(idx) => {
            writeln!(out, "    adrp {reg}, global_{idx}").unwrap();
            writeln!(out, "    add {reg}, {reg}, :lo12:global_{idx}").unwrap();
            writeln!(out, "    ldr {reg}, [{reg}]").unwrap();
        },
    }
}

fn emit(out: &mut String, instr: &Instr, layout: &Layout, interner: &Interner) {
    match instr {
        Instr::AutoAssign(dest, arg) => {
            larg(out, *arg, "x0", layout);
            writeln!(out, "    str x0, [x29, #-{}]", slot(layout, *dest)).unwrap();
        },
        Instr::GlobalAssign(dest, arg) => {
            larg(out, *arg, "x0", layout);
            writeln!(out, "    adrp x1, global_{dest}").unwrap();
            writeln!(out, "    add x1, x1, :lo12:global_{dest}").unwrap();
            writeln!(out, "    str x0, [x1]").unwrap();
        },
        Instr::FunCall(name, arg) => {
            if let Some(arg) = arg {
                larg(out, *arg, "x0", layout);
            }
            writeln!(out, "    bl {}", interner.resolve(*name)).unwrap();
        },
        Instr::BinOp { dest, lhs, rhs, op } => binop(out, *dest, *lhs, *rhs, *op, layout),
        Instr::Label(name) => {
            writeln!(out, "{name}:").unwrap();
        },
        Instr::Jump(label) => {
            writeln!(out, "    b {label}").unwrap();
        },
        Instr::JumpIfFalse(label, cond) => {
            larg(out, *cond, "x0", layout);
            writeln!(out, "    cmp x0, #0").unwrap();
            writeln!(out, "    beq {label}").unwrap();
        },
        Instr::Ret(value) => match value {
            Some(v) => {
                larg(out, *v, "x0", layout);
                writeln!(out, "    bl exit").unwrap();
            },
            None => {
                writeln!(out, "    mov x0, #0").unwrap();
                writeln!(out, "    bl exit").unwrap();
            },
        },
        Instr::AutoVar(_) | Instr::GlobalVar(_) | Instr::ExternVar(_) => {},
    }
}

fn binop(out: &mut String, dest: u32, lhs: Arg, rhs: Arg, op: BinOp, layout: &Layout) {
    let dest_off = slot(layout, dest);
    match op {
        BinOp::Add => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    add x0, x0, x1").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Sub => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    sub x0, x0, x1").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Mul => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    mul x0, x0, x1").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Div => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    sdiv x0, x0, x1").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Mod => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    sdiv x2, x0, x1").unwrap();
            writeln!(out, "    msub x0, x2, x1, x0").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Shl => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    lsl x0, x0, x1").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Shr => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    lsr x0, x0, x1").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            writeln!(out, "    cmp x0, x1").unwrap();
            let cond = match op {
                BinOp::Eq => "eq",
                BinOp::Ne => "ne",
                BinOp::Lt => "lt",
                BinOp::Le => "le",
                BinOp::Gt => "gt",
                BinOp::Ge => "ge",
                _ => unreachable!(),
            };
            writeln!(out, "    cset x0, {cond}").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::And => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            let id = dest;
            writeln!(out, "    cmp x0, #0").unwrap();
            writeln!(out, "    beq .Lland_false_{id}").unwrap();
            writeln!(out, "    cmp x1, #0").unwrap();
            writeln!(out, "    beq .Lland_false_{id}").unwrap();
            writeln!(out, "    mov x0, #1").unwrap();
            writeln!(out, "    b .Lland_end_{id}").unwrap();
            writeln!(out, ".Lland_false_{id}:").unwrap();
            writeln!(out, "    mov x0, #0").unwrap();
            writeln!(out, ".Lland_end_{id}:").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
        BinOp::Or => {
            larg(out, lhs, "x0", layout);
            larg(out, rhs, "x1", layout);
            let id = dest;
            writeln!(out, "    cmp x0, #0").unwrap();
            writeln!(out, "    bne .Llor_true_{id}").unwrap();
            writeln!(out, "    cmp x1, #0").unwrap();
            writeln!(out, "    bne .Llor_true_{id}").unwrap();
            writeln!(out, "    mov x0, #0").unwrap();
            writeln!(out, "    b .Llor_end_{id}").unwrap();
            writeln!(out, ".Llor_true_{id}:").unwrap();
            writeln!(out, "    mov x0, #1").unwrap();
            writeln!(out, ".Llor_end_{id}:").unwrap();
            writeln!(out, "    str x0, [x29, #-{dest_off}]").unwrap();
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interner() -> Interner {
        Interner::new()
    }

    #[test]
    fn stack_size_is_padded_to_sixteen_bytes() {
        let ir = vec![Instr::AutoVar(1), Instr::Ret(None)];
        let text = Aarch64Backend.codegen(&ir, &interner());
        assert!(text.contains("sub sp, sp, #16"));
    }

    #[test]
    fn modulo_computes_via_sdiv_and_msub() {
        let ir = vec![
            Instr::AutoVar(1),
            Instr::BinOp { dest: 1000, lhs: Arg::Literal(7), rhs: Arg::Literal(3), op: BinOp::Mod },
        ];
        let text = Aarch64Backend.codegen(&ir, &interner());
        assert!(text.contains("sdiv x2, x0, x1"));
        assert!(text.contains("msub x0, x2, x1, x0"));
    }

    #[test]
    fn globals_are_addressed_through_adrp_lo12() {
        let ir = vec![Instr::GlobalVar(1), Instr::GlobalAssign(0, Arg::Literal(9))];
        let text = Aarch64Backend.codegen(&ir, &interner());
        assert!(text.contains("adrp x1, global_0"));
        assert!(text.contains(":lo12:global_0"));
    }

    #[test]
    fn asm_and_ld_commands_match_the_reference_toolchain() {
        let backend = Aarch64Backend;
        assert_eq!(backend.asm_cmd("out.s", "out.o"), "as -64 out.s -o out.o");
        assert_eq!(backend.ld_cmd("out.o", "out"), "gcc out.o -o out");
    }
}
