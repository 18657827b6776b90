//! x86-64 backend: FASM-syntax ELF64 text, linked with `gcc -no-pie`.

use std::fmt::Write as _;

use blc_ir::{Arg, Instr};
use blc_par::BinOp;
use blc_util::Interner;

use crate::backend::Backend;
use crate::scan::{scan, Layout};

pub struct X86_64Backend;

impl Backend for X86_64Backend {
    fn name(&self) -> &'static str {
        "x86_64"
    }

    fn file_extension(&self) -> &'static str {
        "asm"
    }

    fn codegen(&self, ir: &[Instr], interner: &Interner) -> String {
        let layout = scan(ir, interner);
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
        format!("fasm {asm_path} {obj_path}")
    }

    fn ld_cmd(&self, obj_path: &str, exe_path: &str) -> String {
        format!("gcc -no-pie {obj_path} -o {exe_path}")
    }
}

fn header(out: &mut String, layout: &Layout) {
    writeln!(out, "format ELF64").unwrap();
    writeln!(out, "section '.text' executable").unwrap();
    for external in &layout.externs {
        writeln!(out, "extrn {external}").unwrap();
    }
    writeln!(out, "public main").unwrap();
    if layout.global_count > 0 {
        writeln!(out, "section '.bss' writeable").unwrap();
        for i in 0..layout.global_count {
            writeln!(out, "global_{i} rq 1").unwrap();
        }
    }
}

fn prolog(out: &mut String, layout: &Layout) {
    writeln!(out, "main:").unwrap();
    writeln!(out, "    push rbp").unwrap();
    writeln!(out, "    mov rbp, rsp").unwrap();
    if layout.stack_size > 0 {
        writeln!(out, "    sub rsp, {}", layout.stack_size).unwrap();
    }
}

fn epilog(out: &mut String, layout: &Layout) {
    out.push('\n');
    if layout.stack_size > 0 {
        writeln!(out, "    add rsp, {}", layout.stack_size).unwrap();
    }
    writeln!(out, "    pop rbp").unwrap();
    writeln!(out, "    mov rdi, 0").unwrap();
    writeln!(out, "    call exit").unwrap();
}

fn slot(layout: &Layout, var: u32) -> String {
    format!("qword [rbp - {}]", layout.var_offsets[&var])
}

fn larg(out: &mut String, arg: Arg, reg: &str, layout: &Layout) {
    match arg {
        Arg::Literal(v) => writeln!(out, "    mov {reg}, {v}").unwrap(),
        Arg::Var(idx) => writeln!(out, "    mov {reg}, qword [rbp - {}]", layout.var_offsets[&idx]).unwrap(),
        Arg::Global(idx) => writeln!(out, "    mov {reg}, qword [global_{idx}]").unwrap(),
    }
}

fn emit(out: &mut String, instr: &Instr, layout: &Layout, interner: &Interner) {
    match instr {
        Instr::AutoAssign(dest, arg) => {
            let dest_slot = slot(layout, *dest);
            match arg {
                Arg::Literal(v) => {
                    writeln!(out, "    mov {dest_slot}, {v}").unwrap();
                },
                _ => {
                    larg(out, *arg, "rax", layout);
                    writeln!(out, "    mov {dest_slot}, rax").unwrap();
                },
            }
        },
        Instr::GlobalAssign(dest, arg) => {
            larg(out, *arg, "rax", layout);
            writeln!(out, "    mov qword [global_{dest}], rax").unwrap();
        },
        Instr::FunCall(name, arg) => {
            if let Some(arg) = arg {
                larg(out, *arg, "rdi", layout);
            }
            writeln!(out, "    call {}", interner.resolve(*name)).unwrap();
        },
        Instr::BinOp { dest, lhs, rhs, op } => binop(out, *dest, *lhs, *rhs, *op, layout),
        Instr::Label(name) => {
            writeln!(out, "{name}:").unwrap();
        },
        Instr::Jump(label) => {
            writeln!(out, "    jmp {label}").unwrap();
        },
        Instr::JumpIfFalse(label, cond) => {
            larg(out, *cond, "rax", layout);
            writeln!(out, "    cmp rax, 0").unwrap();
            writeln!(out, "    je {label}").unwrap();
        },
        Instr::Ret(value) => match value {
            Some(v) => {
                larg(out, *v, "rdi", layout);
                writeln!(out, "    call exit").unwrap();
            },
            None => {
                writeln!(out, "    mov rdi, 0").unwrap();
                writeln!(out, "    call exit").unwrap();
            },
        },
        Instr::AutoVar(_) | Instr::GlobalVar(_) | Instr::ExternVar(_) => {},
    }
}

fn binop(out: &mut String, dest: u32, lhs: Arg, rhs: Arg, op: BinOp, layout: &Layout) {
    let dest_slot = slot(layout, dest);
    match op {
        BinOp::Add => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            writeln!(out, "    add rax, rbx").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Sub => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            writeln!(out, "    sub rax, rbx").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Mul => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            writeln!(out, "    imul rax, rbx").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Div => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            writeln!(out, "    cqo").unwrap();
            writeln!(out, "    idiv rbx").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Mod => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            writeln!(out, "    cqo").unwrap();
            writeln!(out, "    idiv rbx").unwrap();
            writeln!(out, "    mov {dest_slot}, rdx").unwrap();
        },
        BinOp::Shl => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rcx", layout);
            writeln!(out, "    shl rax, cl").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Shr => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rcx", layout);
            writeln!(out, "    shr rax, cl").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            writeln!(out, "    cmp rax, rbx").unwrap();
            let setcc = match op {
                BinOp::Eq => "sete",
                BinOp::Ne => "setne",
                BinOp::Lt => "setl",
                BinOp::Le => "setle",
                BinOp::Gt => "setg",
                BinOp::Ge => "setge",
                _ => unreachable!(),
            };
            writeln!(out, "    {setcc} al").unwrap();
            writeln!(out, "    movzx rax, al").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::And => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            let id = dest;
            writeln!(out, "    cmp rax, 0").unwrap();
            writeln!(out, "    je and_false_{id}").unwrap();
            writeln!(out, "    cmp rbx, 0").unwrap();
            writeln!(out, "    je and_false_{id}").unwrap();
            writeln!(out, "    mov rax, 1").unwrap();
            writeln!(out, "    jmp and_end_{id}").unwrap();
            writeln!(out, "and_false_{id}:").unwrap();
            writeln!(out, "    mov rax, 0").unwrap();
            writeln!(out, "and_end_{id}:").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
        BinOp::Or => {
            larg(out, lhs, "rax", layout);
            larg(out, rhs, "rbx", layout);
            let id = dest;
            writeln!(out, "    cmp rax, 0").unwrap();
            writeln!(out, "    jne or_true_{id}").unwrap();
            writeln!(out, "    cmp rbx, 0").unwrap();
            writeln!(out, "    jne or_true_{id}").unwrap();
            writeln!(out, "    mov rax, 0").unwrap();
            writeln!(out, "    jmp or_end_{id}").unwrap();
            writeln!(out, "or_true_{id}:").unwrap();
            writeln!(out, "    mov rax, 1").unwrap();
            writeln!(out, "or_end_{id}:").unwrap();
            writeln!(out, "    mov {dest_slot}, rax").unwrap();
        },
    }
}

#[cfg(test)]
mod tests {
    use blc_par::BinOp as Op;

    use super::*;

    fn interner() -> Interner {
        Interner::new()
    }

    #[test]
    fn a_straight_line_function_emits_prolog_and_exit_epilog() {
        let ir = vec![Instr::AutoVar(1), Instr::AutoAssign(0, Arg::Literal(4)), Instr::Ret(Some(Arg::Var(0)))];
        let text = X86_64Backend.codegen(&ir, &interner());
        assert!(text.contains("format ELF64"));
        assert!(text.contains("public main"));
        assert!(text.contains("sub rsp, 8"));
        assert!(text.contains("call exit"));
    }

    #[test]
    fn division_emits_cqo_before_idiv() {
        let ir = vec![
            Instr::AutoVar(1),
            Instr::BinOp { dest: 1000, lhs: Arg::Literal(10), rhs: Arg::Literal(3), op: Op::Div },
        ];
        let text = X86_64Backend.codegen(&ir, &interner());
        let cqo = text.find("cqo").unwrap();
        let idiv = text.find("idiv").unwrap();
        assert!(cqo < idiv);
    }

    #[test]
    fn globals_get_a_bss_reservation() {
        let ir = vec![Instr::GlobalVar(2), Instr::GlobalAssign(0, Arg::Literal(7))];
        let text = X86_64Backend.codegen(&ir, &interner());
        assert!(text.contains("section '.bss' writeable"));
        assert!(text.contains("global_0 rq 1"));
        assert!(text.contains("global_1 rq 1"));
        assert!(text.contains("mov qword [global_0], rax"));
    }

    #[test]
    fn asm_and_ld_commands_match_the_reference_toolchain() {
        let backend = X86_64Backend;
        assert_eq!(backend.asm_cmd("out.asm", "out.o"), "fasm out.asm out.o");
        assert_eq!(backend.ld_cmd("out.o", "out"), "gcc -no-pie out.o -o out");
    }
}
