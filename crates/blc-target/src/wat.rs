//! WebAssembly text backend.
//!
//! WAT has no arbitrary jumps, so structured control flow has to be
//! reconstructed from the `while_start_`/`while_end_` label convention.
//! Everything that doesn't fit that shape is emitted as a harmless
//! comment rather than rejected — a degraded-but-safe fallback.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use blc_ir::{Arg, Instr, LabelKind};
use blc_par::BinOp;
use blc_util::Interner;

use crate::backend::Backend;

pub struct WatBackend;

#[derive(Default)]
struct Meta {
    var_offsets: HashMap<u32, u32>,
    local_count: u32,
    externs: BTreeSet<String>,
    extern_has_arg: HashMap<String, bool>,
}

fn scan_wat(ir: &[Instr], interner: &Interner) -> Meta {
    let mut meta = Meta::default();
    for instr in ir {
        match instr {
            Instr::ExternVar(name) => {
                let name = interner.resolve(*name).to_string();
                meta.extern_has_arg.entry(name.clone()).or_insert(false);
                meta.externs.insert(name);
            },
            Instr::AutoVar(count) => {
                for _ in 0..*count {
                    meta.var_offsets.insert(meta.local_count, meta.local_count);
                    meta.local_count += 1;
                }
            },
            Instr::BinOp { dest, .. } => {
                meta.var_offsets.entry(*dest).or_insert_with(|| {
                    let slot = meta.local_count;
                    meta.local_count += 1;
                    slot
                });
            },
            Instr::FunCall(name, arg) => {
                let name = interner.resolve(*name).to_string();
                if arg.is_some() {
                    meta.extern_has_arg.insert(name, true);
                } else {
                    meta.extern_has_arg.entry(name).or_insert(false);
                }
            },
            _ => {},
        }
    }
    meta
}

/// For each `while_start_N`, the first subsequent `JumpIfFalse` target that
/// begins with `while_end_` is its matching end label.
fn pair_loops(ir: &[Instr]) -> HashMap<String, String> {
    let mut start_stack: Vec<String> = Vec::new();
    let mut pairing: HashMap<String, String> = HashMap::new();

    for instr in ir {
        match instr {
            Instr::Label(name) => match LabelKind::parse(name) {
                Some(LabelKind::WhileStart) => start_stack.push(name.clone()),
                Some(LabelKind::WhileEnd) => {
                    if let Some(top) = start_stack.last() {
                        if pairing.get(top) == Some(name) {
                            start_stack.pop();
                        }
                    }
                },
                _ => {},
            },
            Instr::JumpIfFalse(label, _) if LabelKind::parse(label) == Some(LabelKind::WhileEnd) => {
                if let Some(top) = start_stack.last() {
                    pairing.entry(top.clone()).or_insert_with(|| label.clone());
                }
            },
            _ => {},
        }
    }
    pairing
}

impl Backend for WatBackend {
    fn name(&self) -> &'static str {
        "wasm"
    }

    fn file_extension(&self) -> &'static str {
        "wat"
    }

    fn codegen(&self, ir: &[Instr], interner: &Interner) -> String {
        let meta = scan_wat(ir, interner);
        let pairing = pair_loops(ir);
        let mut out = String::new();
        header(&mut out, &meta);
        prolog(&mut out, &meta);

        let mut loop_stack: Vec<(String, String)> = Vec::new();
        for instr in ir {
            emit(&mut out, instr, &meta, &pairing, &mut loop_stack, interner);
        }

        epilog(&mut out);
        out
    }

    fn asm_cmd(&self, asm_path: &str, obj_path: &str) -> String {
        format!("wasmtime compile {asm_path} -o {obj_path}")
    }

    fn ld_cmd(&self, obj_path: &str, exe_path: &str) -> String {
        format!("cp {obj_path} {exe_path}.wasm")
    }
}

fn header(out: &mut String, meta: &Meta) {
    writeln!(out, "(module").unwrap();
    for external in &meta.externs {
        if external == "exit" {
            continue;
        }
        let has_arg = meta.extern_has_arg.get(external).copied().unwrap_or(false);
        if external == "printf" {
            writeln!(out, "  (import \"env\" \"printf\" (func $printf (param i64)))").unwrap();
        } else if has_arg {
            writeln!(out, "  (import \"env\" \"{external}\" (func ${external} (param i64)))").unwrap();
        } else {
            writeln!(out, "  (import \"env\" \"{external}\" (func ${external}))").unwrap();
        }
    }
    writeln!(out, "  (memory 1)").unwrap();
    writeln!(out, "  (export \"memory\" (memory 0))").unwrap();
}

fn prolog(out: &mut String, meta: &Meta) {
    writeln!(out, "  (func $main (export \"_start\") (result i32)").unwrap();
    if meta.local_count > 0 {
        out.push_str("    (local");
        for _ in 0..meta.local_count {
            out.push_str(" i64");
        }
        out.push_str(")\n");
    }
}

fn epilog(out: &mut String) {
    writeln!(out, "    i64.const 0").unwrap();
    writeln!(out, "    i32.wrap_i64").unwrap();
    writeln!(out, "  )").unwrap();
    writeln!(out, ")").unwrap();
}

fn larg(out: &mut String, arg: Arg, meta: &Meta) {
    match arg {
        Arg::Literal(v) => writeln!(out, "    i64.const {v}").unwrap(),
        Arg::Var(idx) => writeln!(out, "    local.get {}", meta.var_offsets[&idx]).unwrap(),
        Arg::Global(idx) => writeln!(out, "    global.get {idx}").unwrap(),
    }
}

fn emit(
    out: &mut String,
    instr: &Instr,
    meta: &Meta,
    pairing: &HashMap<String, String>,
    loop_stack: &mut Vec<(String, String)>,
    interner: &Interner,
) {
    match instr {
        Instr::AutoAssign(dest, arg) => {
            larg(out, *arg, meta);
            writeln!(out, "    local.set {}", meta.var_offsets[dest]).unwrap();
        },
        Instr::GlobalAssign(dest, arg) => {
            larg(out, *arg, meta);
            writeln!(out, "    global.set {dest}").unwrap();
        },
        Instr::FunCall(name, arg) => {
            let name = interner.resolve(*name);
            match arg {
                Some(arg) => {
                    larg(out, *arg, meta);
                    if name == "exit" {
                        writeln!(out, "    i32.wrap_i64").unwrap();
                        writeln!(out, "    return").unwrap();
                    } else if name == "printf" {
                        writeln!(out, "    call $printf").unwrap();
                    } else {
                        writeln!(out, "    call ${name}").unwrap();
                    }
                },
                None => {
                    if name == "exit" {
                        writeln!(out, "    i32.const 0").unwrap();
                        writeln!(out, "    return").unwrap();
                    } else {
                        writeln!(out, "    call ${name}").unwrap();
                    }
                },
            }
        },
        Instr::BinOp { dest, lhs, rhs, op } => binop(out, *dest, *lhs, *rhs, *op, meta),
        Instr::Label(name) => match LabelKind::parse(name) {
            Some(LabelKind::WhileStart) => match pairing.get(name) {
                Some(end) => {
                    writeln!(out, "    (block ${end}").unwrap();
                    writeln!(out, "    (loop ${name}").unwrap();
                    loop_stack.push((name.clone(), end.clone()));
                },
                None => {
                    writeln!(out, "    ;; label: {name}").unwrap();
                },
            },
            Some(LabelKind::WhileEnd) => {
                if loop_stack.last().is_some_and(|(_, end)| end == name) {
                    writeln!(out, "    )").unwrap();
                    writeln!(out, "    )").unwrap();
                    loop_stack.pop();
                } else {
                    writeln!(out, "    ;; label: {name}").unwrap();
                }
            },
            _ => {
                writeln!(out, "    ;; label: {name}").unwrap();
            },
        },
        Instr::Jump(label) => {
            if loop_stack.last().is_some_and(|(start, _)| start == label) {
                writeln!(out, "    br ${label}").unwrap();
            } else {
                writeln!(out, "    ;; jump to {label}").unwrap();
            }
        },
        Instr::JumpIfFalse(label, cond) => {
            if loop_stack.last().is_some_and(|(_, end)| end == label) {
                larg(out, *cond, meta);
                writeln!(out, "    i64.eqz").unwrap();
                writeln!(out, "    br_if ${label}").unwrap();
            } else {
                writeln!(out, "    ;; jumpiffalse to {label}").unwrap();
            }
        },
        Instr::Ret(value) => match value {
            Some(v) => {
                larg(out, *v, meta);
                writeln!(out, "    i32.wrap_i64").unwrap();
                writeln!(out, "    return").unwrap();
            },
            None => {
                writeln!(out, "    i32.const 0").unwrap();
                writeln!(out, "    return").unwrap();
            },
        },
        Instr::AutoVar(_) | Instr::GlobalVar(_) | Instr::ExternVar(_) => {},
    }
}

fn binop(out: &mut String, dest: u32, lhs: Arg, rhs: Arg, op: BinOp, meta: &Meta) {
    let set = |out: &mut String| writeln!(out, "    local.set {}", meta.var_offsets[&dest]).unwrap();
    match op {
        BinOp::Add => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.add").unwrap();
            set(out);
        },
        BinOp::Sub => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.sub").unwrap();
            set(out);
        },
        BinOp::Mul => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.mul").unwrap();
            set(out);
        },
        BinOp::Div => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.div_s").unwrap();
            set(out);
        },
        BinOp::Mod => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.rem_s").unwrap();
            set(out);
        },
        BinOp::Shl => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.shl").unwrap();
            set(out);
        },
        BinOp::Shr => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            writeln!(out, "    i64.shr_s").unwrap();
            set(out);
        },
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            larg(out, lhs, meta);
            larg(out, rhs, meta);
            let op_name = match op {
                BinOp::Eq => "i64.eq",
                BinOp::Ne => "i64.ne",
                BinOp::Lt => "i64.lt_s",
                BinOp::Le => "i64.le_s",
                BinOp::Gt => "i64.gt_s",
                BinOp::Ge => "i64.ge_s",
                _ => unreachable!(),
            };
            writeln!(out, "    {op_name}").unwrap();
            writeln!(out, "    i64.extend_i32_u").unwrap();
            set(out);
        },
        BinOp::And => {
            larg(out, lhs, meta);
            writeln!(out, "    i64.const 0").unwrap();
            writeln!(out, "    i64.ne").unwrap();
            larg(out, rhs, meta);
            writeln!(out, "    i64.const 0").unwrap();
            writeln!(out, "    i64.ne").unwrap();
            writeln!(out, "    i32.and").unwrap();
            writeln!(out, "    i64.extend_i32_u").unwrap();
            set(out);
        },
        BinOp::Or => {
            larg(out, lhs, meta);
            writeln!(out, "    i64.const 0").unwrap();
            writeln!(out, "    i64.ne").unwrap();
            larg(out, rhs, meta);
            writeln!(out, "    i64.const 0").unwrap();
            writeln!(out, "    i64.ne").unwrap();
            writeln!(out, "    i32.or").unwrap();
            writeln!(out, "    i64.extend_i32_u").unwrap();
            set(out);
        },
    }
}
