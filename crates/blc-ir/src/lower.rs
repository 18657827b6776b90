//! AST → IR lowering.
//!
//! Operates per function with three name tables (locals, globals, externs).
//! Globals are pre-populated once from the program header; locals and
//! externs are scoped to one function, since the grammar has no nested
//! blocks that introduce new bindings. `main` is the only function the rest
//! of the pipeline treats as an entry point, so lowering simply
//! concatenates every function's instructions into one program-wide
//! stream — there is no per-function boundary marker in the IR itself.

use std::collections::{HashMap, HashSet};

use blc_par::{BinOp, Expr, Function, Program, Stmt};
use blc_util::{Diagnostic, ErrorClass, Handler, Interner, Symbol};

use crate::ir::{Arg, Instr, LabelKind};

pub fn lower_program(program: &Program, interner: &Interner, handler: &mut Handler) -> Vec<Instr> {
    let mut ir = Vec::new();

    let mut globals = HashMap::new();
    for (i, &name) in program.globals.iter().enumerate() {
        globals.insert(name, i as u32);
    }
    if !program.globals.is_empty() {
        ir.push(Instr::GlobalVar(program.globals.len() as u32));
    }

    for func in &program.functions {
        lower_function(func, &globals, interner, handler, &mut ir);
    }

    ir
}

struct FunctionLowerer<'a> {
    globals: &'a HashMap<Symbol, u32>,
    locals: HashMap<Symbol, u32>,
    externs: HashSet<Symbol>,
    next_local: u32,
    next_temp: u32,
    interner: &'a Interner,
    handler: &'a mut Handler,
}

fn lower_function(
    func: &Function,
    globals: &HashMap<Symbol, u32>,
    interner: &Interner,
    handler: &mut Handler,
    ir: &mut Vec<Instr>,
) {
    let mut lowerer = FunctionLowerer {
        globals,
        locals: HashMap::new(),
        externs: HashSet::new(),
        next_local: 0,
        next_temp: 1000,
        interner,
        handler,
    };

    // Declaration pass: `auto`/`extern` only ever appear at a function's
    // top level, so a single scan of the immediate body is sufficient.
    for stmt in &func.body {
        match stmt {
            Stmt::Auto(names) => {
                for &(name, span) in names {
                    if lowerer.name_conflict(name) {
                        lowerer.conflict(name, span);
                        continue;
                    }
                    let idx = lowerer.next_local;
                    lowerer.next_local += 1;
                    lowerer.locals.insert(name, idx);
                    ir.push(Instr::AutoVar(1));
                }
            },
            Stmt::Extern(names) => {
                for &(name, span) in names {
                    if lowerer.name_conflict(name) {
                        lowerer.conflict(name, span);
                        continue;
                    }
                    lowerer.externs.insert(name);
                    ir.push(Instr::ExternVar(name));
                }
            },
            _ => {},
        }
    }

    for stmt in &func.body {
        lowerer.lower_stmt(stmt, ir);
    }
}

impl<'a> FunctionLowerer<'a> {
    fn name_conflict(&self, name: Symbol) -> bool {
        self.locals.contains_key(&name) || self.externs.contains(&name) || self.globals.contains_key(&name)
    }

    fn conflict(&mut self, name: Symbol, span: blc_util::Span) {
        self.handler.emit(
            Diagnostic::error(
                ErrorClass::Semantic,
                format!("'{}' is already declared in this function", self.interner.resolve(name)),
            )
            .with_span(span),
        );
    }

    fn fresh_temp(&mut self) -> u32 {
        let t = self.next_temp;
        self.next_temp += 1;
        t
    }

    fn lower_expr(&mut self, expr: &Expr, ir: &mut Vec<Instr>) -> Arg {
        match expr {
            Expr::IntLiteral(v) => Arg::Literal(*v),
            Expr::Ident(name, span) => {
                if let Some(&idx) = self.globals.get(name) {
                    Arg::Global(idx)
                } else if let Some(&idx) = self.locals.get(name) {
                    Arg::Var(idx)
                } else {
                    // Reading an extern's value, or an altogether undeclared
                    // name, is not assignment or argument-passing (the only
                    // two uses an extern is legal in), but there is also no
                    // `Arg::Extern` to lower it to. Diagnose and fold to a
                    // sentinel literal so the rest of the function still
                    // lowers.
                    self.handler.emit(
                        Diagnostic::error(
                            ErrorClass::Semantic,
                            format!("'{}' cannot be used as a value here", self.interner.resolve(*name)),
                        )
                        .with_span(*span),
                    );
                    Arg::Literal(0)
                }
            },
            Expr::Binary(op, lhs, rhs) => {
                let lhs_arg = self.lower_expr(lhs, ir);
                let rhs_arg = self.lower_expr(rhs, ir);
                let dest = self.fresh_temp();
                ir.push(Instr::BinOp {
                    dest,
                    lhs: lhs_arg,
                    rhs: rhs_arg,
                    op: *op,
                });
                Arg::Var(dest)
            },
        }
    }

    fn lower_stmt(&mut self, stmt: &Stmt, ir: &mut Vec<Instr>) {
        match stmt {
            Stmt::Auto(_) | Stmt::Extern(_) => {
                // Already handled in the declaration pass.
            },
            Stmt::Assign(name, span, expr) => {
                if let Some(&idx) = self.globals.get(name) {
                    let arg = self.lower_expr(expr, ir);
                    ir.push(Instr::GlobalAssign(idx, arg));
                } else if self.externs.contains(name) {
                    self.handler.emit(
                        Diagnostic::error(
                            ErrorClass::Semantic,
                            format!("cannot assign to extern variable '{}'", self.interner.resolve(*name)),
                        )
                        .with_span(*span),
                    );
                } else if let Some(&idx) = self.locals.get(name) {
                    let arg = self.lower_expr(expr, ir);
                    ir.push(Instr::AutoAssign(idx, arg));
                } else {
                    self.handler.emit(
                        Diagnostic::error(
                            ErrorClass::Semantic,
                            format!("'{}' was never declared", self.interner.resolve(*name)),
                        )
                        .with_span(*span),
                    );
                }
            },
            Stmt::FuncCall(name, arg_expr) => {
                let arg = match arg_expr {
                    None => None,
                    Some(Expr::Ident(arg_name, span)) if self.externs.contains(arg_name) => {
                        self.handler.emit(
                            Diagnostic::error(
                                ErrorClass::Semantic,
                                format!(
                                    "cannot pass extern variable '{}' as an argument",
                                    self.interner.resolve(*arg_name)
                                ),
                            )
                            .with_span(*span),
                        );
                        return;
                    },
                    Some(e) => Some(self.lower_expr(e, ir)),
                };
                ir.push(Instr::FunCall(*name, arg));
            },
            Stmt::If(cond, then_branch, else_branch) => {
                let else_id = self.fresh_temp();
                let end_id = self.fresh_temp();
                let end_label = LabelKind::IfEnd.make(end_id);

                match else_branch {
                    Some(else_branch) => {
                        let else_label = LabelKind::IfElse.make(else_id);
                        let cond_arg = self.lower_expr(cond, ir);
                        ir.push(Instr::JumpIfFalse(else_label.clone(), cond_arg));
                        self.lower_stmt(then_branch, ir);
                        ir.push(Instr::Jump(end_label.clone()));
                        ir.push(Instr::Label(else_label));
                        self.lower_stmt(else_branch, ir);
                        ir.push(Instr::Label(end_label));
                    },
                    None => {
                        let cond_arg = self.lower_expr(cond, ir);
                        ir.push(Instr::JumpIfFalse(end_label.clone(), cond_arg));
                        self.lower_stmt(then_branch, ir);
                        ir.push(Instr::Label(end_label));
                    },
                }
            },
            Stmt::While(cond, body) => {
                let start_id = self.fresh_temp();
                let end_id = self.fresh_temp();
                let start_label = LabelKind::WhileStart.make(start_id);
                let end_label = LabelKind::WhileEnd.make(end_id);

                ir.push(Instr::Label(start_label.clone()));
                let cond_arg = self.lower_expr(cond, ir);
                ir.push(Instr::JumpIfFalse(end_label.clone(), cond_arg));
                self.lower_stmt(body, ir);
                ir.push(Instr::Jump(start_label));
                ir.push(Instr::Label(end_label));
            },
            Stmt::Return(expr) => {
                let arg = expr.as_ref().map(|e| self.lower_expr(e, ir));
                ir.push(Instr::Ret(arg));
            },
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.lower_stmt(s, ir);
                }
            },
        }
    }
}
