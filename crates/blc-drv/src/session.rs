//! Phase sequencing for one compilation.
//!
//! Nothing here persists beyond one `compile` call: there is no incremental
//! cache or multi-file source map, because the language is whole-program
//! single-file. Each phase transition emits a `tracing` debug event so a
//! verbose run shows where time went without changing the default output.

use std::fs;
use std::path::Path;
use std::process::Command;

use blc_ir::lower_program;
use blc_lex::Lexer;
use blc_opt::optimize;
use blc_par::Parser;
use blc_target::Backend;
use blc_util::{Handler, Interner};
use tracing::debug;

use crate::config::Config;
use crate::error::{DrvError, Result};
use crate::ir_fmt;

#[derive(Default)]
pub struct Session {
    pub interner: Interner,
    pub handler: Handler,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexes, parses, lowers, optimizes, and (unless `print_ir`/`asm_only`
    /// short-circuits first) assembles and links `config.input` with
    /// `backend`.
    pub fn compile(&mut self, config: &Config, backend: &'static dyn Backend) -> Result<()> {
        let source =
            fs::read_to_string(&config.input).map_err(|source| DrvError::Read { path: config.input.clone(), source })?;

        debug!(phase = "lexing", file = %config.input.display());
        let tokens = Lexer::new(&source, &mut self.interner, &mut self.handler).tokenize();
        if self.handler.has_errors() {
            self.handler.print_all();
            return Err(DrvError::CompilationFailed);
        }

        debug!(phase = "parsing");
        let program = Parser::new(tokens, &mut self.handler).parse_program();
        if self.handler.has_errors() || program.is_none() {
            self.handler.print_all();
            return Err(DrvError::CompilationFailed);
        }
        let program = program.expect("checked above");

        debug!(phase = "lowering");
        let mut ir = lower_program(&program, &self.interner, &mut self.handler);
        // Semantic diagnostics are non-fatal: print them but keep going,
        // possibly over an ill-formed program.
        self.handler.print_all();

        debug!(phase = "optimizing");
        optimize(&mut ir);

        if config.print_ir {
            println!("{}", ir_fmt::dump(&ir, &self.interner));
        }

        debug!(phase = "codegen", target = backend.name());
        let asm_text = backend.codegen(&ir, &self.interner);

        if config.asm_only {
            println!("{asm_text}");
            return Ok(());
        }

        let asm_path = config.output_stem.with_extension(backend.file_extension());
        fs::write(&asm_path, &asm_text).map_err(|source| DrvError::Write { path: asm_path.clone(), source })?;

        let obj_path = config.output_stem.with_extension("o");
        let exe_path = config.output_stem.clone();

        run_command(&backend.asm_cmd(path_str(&asm_path), path_str(&obj_path)))?;
        run_command(&backend.ld_cmd(path_str(&obj_path), path_str(&exe_path)))?;

        Ok(())
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("CLI paths are always valid UTF-8")
}

/// Runs a backend-produced shell command string through a shell, so
/// chained commands (the WasmEdge backend's `wat2wasm ... && wasmedgec
/// ...`) are interpreted correctly instead of split on whitespace.
fn run_command(command: &str) -> Result<()> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .status()
        .map_err(|source| DrvError::Spawn { command: command.to_string(), source })?;
    if !status.success() {
        return Err(DrvError::CommandFailed { command: command.to_string(), status: status.code().unwrap_or(-1) });
    }
    Ok(())
}
