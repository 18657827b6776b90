//! Command-line surface.
//!
//! One `Args` struct, not a `Subcommand` enum: this compiler has exactly
//! one command. Flags use clap's standard `--long`/`-short` convention
//! rather than single-dash getopt-style spelling (see DESIGN.md for why).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "blc", about = "Compiler for the b-lang toy systems language")]
pub struct Args {
    /// Source file to compile. Not required when `--list-targets` or
    /// `--parse` is given.
    pub input: Option<PathBuf>,

    /// Target backend: x86_64, aarch64 (arm64, aarch64-linux), wasm
    /// (wasm32, wasmtime), wasmedge, x86_64-linux.
    #[arg(short = 't', long = "target", default_value = "x86_64")]
    pub target: String,

    /// Output stem; defaults to the input file's stem.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Optimization level. Accepted for compatibility; currently inert.
    #[arg(long = "optimize")]
    pub optimize: Option<u8>,

    /// Dump the lowered IR to stdout before codegen.
    #[arg(long = "print-ir")]
    pub print_ir: bool,

    /// Print generated assembly to stdout and stop before assembling.
    #[arg(long = "asm-only")]
    pub asm_only: bool,

    /// Force the target to `wasmedge`.
    #[arg(long = "wasmedge-aot")]
    pub wasmedge_aot: bool,

    /// List known target names to stderr and exit.
    #[arg(long = "list-targets")]
    pub list_targets: bool,

    /// Inspect a `.wasm`/`.wat` file instead of compiling.
    #[arg(long = "parse")]
    pub parse: Option<PathBuf>,
}
