//! blc-drv - Command-line driver.
//!
//! Owns the `Config`/`Session` split used throughout this pipeline: `Args`
//! (clap) is parsed into a `Config`, then a fresh `Session` (one `Handler`,
//! one `Interner`, nothing else) runs the phases in order. `-list-targets`
//! and `-parse` are handled before any `Session` exists, since neither
//! touches the compiler pipeline at all.

mod cli;
mod config;
mod error;
mod ir_fmt;
mod session;

use std::fs;

pub use cli::Args;
pub use config::Config;
pub use error::{DrvError, Result};
pub use session::Session;

/// Runs the CLI end to end: resolves `args` into an action, and returns an
/// error the binary maps to exit code 1.
pub fn run(args: Args) -> Result<()> {
    if args.list_targets {
        for name in blc_target::canonical_names() {
            eprintln!("{name}");
        }
        return Ok(());
    }

    if let Some(path) = &args.parse {
        return inspect_wasm(path);
    }

    let config = Config::from_args(&args)?;
    let backend = blc_target::resolve_available(&config.target)?;

    let mut session = Session::new();
    session.compile(&config, backend)
}

fn inspect_wasm(path: &std::path::Path) -> Result<()> {
    let bytes = fs::read(path).map_err(|source| DrvError::Read { path: path.to_path_buf(), source })?;
    match blc_wasminfo::sniff(&bytes) {
        blc_wasminfo::Kind::Unrecognized => Err(DrvError::UnrecognizedWasmFile(path.to_path_buf())),
        kind => {
            println!("{kind}");
            Ok(())
        },
    }
}
