//! Driver-level errors: config resolution, target lookup, file I/O, and
//! the external toolchain invocations that assemble and link.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrvError {
    #[error("no input file given")]
    MissingInput,

    #[error(transparent)]
    Target(#[from] blc_target::TargetError),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not a recognized wasm/wat file")]
    UnrecognizedWasmFile(PathBuf),

    #[error("compilation failed")]
    CompilationFailed,

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with status {status}")]
    CommandFailed { command: String, status: i32 },
}

pub type Result<T> = std::result::Result<T, DrvError>;
