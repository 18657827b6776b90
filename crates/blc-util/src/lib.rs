//! blc-util - Shared infrastructure for the blc compiler pipeline.
//!
//! Every other crate in this workspace depends on this one for three things:
//! source locations (`Span`), diagnostic reporting (`Diagnostic`/`Handler`),
//! and a small string interner (`Interner`) that shows up at the
//! lexer/parser boundary.
//!
//! The compiler is a single-threaded, synchronous batch tool (one process,
//! one input file, one `Session`), so nothing here is `Sync`-hardened the way
//! a long-lived incremental compiler's interner would be.

pub mod diagnostic;
pub mod interner;
pub mod span;

pub use diagnostic::{Diagnostic, ErrorClass, Handler, Level};
pub use interner::{Interner, Symbol};
pub use span::Span;
