//! Diagnostic reporting.
//!
//! Every error class (lexical, syntactic, semantic, target/toolchain, I/O)
//! funnels through one `Diagnostic` shape and one `Handler`, so the driver
//! has a single place to decide "is this fatal" instead of five ad-hoc
//! `eprintln!` call sites scattered across crates.

use std::fmt;

use crate::span::Span;

/// Severity of a diagnostic. `Help` is unused today but kept for parity with
/// the builder-style diagnostics this crate's reporting path is modeled on;
/// a future `-Werror`-equivalent flag would need it for suggestions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// Which pipeline stage raised the diagnostic, as part of a five-way
/// error taxonomy; the driver uses this (not the `Level`) to decide
/// whether to keep going — semantic errors are non-fatal, everything else
/// that reaches `Error` level stops the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Lexical,
    Syntactic,
    Semantic,
    Target,
    Io,
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub class: ErrorClass,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            class,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some(span) = self.span {
            write!(f, "\n  --> byte {span}")?;
        }
        Ok(())
    }
}

/// Accumulates diagnostics for one compilation.
///
/// Not `Sync`/`Send`-hardened on purpose: a `Session` owns exactly one
/// `Handler` and the compiler never runs two compilations concurrently.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Print every accumulated diagnostic to stderr, in the order emitted.
    pub fn print_all(&self) {
        for diag in &self.diagnostics {
            eprintln!("{diag}");
        }
    }
}
