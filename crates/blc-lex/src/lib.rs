//! blc-lex - Lexical analysis.
//!
//! Transforms the source buffer into a flat token sequence. Whitespace
//! is skipped and never re-emitted; the only failure mode
//! is a single unrecognized byte, which is fatal and aborts the whole
//! compilation rather than trying to resynchronize — there is no benefit to
//! continuing once a byte outside the grammar's alphabet appears.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::Token;
