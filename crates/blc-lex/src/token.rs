//! Token kinds produced by the lexer.

use blc_util::Symbol;

/// A lexical unit. Keywords, punctuation, and operators carry no payload;
/// `Ident` and `IntLiteral` carry the data the parser needs to build the AST.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    // Keywords
    Auto,
    Extern,
    Return,
    If,
    Else,
    While,
    Switch,
    Case,
    Goto,

    // Identifiers and literals
    Ident(Symbol),
    IntLiteral(i64),

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Colon,
    Question,

    // Operators — single-character
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Gt,
    Bang,

    // Operators — maximal-munch multi-character forms
    Eq,
    Ne,
    Le,
    Ge,
    Shl,
    Shr,
    Inc,
    Dec,
    AndAnd,
    OrOr,

    // Compound assignment
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    ShlEq,
    ShrEq,

    Eof,
}
