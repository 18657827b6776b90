//! Main lexer driver.
//!
//! Whitespace is insignificant and comments are `/* ... */`, not nested; an
//! unterminated comment consumes to end of input. Every
//! multi-character operator is maximal-munch: `lex_operator` always tries
//! the longest form first, falling back one character at a time.

use blc_util::{Diagnostic, ErrorClass, Handler, Span};

use crate::cursor::Cursor;
use crate::token::Token;

pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor<'a>,
    handler: &'a mut Handler,
    interner: &'a mut blc_util::Interner,
    /// Set once an unrecognized byte is hit; `next_token` returns `Eof` for
    /// every call after that so the driver can stop cleanly instead of
    /// looping on the same bad byte.
    fatal: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut blc_util::Interner, handler: &'a mut Handler) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            handler,
            interner,
            fatal: false,
        }
    }

    pub fn has_fatal_error(&self) -> bool {
        self.fatal
    }

    /// Tokenize the whole input. Stops early (returning what was collected so
    /// far, plus a trailing `Eof`) at the first unrecognized byte.
    pub fn tokenize(mut self) -> Vec<(Token, Span)> {
        let mut tokens = Vec::new();
        loop {
            let (tok, span) = self.next_token();
            let is_eof = tok == Token::Eof;
            tokens.push((tok, span));
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> (Token, Span) {
        self.skip_whitespace_and_comments();

        let start = self.cursor.position() as u32;
        if self.fatal || self.cursor.is_at_end() {
            return (Token::Eof, Span::new(start, start));
        }

        let b = self.cursor.current();
        let tok = match b {
            b'(' => self.single(Token::LParen),
            b')' => self.single(Token::RParen),
            b'{' => self.single(Token::LBrace),
            b'}' => self.single(Token::RBrace),
            b'[' => self.single(Token::LBracket),
            b']' => self.single(Token::RBracket),
            b';' => self.single(Token::Semicolon),
            b',' => self.single(Token::Comma),
            b':' => self.single(Token::Colon),
            b'?' => self.single(Token::Question),
            b'0'..=b'9' => self.lex_number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_ident_or_keyword(),
            _ => self.lex_operator(),
        };

        match tok {
            Some(tok) => {
                let end = self.cursor.position() as u32;
                (tok, Span::new(start, end))
            },
            None => {
                self.fatal = true;
                let end = self.cursor.position() as u32;
                self.handler.emit(
                    Diagnostic::error(
                        ErrorClass::Lexical,
                        format!("unrecognized byte 0x{b:02x}"),
                    )
                    .with_span(Span::new(start, end)),
                );
                (Token::Eof, Span::new(start, end))
            },
        }
    }

    fn single(&mut self, tok: Token) -> Option<Token> {
        self.cursor.advance();
        Some(tok)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.cursor.advance();
                },
                b'/' if self.cursor.peek(1) == b'*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    // Not nested: consumes to the first `*/`, or to EOF if
                    // the comment is never terminated.
                    while !self.cursor.is_at_end()
                        && !(self.cursor.current() == b'*' && self.cursor.peek(1) == b'/')
                    {
                        self.cursor.advance();
                    }
                    if !self.cursor.is_at_end() {
                        self.cursor.advance();
                        self.cursor.advance();
                    }
                },
                _ => break,
            }
        }
    }

    fn lex_number(&mut self) -> Option<Token> {
        let start = self.cursor.position();
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }
        let end = self.cursor.position();
        let text = &self.source[start..end];
        // Decimal digits only, no sign/base prefix; a literal longer
        // than i64 is a lexical error rather than silently
        // wrapping, since the grammar never intended arbitrary precision.
        match text.parse::<i64>() {
            Ok(v) => Some(Token::IntLiteral(v)),
            Err(_) => None,
        }
    }

    fn lex_ident_or_keyword(&mut self) -> Option<Token> {
        let start = self.cursor.position();
        while matches!(self.cursor.current(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.cursor.advance();
        }
        let end = self.cursor.position();
        let text = &self.source[start..end];
        Some(match text {
            "auto" => Token::Auto,
            "extern" => Token::Extern,
            "return" => Token::Return,
            "if" => Token::If,
            "else" => Token::Else,
            "while" => Token::While,
            "switch" => Token::Switch,
            "case" => Token::Case,
            "goto" => Token::Goto,
            _ => Token::Ident(self.interner.intern(text)),
        })
    }

    /// Maximal-munch scan for operators: every multi-character form (`==`,
    /// `!=`, `<=`, `>=`, `<<`, `>>`, `++`, `--`, `&&`, `||`, and every
    /// compound `OP=`) is checked before falling back to its single-char
    /// prefix.
    fn lex_operator(&mut self) -> Option<Token> {
        let b = self.cursor.advance();
        Some(match b {
            b'=' => {
                if self.cursor.eat(b'=') {
                    Token::Eq
                } else {
                    Token::Assign
                }
            },
            b'!' => {
                if self.cursor.eat(b'=') {
                    Token::Ne
                } else {
                    Token::Bang
                }
            },
            b'<' => {
                if self.cursor.eat(b'=') {
                    Token::Le
                } else if self.cursor.eat(b'<') {
                    if self.cursor.eat(b'=') {
                        Token::ShlEq
                    } else {
                        Token::Shl
                    }
                } else {
                    Token::Lt
                }
            },
            b'>' => {
                if self.cursor.eat(b'=') {
                    Token::Ge
                } else if self.cursor.eat(b'>') {
                    if self.cursor.eat(b'=') {
                        Token::ShrEq
                    } else {
                        Token::Shr
                    }
                } else {
                    Token::Gt
                }
            },
            b'+' => {
                if self.cursor.eat(b'+') {
                    Token::Inc
                } else if self.cursor.eat(b'=') {
                    Token::PlusEq
                } else {
                    Token::Plus
                }
            },
            b'-' => {
                if self.cursor.eat(b'-') {
                    Token::Dec
                } else if self.cursor.eat(b'=') {
                    Token::MinusEq
                } else {
                    Token::Minus
                }
            },
            b'*' => {
                if self.cursor.eat(b'=') {
                    Token::StarEq
                } else {
                    Token::Star
                }
            },
            b'/' => {
                if self.cursor.eat(b'=') {
                    Token::SlashEq
                } else {
                    Token::Slash
                }
            },
            b'%' => {
                if self.cursor.eat(b'=') {
                    Token::PercentEq
                } else {
                    Token::Percent
                }
            },
            b'&' if self.cursor.current() == b'&' => {
                self.cursor.advance();
                Token::AndAnd
            },
            b'|' if self.cursor.current() == b'|' => {
                self.cursor.advance();
                Token::OrOr
            },
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blc_util::Interner;

    fn lex(src: &str) -> Vec<Token> {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let lexer = Lexer::new(src, &mut interner, &mut handler);
        lexer.tokenize().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn keywords_and_identifiers_are_distinguished() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let lexer = Lexer::new("auto x extern y", &mut interner, &mut handler);
        let toks: Vec<_> = lexer.tokenize().into_iter().map(|(t, _)| t).collect();
        let names: Vec<Option<&str>> = toks
            .iter()
            .map(|t| match t {
                Token::Ident(sym) => Some(interner.resolve(*sym)),
                _ => None,
            })
            .collect();
        assert_eq!(toks[0], Token::Auto);
        assert_eq!(names[1], Some("x"));
        assert_eq!(toks[2], Token::Extern);
        assert_eq!(names[3], Some("y"));
        assert_eq!(toks[4], Token::Eof);
    }

    #[test]
    fn maximal_munch_prefers_multi_char_operators() {
        assert_eq!(lex("=="), vec![Token::Eq, Token::Eof]);
        assert_eq!(lex("<<="), vec![Token::ShlEq, Token::Eof]);
        assert_eq!(lex("&&"), vec![Token::AndAnd, Token::Eof]);
        assert_eq!(lex("++"), vec![Token::Inc, Token::Eof]);
        assert_eq!(lex("<"), vec![Token::Lt, Token::Eof]);
    }

    #[test]
    fn block_comments_are_skipped_and_not_nested() {
        let toks = lex("1 /* comment /* still comment */ 2");
        assert_eq!(toks, vec![Token::IntLiteral(1), Token::IntLiteral(2), Token::Eof]);
    }

    #[test]
    fn unterminated_comment_consumes_to_eof() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let lexer = Lexer::new("1 /* never closed", &mut interner, &mut handler);
        let toks: Vec<_> = lexer.tokenize().into_iter().map(|(t, _)| t).collect();
        assert_eq!(toks, vec![Token::IntLiteral(1), Token::Eof]);
        assert!(!handler.has_errors());
    }

    #[test]
    fn unrecognized_byte_is_a_fatal_lexical_error() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let lexer = Lexer::new("x @ y", &mut interner, &mut handler);
        let _ = lexer.tokenize();
        assert!(handler.has_errors());
    }

    #[test]
    fn integer_literals_are_decimal_only() {
        assert_eq!(lex("42"), vec![Token::IntLiteral(42), Token::Eof]);
    }
}
