//! Recursive-descent parser.
//!
//! Statement dispatch is driven entirely by the first token;
//! expression parsing has no precedence climbing at
//! all — `parse_expr` left-folds every binary operator at one shared level,
//! which is a documented limitation of this language, not an oversight.
//! Anything that needs `*` to bind tighter than `+` has to parenthesize.

use blc_lex::Token;
use blc_util::{Diagnostic, ErrorClass, Handler, Span};

use crate::ast::{BinOp, Expr, Function, Program, Stmt};

pub struct Parser<'a> {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    handler: &'a mut Handler,
    /// Flipped to `false` on the first syntax error. `parse_program` checks
    /// this at the very end and returns `None` ("no program") rather than a
    /// partial AST.
    ok: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<(Token, Span)>, handler: &'a mut Handler) -> Self {
        Self {
            tokens,
            pos: 0,
            handler,
            ok: true,
        }
    }

    pub fn parse_program(mut self) -> Option<Program> {
        let mut program = Program::default();

        while self.peek() != &Token::Eof {
            if let Token::Ident(name) = *self.peek() {
                if self.peek_at(1) == &Token::Semicolon {
                    self.advance();
                    self.advance();
                    program.globals.push(name);
                    continue;
                }
            }

            match self.parse_function() {
                Some(func) => program.functions.push(func),
                None => self.recover_to_top_level(),
            }
        }

        if self.ok {
            Some(program)
        } else {
            None
        }
    }

    fn parse_function(&mut self) -> Option<Function> {
        let name = match self.peek() {
            Token::Ident(s) => *s,
            _ => {
                self.error("expected function name");
                return None;
            },
        };
        self.advance();

        self.expect(Token::LParen)?;
        self.expect(Token::RParen)?;
        self.expect(Token::LBrace)?;

        let mut body = Vec::new();
        while self.peek() != &Token::RBrace && self.peek() != &Token::Eof {
            body.push(self.parse_stmt()?);
        }
        self.expect(Token::RBrace)?;

        Some(Function { name, body })
    }

    fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.peek() {
            Token::Auto => self.parse_decl_list(true),
            Token::Extern => self.parse_decl_list(false),
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::Return => self.parse_return(),
            Token::LBrace => self.parse_block(),
            Token::Ident(_) => self.parse_ident_stmt(),
            _ => {
                self.error("expected a statement");
                None
            },
        }
    }

    fn parse_decl_list(&mut self, is_auto: bool) -> Option<Stmt> {
        self.advance(); // `auto` or `extern`
        let mut names = Vec::new();
        loop {
            let span = self.peek_span();
            match self.peek() {
                Token::Ident(s) => names.push((*s, span)),
                _ => {
                    self.error("expected identifier in declaration");
                    return None;
                },
            }
            self.advance();
            if self.peek() == &Token::Comma {
                self.advance();
                continue;
            }
            break;
        }
        self.expect(Token::Semicolon)?;
        Some(if is_auto { Stmt::Auto(names) } else { Stmt::Extern(names) })
    }

    fn parse_if(&mut self) -> Option<Stmt> {
        self.advance();
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.peek() == &Token::Else {
            self.advance();
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Some(Stmt::If(cond, then_branch, else_branch))
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        self.advance();
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Some(Stmt::While(cond, body))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        self.advance();
        if self.peek() == &Token::Semicolon {
            self.advance();
            return Some(Stmt::Return(None));
        }
        let expr = self.parse_expr()?;
        self.expect(Token::Semicolon)?;
        Some(Stmt::Return(Some(expr)))
    }

    fn parse_block(&mut self) -> Option<Stmt> {
        self.advance();
        let mut stmts = Vec::new();
        while self.peek() != &Token::RBrace && self.peek() != &Token::Eof {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(Token::RBrace)?;
        Some(Stmt::Block(stmts))
    }

    fn parse_ident_stmt(&mut self) -> Option<Stmt> {
        let (name, span) = match (self.peek(), self.peek_span()) {
            (Token::Ident(s), span) => (*s, span),
            _ => unreachable!("dispatched only on Token::Ident"),
        };
        self.advance();

        match self.peek() {
            Token::Assign => {
                self.advance();
                let rhs = self.parse_expr()?;
                self.expect(Token::Semicolon)?;
                Some(Stmt::Assign(name, span, rhs))
            },
            Token::LParen => {
                self.advance();
                let arg = if self.peek() == &Token::RParen {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(Token::RParen)?;
                self.expect(Token::Semicolon)?;
                Some(Stmt::FuncCall(name, arg))
            },
            _ => {
                self.error("expected '=' or '(' after identifier");
                None
            },
        }
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        let mut left = self.parse_primary()?;
        while let Some(op) = Self::token_to_binop(self.peek()) {
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Some(left)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.peek_span();
        match self.peek() {
            Token::IntLiteral(v) => {
                let v = *v;
                self.advance();
                Some(Expr::IntLiteral(v))
            },
            Token::Ident(s) => {
                let s = *s;
                self.advance();
                Some(Expr::Ident(s, span))
            },
            _ => {
                self.error("expected an expression");
                None
            },
        }
    }

    fn token_to_binop(tok: &Token) -> Option<BinOp> {
        Some(match tok {
            Token::Plus => BinOp::Add,
            Token::Minus => BinOp::Sub,
            Token::Star => BinOp::Mul,
            Token::Slash => BinOp::Div,
            Token::Percent => BinOp::Mod,
            Token::Eq => BinOp::Eq,
            Token::Ne => BinOp::Ne,
            Token::Lt => BinOp::Lt,
            Token::Le => BinOp::Le,
            Token::Gt => BinOp::Gt,
            Token::Ge => BinOp::Ge,
            Token::AndAnd => BinOp::And,
            Token::OrOr => BinOp::Or,
            Token::Shl => BinOp::Shl,
            Token::Shr => BinOp::Shr,
            _ => return None,
        })
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    fn peek_span(&self) -> Span {
        self.tokens.get(self.pos).map(|(_, s)| *s).unwrap_or(Span::DUMMY)
    }

    fn advance(&mut self) -> (Token, Span) {
        let current = self.tokens.get(self.pos).copied().unwrap_or((Token::Eof, Span::DUMMY));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        current
    }

    fn expect(&mut self, expected: Token) -> Option<Span> {
        if self.peek() == &expected {
            let (_, span) = self.advance();
            Some(span)
        } else {
            self.error(&format!("expected {expected:?}, found {:?}", self.peek()));
            None
        }
    }

    fn error(&mut self, message: &str) {
        self.ok = false;
        self.handler
            .emit(Diagnostic::error(ErrorClass::Syntactic, message.to_string()).with_span(self.peek_span()));
    }

    /// After a syntax error abandons one function, skip forward to the next
    /// token that plausibly starts a new top-level item (an identifier at
    /// brace-depth 0) so the parser can keep collecting diagnostics for the
    /// rest of the file. The overall result is still "no program" because
    /// `ok` was already cleared.
    fn recover_to_top_level(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match self.peek() {
                Token::Eof => return,
                Token::LBrace => {
                    depth += 1;
                    self.advance();
                },
                Token::RBrace => {
                    depth -= 1;
                    self.advance();
                    if depth <= 0 {
                        return;
                    }
                },
                _ => {
                    self.advance();
                },
            }
        }
    }
}
