use std::rc::Rc;

use crate::foundation::limits::MAX_NESTING_DEPTH;
use crate::script::ast::{
    BinaryOp, DeclKind, Expr, FunctionDecl, Lit, Program, Stmt, StmtKind, Target, UnaryOp,
};
use crate::script::error::ScriptError;
use crate::script::lexer::{Token, TokenKind, lex};

pub(crate) fn parse_program(src: &str) -> Result<Program, ScriptError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let mut body = Vec::new();
    while p.peek().kind != TokenKind::Eof {
        body.push(p.parse_statement()?);
    }
    Ok(Program { body })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

fn show(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => format!("identifier '{s}'"),
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::Str(_) => "string".to_owned(),
        TokenKind::Eof => "end of input".to_owned(),
        other => match punctuation(other) {
            Some(p) => format!("'{p}'"),
            None => format!("'{}'", property_name(other).as_deref().unwrap_or("?")),
        },
    }
}

fn punctuation(kind: &TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBrace => "{",
        TokenKind::RBrace => "}",
        TokenKind::LBracket => "[",
        TokenKind::RBracket => "]",
        TokenKind::Comma => ",",
        TokenKind::Dot => ".",
        TokenKind::Semicolon => ";",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::StarStar => "**",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::PlusPlus => "++",
        TokenKind::MinusMinus => "--",
        TokenKind::Assign => "=",
        TokenKind::PlusAssign => "+=",
        TokenKind::MinusAssign => "-=",
        TokenKind::StarAssign => "*=",
        TokenKind::SlashAssign => "/=",
        TokenKind::PercentAssign => "%=",
        TokenKind::Bang => "!",
        TokenKind::EqEq => "==",
        TokenKind::EqEqEq => "===",
        TokenKind::Ne => "!=",
        TokenKind::NeEq => "!==",
        TokenKind::Lt => "<",
        TokenKind::Le => "<=",
        TokenKind::Gt => ">",
        TokenKind::Ge => ">=",
        TokenKind::AndAnd => "&&",
        TokenKind::OrOr => "||",
        TokenKind::Question => "?",
        TokenKind::Colon => ":",
        _ => return None,
    })
}

/// Property names may be keywords (`obj.for`).
fn property_name(kind: &TokenKind) -> Option<Rc<str>> {
    let s = match kind {
        TokenKind::Ident(s) => return Some(Rc::from(s.as_str())),
        TokenKind::Let => "let",
        TokenKind::Const => "const",
        TokenKind::Var => "var",
        TokenKind::Function => "function",
        TokenKind::Return => "return",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::While => "while",
        TokenKind::For => "for",
        TokenKind::Of => "of",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Null => "null",
        TokenKind::Undefined => "undefined",
        _ => return None,
    };
    Some(Rc::from(s))
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let i = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[i].kind
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn offset(&self) -> usize {
        self.peek().span.start
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, ScriptError> {
        Err(ScriptError::new(self.offset(), message))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ScriptError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            self.error(format!(
                "expected {}, found {}",
                show(&kind),
                show(&self.peek().kind)
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<Rc<str>, ScriptError> {
        match &self.peek().kind {
            TokenKind::Ident(s) => {
                let s = Rc::from(s.as_str());
                self.bump();
                Ok(s)
            }
            other => self.error(format!("expected identifier, found {}", show(other))),
        }
    }

    fn enter(&mut self) -> Result<(), ScriptError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return self.error(format!("nesting deeper than {MAX_NESTING_DEPTH} levels"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Automatic semicolon insertion: a statement may also end at `}`, end of input or a
    /// line break.
    fn end_statement(&mut self) -> Result<(), ScriptError> {
        if self.consume(TokenKind::Semicolon) {
            return Ok(());
        }
        let t = self.peek();
        if matches!(t.kind, TokenKind::RBrace | TokenKind::Eof) || t.newline_before {
            return Ok(());
        }
        self.error(format!("expected ';', found {}", show(&t.kind)))
    }

    // ---- statements -----------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Stmt, ScriptError> {
        self.enter()?;
        let r = self.parse_statement_inner();
        self.leave();
        r
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ScriptError> {
        let offset = self.offset();
        let kind = match self.peek().kind {
            TokenKind::LBrace => {
                self.bump();
                StmtKind::Block(self.parse_block_body()?)
            }
            TokenKind::Semicolon => {
                self.bump();
                StmtKind::Empty
            }
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                let decl = self.parse_decl()?;
                self.end_statement()?;
                decl
            }
            TokenKind::Function => {
                self.bump();
                let name = self.expect_ident()?;
                StmtKind::Function(Rc::new(self.parse_function_rest(Some(name))?))
            }
            TokenKind::If => {
                self.bump();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let then = Box::new(self.parse_statement()?);
                let otherwise = if self.consume(TokenKind::Else) {
                    Some(Box::new(self.parse_statement()?))
                } else {
                    None
                };
                StmtKind::If {
                    cond,
                    then,
                    otherwise,
                }
            }
            TokenKind::While => {
                self.bump();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While { cond, body }
            }
            TokenKind::For => {
                self.bump();
                self.parse_for()?
            }
            TokenKind::Return => {
                self.bump();
                let t = self.peek();
                let value = if matches!(
                    t.kind,
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
                ) || t.newline_before
                {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.end_statement()?;
                StmtKind::Return(value)
            }
            TokenKind::Break => {
                self.bump();
                self.end_statement()?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.bump();
                self.end_statement()?;
                StmtKind::Continue
            }
            _ => {
                let e = self.parse_expr()?;
                self.end_statement()?;
                StmtKind::Expr(e)
            }
        };
        Ok(Stmt { kind, offset })
    }

    /// Statements up to and including the closing `}`.
    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut body = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RBrace => {
                    self.bump();
                    return Ok(body);
                }
                TokenKind::Eof => return self.error("expected '}', found end of input"),
                _ => body.push(self.parse_statement()?),
            }
        }
    }

    fn decl_kind(&mut self) -> Option<DeclKind> {
        let kind = match self.peek().kind {
            TokenKind::Let => DeclKind::Let,
            TokenKind::Const => DeclKind::Const,
            TokenKind::Var => DeclKind::Var,
            _ => return None,
        };
        self.bump();
        Some(kind)
    }

    /// `let a = 1, b` without the terminating semicolon.
    fn parse_decl(&mut self) -> Result<StmtKind, ScriptError> {
        let Some(kind) = self.decl_kind() else {
            return self.error("expected declaration");
        };
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let init = if self.consume(TokenKind::Assign) {
                Some(self.parse_assignment()?)
            } else if kind == DeclKind::Const {
                return self.error(format!("missing initializer in const declaration '{name}'"));
            } else {
                None
            };
            decls.push((name, init));
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }
        Ok(StmtKind::Decl { kind, decls })
    }

    fn parse_for(&mut self) -> Result<StmtKind, ScriptError> {
        self.expect(TokenKind::LParen)?;

        let is_decl = matches!(
            self.peek().kind,
            TokenKind::Let | TokenKind::Const | TokenKind::Var
        );
        if is_decl
            && matches!(self.peek_at(1), TokenKind::Ident(_))
            && *self.peek_at(2) == TokenKind::Of
        {
            let Some(kind) = self.decl_kind() else {
                return self.error("expected declaration");
            };
            let name = self.expect_ident()?;
            self.expect(TokenKind::Of)?;
            let iterable = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = Box::new(self.parse_statement()?);
            return Ok(StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            });
        }

        let init = if self.peek().kind == TokenKind::Semicolon {
            None
        } else {
            let offset = self.offset();
            let kind = if is_decl {
                self.parse_decl()?
            } else {
                StmtKind::Expr(self.parse_expr()?)
            };
            Some(Box::new(Stmt { kind, offset }))
        };
        self.expect(TokenKind::Semicolon)?;

        let cond = if self.peek().kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let update = if self.peek().kind == TokenKind::RParen {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::For {
            init,
            cond,
            update,
            body,
        })
    }

    /// Parameter list and body, after `function [name]`.
    fn parse_function_rest(&mut self, name: Option<Rc<str>>) -> Result<FunctionDecl, ScriptError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.consume(TokenKind::RParen) {
            loop {
                params.push(self.expect_ident()?);
                if self.consume(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::RParen)?;
                break;
            }
        }
        self.expect(TokenKind::LBrace)?;
        self.enter()?;
        let body = self.parse_block_body();
        self.leave();
        Ok(FunctionDecl {
            name,
            params,
            body: body?,
        })
    }

    // ---- expressions ----------------------------------------------------------------------

    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ScriptError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ScriptError> {
        self.enter()?;
        let r = self.parse_assignment_inner();
        self.leave();
        r
    }

    fn parse_assignment_inner(&mut self) -> Result<Expr, ScriptError> {
        let offset = self.offset();
        let lhs = self.parse_conditional()?;
        let op = match self.peek().kind {
            TokenKind::Assign => None,
            TokenKind::PlusAssign => Some(BinaryOp::Add),
            TokenKind::MinusAssign => Some(BinaryOp::Sub),
            TokenKind::StarAssign => Some(BinaryOp::Mul),
            TokenKind::SlashAssign => Some(BinaryOp::Div),
            TokenKind::PercentAssign => Some(BinaryOp::Mod),
            _ => return Ok(lhs),
        };
        let Some(target) = to_target(lhs) else {
            return Err(ScriptError::new(offset, "invalid assignment target"));
        };
        self.bump();
        let value = self.parse_assignment()?;
        Ok(Expr::Assign {
            target,
            op,
            value: Box::new(value),
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, ScriptError> {
        let cond = self.parse_or()?;
        if !self.consume(TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_assignment()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_assignment()?;
        Ok(Expr::Cond {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ScriptError> {
        let mut e = self.parse_and()?;
        while self.consume(TokenKind::OrOr) {
            let r = self.parse_and()?;
            e = Expr::Logical {
                and: false,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_and(&mut self) -> Result<Expr, ScriptError> {
        let mut e = self.parse_equality()?;
        while self.consume(TokenKind::AndAnd) {
            let r = self.parse_equality()?;
            e = Expr::Logical {
                and: true,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    /// Left-associative binary level: `next (op next)*`.
    fn parse_binary_level(
        &mut self,
        ops: &[(TokenKind, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, ScriptError>,
    ) -> Result<Expr, ScriptError> {
        let mut e = next(self)?;
        while let Some(op) = ops
            .iter()
            .find(|(k, _)| *k == self.peek().kind)
            .map(|(_, op)| *op)
        {
            self.bump();
            let r = next(self)?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_equality(&mut self) -> Result<Expr, ScriptError> {
        self.parse_binary_level(
            &[
                (TokenKind::EqEq, BinaryOp::Eq),
                (TokenKind::Ne, BinaryOp::Ne),
                (TokenKind::EqEqEq, BinaryOp::StrictEq),
                (TokenKind::NeEq, BinaryOp::StrictNe),
            ],
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> Result<Expr, ScriptError> {
        self.parse_binary_level(
            &[
                (TokenKind::Lt, BinaryOp::Lt),
                (TokenKind::Le, BinaryOp::Le),
                (TokenKind::Gt, BinaryOp::Gt),
                (TokenKind::Ge, BinaryOp::Ge),
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expr, ScriptError> {
        self.parse_binary_level(
            &[
                (TokenKind::Plus, BinaryOp::Add),
                (TokenKind::Minus, BinaryOp::Sub),
            ],
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> Result<Expr, ScriptError> {
        self.parse_binary_level(
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Mod),
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, ScriptError> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            self.enter()?;
            let e = self.parse_unary();
            self.leave();
            return Ok(Expr::Unary {
                op,
                expr: Box::new(e?),
            });
        }

        let delta = match self.peek().kind {
            TokenKind::PlusPlus => Some(1.0),
            TokenKind::MinusMinus => Some(-1.0),
            _ => None,
        };
        if let Some(delta) = delta {
            let offset = self.bump().span.start;
            self.enter()?;
            let e = self.parse_unary();
            self.leave();
            let Some(target) = to_target(e?) else {
                return Err(ScriptError::new(offset, "invalid increment/decrement target"));
            };
            return Ok(Expr::Update {
                target,
                delta,
                prefix: true,
            });
        }

        self.parse_exponent()
    }

    /// `**` is right-associative and binds tighter than unary minus on its left operand.
    fn parse_exponent(&mut self) -> Result<Expr, ScriptError> {
        let base = self.parse_postfix()?;
        if !self.consume(TokenKind::StarStar) {
            return Ok(base);
        }
        self.enter()?;
        let exp = self.parse_unary();
        self.leave();
        Ok(Expr::Binary {
            op: BinaryOp::Pow,
            left: Box::new(base),
            right: Box::new(exp?),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut e = self.parse_primary()?;

        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.bump();
                    let t = self.bump().clone();
                    let Some(name) = property_name(&t.kind) else {
                        return Err(ScriptError::new(
                            t.span.start,
                            format!("expected property name after '.', found {}", show(&t.kind)),
                        ));
                    };
                    e = Expr::Member {
                        object: Box::new(e),
                        name,
                    };
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    e = Expr::Index {
                        object: Box::new(e),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    self.bump();
                    let args = self.parse_list(TokenKind::RParen)?;
                    e = Expr::Call {
                        callee: Box::new(e),
                        args,
                    };
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus if !self.peek().newline_before => {
                    let t = self.bump().clone();
                    let Some(target) = to_target(e) else {
                        return Err(ScriptError::new(
                            t.span.start,
                            "invalid increment/decrement target",
                        ));
                    };
                    let delta = if t.kind == TokenKind::PlusPlus { 1.0 } else { -1.0 };
                    return Ok(Expr::Update {
                        target,
                        delta,
                        prefix: false,
                    });
                }
                _ => return Ok(e),
            }
        }
    }

    /// Comma-separated expressions up to `close`; a trailing comma is allowed.
    fn parse_list(&mut self, close: TokenKind) -> Result<Vec<Expr>, ScriptError> {
        let mut items = Vec::new();
        loop {
            if self.consume(close.clone()) {
                return Ok(items);
            }
            items.push(self.parse_assignment()?);
            if !self.consume(TokenKind::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn parse_object(&mut self) -> Result<Expr, ScriptError> {
        let mut props = Vec::new();
        loop {
            if self.consume(TokenKind::RBrace) {
                return Ok(Expr::Object(props));
            }
            let t = self.bump().clone();
            let key: Rc<str> = match &t.kind {
                TokenKind::Str(s) => Rc::from(s.as_str()),
                TokenKind::Number(v) => Rc::from(crate::script::value::format_number(*v)),
                other => match property_name(other) {
                    Some(k) => k,
                    None => {
                        return Err(ScriptError::new(
                            t.span.start,
                            format!("expected property name, found {}", show(other)),
                        ));
                    }
                },
            };
            let value = if self.consume(TokenKind::Colon) {
                self.parse_assignment()?
            } else if matches!(t.kind, TokenKind::Ident(_)) {
                // shorthand `{ x }`
                Expr::Ident(key.clone())
            } else {
                return self.error("expected ':' after property name");
            };
            props.push((key, value));
            if !self.consume(TokenKind::Comma) {
                self.expect(TokenKind::RBrace)?;
                return Ok(Expr::Object(props));
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ScriptError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Lit(Lit::Num(v))),
            TokenKind::Str(s) => Ok(Expr::Lit(Lit::Str(Rc::from(s)))),
            TokenKind::True => Ok(Expr::Lit(Lit::Bool(true))),
            TokenKind::False => Ok(Expr::Lit(Lit::Bool(false))),
            TokenKind::Null => Ok(Expr::Lit(Lit::Null)),
            TokenKind::Undefined => Ok(Expr::Lit(Lit::Undefined)),
            TokenKind::Ident(s) => Ok(Expr::Ident(Rc::from(s))),
            TokenKind::LParen => {
                let e = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::LBracket => Ok(Expr::Array(self.parse_list(TokenKind::RBracket)?)),
            TokenKind::LBrace => {
                self.enter()?;
                let e = self.parse_object();
                self.leave();
                e
            }
            TokenKind::Function => {
                let name = if matches!(self.peek().kind, TokenKind::Ident(_)) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                Ok(Expr::Function(Rc::new(self.parse_function_rest(name)?)))
            }
            other => Err(ScriptError::new(
                t.span.start,
                format!("unexpected {}", show(&other)),
            )),
        }
    }
}

fn to_target(e: Expr) -> Option<Target> {
    match e {
        Expr::Ident(name) => Some(Target::Name(name)),
        Expr::Member { object, name } => Some(Target::Member { object, name }),
        Expr::Index { object, index } => Some(Target::Index { object, index }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/parser.rs"]
mod tests;
