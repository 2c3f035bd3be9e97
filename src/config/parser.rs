//! Recursive-descent parser for the settings DSL
//!
//! The parser produces an untyped syntax tree; giving meaning to the
//! statements is left to the loader. Both Kotlin (`include(":app")`) and
//! Groovy (`include ':app'`) call styles are accepted.

use super::lexer::{Token, TokenKind, tokenize};
use crate::error::{ConfigError, Result};

/// Deepest nesting of blocks and argument lists accepted
const MAX_NESTING: usize = 256;

/// Source position of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// One link of a dotted chain such as `project(":app").projectDir`
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    /// `None` for a bare property access, `Some` for a call (even with no arguments)
    pub args: Option<Vec<Argument>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Number(String),
    Bool(bool),
    Chain(Vec<Segment>),
}

impl Expr {
    pub fn describe(&self) -> String {
        match self {
            Expr::Str(value) => format!("\"{}\"", value),
            Expr::Number(value) => value.clone(),
            Expr::Bool(value) => value.to_string(),
            Expr::Chain(chain) => chain_name(chain),
        }
    }
}

/// A call, property access or block, with optional trailing lambda and infix calls
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub chain: Vec<Segment>,
    pub body: Option<Vec<Statement>>,
    /// Infix calls following the invocation, e.g. `version "8.2.2"` and `apply false`
    pub infix: Vec<(String, Expr)>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Invocation(Invocation),
    Assign {
        target: Vec<Segment>,
        value: Expr,
        position: Position,
    },
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Invocation(invocation) => invocation.position,
            Statement::Assign { position, .. } => *position,
        }
    }
}

/// Render a chain the way it was written, without arguments: `project.projectDir`
pub fn chain_name(chain: &[Segment]) -> String {
    chain
        .iter()
        .map(|segment| segment.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// Parse a whole script into its top-level statements
pub fn parse(source: &str) -> Result<Vec<Statement>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
    };
    let statements = parser.statements()?;
    parser.expect(&TokenKind::Eof)?;
    Ok(statements)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        &self.tokens[(self.index + offset).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn error(&self, message: impl Into<String>) -> ConfigError {
        let token = self.peek();
        ConfigError::syntax(token.line, token.column, message)
    }

    fn unexpected(&self, wanted: &str) -> ConfigError {
        self.error(format!(
            "expected {}, found {}",
            wanted,
            self.peek().kind.describe()
        ))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_NESTING)));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Annotations such as `@Suppress("UnstableApiUsage")` or `@file:Suppress(...)` carry no settings
    fn skip_annotations(&mut self) -> Result<()> {
        while self.check(&TokenKind::Symbol('@')) {
            self.advance();
            if matches!(
                (self.peek_at(0), self.peek_at(1)),
                (TokenKind::Ident(_), TokenKind::Colon)
            ) {
                self.advance();
                self.advance();
            }
            self.chain()?;
            self.skip_separators();
        }
        Ok(())
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Statements up to (not including) a closing brace or end of input
    fn statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if matches!(self.peek().kind, TokenKind::RBrace | TokenKind::Eof) {
                return Ok(statements);
            }
            statements.push(self.statement()?);
            match self.peek().kind {
                TokenKind::Newline | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {}
                _ => return Err(self.unexpected("end of statement")),
            }
        }
    }

    fn block(&mut self) -> Result<Vec<Statement>> {
        self.expect(&TokenKind::LBrace)?;
        self.enter()?;
        let body = self.statements()?;
        self.leave();
        self.expect(&TokenKind::RBrace)?;
        Ok(body)
    }

    fn statement(&mut self) -> Result<Statement> {
        self.skip_annotations()?;
        let start = self.peek();
        let position = Position {
            line: start.line,
            column: start.column,
        };
        if !matches!(start.kind, TokenKind::Ident(_)) {
            return Err(self.unexpected("a statement"));
        }

        let mut chain = self.chain()?;

        if self.check(&TokenKind::Assign) {
            self.advance();
            self.skip_newlines();
            let value = self.expr()?;
            return Ok(Statement::Assign {
                target: chain,
                value,
                position,
            });
        }

        // Groovy command call: `include ':app', ':lib'`
        let bare = chain.last().is_some_and(|segment| segment.args.is_none());
        if bare
            && matches!(
                self.peek().kind,
                TokenKind::Str(_) | TokenKind::Number(_) | TokenKind::Ident(_)
            )
        {
            let mut args = vec![Argument {
                name: None,
                value: self.expr()?,
            }];
            while self.check(&TokenKind::Comma) {
                self.advance();
                self.skip_newlines();
                args.push(Argument {
                    name: None,
                    value: self.expr()?,
                });
            }
            if let Some(last) = chain.last_mut() {
                last.args = Some(args);
            }
        }

        let body = if self.check(&TokenKind::LBrace) {
            Some(self.block()?)
        } else {
            None
        };

        let mut infix = Vec::new();
        while let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            infix.push((name, self.expr()?));
        }

        Ok(Statement::Invocation(Invocation {
            chain,
            body,
            infix,
            position,
        }))
    }

    fn chain(&mut self) -> Result<Vec<Segment>> {
        let mut chain = vec![self.segment()?];
        while self.check(&TokenKind::Dot) {
            self.advance();
            chain.push(self.segment()?);
        }
        Ok(chain)
    }

    fn segment(&mut self) -> Result<Segment> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            _ => return Err(self.unexpected("an identifier")),
        };
        self.advance();
        let args = if self.check(&TokenKind::LParen) {
            Some(self.arguments()?)
        } else {
            None
        };
        Ok(Segment { name, args })
    }

    fn arguments(&mut self) -> Result<Vec<Argument>> {
        self.expect(&TokenKind::LParen)?;
        self.enter()?;
        let mut args = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(&TokenKind::RParen) {
                break;
            }
            let name = match (self.peek_at(0), self.peek_at(1)) {
                (TokenKind::Ident(name), TokenKind::Assign | TokenKind::Colon) => {
                    let name = name.clone();
                    self.advance();
                    self.advance();
                    Some(name)
                }
                _ => None,
            };
            self.skip_newlines();
            args.push(Argument {
                name,
                value: self.expr()?,
            });
            self.skip_newlines();
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if !self.check(&TokenKind::RParen) {
                return Err(self.unexpected("',' or ')'"));
            }
        }
        self.leave();
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn expr(&mut self) -> Result<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Str(value))
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Number(value))
            }
            TokenKind::Ident(name) if name == "true" || name == "false" => {
                self.advance();
                Ok(Expr::Bool(name == "true"))
            }
            TokenKind::Ident(_) => Ok(Expr::Chain(self.chain()?)),
            _ => Err(self.unexpected("a value")),
        }
    }
}
