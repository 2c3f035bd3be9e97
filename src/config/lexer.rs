//! Tokeniser for the settings DSL
//!
//! Covers the subset of Kotlin and Groovy script syntax that settings and
//! build files use: identifiers, string and number literals, braces,
//! parentheses and a handful of punctuation. Anything else becomes a
//! [`TokenKind::Symbol`] so that callers scanning arbitrary build scripts
//! never fail on operators they do not care about.

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Assign,
    Colon,
    Semicolon,
    Newline,
    Symbol(char),
    Eof,
}

impl TokenKind {
    /// Short human-readable form used in syntax errors
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Str(value) => format!("string \"{}\"", value),
            TokenKind::Number(value) => format!("number {}", value),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Symbol(c) => format!("'{}'", c),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

/// Split `source` into tokens, terminated by a single [`TokenKind::Eof`].
///
/// Consecutive line breaks collapse into one [`TokenKind::Newline`].
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        if kind == TokenKind::Newline
            && matches!(
                self.tokens.last().map(|t| &t.kind),
                None | Some(TokenKind::Newline)
            )
        {
            return;
        }
        self.tokens.push(Token { kind, line, column });
    }

    fn run(&mut self) -> Result<()> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, line, column);
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' => {
                    self.bump();
                    match self.chars.peek() {
                        Some('/') => self.skip_line_comment(),
                        Some('*') => self.skip_block_comment(line, column)?,
                        _ => self.push(TokenKind::Symbol('/'), line, column),
                    }
                }
                '"' | '\'' => {
                    let value = if self.at_triple_quote(c) {
                        self.multiline_string(c, line, column)?
                    } else {
                        self.string(c, line, column)?
                    };
                    self.push(TokenKind::Str(value), line, column);
                }
                c if c.is_ascii_digit() => {
                    let value = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                    self.push(TokenKind::Number(value), line, column);
                }
                c if c.is_alphabetic() || c == '_' || c == '$' => {
                    let value = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '$');
                    self.push(TokenKind::Ident(value), line, column);
                }
                '`' => {
                    self.bump();
                    let value = self.take_while(|c| c != '`' && c != '\n');
                    if self.bump() != Some('`') {
                        return Err(ConfigError::syntax(line, column, "unterminated identifier"));
                    }
                    self.push(TokenKind::Ident(value), line, column);
                }
                _ => {
                    self.bump();
                    let kind = match c {
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        ',' => TokenKind::Comma,
                        '.' => TokenKind::Dot,
                        ':' => TokenKind::Colon,
                        ';' => TokenKind::Semicolon,
                        '=' if self.chars.peek() == Some(&'=') => {
                            self.bump();
                            TokenKind::Symbol('=')
                        }
                        '=' => TokenKind::Assign,
                        other => TokenKind::Symbol(other),
                    };
                    self.push(kind, line, column);
                }
            }
        }
        let (line, column) = (self.line, self.column);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line,
            column,
        });
        Ok(())
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut value = String::new();
        while let Some(&c) = self.chars.peek() {
            if !keep(c) {
                break;
            }
            value.push(c);
            self.bump();
        }
        value
    }

    fn skip_line_comment(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, line: usize, column: usize) -> Result<()> {
        self.bump();
        let mut previous = '\0';
        while let Some(c) = self.bump() {
            if previous == '*' && c == '/' {
                return Ok(());
            }
            previous = c;
        }
        Err(ConfigError::syntax(line, column, "unterminated block comment"))
    }

    fn at_triple_quote(&self, quote: char) -> bool {
        let mut ahead = self.chars.clone();
        (0..3).all(|_| ahead.next() == Some(quote))
    }

    /// `"""..."""` or `'''...'''`, kept verbatim and allowed to span lines
    fn multiline_string(&mut self, quote: char, line: usize, column: usize) -> Result<String> {
        for _ in 0..3 {
            self.bump();
        }
        let mut value = String::new();
        loop {
            if self.at_triple_quote(quote) {
                for _ in 0..3 {
                    self.bump();
                }
                return Ok(value);
            }
            match self.bump() {
                Some(c) => value.push(c),
                None => {
                    return Err(ConfigError::syntax(
                        line,
                        column,
                        "unterminated multi-line string literal",
                    ));
                }
            }
        }
    }

    fn string(&mut self, quote: char, line: usize, column: usize) -> Result<String> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(ConfigError::syntax(line, column, "unterminated string literal"));
                }
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(other) => value.push(other),
                    None => {
                        return Err(ConfigError::syntax(
                            line,
                            column,
                            "unterminated string literal",
                        ));
                    }
                },
                Some(c) => value.push(c),
            }
        }
    }
}
