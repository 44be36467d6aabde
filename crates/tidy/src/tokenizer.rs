//! Lexer: character stream → typed tokens

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Result, SchemeError};

/// A lexical token of the surface syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Integer constant, possibly signed (`42`, `+4`, `-2`)
    Constant(i64),
    /// Boolean literal `#t` or `#f`
    Bool(bool),
    /// Symbol (identifiers and operator names)
    Symbol(String),
    /// The quote mark `'`
    Quote,
    /// The pair dot `.`
    Dot,
    /// Opening bracket `(`
    Open,
    /// Closing bracket `)`
    Close,
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '<' | '=' | '>' | '*' | '/' | '#')
}

fn is_symbol_continue(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit() || matches!(c, '?' | '!' | '-')
}

/// Streaming tokenizer over a source string.
///
/// Holds one token of lookahead: [`peek`](Tokenizer::peek) inspects it,
/// [`next`](Tokenizer::next) consumes it and lexes the following one.
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    current: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    /// Tokenize `input`, lexing the first token eagerly.
    pub fn new(input: &'a str) -> Result<Self> {
        let mut tokenizer = Self {
            chars: input.chars().peekable(),
            current: None,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    /// Whether the token stream is exhausted.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// The upcoming token, if any.
    pub fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Consume and return the upcoming token.
    ///
    /// Reading past the end of the stream is a syntax error.
    pub fn next(&mut self) -> Result<Token> {
        let token = self
            .current
            .take()
            .ok_or_else(|| SchemeError::syntax("unexpected end of input"))?;
        self.advance()?;
        Ok(token)
    }

    /// Lex the next token into the lookahead slot.
    fn advance(&mut self) -> Result<()> {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }

        let c = match self.chars.peek() {
            Some(c) => *c,
            None => {
                self.current = None;
                return Ok(());
            }
        };

        self.current = Some(match c {
            '(' => {
                self.chars.next();
                Token::Open
            }
            ')' => {
                self.chars.next();
                Token::Close
            }
            '\'' => {
                self.chars.next();
                Token::Quote
            }
            '.' => {
                self.chars.next();
                Token::Dot
            }
            '+' | '-' => {
                self.chars.next();
                match self.chars.peek() {
                    Some(d) if d.is_ascii_digit() => self.lex_number(c == '-')?,
                    // A bare sign is the arithmetic symbol.
                    _ => Token::Symbol(c.to_string()),
                }
            }
            _ if c.is_ascii_digit() => self.lex_number(false)?,
            _ if is_symbol_start(c) => self.lex_symbol(),
            _ => return Err(SchemeError::Syntax(format!("unexpected character `{c}`"))),
        });
        Ok(())
    }

    fn lex_number(&mut self, negative: bool) -> Result<Token> {
        // Parsed with the sign attached so the full signed range lexes.
        let mut digits = String::new();
        if negative {
            digits.push('-');
        }
        while matches!(self.chars.peek(), Some(d) if d.is_ascii_digit()) {
            if let Some(d) = self.chars.next() {
                digits.push(d);
            }
        }
        let value: i64 = digits
            .parse()
            .map_err(|_| SchemeError::Syntax(format!("malformed number literal `{digits}`")))?;
        Ok(Token::Constant(value))
    }

    fn lex_symbol(&mut self) -> Token {
        let mut name = String::new();
        while matches!(self.chars.peek(), Some(c) if is_symbol_continue(*c)) {
            if let Some(c) = self.chars.next() {
                name.push(c);
            }
        }
        match name.as_str() {
            "#t" => Token::Bool(true),
            "#f" => Token::Bool(false),
            _ => Token::Symbol(name),
        }
    }
}
