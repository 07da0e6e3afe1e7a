use std::fmt;

use thiserror::Error;

use crate::ast::{Spanned, Token};

/// Character offset into the statement text, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
}

impl Position {
    pub fn new(offset: usize) -> Self {
        Position { offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.offset)
    }
}

/// Errors raised while splitting a statement into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at {position}{hint}")]
    UnexpectedChar {
        ch: char,
        position: Position,
        hint: &'static str,
    },

    #[error("Unterminated string starting at {position}: missing closing quote")]
    UnterminatedString { position: Position },

    #[error("Invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_identifier_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
    }

    /// Reads a maximal `[a-zA-Z_][a-zA-Z0-9_.]*` run, dots included.
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_identifier_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = Position::new(self.position);
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '"' {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = Position::new(self.position);
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let invalid = || LexError::InvalidNumber {
            text: number.clone(),
            position: start,
        };

        if is_float {
            number.parse::<f64>().map(Token::Float).map_err(|_| invalid())
        } else {
            number.parse::<i64>().map(Token::Integer).map_err(|_| invalid())
        }
    }

    fn unexpected(&self, ch: char, hint: &'static str) -> LexError {
        LexError::UnexpectedChar {
            ch,
            position: Position::new(self.position),
            hint,
        }
    }

    /// Consumes `second` after `first` if present, yielding `pair`; otherwise
    /// yields `single`, or an error when the one-character form is not a token.
    fn one_or_two(
        &mut self,
        second: char,
        pair: Token,
        single: Result<Token, LexError>,
    ) -> Result<Token, LexError> {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(pair)
        } else {
            let token = single?;
            self.advance();
            Ok(token)
        }
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();
        let start = Position::new(self.position);

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('=') => {
                let err = self.unexpected('=', " (did you mean '=='?)");
                self.one_or_two('=', Token::EqEq, Err(err))?
            }
            Some('!') => self.one_or_two('=', Token::NotEq, Ok(Token::Bang))?,
            Some('<') => self.one_or_two('=', Token::LtEq, Ok(Token::Lt))?,
            Some('>') => self.one_or_two('=', Token::GtEq, Ok(Token::Gt))?,
            Some('&') => {
                let err = self.unexpected('&', " (did you mean '&&'?)");
                self.one_or_two('&', Token::AndAnd, Err(err))?
            }
            Some('|') => {
                let err = self.unexpected('|', " (did you mean '||'?)");
                self.one_or_two('|', Token::OrOr, Err(err))?
            }
            Some('"') => Token::String(self.read_string()?),
            Some(ch) if Self::is_identifier_start(ch) => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => return Err(self.unexpected(ch, "")),
        };

        Ok(Spanned::new(token, start))
    }

    /// Drains the lexer. The last token is always [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Splits statement text into tokens, ending with [`Token::Eof`].
///
/// # Examples
///
/// ```
/// use sieve_lang::{Token, lexer::tokenize};
///
/// let tokens: Vec<Token> = tokenize("user.age <= 30")
///     .unwrap()
///     .into_iter()
///     .map(|t| t.token)
///     .collect();
///
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Identifier("user.age".to_string()),
///         Token::LtEq,
///         Token::Integer(30),
///         Token::Eof,
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(text).tokenize()
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("true false truthy");
    assert_eq!(lexer.next_token().unwrap().token, Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap().token, Token::Boolean(false));
    assert_eq!(
        lexer.next_token().unwrap().token,
        Token::Identifier("truthy".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
}

#[test]
fn test_statement() {
    let mut lexer = Lexer::new("!(user.age > 5)");
    assert_eq!(lexer.next_token().unwrap().token, Token::Bang);
    assert_eq!(lexer.next_token().unwrap().token, Token::LParen);
    assert_eq!(
        lexer.next_token().unwrap().token,
        Token::Identifier("user.age".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().token, Token::Gt);
    assert_eq!(lexer.next_token().unwrap().token, Token::Integer(5));
    assert_eq!(lexer.next_token().unwrap().token, Token::RParen);
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
}
