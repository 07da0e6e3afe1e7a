use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, LogicalOp, Spanned, Token},
    lexer::Position,
};

/// Deepest AST (and parenthesis nesting) the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// The one variable a statement can reference.
pub const BOUND_VARIABLE: &str = "user";

/// Errors raised while building the AST from tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Expected {expected}, got {found} at {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        position: Position,
    },

    #[error("Unclosed '(' opened at {opened_at}")]
    UnclosedParen { opened_at: Position },

    #[error("Unmatched ')' at {position}")]
    UnmatchedParen { position: Position },

    #[error(
        "Invalid field path '{path}' at {position}: fields are written as 'user.<field>'"
    )]
    InvalidFieldPath { path: String, position: Position },

    #[error("Unexpected {found} at {position} after a complete expression")]
    TrailingInput { found: Token, position: Position },

    #[error("Chained comparison at {position}; combine comparisons with '&&'")]
    ChainedComparison { position: Position },

    #[error("Statement nests deeper than {max} levels")]
    TooDeep { max: usize },
}

/// An expression together with the height of its tree.
struct Node {
    expr: Expr,
    depth: usize,
}

pub struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
    nesting: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Spanned>) -> Self {
        if tokens.last().is_none_or(|t| t.token != Token::Eof) {
            let position = tokens.last().map(|t| t.position).unwrap_or_default();
            tokens.push(Spanned::new(Token::Eof, position));
        }
        Parser {
            tokens,
            index: 0,
            nesting: 0,
        }
    }

    fn current(&self) -> &Spanned {
        // `new` guarantees a trailing Eof and `advance` never moves past it.
        &self.tokens[self.index]
    }

    fn advance(&mut self) {
        if self.current().token != Token::Eof {
            self.index += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.current().token) == std::mem::discriminant(token)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let current = self.current();
        ParseError::UnexpectedToken {
            expected,
            found: current.token.clone(),
            position: current.position,
        }
    }

    fn node(&self, expr: Expr, depth: usize) -> Result<Node, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { max: MAX_DEPTH });
        }
        Ok(Node { expr, depth })
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(ParseError::TooDeep { max: MAX_DEPTH });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Parse primary expressions (atoms): literals, field paths, '(' expr ')'
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let Spanned { token, position } = self.current().clone();

        let expr = match token {
            Token::Float(n) => Expr::Float(n),
            Token::Integer(n) => Expr::Integer(n),
            Token::String(s) => Expr::String(s),
            Token::Boolean(b) => Expr::Boolean(b),
            Token::Identifier(path) => Expr::Field(field_key(&path, position)?),
            Token::LParen => {
                self.advance(); // consume '('
                self.enter()?;
                let inner = self.parse_or();
                self.leave();
                let inner = inner?;

                match self.current().token {
                    Token::RParen => self.advance(),
                    Token::Eof => return Err(ParseError::UnclosedParen { opened_at: position }),
                    _ => return Err(self.unexpected("')'")),
                }
                return Ok(inner);
            }
            _ => return Err(self.unexpected("a literal, a field or '('")),
        };

        self.advance();
        self.node(expr, 1)
    }

    fn parse_comparison(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_primary()?;

        let Some(op) = compare_op(&self.current().token) else {
            return Ok(left);
        };
        self.advance();
        let right = self.parse_primary()?;

        if compare_op(&self.current().token).is_some() {
            return Err(ParseError::ChainedComparison {
                position: self.current().position,
            });
        }

        let depth = 1 + left.depth.max(right.depth);
        self.node(
            Expr::Compare {
                op,
                left: Box::new(left.expr),
                right: Box::new(right.expr),
            },
            depth,
        )
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if !self.check(&Token::Bang) {
            return self.parse_comparison();
        }

        self.advance(); // consume '!'
        self.enter()?;
        let operand = self.parse_unary();
        self.leave();
        let operand = operand?;

        self.node(Expr::Not(Box::new(operand.expr)), operand.depth + 1)
    }

    fn parse_logical(
        &mut self,
        token: Token,
        op: LogicalOp,
        next: fn(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        let mut left = next(self)?;

        while self.check(&token) {
            self.advance();
            let right = next(self)?;

            let depth = 1 + left.depth.max(right.depth);
            left = self.node(
                Expr::Logical {
                    op,
                    left: Box::new(left.expr),
                    right: Box::new(right.expr),
                },
                depth,
            )?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        self.parse_logical(Token::AndAnd, LogicalOp::And, Self::parse_unary)
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        self.parse_logical(Token::OrOr, LogicalOp::Or, Self::parse_and)
    }

    /// Parses exactly one expression; anything left over is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let node = self.parse_or()?;

        let Spanned { token, position } = self.current().clone();
        match token {
            Token::Eof => Ok(node.expr),
            Token::RParen => Err(ParseError::UnmatchedParen { position }),
            found => Err(ParseError::TrailingInput { found, position }),
        }
    }
}

/// Builds the AST for a token stream produced by [`crate::lexer::tokenize`].
pub fn parse(tokens: Vec<Spanned>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}

fn compare_op(token: &Token) -> Option<CompareOp> {
    match token {
        Token::EqEq => Some(CompareOp::Equal),
        Token::NotEq => Some(CompareOp::NotEqual),
        Token::Lt => Some(CompareOp::LessThan),
        Token::LtEq => Some(CompareOp::LessEqual),
        Token::Gt => Some(CompareOp::GreaterThan),
        Token::GtEq => Some(CompareOp::GreaterEqual),
        _ => None,
    }
}

/// Validates `user.<segment>[.<segment>...]` and returns the flattened key
/// after `user.`.
fn field_key(path: &str, position: Position) -> Result<String, ParseError> {
    let invalid = || ParseError::InvalidFieldPath {
        path: path.to_string(),
        position,
    };

    let (head, rest) = path.split_once('.').ok_or_else(invalid)?;
    if head != BOUND_VARIABLE || rest.split('.').any(str::is_empty) {
        return Err(invalid());
    }
    Ok(rest.to_string())
}
