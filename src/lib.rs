pub mod aggregate;
pub mod ast;
pub mod cli;
pub mod evaluator;
pub mod filter;
pub mod ingest;
pub mod lexer;
pub mod parser;
pub mod predicate;
pub mod value;

pub use aggregate::{Aggregate, AggregateError, aggregate, aggregate_parallel};
pub use ast::{CompareOp, Expr, LogicalOp, Spanned, Token};
pub use evaluator::{EvalError, Evaluator, evaluate};
pub use filter::{RowError, matches, select};
pub use ingest::{IngestError, IngestOptions};
pub use lexer::{LexError, Lexer, Position, tokenize};
pub use parser::{MAX_DEPTH, ParseError, Parser, parse};
pub use predicate::{CompileError, CompiledStatement, compile, test};
pub use value::{Record, Value};
