//! # Sieve Statement Language - Abstract Syntax Tree
//!
//! A statement is a single boolean predicate over one record, bound to the
//! name `user`:
//!
//! ```text
//! user.balance >= 500 && user.gender == "female" && user.age <= 30
//! ```
//!
//! ## Submodules
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (fields, literals, operations)
//! - **[operators]** - Comparison and logical operators
//!
//! ## Precedence
//!
//! From loosest to tightest, all binary operators left-associative:
//!
//! ```text
//! ||
//! &&
//! !            (applies to the whole comparison on its right)
//! == != < <= > >=   (at most one per level, no chaining)
//! literal | user.field | ( expr )
//! ```
//!
//! ## Types
//!
//! Values are strings, integers, floats and booleans. Integers and floats
//! compare numerically with each other; strings and booleans only compare
//! for equality against their own kind.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::{CompareOp, LogicalOp};
pub use tokens::{Spanned, Token};
