//! Arithmetic core: tokenizer, parser, evaluator, unary functions and history
//!
//! Nothing in here knows about buttons or buffers. The expression engine in
//! [`crate::engine`] drives these pieces.

pub mod evaluator;
pub mod format;
pub mod functions;
pub mod history;
mod operations;
pub mod parser;

pub use operations::{Calculator, Operation};

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Evaluation errors.
///
/// The engine treats every variant the same way (error marker on the display,
/// buffer discarded); the variants exist for logging and for tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division or modulo by zero attempted
    #[error("Division by zero")]
    DivisionByZero,
    /// Result is not representable as a finite number
    #[error("Overflow: result exceeds maximum value")]
    Overflow,
    /// Argument outside the domain of a function
    #[error("Domain error: {0}")]
    DomainError(String),
    /// Invalid expression syntax
    #[error("Invalid expression: {0}")]
    ParseError(String),
    /// Empty expression provided
    #[error("Empty expression")]
    EmptyExpression,
}

impl CalcError {
    /// Creates a domain error
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::DomainError(message.into())
    }

    /// Creates a parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError(message.into())
    }
}
