//! Binary arithmetic operations
//!
//! Every operation rejects non-finite results so that infinity and NaN never
//! reach the buffer.

use crate::core::{CalcError, CalcResult};

/// Binary operators understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
    /// Floored modulo (%)
    Modulo,
    /// Exponentiation (**)
    Power,
}

impl Operation {
    /// Returns the operator as it appears in the input buffer
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Power => "**",
        }
    }

    /// Returns the operator for a single-character buffer token, if any.
    ///
    /// Power is two characters and is never returned here.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '%' => Some(Self::Modulo),
            _ => None,
        }
    }
}

/// Arithmetic on two operands
#[derive(Debug, Default, Clone, Copy)]
pub struct Calculator;

impl Calculator {
    /// Performs an operation on two operands
    pub fn calculate(a: f64, b: f64, op: Operation) -> CalcResult<f64> {
        match op {
            Operation::Add => Self::add(a, b),
            Operation::Subtract => Self::subtract(a, b),
            Operation::Multiply => Self::multiply(a, b),
            Operation::Divide => Self::divide(a, b),
            Operation::Modulo => Self::modulo(a, b),
            Operation::Power => Self::power(a, b),
        }
    }

    /// Addition: a + b
    pub fn add(a: f64, b: f64) -> CalcResult<f64> {
        Self::check_finite(a + b)
    }

    /// Subtraction: a - b
    pub fn subtract(a: f64, b: f64) -> CalcResult<f64> {
        Self::check_finite(a - b)
    }

    /// Multiplication: a * b
    pub fn multiply(a: f64, b: f64) -> CalcResult<f64> {
        Self::check_finite(a * b)
    }

    /// Division: a / b
    pub fn divide(a: f64, b: f64) -> CalcResult<f64> {
        if b == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        Self::check_finite(a / b)
    }

    /// Floored modulo: the result carries the sign of the divisor
    pub fn modulo(a: f64, b: f64) -> CalcResult<f64> {
        if b == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        let mut result = a % b;
        if result != 0.0 && (result < 0.0) != (b < 0.0) {
            result += b;
        }
        Self::check_finite(result)
    }

    /// Power: a ** b
    pub fn power(a: f64, b: f64) -> CalcResult<f64> {
        if a == 0.0 && b < 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        Self::check_finite(a.powf(b))
    }

    /// Rejects NaN and infinity
    pub(crate) fn check_finite(result: f64) -> CalcResult<f64> {
        if result.is_nan() {
            Err(CalcError::domain("result is not a number"))
        } else if result.is_infinite() {
            Err(CalcError::Overflow)
        } else {
            Ok(result)
        }
    }
}
