//! Single-argument functions applied to an evaluated buffer

use crate::core::{CalcError, CalcResult, Calculator};

/// Largest `n` for which `n!` is finite as an `f64`
pub const MAX_FACTORIAL: u32 = 170;

/// Functions that replace the buffer with `f(value)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFunction {
    /// `-x`
    Negate,
    /// `x / 100`
    Percent,
    /// Square root
    Sqrt,
    /// `x²`
    Square,
    /// `x³`
    Cube,
    /// `1 / x`
    Reciprocal,
    /// Factorial of `x` truncated toward zero
    Factorial,
    /// Sine of `x` degrees
    Sin,
    /// Cosine of `x` degrees
    Cos,
    /// Tangent of `x` degrees
    Tan,
    /// Natural logarithm
    Ln,
    /// Base-10 logarithm
    Log10,
    /// Absolute value
    Abs,
}

impl UnaryFunction {
    /// Every function, in keypad order
    pub const ALL: [Self; 13] = [
        Self::Negate,
        Self::Percent,
        Self::Sqrt,
        Self::Square,
        Self::Cube,
        Self::Reciprocal,
        Self::Factorial,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Ln,
        Self::Log10,
        Self::Abs,
    ];

    /// Returns the function's short name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Negate => "negate",
            Self::Percent => "percent",
            Self::Sqrt => "sqrt",
            Self::Square => "square",
            Self::Cube => "cube",
            Self::Reciprocal => "reciprocal",
            Self::Factorial => "factorial",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Ln => "ln",
            Self::Log10 => "log10",
            Self::Abs => "abs",
        }
    }

    /// Looks a function up by its short name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Applies the function to `x`
    pub fn apply(self, x: f64) -> CalcResult<f64> {
        let result = match self {
            Self::Negate => -x,
            Self::Percent => x / 100.0,
            Self::Sqrt => {
                if x < 0.0 {
                    return Err(CalcError::domain("square root of a negative number"));
                }
                x.sqrt()
            }
            Self::Square => x.powi(2),
            Self::Cube => x.powi(3),
            Self::Reciprocal => return Calculator::divide(1.0, x),
            Self::Factorial => return factorial(x),
            Self::Sin => x.to_radians().sin(),
            Self::Cos => x.to_radians().cos(),
            Self::Tan => x.to_radians().tan(),
            Self::Ln => {
                if x <= 0.0 {
                    return Err(CalcError::domain("logarithm of a non-positive number"));
                }
                x.ln()
            }
            Self::Log10 => {
                if x <= 0.0 {
                    return Err(CalcError::domain("logarithm of a non-positive number"));
                }
                x.log10()
            }
            Self::Abs => x.abs(),
        };
        Calculator::check_finite(result)
    }
}

/// Factorial of `x` truncated toward zero; negative input is a domain error
pub fn factorial(x: f64) -> CalcResult<f64> {
    if !x.is_finite() {
        return Err(CalcError::domain("factorial of a non-finite number"));
    }
    let n = x.trunc();
    if n < 0.0 {
        return Err(CalcError::domain("factorial of a negative number"));
    }
    if n > f64::from(MAX_FACTORIAL) {
        return Err(CalcError::Overflow);
    }
    Ok((2..=n as u32).map(f64::from).product())
}
