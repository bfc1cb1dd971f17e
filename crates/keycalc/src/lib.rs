//! keycalc - keypad calculator engine with a terminal frontend
//!
//! Button presses and keystrokes build an infix expression in a text buffer;
//! `=` evaluates it with a dedicated recursive-descent parser. The engine also
//! keeps a memory register and a short history of evaluations.
//!
//! # Layers
//!
//! - [`core`]: parser, evaluator, arithmetic, unary functions, formatting
//! - [`engine`]: the buffer/memory/history state machine
//! - [`driver`]: maps button labels and keys onto the engine and renders frames
//! - `tui` (feature `tui`): ratatui frontend with clickable keypads
//!
//! # Example
//!
//! ```rust
//! use keycalc::prelude::*;
//!
//! let mut session = Session::new(FrameCapture::new());
//! for label in ["4", "2", "×", "(", "3", "+", "7", ")", "="] {
//!     session.on_function(label).unwrap();
//! }
//! assert_eq!(session.sink().last().display, "420");
//! assert_eq!(session.sink().last().pending, "42*(3+7) =");
//!
//! // Errors show as a marker and leave the buffer empty
//! session.on_function("÷").unwrap();
//! session.on_function("0").unwrap();
//! session.on_equals();
//! assert_eq!(session.sink().last().display, "Error");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod driver;
pub mod engine;

#[cfg(feature = "tui")]
pub mod tui;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::evaluator::Evaluator;
    pub use crate::core::format::{format_memory, format_number, format_significant};
    pub use crate::core::functions::UnaryFunction;
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::{CalcError, CalcResult, Calculator, Operation};
    pub use crate::driver::{
        Command, DriverError, FrameCapture, Key, Mode, RenderFrame, RenderSink, Session,
    };
    pub use crate::engine::{Constant, ExpressionEngine};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_str("2+3").unwrap(), 5.0);
    }

    #[test]
    fn test_calculator_direct() {
        let result = Calculator::calculate(6.0, 7.0, Operation::Multiply).unwrap();
        assert_eq!(result, 42.0);
    }

    #[test]
    fn test_parser_direct() {
        let ast = Parser::parse_str("1+2*3").unwrap();
        assert_eq!(Evaluator::new().evaluate(&ast).unwrap(), 7.0);
    }

    #[test]
    fn test_engine_and_session_agree() {
        let mut engine = ExpressionEngine::new();
        for c in ["1", "0"] {
            engine.append_digit_or_dot(c);
        }
        engine.apply_unary(UnaryFunction::Factorial);

        let mut session = Session::new(FrameCapture::new());
        for label in ["1", "0", "!"] {
            session.on_function(label).unwrap();
        }

        assert_eq!(engine.display(), "3628800");
        assert_eq!(session.sink().last().display, engine.display());
    }
}
