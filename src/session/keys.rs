//! Keypad keys and their macro expansions.
//!
//! Unary function keys are presentation-level templates applied to the raw
//! expression text, before any normalization: `x²` wraps the whole
//! expression, `sin` appends an open call for the user to finish.

use super::Key;

/// The unary function keys of the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryFunc {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Sqrt,
    Cbrt,
    Square,
    Cube,
    Reciprocal,
    Factorial,
}

impl UnaryFunc {
    /// Expand the key against the current expression text.
    pub fn apply(self, expr: &str) -> String {
        match self {
            Self::Sin | Self::Cos | Self::Tan | Self::Log | Self::Ln => {
                format!("{expr}{}(", self.name())
            }
            Self::Sqrt => format!("sqrt({expr})"),
            Self::Cbrt => format!("cbrt({expr})"),
            Self::Square => format!("({expr})^2"),
            Self::Cube => format!("({expr})^3"),
            Self::Reciprocal => format!("1/({expr})"),
            Self::Factorial => format!("factorial({expr})"),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Square => "square",
            Self::Cube => "cube",
            Self::Reciprocal => "reciprocal",
            Self::Factorial => "factorial",
        }
    }
}

impl Key {
    /// Map a keypad button value (the strings the key definitions use) to a
    /// key. Unknown values map to nothing.
    pub fn from_keypad(value: &str) -> Option<Key> {
        let key = match value {
            "C" => Key::Clear,
            "⌫" => Key::Backspace,
            "=" => Key::Equals,
            "%" => Key::Percent,
            "bin" => Key::ToBinary,
            "1/x" => Key::Func(UnaryFunc::Reciprocal),
            "x²" => Key::Func(UnaryFunc::Square),
            "x³" => Key::Func(UnaryFunc::Cube),
            "√" | "sqrt" => Key::Func(UnaryFunc::Sqrt),
            "∛" | "cbrt" => Key::Func(UnaryFunc::Cbrt),
            "n!" => Key::Func(UnaryFunc::Factorial),
            "sin" => Key::Func(UnaryFunc::Sin),
            "cos" => Key::Func(UnaryFunc::Cos),
            "tan" => Key::Func(UnaryFunc::Tan),
            "log" => Key::Func(UnaryFunc::Log),
            "ln" => Key::Func(UnaryFunc::Ln),
            "pi" | "e" => Key::Literal(value.to_string()),
            _ => {
                let mut chars = value.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    return None;
                };
                if c.is_ascii_digit() || "+-*/^().×÷−".contains(c) {
                    Key::Literal(value.to_string())
                } else {
                    return None;
                }
            }
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_templates() {
        assert_eq!(UnaryFunc::Sin.apply("2+"), "2+sin(");
        assert_eq!(UnaryFunc::Ln.apply(""), "ln(");
    }

    #[test]
    fn test_wrap_templates() {
        assert_eq!(UnaryFunc::Square.apply("3+1"), "(3+1)^2");
        assert_eq!(UnaryFunc::Cube.apply("2"), "(2)^3");
        assert_eq!(UnaryFunc::Sqrt.apply("16"), "sqrt(16)");
        assert_eq!(UnaryFunc::Reciprocal.apply("4"), "1/(4)");
        assert_eq!(UnaryFunc::Factorial.apply("5"), "factorial(5)");
    }

    #[test]
    fn test_keypad_mapping() {
        assert_eq!(Key::from_keypad("7"), Some(Key::Literal("7".into())));
        assert_eq!(Key::from_keypad("×"), Some(Key::Literal("×".into())));
        assert_eq!(Key::from_keypad("="), Some(Key::Equals));
        assert_eq!(Key::from_keypad("n!"), Some(Key::Func(UnaryFunc::Factorial)));
        assert_eq!(Key::from_keypad("quit"), None);
    }
}
