//! Display-glyph normalization.
//!
//! The keypad and voice layers produce typographic operators (`×`, `÷`,
//! `−`); the evaluator only understands ASCII. This mapping is total and
//! touches nothing else: digits, parentheses, decimal points, and function
//! names pass through untouched.

/// Replace display glyphs with evaluator operators.
pub fn normalize(expr: &str) -> String {
    expr.chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}
