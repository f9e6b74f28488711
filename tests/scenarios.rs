//! End-to-end keypad scenarios through the public API.

use omnicalc::expr::{normalize, repair};
use omnicalc::eval::{Evaluator, EvaluatorConfig};
use omnicalc::session::UnaryFunc;
use omnicalc::{CalculatorConfig, CalculatorMode, InputSession, Key, SessionState};

fn session() -> InputSession {
    InputSession::new(&CalculatorConfig::default())
}

fn type_text(session: &mut InputSession, text: &str) {
    for c in text.chars() {
        session.press(Key::Literal(c.to_string()));
    }
}

#[test]
fn scenario_simple_addition() {
    let mut s = session();
    type_text(&mut s, "2+2");
    s.press(Key::Equals);
    assert_eq!(s.display(), Some("4"));
}

#[test]
fn scenario_incomplete_function_is_error_and_editable() {
    let mut s = session();
    s.select_mode(CalculatorMode::Scientific);
    s.press(Key::Func(UnaryFunc::Sin));
    s.press(Key::Equals);
    assert_eq!(s.display(), Some("Error"));
    assert_eq!(s.expression(), "sin(");

    // Still editable: finish the call and evaluate.
    type_text(&mut s, "0)");
    s.press(Key::Equals);
    assert_eq!(s.display(), Some("0"));
}

#[test]
fn scenario_standard_mode_never_auto_upgrades() {
    let mut s = session();
    type_text(&mut s, "sin(90)");
    s.press(Key::Equals);
    assert_eq!(s.display(), Some("Error"));
    assert_eq!(s.mode(), CalculatorMode::Standard);
}

#[test]
fn scenario_unbalanced_parens() {
    let mut s = session();
    type_text(&mut s, "2*(3+4");
    s.press(Key::Equals);
    assert_eq!(s.display(), Some("14"));
}

#[test]
fn scenario_binary_conversion() {
    let mut s = session();
    type_text(&mut s, "5");
    s.press(Key::ToBinary);
    assert_eq!(s.expression(), "dec_to_bin(5)");
    assert_eq!(s.display(), Some("101"));
}

#[test]
fn scenario_infinity_is_error() {
    let mut s = session();
    type_text(&mut s, "1/0");
    s.press(Key::Equals);
    assert_eq!(s.display(), Some("Error"));
}

#[test]
fn keypad_values_drive_a_full_calculation() {
    let mut s = session();
    for value in ["7", "×", "8", "="] {
        s.press(Key::from_keypad(value).unwrap());
    }
    assert_eq!(s.display(), Some("56"));
    assert_eq!(s.state(), SessionState::ResultShown);
}

#[test]
fn repair_is_idempotent_over_keypad_junk() {
    for expr in [
        "2*(3+4",
        "2++2",
        "5--3",
        "sin(30",
        "1+2)",
        "((1",
        "9.5*2",
        "2+-2",
    ] {
        let once = repair(&normalize(expr)).unwrap();
        let twice = repair(&once).unwrap();
        assert_eq!(once, twice, "repair not idempotent for {expr:?}");
    }
}

#[test]
fn formatted_results_parse_back_within_tolerance() {
    let eval = Evaluator::new(EvaluatorConfig {
        mode: CalculatorMode::Scientific,
        precision: 10,
    });
    for expr in ["1/3", "2/7", "sqrt(2)", "10/4", "ln(e)", "100*3"] {
        let value = eval.evaluate(expr).unwrap();
        let rendered = eval.evaluate_and_format(expr).unwrap();
        let parsed: f64 = rendered.parse().unwrap();
        assert!(
            (parsed - value).abs() < 1e-10,
            "{expr}: {value} rendered as {rendered}"
        );
    }
}
