//! Projection expressions, evaluated with `jaq` (the jq language).
//!
//! The expression receives the surviving reminders as one JSON array in the
//! full field set. Multiple outputs are collected into an array; no output is
//! `null`. At most `max_outputs` outputs are pulled from the filter, so a
//! generator such as `range(1000000000)` stops once the caller's limit is reached.

use jaq_core::load::{Arena, File, Loader};
use jaq_core::{Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{RemkitError, Result};

/// Compile and run `expression` against `input`.
///
/// Any syntax, compile or runtime failure is a [`RemkitError::Parse`] naming
/// the expression. Outputs past `max_outputs` are never evaluated; at least
/// two are pulled so a multi-output filter still yields an array.
pub fn evaluate(expression: &str, input: Value, max_outputs: usize) -> Result<Value> {
    let program = File {
        code: expression,
        path: (),
    };

    let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = Arena::default();

    let modules = loader.load(&arena, program).map_err(|errs| {
        RemkitError::parse(
            expression,
            format!("projection has {} syntax error(s)", errs.len()),
        )
    })?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            RemkitError::parse(
                expression,
                format!(
                    "projection references {} undefined name(s)",
                    errs.len()
                ),
            )
        })?;

    let inputs = RcIter::new(core::iter::empty());
    let mut outputs = Vec::new();
    let stream = filter.run((Ctx::new([], &inputs), Val::from(input)));
    for out in stream.take(max_outputs.max(2)) {
        let val = out.map_err(|e| RemkitError::parse(expression, format!("projection failed: {e}")))?;
        outputs.push(Value::from(val));
    }

    Ok(match outputs.len() {
        0 => Value::Null,
        1 => outputs.pop().unwrap_or(Value::Null),
        _ => Value::Array(outputs),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn items() -> Value {
        json!([
            {"id": "a", "title": "Buy milk", "priority": "high"},
            {"id": "b", "title": "Call mum", "priority": "none"},
            {"id": "c", "title": "File taxes", "priority": "high"}
        ])
    }

    #[test]
    fn select_and_map() {
        let out = evaluate(r#"map(select(.priority == "high") | .title)"#, items(), 50).unwrap();
        assert_eq!(out, json!(["Buy milk", "File taxes"]));
    }

    #[test]
    fn scalar_result() {
        assert_eq!(evaluate("length", items(), 50).unwrap(), json!(3));
    }

    #[test]
    fn multiple_outputs_are_collected() {
        let out = evaluate(".[].id", items(), 50).unwrap();
        assert_eq!(out, json!(["a", "b", "c"]));
    }

    #[test]
    fn output_stream_stops_at_the_cap() {
        let out = evaluate("range(1000000000)", json!(null), 3).unwrap();
        assert_eq!(out, json!([0, 1, 2]));
        let out = evaluate(".[].id", items(), 1).unwrap();
        assert_eq!(out, json!(["a", "b"]));
        assert_eq!(evaluate("length", items(), 1).unwrap(), json!(3));
    }

    #[test]
    fn empty_output_is_null() {
        assert_eq!(evaluate("empty", items(), 50).unwrap(), Value::Null);
    }

    #[test]
    fn syntax_error_names_expression() {
        let err = evaluate("map(.title", items(), 50).unwrap_err();
        assert!(matches!(err, RemkitError::Parse { ref input, .. } if input == "map(.title"));
    }

    #[test]
    fn undefined_function_is_parse_error() {
        let err = evaluate("no_such_fn(1)", items(), 50).unwrap_err();
        assert!(matches!(err, RemkitError::Parse { .. }));
    }

    #[test]
    fn runtime_error_is_parse_error() {
        let err = evaluate(".[0] + 1", items(), 50).unwrap_err();
        assert!(matches!(err, RemkitError::Parse { .. }));
    }
}
