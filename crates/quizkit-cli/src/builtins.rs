//! Functions available to code questions taken from the terminal.

use serde_json::{json, Value};

use quizkit_core::registry::FunctionRegistry;

/// The registry the `take` command grades code questions against.
pub fn registry() -> FunctionRegistry {
    FunctionRegistry::new()
        .with("add", add)
        .with("maximum", maximum)
        .with("reverse", reverse)
        .with("length", length)
}

fn add(args: &[Value]) -> Value {
    if let Some(ints) = args.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
        return json!(ints.iter().sum::<i64>());
    }
    match args.iter().map(Value::as_f64).collect::<Option<Vec<_>>>() {
        Some(floats) => json!(floats.iter().sum::<f64>()),
        None => Value::Null,
    }
}

fn maximum(args: &[Value]) -> Value {
    args.iter()
        .filter(|v| v.is_number())
        .max_by(|a, b| {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        })
        .cloned()
        .unwrap_or(Value::Null)
}

fn reverse(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::String(s)) => json!(s.chars().rev().collect::<String>()),
        Some(Value::Array(items)) => json!(items.iter().rev().collect::<Vec<_>>()),
        _ => Value::Null,
    }
}

fn length(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::String(s)) => json!(s.chars().count()),
        Some(Value::Array(items)) => json!(items.len()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_integers_exact() {
        assert_eq!(add(&[json!(1), json!(2)]), json!(3));
        assert_eq!(add(&[json!(1.5), json!(2)]), json!(3.5));
        assert_eq!(add(&[json!("x")]), Value::Null);
        assert_eq!(add(&[]), json!(0));
    }

    #[test]
    fn maximum_of_numbers() {
        assert_eq!(maximum(&[json!(3), json!(9), json!(-1)]), json!(9));
        assert_eq!(maximum(&[]), Value::Null);
    }

    #[test]
    fn reverse_and_length() {
        assert_eq!(reverse(&[json!("abc")]), json!("cba"));
        assert_eq!(reverse(&[json!([1, 2])]), json!([2, 1]));
        assert_eq!(length(&[json!("héllo")]), json!(5));
        assert_eq!(length(&[json!([1, 2, 3])]), json!(3));
    }

    #[test]
    fn registry_names() {
        assert_eq!(registry().names(), vec!["add", "length", "maximum", "reverse"]);
    }
}
