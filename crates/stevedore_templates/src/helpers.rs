//! Functions exposed to template bodies.

use std::collections::HashMap;

use tera::{Result as TeraResult, Tera, Value};

/// Whether `index` is the last index of a sequence of length `len`.
pub fn is_last(index: usize, len: usize) -> bool {
    len > 0 && index == len - 1
}

/// Register every helper on a Tera instance.
pub fn register_helpers(tera: &mut Tera) {
    tera.register_function("is_last", is_last_function);
}

/// `is_last(index=loop.index0, items=ports)`
///
/// ```tera
/// [{% for p in ports %}"{{ p.port }}"{% if not is_last(index=loop.index0, items=ports) %}, {% endif %}{% endfor %}]
/// ```
fn is_last_function(args: &HashMap<String, Value>) -> TeraResult<Value> {
    let index = args
        .get("index")
        .and_then(Value::as_u64)
        .ok_or_else(|| tera::Error::msg("is_last requires a non-negative integer `index`"))?;
    let items = args
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| tera::Error::msg("is_last requires an array `items`"))?;

    let index = usize::try_from(index).map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(Value::Bool(is_last(index, items.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(index: Value, items: Value) -> TeraResult<Value> {
        let args = HashMap::from([("index".to_string(), index), ("items".to_string(), items)]);
        is_last_function(&args)
    }

    #[test]
    fn test_is_last_over_three_elements() {
        let results: Vec<_> = (0..3).map(|i| is_last(i, 3)).collect();
        assert_eq!(results, vec![false, false, true]);
    }

    #[test]
    fn test_is_last_empty_sequence() {
        assert!(!is_last(0, 0));
    }

    #[test]
    fn test_function_arguments() {
        assert_eq!(call(json!(1), json!(["a", "b"])).unwrap(), json!(true));
        assert_eq!(call(json!(0), json!(["a", "b"])).unwrap(), json!(false));
    }

    #[test]
    fn test_function_rejects_bad_arguments() {
        assert!(call(json!(-1), json!(["a"])).is_err());
        assert!(call(json!(0), json!("abc")).is_err());
        assert!(is_last_function(&HashMap::new()).is_err());
    }
}
