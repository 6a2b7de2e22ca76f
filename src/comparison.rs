use crate::coerce::comparable_form;
use serde_json::Value;
use std::cmp::Ordering;

/// Order two values of the same primitive type. Dates compare by their epoch
/// milliseconds; mixed or non-primitive operands have no ordering.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (comparable_form(a), comparable_form(b)) {
        (Value::Number(na), Value::Number(nb)) => na.as_f64()?.partial_cmp(&nb.as_f64()?),
        (Value::String(sa), Value::String(sb)) => Some(sa.cmp(&sb)),
        (Value::Bool(ba), Value::Bool(bb)) => Some(ba.cmp(&bb)),
        _ => None,
    }
}

pub fn cmp_values<F>(a: &Value, b: &Value, pred_on_ord: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    compare(a, b).map(pred_on_ord).unwrap_or(false)
}

/// Structural equality: key order is irrelevant and `1 == 1.0`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(na), Value::Number(nb)) => na == nb || na.as_f64() == nb.as_f64(),
        (Value::Array(xa), Value::Array(xb)) => {
            xa.len() == xb.len() && xa.iter().zip(xb).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(ma), Value::Object(mb)) => {
            ma.len() == mb.len()
                && ma
                    .iter()
                    .all(|(k, v)| mb.get(k).map(|w| deep_equal(v, w)).unwrap_or(false))
        }
        _ => a == b,
    }
}

/// Equality after date normalisation.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    deep_equal(&comparable_form(a), &comparable_form(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::to_date;
    use serde_json::json;

    #[test]
    fn orders_same_types_only() {
        assert_eq!(compare(&json!(1), &json!(2.5)), Some(Ordering::Less));
        assert_eq!(compare(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare(&json!(true), &json!(false)), Some(Ordering::Greater));
        assert_eq!(compare(&json!("1"), &json!(0)), None);
        assert_eq!(compare(&json!([1]), &json!([1])), None);
        assert_eq!(compare(&json!(null), &json!(null)), None);
        assert!(!cmp_values(&json!("1"), &json!(0), |o| o.is_gt()));
    }

    #[test]
    fn dates_order_chronologically() {
        let a = to_date(&json!("2020-08-19"));
        let b = to_date(&json!("1983-08-19"));
        assert!(cmp_values(&a, &b, |o| o.is_gt()));
        assert!(values_equal(&a, &json!(1_597_795_200_000_i64)));
    }

    #[test]
    fn structural_equality() {
        assert!(deep_equal(&json!({ "a": 1, "b": [1, 2] }), &json!({ "b": [1, 2], "a": 1.0 })));
        assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!deep_equal(&json!({ "a": 1 }), &json!({ "a": 1, "b": 2 })));
        assert!(!deep_equal(&json!(1), &json!("1")));
    }
}
