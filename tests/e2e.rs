use filter_expressions as fx;
use fx::Options;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn eval(expr: Value, context: Option<Value>) -> Value {
    fx::evaluate(&expr, context.as_ref(), &Options::default())
}

#[test]
fn test_literal_equality() {
    assert_eq!(eval(json!(["==", 1, 1]), None), json!(true));
    assert_eq!(eval(json!(["==", 1, "1"]), None), json!(false));
    assert_eq!(eval(json!(["==", [1, 2], [1, 2]]), None), json!(true));
}

#[test]
fn test_existence_against_context() {
    assert_eq!(eval(json!(["has", "numbers"]), Some(json!({ "numbers": [1, 2] }))), json!(true));
    assert_eq!(eval(json!(["!have", "numbers"]), Some(json!({ "letters": ["a"] }))), json!(true));
    assert_eq!(eval(json!(["have", "numbers"]), Some(json!({ "letters": ["a"] }))), json!(false));
    assert_eq!(eval(json!(["in", "numbers", 1]), Some(json!({ "numbers": [1, 2] }))), json!(true));
}

#[test]
fn test_get_paths_and_defaults() {
    let ctx = json!({ "a": [{ "b": { "c": 3 } }], "v": 100 });
    assert_eq!(eval(json!(["get", "a[0].b.c"]), Some(ctx.clone())), json!(3));
    assert_eq!(eval(json!(["get", "a[0].b.missing", "default"]), Some(ctx.clone())), json!("default"));
    assert_eq!(eval(json!(["get", "a[0].b.missing", ["get", "v"]]), Some(ctx)), json!(100));
    assert_eq!(eval(json!(["get", 0]), None), json!(0));
    assert_eq!(eval(json!(["get", "foo"]), Some(json!({ "foo": "bar" }))), json!("bar"));
}

#[test]
fn test_comparing_two_fields() {
    let expr = json!(["==", ["get", "foo"], ["get", "bar"]]);
    assert_eq!(eval(expr.clone(), Some(json!({ "foo": 1, "bar": 1 }))), json!(true));
    assert_eq!(eval(expr, Some(json!({ "foo": 1, "bar": 2 }))), json!(false));
}

#[test]
fn test_modifiers() {
    let opts = Options::new().with_modifier("not", |v: &Value, _: Option<&Value>| {
        Value::Bool(!fx::coerce::truthy(v))
    });
    let ctx = json!({ "a": true });
    assert_eq!(fx::evaluate(&json!(["==", "not(a)", false]), Some(&ctx), &opts), json!(true));
    assert_eq!(fx::evaluate(&json!(["all", ["==", "not(a)", false]]), Some(&ctx), &opts), json!(true));
    let nested = json!({ "a": { "b": { "c": [false, true, false] } } });
    assert_eq!(
        fx::evaluate(&json!(["==", "not(a.b.c[1])", false]), Some(&nested), &opts),
        json!(true)
    );
    // unregistered modifier names are plain field references
    assert_eq!(fx::evaluate(&json!(["has", "other(a)"]), Some(&ctx), &opts), json!(false));
}

#[test]
fn test_nested_combinators_against_context() {
    let ctx = json!({ "ancestors": 0, "discriminator": "collection" });
    let all = json!(["all", ["==", "discriminator", "collection"], ["==", "ancestors", 0]]);
    assert_eq!(eval(all.clone(), Some(ctx.clone())), json!(true));
    assert_eq!(eval(json!(["any", all]), Some(ctx.clone())), json!(true));
    assert_eq!(eval(json!(["==", "ancestors", 0]), Some(ctx)), json!(true));
}

#[test]
fn test_custom_operator_use_case() {
    let item = json!({
        "attributes": [
            { "attribute": { "$ref": "alpaca://attribute/foo" }, "locale": "en", "value": "2020-08-19" },
            { "attribute": { "$ref": "alpaca://attribute/foo" }, "locale": "en_AU", "value": "1983-08-19" }
        ]
    });
    let opts = Options::new().with_operator("attribute-value", |ctx: Option<&Value>, args: &[Value]| {
        let (reference, locale) = (args.first(), args.get(1));
        ctx.and_then(|c| c["attributes"].as_array())
            .and_then(|attrs| {
                attrs.iter().find(|a| {
                    Some(&a["attribute"]["$ref"]) == reference
                        && locale.map(|l| &a["locale"] == l).unwrap_or(true)
                })
            })
            .map(|a| a["value"].clone())
            .unwrap_or(Value::Null)
    });

    let later = json!([
        ">",
        ["date", ["attribute-value", "alpaca://attribute/foo", "en"]],
        ["date", ["attribute-value", "alpaca://attribute/foo", "en_AU"]]
    ]);
    assert_eq!(fx::evaluate(&later, Some(&item), &opts), json!(true));

    let same = json!([
        "==",
        ["attribute-value", "alpaca://attribute/foo", "en"],
        ["attribute-value", "alpaca://attribute/foo", "en"]
    ]);
    assert_eq!(fx::evaluate(&same, Some(&item), &opts), json!(true));
}

#[test]
fn test_custom_comparisons_and_negation() {
    let opts = Options::new().with_comparison("custom", |a: &Value, rest: &[Value]| rest.first() == Some(a));
    let ctx = json!({ "a": true });
    assert_eq!(fx::evaluate(&json!(["custom", "a", true]), Some(&ctx), &opts), json!(true));
    assert_eq!(fx::evaluate(&json!(["!custom", "a", true]), Some(&ctx), &opts), json!(false));
    assert_eq!(fx::evaluate(&json!(["CUSTOM", "a", false]), Some(&ctx), &opts), json!(false));
}

#[test]
fn test_custom_operators_within_expressions() {
    let at = |_: Option<&Value>, args: &[Value]| {
        let index = args.first().and_then(|i| i.as_str()).and_then(|i| i.parse::<usize>().ok());
        match (index, args.get(1)) {
            (Some(i), Some(Value::Array(items))) => items.get(i).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    };
    let opts = Options::new()
        .with_operator("pick", at)
        .with_operator("num", |ctx: Option<&Value>, args: &[Value]| {
            let key = args.first().and_then(|k| k.as_str()).unwrap_or_default();
            ctx.map(|c| fx::coerce::to_number(&c[key])).unwrap_or(Value::Null)
        });
    assert_eq!(fx::evaluate(&json!(["pick", "1", [2, 4, 6]]), None, &opts), json!(4));
    assert_eq!(fx::evaluate(&json!(["==", ["pick", "1", [2, 4, 6]], 4]), None, &opts), json!(true));
    assert_eq!(fx::evaluate(&json!(["num", "foo"]), Some(&json!({ "foo": 4 })), &opts), json!(4));
}

#[test]
fn test_local_bindings() {
    let expr = json!(["all", ["let", "limit", 10], ["<", "count", ["var", "limit"]]]);
    assert_eq!(eval(expr.clone(), Some(json!({ "count": 3 }))), json!(true));
    assert_eq!(eval(expr, Some(json!({ "count": 30 }))), json!(false));
    // bindings never leak between calls
    assert_eq!(eval(json!(["var", "limit"]), None), json!(null));
}

#[test]
fn test_evaluator_reuse() {
    let ev = fx::Evaluator::default();
    let ctx = json!({ "n": 5 });
    assert_eq!(ev.eval(&json!([">", "n", 1]), Some(&ctx)), json!(true));
    assert_eq!(ev.eval(&json!([">", "n", 10]), Some(&ctx)), json!(false));
}
