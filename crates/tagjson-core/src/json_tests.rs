use indoc::indoc;

use crate::json::{self, FormatError, Indent, Key};
use crate::{BigInt, Kind, Value};

const DEPTH: usize = 128;

fn plain(value: Value, indent: impl Into<Indent>) -> String {
    json::stringify(value, &indent.into(), DEPTH, |_, _| Ok::<_, FormatError>(())).unwrap()
}

fn parse_plain(text: &str) -> Value {
    json::parse(text, DEPTH, |_, v| Ok::<_, FormatError>(v)).unwrap()
}

fn sample() -> Value {
    Value::object([
        ("name", Value::from("ada")),
        ("age", Value::from(36)),
        ("ratio", Value::from(0.1)),
        ("tags", Value::from(vec![Value::from(true), Value::Null])),
    ])
}

#[test]
fn stringify_compact() {
    insta::assert_snapshot!(plain(sample(), ()), @r#"{"name":"ada","age":36,"ratio":0.1,"tags":[true,null]}"#);
}

#[test]
fn stringify_with_spaces() {
    let expected = indoc! {r#"
        {
          "name": "ada",
          "age": 36,
          "ratio": 0.1,
          "tags": [
            true,
            null
          ]
        }"#};
    assert_eq!(plain(sample(), Indent::Spaces(2)), expected);
}

#[test]
fn stringify_with_text_indent() {
    let value = Value::object([("a", Value::from(1))]);
    assert_eq!(plain(value, "\t"), "{\n\t\"a\": 1\n}");
}

#[test]
fn indent_is_clamped() {
    assert_eq!(Indent::Spaces(40).unit().unwrap().len(), 10);
    assert_eq!(
        Indent::from("abcdefghijklmnop").unit().unwrap(),
        "abcdefghij"
    );
    assert!(Indent::Spaces(0).unit().is_none());
    assert!(Indent::from("").unit().is_none());
    assert!(Indent::Compact.unit().is_none());
}

#[test]
fn parse_round_trips_native_tree() {
    let text = plain(sample(), ());
    assert_eq!(parse_plain(&text), sample());
}

#[test]
fn parse_numbers() {
    let value = parse_plain("[1, -7, 1.0, 18446744073709551615, 2.5e-3]");
    assert_eq!(
        value,
        Value::from(vec![
            Value::Int(1),
            Value::Int(-7),
            Value::Float(1.0),
            Value::Float(18446744073709551615.0),
            Value::Float(0.0025),
        ])
    );
}

#[test]
fn float_text_is_lossless() {
    let value = Value::from(vec![Value::from(0.1 + 0.2), Value::from(1e300)]);
    assert_eq!(parse_plain(&plain(value.clone(), ())), value);
}

#[test]
fn replacer_visits_top_down() {
    let mut seen = Vec::new();
    json::stringify(sample(), &Indent::Compact, DEPTH, |key, value| {
        seen.push((key.to_string(), value.kind()));
        Ok::<_, FormatError>(())
    })
    .unwrap();

    assert_eq!(
        seen,
        [
            (String::new(), Kind::Object),
            ("name".into(), Kind::String),
            ("age".into(), Kind::Int),
            ("ratio".into(), Kind::Float),
            ("tags".into(), Kind::Array),
            ("0".into(), Kind::Bool),
            ("1".into(), Kind::Null),
        ]
    );
}

#[test]
fn replacer_rewrites_before_emit() {
    let value = Value::object([("n", Value::from(BigInt::from(12)))]);
    let text = json::stringify(value, &Indent::Compact, DEPTH, |_, v| {
        if let Value::BigInt(n) = v {
            *v = Value::String(format!("big:{n}"));
        }
        Ok::<_, FormatError>(())
    })
    .unwrap();
    assert_eq!(text, r#"{"n":"big:12"}"#);
}

#[test]
fn reviver_sees_scalars_bottom_up() {
    let mut seen = Vec::new();
    json::parse(r#"{"a":[1,"x"],"b":null}"#, DEPTH, |key, value| {
        seen.push(format!("{key}={}", value.kind()));
        Ok::<_, FormatError>(value)
    })
    .unwrap();
    assert_eq!(seen, ["0=int", "1=string", "b=null"]);
}

#[test]
fn reviver_replaces_scalars() {
    let value = json::parse(r#"{"a":"up"}"#, DEPTH, |key, value| {
        Ok::<_, FormatError>(match (key, value) {
            (Key::Field("a"), Value::String(s)) => Value::String(s.to_uppercase()),
            (_, other) => other,
        })
    })
    .unwrap();
    assert_eq!(value.get("a"), Some(&Value::from("UP")));
}

#[test]
fn unrepresentable_kind() {
    let value = Value::from(vec![Value::from(BigInt::from(1))]);
    let err = json::stringify(value, &Indent::Compact, DEPTH, |_, _| Ok::<_, FormatError>(()))
        .unwrap_err();
    assert!(matches!(err, FormatError::Unrepresentable(Kind::BigInt)));
}

#[test]
fn non_finite_float() {
    let err = json::stringify(Value::Float(f64::NAN), &Indent::Compact, DEPTH, |_, _| {
        Ok::<_, FormatError>(())
    })
    .unwrap_err();
    assert!(matches!(err, FormatError::NonFiniteNumber(_)));
}

#[test]
fn depth_limit() {
    let nested = Value::from(vec![Value::from(vec![Value::Array(vec![])])]);
    let err = json::stringify(nested.clone(), &Indent::Compact, 2, |_, _| {
        Ok::<_, FormatError>(())
    })
    .unwrap_err();
    assert!(matches!(err, FormatError::DepthExceeded(2)));

    let err = json::parse("[[[]]]", 2, |_, v| Ok::<_, FormatError>(v)).unwrap_err();
    assert!(matches!(err, FormatError::DepthExceeded(2)));

    assert!(
        json::stringify(nested, &Indent::Compact, 3, |_, _| Ok::<_, FormatError>(())).is_ok()
    );
}

#[test]
fn malformed_text() {
    let err = json::parse("{\"a\":", DEPTH, |_, v| Ok::<_, FormatError>(v)).unwrap_err();
    assert!(matches!(err, FormatError::Json(_)));
}

fn nest_arrays(levels: usize) -> Value {
    let mut value = Value::Null;
    for _ in 0..levels {
        value = Value::from(vec![value]);
    }
    value
}

#[test]
fn depth_limit_agrees_on_both_sides() {
    for levels in [127, 128] {
        let text = plain(nest_arrays(levels), ());
        assert_eq!(parse_plain(&text), nest_arrays(levels), "{levels} levels");
    }

    let err = json::stringify(nest_arrays(129), &Indent::Compact, DEPTH, |_, _| {
        Ok::<_, FormatError>(())
    })
    .unwrap_err();
    assert!(matches!(err, FormatError::DepthExceeded(DEPTH)));

    let text = format!("{}{}", "[".repeat(129), "]".repeat(129));
    let err = json::parse(&text, DEPTH, |_, v| Ok::<_, FormatError>(v)).unwrap_err();
    assert!(matches!(err, FormatError::DepthExceeded(DEPTH)));
}

#[test]
fn depth_limit_above_serde_default() {
    let limit = 500;
    let value = nest_arrays(200);
    let text = json::stringify(value.clone(), &Indent::Compact, limit, |_, _| {
        Ok::<_, FormatError>(())
    })
    .unwrap();
    let back = json::parse(&text, limit, |_, v| Ok::<_, FormatError>(v)).unwrap();
    assert_eq!(back, value);
}

#[test]
fn deep_objects_hit_depth_limit() {
    let text = format!("{}1{}", r#"{"a":"#.repeat(4), "}".repeat(4));
    assert!(json::parse(&text, 4, |_, v| Ok::<_, FormatError>(v)).is_ok());
    let err = json::parse(&text, 3, |_, v| Ok::<_, FormatError>(v)).unwrap_err();
    assert!(matches!(err, FormatError::DepthExceeded(3)));
}

#[test]
fn trailing_text_is_rejected() {
    let err = json::parse("[1] x", DEPTH, |_, v| Ok::<_, FormatError>(v)).unwrap_err();
    assert!(matches!(err, FormatError::Json(_)));
}
