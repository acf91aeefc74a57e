use crate::{Decoder, Encoder, Error, Kind, Predicate, Registry, StandardCodec, Value};

fn never() -> (Predicate, Encoder, Decoder) {
    (
        Predicate::new(|_| false),
        Encoder::new(|_, _| Ok(None)),
        Decoder::new(|_, _| Ok(None)),
    )
}

fn register_never(registry: &mut Registry, tag: &str) -> crate::Result<()> {
    let (p, e, d) = never();
    registry.register(tag, p, e, d)?;
    Ok(())
}

#[test]
fn register_appends_in_order() {
    let mut registry = Registry::new();
    assert!(registry.is_empty());

    let (p1, e1, d1) = never();
    let (p2, e2, d2) = never();
    registry
        .register("(10)", p1, e1, d1)
        .unwrap()
        .register("(11)", p2, e2, d2)
        .unwrap();

    assert_eq!(registry.tags().collect::<Vec<_>>(), ["(10)", "(11)"]);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.find_by_tag("(11)"), Some((1, 1)));
    assert!(registry.contains("(10)"));
    assert!(!registry.contains("(12)"));
}

#[test]
fn duplicate_tag_rejected() {
    let mut registry = Registry::new();
    register_never(&mut registry, "(10)").unwrap();

    let err = register_never(&mut registry, "(10)").unwrap_err();
    assert!(matches!(err, Error::DuplicateTag(ref tag) if tag == "(10)"));
    assert_eq!(err.to_string(), "codec tag `(10)` is already registered");
    assert_eq!(registry.len(), 1);
}

#[test]
fn empty_tag_rejected() {
    let mut registry = Registry::new();
    let err = register_never(&mut registry, "").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(registry.is_empty());
}

#[test]
fn modify_unknown_tag() {
    let mut registry = Registry::standard();
    let err = registry.modify("(99)").err().unwrap();
    assert!(matches!(err, Error::NotFound(ref tag) if tag == "(99)"));

    let err = registry
        .replace_predicate("(99)", Predicate::kind(Kind::Int))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(matches!(
        registry.replace_encoder("(99)", Encoder::new(|_, _| Ok(None))),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        registry.replace_decoder("(99)", Decoder::new(|_, _| Ok(None))),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn modify_replaces_slots_in_place() {
    let mut registry = Registry::new();
    register_never(&mut registry, "(10)").unwrap();
    register_never(&mut registry, "(11)").unwrap();

    registry
        .modify("(10)")
        .unwrap()
        .predicate(Predicate::kind(Kind::Bool))
        .encoder(Encoder::new(|v, _| Ok(Some(format!("{v:?}")))));

    assert_eq!(registry.tags().collect::<Vec<_>>(), ["(10)", "(11)"]);
    assert_eq!(
        registry.serialize(Value::Bool(true), ()).unwrap(),
        r#""(10)Bool(true)""#
    );
}

#[test]
fn replace_methods_chain() {
    let mut registry = Registry::new();
    register_never(&mut registry, "(10)").unwrap();

    registry
        .replace_predicate("(10)", Predicate::kind(Kind::String))
        .unwrap()
        .replace_encoder("(10)", Encoder::new(|_, _| Ok(Some("s".into()))))
        .unwrap()
        .replace_decoder("(10)", Decoder::new(|p, _| Ok(Some(Value::from(p.len() as i64)))))
        .unwrap();

    assert_eq!(registry.serialize(Value::from("x"), ()).unwrap(), r#""(10)s""#);
    assert_eq!(registry.deserialize(r#""(10)abc""#).unwrap(), Value::Int(3));
}

#[test]
fn unregister_removes_both_sides() {
    let mut registry = Registry::standard();
    registry.unregister(StandardCodec::ExactNumber.tag()).unwrap();

    assert_eq!(registry.len(), 5);
    assert_eq!(registry.find_by_tag("(00)"), None);
    assert_eq!(registry.serialize(Value::from(27), ()).unwrap(), "27");
    assert_eq!(
        registry.deserialize(r#""(00)r""#).unwrap(),
        Value::from("(00)r")
    );
}

#[test]
fn unregister_unknown_tag() {
    let mut registry = Registry::new();
    assert!(matches!(
        registry.unregister("(10)"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn unregister_then_register_again() {
    let mut registry = Registry::new();
    register_never(&mut registry, "(10)").unwrap();
    registry.unregister("(10)").unwrap();
    register_never(&mut registry, "(10)").unwrap();
    assert_eq!(registry.find_by_tag("(10)"), Some((0, 0)));
}

#[test]
fn standard_set_in_table_order() {
    let registry = Registry::standard();
    assert_eq!(
        registry.tags().collect::<Vec<_>>(),
        ["(00)", "(01)", "(02)", "(03)", "(04)", "(05)"]
    );
}

#[test]
fn register_standard_is_all_or_nothing() {
    let mut registry = Registry::new();
    register_never(&mut registry, "(03)").unwrap();

    let err = registry.register_standard().err().unwrap();
    assert!(matches!(err, Error::DuplicateTag(ref tag) if tag == "(03)"));
    assert_eq!(registry.tags().collect::<Vec<_>>(), ["(03)"]);
}

#[test]
fn register_standard_twice_fails() {
    let mut registry = Registry::new();
    registry.register_standard().unwrap();
    assert!(matches!(
        registry.register_standard(),
        Err(Error::DuplicateTag(_))
    ));
    assert_eq!(registry.len(), 6);
}

#[test]
fn custom_codec_after_standard_set() {
    let mut registry = Registry::standard();
    register_never(&mut registry, "(10)").unwrap();
    assert_eq!(registry.find_by_tag("(10)"), Some((6, 6)));
}

#[test]
fn debug_lists_tags() {
    let mut registry = Registry::new();
    register_never(&mut registry, "(10)").unwrap();
    let debug = format!("{registry:?}");
    assert!(debug.starts_with(r#"Registry { tags: ["(10)"]"#), "{debug}");
}
