use super::*;

#[test]
fn missing_keys_yield_defaults() {
    let params = ParamSet::new();
    assert_eq!(
        params.get_enum_or("addressing_mode", "wrap", &["clamp", "wrap"], "test"),
        "wrap"
    );
    assert_eq!(params.get_f32_or("bump_amplitude", 1.0, "test"), 1.0);
}

#[test]
fn valid_enum_values_are_returned() {
    let params = ParamSet::new().with("addressing_mode", "clamp");
    assert_eq!(
        params.get_enum_or("addressing_mode", "wrap", &["clamp", "wrap"], "test"),
        "clamp"
    );
}

#[test]
fn out_of_range_enum_value_falls_back() {
    let params = ParamSet::new().with("addressing_mode", "mirror");
    assert_eq!(
        params.get_enum_or("addressing_mode", "wrap", &["clamp", "wrap"], "test"),
        "wrap"
    );
}

#[test]
fn non_string_enum_value_falls_back() {
    let params = ParamSet::new().with("addressing_mode", 3);
    assert_eq!(
        params.get_enum_or("addressing_mode", "wrap", &["clamp", "wrap"], "test"),
        "wrap"
    );
}

#[test]
fn numeric_reads_integers_and_floats() {
    let params = ParamSet::new().with("a", 2).with("b", 0.25);
    assert_eq!(params.get_f32_or("a", 0.0, "test"), 2.0);
    assert_eq!(params.get_f32_or("b", 0.0, "test"), 0.25);
}

#[test]
fn non_numeric_value_falls_back() {
    let params = ParamSet::new().with("amount", "lots");
    assert_eq!(params.get_f32_or("amount", 0.5, "test"), 0.5);
}

#[test]
fn insert_replaces_previous_value() {
    let mut params = ParamSet::new().with("mode", "clamp");
    params.insert("mode", "wrap");
    assert_eq!(params.get_str("mode"), Some("wrap"));
    assert_eq!(params.len(), 1);
}

#[test]
fn deserializes_from_plain_json_object() {
    let params: ParamSet =
        serde_json::from_value(serde_json::json!({"alpha_mode": "detect", "bump_amplitude": 0.5}))
            .unwrap();
    assert_eq!(params.get_str("alpha_mode"), Some("detect"));
    assert_eq!(params.get_f32_or("bump_amplitude", 1.0, "test"), 0.5);
}

#[test]
fn hashing_is_order_independent_for_equal_sets() {
    let a = ParamSet::new().with("x", 1).with("y", 2);
    let b = ParamSet::new().with("y", 2).with("x", 1);
    let mut ha = Fnv1a64::new_default();
    let mut hb = Fnv1a64::new_default();
    a.hash_into(&mut ha);
    b.hash_into(&mut hb);
    assert_eq!(ha.finish(), hb.finish());
}
