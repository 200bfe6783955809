use serde_json::{json, Value};
use tinyquery::{range, range_from, range_step, Collection, Key, QueryError, Shape};

fn wrap(value: Value) -> Collection {
    Collection::new(value).expect("container")
}

fn users() -> Collection {
    wrap(json!([
        {"name": "ann", "age": 31, "admin": true},
        {"name": "bob", "age": 25, "admin": false},
        {"name": "cy", "age": 31, "admin": false}
    ]))
}

fn scores() -> Collection {
    wrap(json!({"ann": 9, "bob": 0, "cy": 7}))
}

#[test]
fn map_over_mapping_yields_sequence_of_entry_count() {
    let mapped = scores().map(|value, key| match key {
        Key::Name(name) => json!(format!("{name}:{value}")),
        Key::Index(_) => unreachable!("mapping keys are names"),
    });
    assert_eq!(mapped.shape(), Shape::Seq);
    assert_eq!(mapped.len(), scores().len());
    assert_eq!(mapped.val(), json!(["ann:9", "bob:0", "cy:7"]));
}

#[test]
fn map_over_sequence_sees_indices() {
    let doubled = wrap(json!([1, 2, 3])).map(|value, key| {
        let Key::Index(index) = key else {
            unreachable!("sequence keys are indices")
        };
        json!(value.as_i64().unwrap_or_default() * 10 + index as i64)
    });
    assert_eq!(doubled.val(), json!([10, 21, 32]));
}

#[test]
fn filt_and_where_preserve_shape() {
    let old = users().filt(|user, _| user["age"] == json!(31));
    assert_eq!(old.shape(), Shape::Seq);
    assert_eq!(old.len(), 2);

    let positive = scores().filt(|score, _| score.as_i64().unwrap_or_default() > 0);
    assert_eq!(positive.shape(), Shape::Map);
    assert_eq!(positive.val(), json!({"ann": 9, "cy": 7}));

    let by_key = scores().filt(|_, key| key == Key::Name("bob"));
    assert_eq!(by_key.val(), json!({"bob": 0}));

    let admins = users().where_(&json!({"admin": true}));
    assert_eq!(admins.pluk("name").expect("pluk").val(), json!(["ann"]));

    let people = wrap(json!({"a": {"team": "x"}, "b": {"team": "y"}}));
    assert_eq!(
        people.where_(&json!({"team": "y"})).val(),
        json!({"b": {"team": "y"}})
    );
}

#[test]
fn find_returns_first_match_unwrapped() {
    let users = users();
    let found = users.find(|user, _| user["age"] == json!(31));
    assert_eq!(found.map(|u| u["name"].clone()), Some(json!("ann")));
    assert_eq!(users.find(|user, _| user["age"] == json!(99)), None);

    let scores = scores();
    assert_eq!(scores.find(|score, _| score == &json!(7)), Some(&json!(7)));

    let bob = users.find_w(&json!({"name": "bob", "admin": false}));
    assert_eq!(bob.map(|u| u["age"].clone()), Some(json!(25)));
    assert_eq!(users.find_w(&json!({"name": "bob", "admin": true})), None);
}

#[test]
fn rej_is_the_complement_of_filt() {
    let numbers = range(6);
    let even = |v: &Value| v.as_i64().unwrap_or_default() % 2 == 0;
    assert_eq!(numbers.rej(even).val(), json!([1, 3, 5]));
    assert_eq!(numbers.filt(|v, _| even(v)).val(), json!([0, 2, 4]));
}

#[test]
fn quantifiers_and_membership_ignore_keys() {
    let scores = scores();
    assert!(scores.some(|v| v == &json!(0)));
    assert!(!scores.evry(|v| v.as_i64().unwrap_or_default() > 0));
    assert!(scores.cont(&json!(9)));
    assert!(!scores.cont(&json!("ann")));

    let empty = wrap(json!([]));
    assert!(empty.evry(|_| false));
    assert!(!empty.some(|_| true));

    assert!(users().cont(&json!({"name": "cy", "age": 31, "admin": false})));
}

#[test]
fn integral_and_fractional_numbers_are_equal() {
    let numbers = wrap(json!([1, 2.5]));
    assert!(numbers.cont(&json!(1.0)));
    assert!(numbers.cont(&json!(2.5)));
    assert!(!numbers.cont(&json!(2)));

    let users = users();
    let found = users.find_w(&json!({"age": 25.0}));
    assert_eq!(found.map(|u| u["name"].clone()), Some(json!("bob")));
    assert_eq!(users.where_(&json!({"age": 31.0})).len(), 2);
}

#[test]
fn pluk_fills_missing_properties_with_null() {
    let rows = wrap(json!([{"a": 1}, {"b": 2}, 3, [4, 5]]));
    assert_eq!(rows.pluk("a").expect("pluk").val(), json!([1, null, null, null]));
    assert_eq!(rows.pluk("1").expect("pluk").val(), json!([null, null, null, 5]));
}

#[test]
fn boundary_slices() {
    let ten = range_from(0, 10);
    assert_eq!(ten.frst_n(3).expect("frst").val(), json!([0, 1, 2]));
    assert_eq!(ten.last_n(3).expect("last").val(), json!([7, 8, 9]));
    assert_eq!(ten.frst().expect("frst"), Some(&json!(0)));
    assert_eq!(ten.last().expect("last"), Some(&json!(9)));
    assert_eq!(ten.init(1).expect("init").len(), 9);
    assert_eq!(ten.rest(1).expect("rest").frst().expect("frst"), Some(&json!(1)));
    assert_eq!(ten.init(3).expect("init").last().expect("last"), Some(&json!(6)));
    assert_eq!(ten.rest(20).expect("rest").val(), json!([]));
}

#[test]
fn comp_drops_falsy_values() {
    let mixed = wrap(json!([0, 1, false, 2, "", 3, null]));
    assert_eq!(mixed.comp().expect("comp").val(), json!([1, 2, 3]));
}

#[test]
fn flat_respects_depth() {
    let nested = wrap(json!([1, [2, [3, [4]]], {"k": [5]}]));
    assert_eq!(nested.flat(0).expect("flat").val(), nested.val());
    assert_eq!(
        nested.flat(1).expect("flat").val(),
        json!([1, 2, [3, [4]], {"k": [5]}])
    );
    assert_eq!(
        nested.flat_all().expect("flat").val(),
        json!([1, 2, 3, 4, {"k": [5]}])
    );

    let pair = wrap(json!([1, [2, [3, 4]]]));
    assert_eq!(pair.flat(1).expect("flat").val(), json!([1, 2, [3, 4]]));
}

#[test]
fn sequence_helpers_reject_mappings() {
    let scores = scores();
    for result in [
        scores.frst_n(1),
        scores.last_n(1),
        scores.init(1),
        scores.rest(1),
        scores.comp(),
        scores.flat(1),
        scores.pluk("x"),
    ] {
        assert!(matches!(
            result,
            Err(QueryError::ShapeMismatch {
                shape: Shape::Map,
                ..
            })
        ));
    }
}

#[test]
fn transforms_leave_the_original_untouched() {
    let original = wrap(json!([3, 1, 2]));
    let _ = original.map(|_, _| json!(0));
    let _ = original.filt(|_, _| false);
    let _ = original.rest(2).expect("rest");
    assert_eq!(original.val(), json!([3, 1, 2]));
}

#[test]
fn range_forms() {
    assert_eq!(range(5).val(), json!([0, 1, 2, 3, 4]));
    assert_eq!(range_from(2, 5).val(), json!([2, 3, 4]));
    assert_eq!(range_step(0, 10, 2).val(), json!([0, 2, 4, 6, 8]));
    assert_eq!(range_step(-3, 0, 1).val(), json!([-3, -2, -1]));
}

#[test]
fn mapping_keeps_insertion_order() {
    let ordered = wrap(json!({"z": 1, "a": 2, "m": 3}));
    let mut keys = Vec::new();
    ordered.each(|_, key| {
        if let Key::Name(name) = key {
            keys.push(name.to_string());
        }
    });
    assert_eq!(keys, vec!["z", "a", "m"]);
}
