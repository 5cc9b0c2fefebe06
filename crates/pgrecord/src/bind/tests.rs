use super::*;
use crate::binds;
use crate::value::Value;

#[test]
fn legacy_marker_is_normalized() {
    let (sql, bind) = translate_bind_syntax("x = :x:", binds! { "x" => 1 }).unwrap();
    assert_eq!(sql, "x = :x");
    assert_eq!(bind, binds! { "x" => 1 });
}

#[test]
fn array_marker_expands_in_order() {
    let (sql, bind) =
        translate_bind_syntax("id IN ({ids:array})", binds! { "ids" => vec![5, 6, 7] }).unwrap();

    assert_eq!(sql, "id IN (:ids_0, :ids_1, :ids_2)");
    assert_eq!(bind, binds! { "ids_0" => 5, "ids_1" => 6, "ids_2" => 7 });
    assert!(!bind.contains_key("ids"));
}

#[test]
fn array_marker_with_scalar_is_a_type_mismatch() {
    let err = translate_bind_syntax("id IN ({ids:array})", binds! { "ids" => 5 }).unwrap_err();
    assert!(matches!(err, OrmError::ArrayPlaceholderTypeMismatch { ref name } if name == "ids"));
}

#[test]
fn filter_without_markers_is_unchanged() {
    let bind = binds! { "a" => 1, "b" => vec![1, 2] };
    let (sql, out) = translate_bind_syntax("deleted_at IS NULL", bind.clone()).unwrap();
    assert_eq!(sql, "deleted_at IS NULL");
    assert_eq!(out, bind);
}

#[test]
fn already_translated_filter_is_unchanged() {
    let bind = binds! { "a" => 1 };
    let (sql, out) = translate_bind_syntax("a = :a", bind.clone()).unwrap();
    assert_eq!(sql, "a = :a");
    assert_eq!(out, bind);
}

#[test]
fn entries_not_used_as_arrays_are_untouched() {
    let bind = binds! { "status" => 1, "ids" => vec![3, 4], "tags" => vec!["a", "b"] };
    let (sql, out) =
        translate_bind_syntax("status = :status: AND id IN ({ids:array})", bind).unwrap();

    assert_eq!(sql, "status = :status AND id IN (:ids_0, :ids_1)");
    assert_eq!(
        out.keys().collect::<Vec<_>>(),
        vec!["status", "tags", "ids_0", "ids_1"]
    );
    assert!(out.get("tags").unwrap().is_list());
}

#[test]
fn repeated_legacy_markers_all_translate() {
    let (sql, _) =
        translate_bind_syntax("a = :v: OR b = :v:", binds! { "v" => "x" }).unwrap();
    assert_eq!(sql, "a = :v OR b = :v");
}

#[test]
fn built_filter_translates() {
    let params = crate::build_params(
        crate::ConditionMap::new().eq("status", 1).like("name", "%a%"),
        BindMap::new(),
    )
    .unwrap();
    let (sql, bind) = translate_bind_syntax(&params.filter, params.bind).unwrap();

    assert_eq!(sql, " status = :status  AND  name LIKE :name ");
    assert_eq!(bind.get("name"), Some(&BindValue::Scalar(Value::Text("%a%".into()))));
}

#[test]
fn empty_list_renders_null() {
    let (sql, bind) =
        translate_bind_syntax("id IN ({ids:array})", binds! { "ids" => Vec::<i64>::new() })
            .unwrap();
    assert_eq!(sql, "id IN (NULL)");
    assert!(bind.is_empty());
}

#[test]
fn sparse_lists_are_reindexed_from_zero() {
    let json = serde_json::json!({ "3": 10, "7": 20 });
    let items: Vec<Value> = json
        .as_object()
        .unwrap()
        .values()
        .cloned()
        .map(Value::from_json)
        .collect();
    let (sql, bind) =
        translate_bind_syntax("id IN ({ids:array})", binds! { "ids" => items }).unwrap();

    assert_eq!(sql, "id IN (:ids_0, :ids_1)");
    assert_eq!(bind, binds! { "ids_0" => 10, "ids_1" => 20 });
}

#[test]
fn unknown_legacy_marker_is_unresolved() {
    let err = translate_bind_syntax("a = :a: AND b = :b:", binds! { "a" => 1 }).unwrap_err();
    assert!(matches!(err, OrmError::UnresolvedPlaceholder { ref name } if name == "b"));
}

#[test]
fn unknown_array_marker_is_unresolved() {
    let err = translate_bind_syntax("id IN ({ids:array})", BindMap::new()).unwrap_err();
    assert!(matches!(err, OrmError::UnresolvedPlaceholder { ref name } if name == "ids"));
}

#[test]
fn expansion_collision_is_rejected() {
    let bind = binds! { "ids" => vec![1, 2], "ids_1" => 9 };
    let err = translate_bind_syntax("id IN ({ids:array})", bind).unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
}

#[test]
fn markers_inside_literals_are_not_translated() {
    let (sql, _) =
        translate_bind_syntax("note = ':x:' AND x = :x:", binds! { "x" => 1 }).unwrap();
    assert_eq!(sql, "note = ':x:' AND x = :x");
}

#[test]
fn dotted_and_unicode_keys_translate() {
    let (sql, bind) = translate_bind_syntax(
        "u.status = :u.status: AND café = :café:",
        binds! { "u.status" => 1, "café" => "noir" },
    )
    .unwrap();
    assert_eq!(sql, "u.status = :u.status AND café = :café");
    assert_eq!(bind.len(), 2);

    let (sql, bind) =
        translate_bind_syntax("u.id IN ({u.ids:array})", binds! { "u.ids" => vec![3, 4] }).unwrap();
    assert_eq!(sql, "u.id IN (:u.ids_0, :u.ids_1)");
    assert_eq!(bind, binds! { "u.ids_0" => 3, "u.ids_1" => 4 });
}

#[test]
fn escape_string_does_not_hide_later_markers() {
    let (sql, _) =
        translate_bind_syntax(r"note = E'it\'s :x:' AND x = :x:", binds! { "x" => 1 }).unwrap();
    assert_eq!(sql, r"note = E'it\'s :x:' AND x = :x");
}
