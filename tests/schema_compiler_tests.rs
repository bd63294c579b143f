//! Schema compiler tests
//!
//! Exercises every node kind the compiler understands, the precedence
//! between `const`, composition keywords and `type`, and the permissive
//! fallbacks for incomplete descriptors.

use mcp_hive_proxy::validation::{FieldPath, IssueKind};
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::{json, Value};

mod common;
use common::compile;

fn accepts(raw: Value, value: Value) -> bool {
    compile(raw).validate(&value).is_ok()
}

// Basic types

#[rstest]
#[case(json!({"type": "string"}), json!("hello"), json!(123))]
#[case(json!({"type": "number"}), json!(3.14), json!("42"))]
#[case(json!({"type": "integer"}), json!(42), json!(3.14))]
#[case(json!({"type": "integer"}), json!(42), json!("42"))]
#[case(json!({"type": "boolean"}), json!(false), json!("true"))]
#[case(json!({"type": "null"}), json!(null), json!("null"))]
fn test_primitive_types(#[case] schema: Value, #[case] good: Value, #[case] bad: Value) {
    let validator = compile(schema);
    assert_eq!(validator.validate(&good).unwrap(), good);
    assert!(validator.validate(&bad).is_err());
}

#[test]
fn test_primitive_kind_names() {
    assert_eq!(compile(json!({"type": "string"})).kind_name(), "string");
    assert_eq!(compile(json!({"type": "number"})).kind_name(), "number");
    assert_eq!(compile(json!({"type": "integer"})).kind_name(), "integer");
    assert_eq!(compile(json!({"type": "boolean"})).kind_name(), "boolean");
    assert_eq!(compile(json!({"type": "null"})).kind_name(), "null");
}

#[test]
fn test_null_rejects_absent() {
    assert!(compile(json!({"type": "null"})).parse(None).is_err());
}

#[test]
fn test_string_enum() {
    let validator = compile(json!({
        "type": "string",
        "description": "Status field",
        "enum": ["active", "inactive", "pending"]
    }));
    for status in ["active", "inactive", "pending"] {
        assert!(validator.validate(&json!(status)).is_ok());
    }
    let failure = validator.validate(&json!("invalid")).unwrap_err();
    assert!(matches!(failure.issues()[0].kind, IssueKind::EnumMismatch { .. }));
}

#[test]
fn test_object_with_properties() {
    let validator = compile(json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "description": "Name"},
            "age": {"type": "integer", "description": "Age"}
        }
    }));
    assert_eq!(validator.kind_name(), "object");
    let data = json!({"name": "John", "age": 30});
    assert_eq!(validator.validate(&data).unwrap(), data);

    let failure = validator
        .validate(&json!({"name": "John", "age": 30.5}))
        .unwrap_err();
    assert!(failure.has_issue_at(&FieldPath::root().key("age")));
}

#[test]
fn test_object_lists_all_properties_as_required() {
    let validator = compile(json!({
        "type": "object",
        "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
    }));
    let failure = validator.validate(&json!({"name": "John"})).unwrap_err();
    assert_eq!(failure.issues()[0].kind, IssueKind::MissingRequired);
    assert!(failure.has_issue_at(&FieldPath::root().key("age")));
}

#[test]
fn test_unrecognized_type_is_unknown() {
    let validator = compile(json!({"type": "unknown-type", "description": "Unknown field"}));
    assert_eq!(validator.kind_name(), "unknown");
    for value in [json!("anything"), json!(123), json!({"foo": "bar"})] {
        assert_eq!(validator.validate(&value).unwrap(), value);
    }
}

#[test]
fn test_missing_type_is_unknown() {
    assert_eq!(
        compile(json!({"description": "untyped"})).kind_name(),
        "unknown"
    );
}

// Arrays and tuples

#[rstest]
#[case(json!({"type": "string"}), json!(["a", "b", "c"]), json!(["a", 123]))]
#[case(json!({"type": "number"}), json!([1, 2, 3]), json!([1, "two"]))]
fn test_homogeneous_arrays(#[case] items: Value, #[case] good: Value, #[case] bad: Value) {
    let validator = compile(json!({"type": "array", "items": items}));
    assert_eq!(validator.validate(&good).unwrap(), good);
    assert!(validator.validate(&bad).is_err());
}

#[test]
fn test_array_of_objects() {
    let validator = compile(json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {"id": {"type": "integer"}, "name": {"type": "string"}}
        }
    }));
    let data = json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]);
    assert_eq!(validator.validate(&data).unwrap(), data);

    let failure = validator
        .validate(&json!([{"id": 1.5, "name": "Alice"}]))
        .unwrap_err();
    assert!(failure.has_issue_at(&FieldPath::root().index(0).key("id")));
}

#[test]
fn test_array_without_items_accepts_anything() {
    let validator = compile(json!({"type": "array", "description": "Any array"}));
    let data = json!([1, "two", {"three": 3}]);
    assert_eq!(validator.validate(&data).unwrap(), data);
    assert!(validator.validate(&json!({"not": "an array"})).is_err());
}

#[rstest]
#[case(1, false)]
#[case(2, true)]
#[case(3, true)]
#[case(4, true)]
#[case(5, false)]
fn test_array_bounds(#[case] length: usize, #[case] expected: bool) {
    let schema = json!({
        "type": "array",
        "items": {"type": "number"},
        "minItems": 2,
        "maxItems": 4
    });
    let value = Value::Array((0..length).map(|n| json!(n)).collect());
    assert_eq!(accepts(schema, value), expected);
}

#[test]
fn test_array_bound_issues() {
    let validator = compile(json!({"type": "array", "items": {"type": "string"}, "minItems": 2}));
    let failure = validator.validate(&json!(["a"])).unwrap_err();
    assert_eq!(
        failure.issues()[0].kind,
        IssueKind::TooFewItems { minimum: 2 }
    );

    let validator = compile(json!({"type": "array", "items": {"type": "string"}, "maxItems": 3}));
    let failure = validator.validate(&json!(["a", "b", "c", "d"])).unwrap_err();
    assert_eq!(
        failure.issues()[0].kind,
        IssueKind::TooManyItems { maximum: 3 }
    );
}

#[test]
fn test_nested_arrays() {
    let validator = compile(json!({
        "type": "array",
        "items": {"type": "array", "items": {"type": "number"}}
    }));
    let matrix = json!([[1, 2], [3, 4]]);
    assert_eq!(validator.validate(&matrix).unwrap(), matrix);
    let failure = validator.validate(&json!([[1, 2], [3, "four"]])).unwrap_err();
    assert!(failure.has_issue_at(&FieldPath::root().index(1).index(1)));
}

#[test]
fn test_empty_containers() {
    let object = compile(json!({"type": "object", "properties": {}}));
    assert_eq!(object.validate(&json!({})).unwrap(), json!({}));

    let array = compile(json!({"type": "array", "items": {"type": "string"}}));
    assert_eq!(array.validate(&json!([])).unwrap(), json!([]));
}

#[test]
fn test_tuple_arity() {
    let validator = compile(json!({
        "type": "array",
        "prefixItems": [{"type": "string"}, {"type": "number"}]
    }));
    assert_eq!(validator.kind_name(), "tuple");
    assert!(validator.validate(&json!(["Alice", 95])).is_ok());
    assert!(validator.validate(&json!([95, "Alice"])).is_err());

    let failure = validator.validate(&json!(["Alice"])).unwrap_err();
    assert_eq!(
        failure.issues()[0].kind,
        IssueKind::TupleArity {
            expected: 2,
            received: 1
        }
    );
    assert!(validator.validate(&json!(["Alice", 95, true])).is_err());
}

#[test]
fn test_tuple_with_object_slots() {
    let validator = compile(json!({
        "type": "array",
        "prefixItems": [
            {"type": "object", "properties": {"id": {"type": "integer"}}},
            {"type": "boolean"}
        ]
    }));
    let data = json!([{"id": 7}, true]);
    assert_eq!(validator.validate(&data).unwrap(), data);
}

#[test]
fn test_prefix_items_win_over_items() {
    let validator = compile(json!({
        "type": "array",
        "prefixItems": [{"type": "string"}],
        "items": {"type": "number"}
    }));
    assert!(validator.validate(&json!(["only"])).is_ok());
    assert!(validator.validate(&json!([1])).is_err());
}

// Unions and intersections

#[test]
fn test_any_of_ignores_type() {
    let validator = compile(json!({
        "type": "string",
        "anyOf": [{"type": "string"}, {"type": "number"}]
    }));
    assert_eq!(validator.kind_name(), "union");
    assert_eq!(validator.validate(&json!("hello")).unwrap(), json!("hello"));
    assert_eq!(validator.validate(&json!(42)).unwrap(), json!(42));

    let failure = validator.validate(&json!(true)).unwrap_err();
    assert_eq!(
        failure.issues()[0].kind,
        IssueKind::NoMatchingBranch { branches: 2 }
    );
}

#[test]
fn test_one_of_behaves_like_any_of() {
    let validator = compile(json!({
        "type": "string",
        "oneOf": [{"type": "string"}, {"type": "boolean"}]
    }));
    assert!(validator.validate(&json!("test")).is_ok());
    assert!(validator.validate(&json!(false)).is_ok());
    assert!(validator.validate(&json!(123)).is_err());
}

#[test]
fn test_union_of_object_and_array() {
    let validator = compile(json!({
        "type": "object",
        "anyOf": [
            {"type": "object", "properties": {"name": {"type": "string"}}},
            {"type": "array", "items": {"type": "string"}}
        ]
    }));
    assert_eq!(
        validator.validate(&json!({"name": "John"})).unwrap(),
        json!({"name": "John"})
    );
    assert_eq!(
        validator.validate(&json!(["a", "b"])).unwrap(),
        json!(["a", "b"])
    );
}

#[test]
fn test_union_picks_first_matching_branch() {
    let validator = compile(json!({
        "anyOf": [
            {"type": "object", "properties": {"id": {"type": "integer"}}},
            {"type": "object", "additionalProperties": {"type": "integer"}}
        ]
    }));
    let parsed = validator.validate(&json!({"id": 1, "extra": 2})).unwrap();
    assert_eq!(parsed, json!({"id": 1, "extra": 2}));
    assert_eq!(validator.kind_name(), "union");
}

#[test]
fn test_single_any_of_degenerates() {
    let wrapped = compile(json!({"type": "string", "anyOf": [{"type": "string"}]}));
    let direct = compile(json!({"type": "string"}));
    assert_eq!(wrapped.kind_name(), direct.kind_name());
    assert_eq!(wrapped.validate(&json!("test")).unwrap(), json!("test"));
}

#[test]
fn test_all_of_merges_objects() {
    let validator = compile(json!({
        "type": "object",
        "allOf": [
            {"type": "object", "properties": {"name": {"type": "string"}}},
            {"type": "object", "properties": {"age": {"type": "integer"}}}
        ]
    }));
    assert_eq!(validator.kind_name(), "intersection");
    let data = json!({"name": "Alice", "age": 30});
    assert_eq!(validator.validate(&data).unwrap(), data);
    assert!(validator.validate(&json!({"name": "Alice"})).is_err());
    assert!(validator.validate(&json!({"name": "Alice", "age": 30.5})).is_err());
}

#[test]
fn test_single_all_of_degenerates() {
    let validator = compile(json!({
        "type": "object",
        "allOf": [{"type": "object", "properties": {"id": {"type": "integer"}}}]
    }));
    assert_eq!(validator.kind_name(), "object");
    assert_eq!(
        validator.validate(&json!({"id": 123})).unwrap(),
        json!({"id": 123})
    );
}

#[test]
fn test_all_of_primitive_branches_must_all_accept() {
    let validator = compile(json!({
        "allOf": [
            {"type": "string", "minLength": 2},
            {"type": "string", "maxLength": 4}
        ]
    }));
    assert!(validator.validate(&json!("abc")).is_ok());
    assert!(validator.validate(&json!("a")).is_err());
    assert!(validator.validate(&json!("abcde")).is_err());
}

// Nullable

#[rstest]
#[case(json!({"type": "string", "nullable": true}), json!("hello"))]
#[case(json!({"type": "number", "nullable": true}), json!(42))]
#[case(json!({"type": "boolean", "nullable": true}), json!(true))]
#[case(json!({"type": "array", "nullable": true}), json!(["a", "b"]))]
#[case(
    json!({"type": "object", "properties": {"value": {"type": "string"}}, "nullable": true}),
    json!({"value": "test"})
)]
#[case(
    json!({
        "type": "array",
        "prefixItems": [{"type": "string"}, {"type": "number"}],
        "nullable": true
    }),
    json!(["Alice", 95])
)]
#[case(
    json!({"type": "object", "additionalProperties": {"type": "string"}, "nullable": true}),
    json!({"key": "value"})
)]
fn test_nullable_widens_to_null(#[case] schema: Value, #[case] value: Value) {
    let validator = compile(schema);
    assert!(validator.is_nullable());
    assert_eq!(validator.validate(&value).unwrap(), value);
    assert_eq!(validator.validate(&Value::Null).unwrap(), Value::Null);
    assert!(validator.parse(None).is_err());
}

#[test]
fn test_nullable_enum() {
    let validator = compile(json!({
        "type": "string",
        "enum": ["red", "green", "blue"],
        "nullable": true
    }));
    assert!(validator.validate(&json!("red")).is_ok());
    assert!(validator.validate(&Value::Null).is_ok());
    assert!(validator.validate(&json!("yellow")).is_err());
}

#[test]
fn test_non_nullable_rejects_null() {
    let failure = compile(json!({"type": "string"}))
        .validate(&Value::Null)
        .unwrap_err();
    assert_eq!(
        failure.issues()[0].kind,
        IssueKind::InvalidType {
            expected: "string".to_string(),
            received: "null".to_string()
        }
    );
}

// Literals

#[rstest]
#[case(
    json!({"type": "string", "const": "exact-value"}),
    json!("exact-value"),
    json!("other-value")
)]
#[case(json!({"type": "number", "const": 42}), json!(42), json!(43))]
#[case(json!({"type": "number", "const": 42}), json!(42), json!("42"))]
#[case(json!({"type": "boolean", "const": true}), json!(true), json!(false))]
fn test_const_literals(#[case] schema: Value, #[case] good: Value, #[case] bad: Value) {
    let validator = compile(schema);
    assert_eq!(validator.kind_name(), "literal");
    assert_eq!(validator.validate(&good).unwrap(), good);
    assert!(validator.validate(&bad).is_err());
    assert!(validator.parse(None).is_err());
}

#[test]
fn test_const_null_literal() {
    let validator = compile(json!({"const": null}));
    assert!(validator.validate(&Value::Null).is_ok());
    assert!(validator.validate(&json!("null")).is_err());
}

// Compositions

#[test]
fn test_union_of_nullable_branches() {
    let validator = compile(json!({
        "type": "string",
        "anyOf": [
            {"type": "string", "nullable": true},
            {"type": "number", "nullable": true}
        ]
    }));
    assert_eq!(validator.validate(&json!("text")).unwrap(), json!("text"));
    assert_eq!(validator.validate(&json!(123)).unwrap(), json!(123));
    assert_eq!(validator.validate(&Value::Null).unwrap(), Value::Null);
}

#[test]
fn test_array_of_unions() {
    let validator = compile(json!({
        "type": "array",
        "items": {"type": "string", "anyOf": [{"type": "string"}, {"type": "number"}]}
    }));
    let data = json!(["a", 1, "b", 2]);
    assert_eq!(validator.validate(&data).unwrap(), data);
}

#[test]
fn test_union_of_literals() {
    let validator = compile(json!({
        "type": "string",
        "anyOf": [
            {"type": "string", "const": "success"},
            {"type": "string", "const": "error"}
        ]
    }));
    assert!(validator.validate(&json!("success")).is_ok());
    assert!(validator.validate(&json!("error")).is_ok());
    assert!(validator.validate(&json!("pending")).is_err());
}

// String constraints

#[rstest]
#[case("ab", false)]
#[case("abc", true)]
#[case("abcde", true)]
#[case("abcdef", false)]
fn test_string_length_bounds(#[case] value: &str, #[case] expected: bool) {
    let schema = json!({"type": "string", "minLength": 3, "maxLength": 5});
    assert_eq!(accepts(schema, json!(value)), expected);
}

#[test]
fn test_string_length_counts_characters() {
    let validator = compile(json!({"type": "string", "maxLength": 3}));
    assert!(validator.validate(&json!("äöü")).is_ok());
    assert!(validator.validate(&json!("äöüß")).is_err());
}

#[rstest]
#[case("Hello", true)]
#[case("World", true)]
#[case("hello", false)]
#[case("HELLO", false)]
#[case("Hello123", false)]
fn test_pattern(#[case] value: &str, #[case] expected: bool) {
    let schema = json!({"type": "string", "pattern": "^[A-Z][a-z]+$"});
    assert_eq!(accepts(schema, json!(value)), expected);
}

#[rstest]
#[case("secret42", true)]
#[case("no-digits-here", false)]
#[case("ab1", false)]
#[case("waytoolong123456", false)]
fn test_lookahead_pattern_composes_with_length(#[case] value: &str, #[case] expected: bool) {
    let schema = json!({"type": "string", "maxLength": 12, "pattern": "(?=.*\\d).{8,}"});
    assert_eq!(accepts(schema, json!(value)), expected);
}

#[test]
fn test_string_constraints_compose() {
    let validator = compile(json!({
        "type": "string",
        "minLength": 5,
        "maxLength": 50,
        "pattern": "^[a-z]+@[a-z]+\\.[a-z]+$"
    }));
    assert!(validator.validate(&json!("user@example.com")).is_ok());
    assert!(validator.validate(&json!("a@b")).is_err());

    let failure = validator.validate(&json!("User@example.com")).unwrap_err();
    assert!(matches!(failure.issues()[0].kind, IssueKind::PatternMismatch { .. }));
}

#[test]
fn test_every_string_issue_is_reported() {
    let validator = compile(json!({
        "type": "string",
        "minLength": 10,
        "format": "email"
    }));
    let failure = validator.validate(&json!("nope")).unwrap_err();
    let kinds: Vec<&IssueKind> = failure.issues().iter().map(|issue| &issue.kind).collect();
    assert_eq!(
        kinds,
        [
            &IssueKind::StringTooShort { minimum: 10 },
            &IssueKind::FormatMismatch {
                format: "email".to_string()
            }
        ]
    );
}

// Number constraints

#[rstest]
#[case(json!({"type": "number", "minimum": 0}), &[json!(0), json!(10)], &[json!(-1)])]
#[case(json!({"type": "number", "maximum": 100}), &[json!(0), json!(100)], &[json!(101)])]
#[case(
    json!({"type": "number", "minimum": 1, "maximum": 10}),
    &[json!(1), json!(5), json!(10)],
    &[json!(0), json!(11)]
)]
#[case(
    json!({"type": "number", "exclusiveMinimum": 0}),
    &[json!(0.1), json!(1)],
    &[json!(0), json!(-1)]
)]
#[case(
    json!({"type": "number", "exclusiveMaximum": 100}),
    &[json!(99.9), json!(50)],
    &[json!(100), json!(101)]
)]
#[case(
    json!({"type": "integer", "minimum": 1, "maximum": 100}),
    &[json!(1), json!(50), json!(100)],
    &[json!(0), json!(101), json!(50.5)]
)]
fn test_number_bounds(#[case] schema: Value, #[case] good: &[Value], #[case] bad: &[Value]) {
    let validator = compile(schema);
    for value in good {
        assert_eq!(validator.validate(value).unwrap(), *value);
    }
    for value in bad {
        assert!(
            validator.validate(value).is_err(),
            "{value} should be rejected"
        );
    }
}

#[test]
fn test_exclusive_bound_issue() {
    let failure = compile(json!({"type": "number", "exclusiveMinimum": 0}))
        .validate(&json!(0))
        .unwrap_err();
    assert_eq!(
        failure.issues()[0].kind,
        IssueKind::BelowMinimum {
            minimum: 0.0,
            exclusive: true
        }
    );
}

#[test]
fn test_integer_accepts_whole_float_representation() {
    let validator = compile(json!({"type": "integer"}));
    assert!(validator.validate(&json!(42.0)).is_ok());
    assert_eq!(
        validator.validate(&json!(3.14)).unwrap_err().issues()[0].kind,
        IssueKind::NotAnInteger
    );
}

// Records

#[test]
fn test_record_of_strings() {
    let validator = compile(json!({"type": "object", "additionalProperties": {"type": "string"}}));
    assert_eq!(validator.kind_name(), "record");
    let data = json!({"a": "hello", "b": "world"});
    assert_eq!(validator.validate(&data).unwrap(), data);

    let failure = validator.validate(&json!({"a": "hello", "b": 123})).unwrap_err();
    assert!(failure.has_issue_at(&FieldPath::root().key("b")));
}

#[test]
fn test_record_of_numbers() {
    let validator = compile(json!({"type": "object", "additionalProperties": {"type": "number"}}));
    let data = json!({"score1": 95, "score2": 87.5});
    assert_eq!(validator.validate(&data).unwrap(), data);
    assert!(validator.validate(&json!({"score1": "ninety-five"})).is_err());
}

#[test]
fn test_record_of_objects() {
    let validator = compile(json!({
        "type": "object",
        "additionalProperties": {
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
        }
    }));
    let data = json!({
        "user1": {"name": "Alice", "age": 30},
        "user2": {"name": "Bob", "age": 25}
    });
    assert_eq!(validator.validate(&data).unwrap(), data);
}

#[test]
fn test_properties_win_over_additional_properties() {
    let validator = compile(json!({
        "type": "object",
        "properties": {"id": {"type": "integer"}, "name": {"type": "string"}},
        "additionalProperties": {"type": "string"}
    }));
    assert_eq!(validator.kind_name(), "object");
    assert_eq!(
        validator.validate(&json!({"id": 1, "name": "Test"})).unwrap(),
        json!({"id": 1, "name": "Test"})
    );
    // undeclared keys follow the object rule, not the record's value type
    let data = json!({"id": 1, "name": "Test", "extra": 5});
    assert_eq!(validator.validate(&data).unwrap(), data);
}

#[rstest]
#[case(json!({"id": 1, "user": {"name": "Ann"}, "extra": "x"}))]
#[case(json!({"id": 1, "user": {"name": "Ann"}, "meta": {"trace": true}, "tags": ["a"]}))]
#[case(json!({"id": 1, "user": {"name": "Ann", "nickname": "A"}}))]
fn test_accepted_objects_round_trip_with_undeclared_keys(#[case] data: Value) {
    let validator = compile(json!({
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "user": {"type": "object", "properties": {"name": {"type": "string"}}}
        }
    }));
    assert_eq!(validator.validate(&data).unwrap(), data);
}

#[test]
fn test_object_without_properties_is_unknown() {
    let validator = compile(json!({"type": "object"}));
    assert_eq!(validator.kind_name(), "unknown");
    assert!(validator.validate(&json!("not even an object")).is_ok());
}

// Formats

#[rstest]
#[case("email", "user@example.com", true)]
#[case("email", "test.user+tag@domain.co.uk", true)]
#[case("email", "invalid-email", false)]
#[case("email", "missing@domain", false)]
#[case("url", "https://example.com", true)]
#[case("url", "http://localhost:8080/path", true)]
#[case("url", "not-a-url", false)]
#[case("url", "just-text", false)]
#[case("uri", "https://example.com", true)]
#[case("uri", "not-a-uri", false)]
#[case("uuid", "123e4567-e89b-12d3-a456-426614174000", true)]
#[case("uuid", "not-a-uuid", false)]
#[case("uuid", "123e4567-e89b-12d3-a456", false)]
#[case("date-time", "2025-12-06T10:30:00Z", true)]
#[case("date-time", "2025-12-06T10:30:00.123Z", true)]
#[case("date-time", "2025-12-06", false)]
#[case("date-time", "not-a-datetime", false)]
#[case("datetime", "2025-12-06T10:30:00Z", true)]
#[case("date", "2025-12-06", true)]
#[case("date", "12/06/2025", false)]
#[case("date", "2025-12-06T10:30:00Z", false)]
#[case("time", "10:30:00", true)]
#[case("time", "23:59:59", true)]
#[case("time", "25:00:00", false)]
#[case("time", "not-a-time", false)]
#[case("ipv4", "192.168.1.1", true)]
#[case("ipv4", "10.0.0.1", true)]
#[case("ipv4", "256.1.1.1", false)]
#[case("ipv4", "not-an-ip", false)]
#[case("ipv6", "2001:0db8:85a3:0000:0000:8a2e:0370:7334", true)]
#[case("ipv6", "::1", true)]
#[case("ipv6", "192.168.1.1", false)]
#[case("ip", "192.168.1.1", true)]
#[case("ip", "::1", true)]
#[case("ip", "not-an-ip", false)]
#[case("custom-unknown-format", "any-string", true)]
#[case("custom-unknown-format", "123", true)]
fn test_formats(#[case] format: &str, #[case] value: &str, #[case] expected: bool) {
    let schema = json!({"type": "string", "format": format});
    assert_eq!(accepts(schema, json!(value)), expected);
}

#[test]
fn test_format_composes_with_length() {
    let validator = compile(json!({
        "type": "string",
        "format": "email",
        "minLength": 10,
        "maxLength": 100
    }));
    assert!(validator.validate(&json!("user@example.com")).is_ok());
    assert!(validator.validate(&json!("a@b.co")).is_err());
    assert!(validator.validate(&json!("not-an-email-but-long-enough")).is_err());
}

#[test]
fn test_nullable_format() {
    let validator = compile(json!({"type": "string", "format": "email", "nullable": true}));
    assert!(validator.validate(&json!("user@example.com")).is_ok());
    assert!(validator.validate(&Value::Null).is_ok());
    assert!(validator.validate(&json!("invalid-email")).is_err());
}

// Descriptions

#[test]
fn test_description_is_preserved() {
    let validator = compile(json!({"type": "string", "description": "Test description"}));
    assert_eq!(validator.description(), "Test description");
}

#[test]
fn test_missing_description_is_empty() {
    let validator = compile(json!({"type": "array", "items": {"type": "string"}}));
    assert_eq!(validator.description(), "");
    assert_eq!(
        validator.validate(&json!(["test"])).unwrap(),
        json!(["test"])
    );
}

#[test]
fn test_nullable_keeps_description() {
    let validator = compile(json!({"type": "number", "description": "Score", "nullable": true}));
    assert_eq!(validator.description(), "Score");
}

#[test]
fn test_validators_are_reusable_across_threads() {
    let validator = std::sync::Arc::new(compile(json!({
        "type": "object",
        "properties": {"n": {"type": "integer", "minimum": 0}}
    })));

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let validator = validator.clone();
            std::thread::spawn(move || validator.validate(&json!({"n": n})).is_ok())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
