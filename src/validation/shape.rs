//! Shape inference for whole argument objects
//!
//! A tool declares its inputs as a map of parameter name to schema node
//! plus a list of required names. [`infer_shape`] compiles each parameter
//! once; the resulting [`Shape`] is kept for the lifetime of the tool
//! registration and checks every call's arguments.

use crate::validation::compiler::SchemaCompiler;
use crate::validation::schema::SchemaNode;
use crate::validation::validator::{ObjectField, ObjectShape, Validator, ValidatorKind};
use crate::validation::ValidationFailure;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// One compiled parameter; `optional` fields may be absent but stay non-nullable
pub type ShapeField = ObjectField;

/// Field name to compiled validator, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Shape {
    object: ObjectShape,
}

/// Compile every parameter with the default compiler
pub fn infer_shape<S: AsRef<str>>(spec: &IndexMap<String, SchemaNode>, required: &[S]) -> Shape {
    infer_shape_with(&SchemaCompiler::new(), spec, required)
}

/// Compile every parameter with `compiler`
///
/// Only membership in `required` matters; its order and any names that
/// are not parameters are ignored.
pub fn infer_shape_with<S: AsRef<str>>(
    compiler: &SchemaCompiler,
    spec: &IndexMap<String, SchemaNode>,
    required: &[S],
) -> Shape {
    for name in required {
        if !spec.contains_key(name.as_ref()) {
            debug!("Required input '{}' has no schema, ignoring", name.as_ref());
        }
    }

    let required: Vec<String> = required.iter().map(|r| r.as_ref().to_string()).collect();
    Shape {
        object: compiler.object_shape(spec, Some(required.as_slice())),
    }
}

/// Infer from the raw JSON `properties` map a tool listing carries
pub fn infer_shape_from_value<S: AsRef<str>>(raw: &Value, required: &[S]) -> Shape {
    let spec: IndexMap<String, SchemaNode> = raw
        .as_object()
        .map(|object| {
            object
                .iter()
                .map(|(name, node)| (name.clone(), SchemaNode::from_value(node)))
                .collect()
        })
        .unwrap_or_default();
    infer_shape(&spec, required)
}

impl Shape {
    pub fn get(&self, name: &str) -> Option<&ShapeField> {
        self.object.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &ShapeField)> {
        self.object
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.object.fields.keys().map(String::as_str)
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, field)| !field.optional)
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.object.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object.fields.is_empty()
    }

    /// Check a whole argument object
    pub fn validate(&self, arguments: &Value) -> Result<Value, ValidationFailure> {
        self.object.validate(arguments)
    }

    /// Object validator over this shape
    pub fn into_validator(self) -> Validator {
        Validator::new(ValidatorKind::Object(self.object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(raw: Value) -> IndexMap<String, SchemaNode> {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_required_order_is_irrelevant() {
        let spec = spec(json!({
            "a": {"type": "string"},
            "b": {"type": "string"},
            "c": {"type": "string"}
        }));
        let forward = infer_shape(&spec, &["a", "c"]);
        let backward = infer_shape(&spec, &["c", "a"]);

        let names = |shape: &Shape| shape.required_names().map(str::to_string).collect::<Vec<_>>();
        assert_eq!(names(&forward), ["a", "c"]);
        assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn test_optional_field_still_rejects_null() {
        let shape = infer_shape(&spec(json!({"email": {"type": "string"}})), &[] as &[&str]);
        assert!(shape.validate(&json!({})).is_ok());
        assert!(shape.validate(&json!({"email": null})).is_err());
    }

    #[test]
    fn test_unknown_required_names_are_ignored() {
        let shape = infer_shape(&spec(json!({"id": {"type": "integer"}})), &["id", "ghost"]);
        assert_eq!(shape.len(), 1);
        assert!(shape.validate(&json!({"id": 3})).is_ok());
    }

    #[test]
    fn test_field_order_follows_declaration() {
        let shape = infer_shape_from_value(
            &json!({"zeta": {"type": "string"}, "alpha": {"type": "number"}}),
            &["zeta"],
        );
        assert_eq!(shape.field_names().collect::<Vec<_>>(), ["zeta", "alpha"]);
    }
}
