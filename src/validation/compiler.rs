//! Schema compiler
//!
//! Maps one [`SchemaNode`] to one [`Validator`]. Compilation never fails:
//! incomplete or unrecognized descriptors fall back to permissive
//! validators so that a careless tool author cannot break tool listing.

use crate::validation::schema::{NodeKind, SchemaNode, SchemaType, StringFormat};
use crate::validation::validator::{
    ArrayRules, NumberRules, ObjectField, ObjectShape, StringRules, UnknownKeys, Validator,
    ValidatorKind,
};
use indexmap::IndexMap;
use fancy_regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Compile a node with the default settings
pub fn compile_schema(node: &SchemaNode) -> Validator {
    SchemaCompiler::new().scan(node)
}

/// Recursive schema-to-validator compiler
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCompiler {
    unknown_keys: UnknownKeys,
}

impl SchemaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy applied to every object shape this compiler produces
    pub fn with_unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Compile a raw JSON descriptor
    pub fn scan_value(&self, raw: &Value) -> Validator {
        self.scan(&SchemaNode::from_value(raw))
    }

    /// Compile one node, then apply `nullable`
    pub fn scan(&self, node: &SchemaNode) -> Validator {
        let validator = match node.kind() {
            NodeKind::Const(value) => Validator::literal(value.clone()),
            NodeKind::Union(branches) => self.scan_union(branches),
            NodeKind::Intersection(branches) => self.scan_intersection(branches),
            NodeKind::Typed(schema_type) => self.scan_typed(node, schema_type),
        };

        let validator = validator.with_description(node.description_or_empty());
        if node.nullable {
            validator.nullable()
        } else {
            validator
        }
    }

    fn scan_union(&self, branches: &[SchemaNode]) -> Validator {
        let mut compiled: Vec<Validator> = branches.iter().map(|b| self.scan(b)).collect();
        match compiled.len() {
            0 => {
                debug!("Empty anyOf/oneOf, accepting any value");
                Validator::unknown()
            }
            1 => compiled.remove(0),
            _ => Validator::new(ValidatorKind::Union(compiled)),
        }
    }

    fn scan_intersection(&self, branches: &[SchemaNode]) -> Validator {
        let mut compiled: Vec<Validator> = branches.iter().map(|b| self.scan(b)).collect();
        match compiled.len() {
            0 => {
                debug!("Empty allOf, accepting any value");
                Validator::unknown()
            }
            1 => compiled.remove(0),
            _ => Validator::new(ValidatorKind::Intersection(compiled)),
        }
    }

    fn scan_typed(&self, node: &SchemaNode, schema_type: Option<&SchemaType>) -> Validator {
        let Some(schema_type) = schema_type else {
            return Validator::unknown();
        };

        match schema_type {
            SchemaType::String => scan_string(node),
            SchemaType::Number => scan_number(node, false),
            SchemaType::Integer => scan_number(node, true),
            SchemaType::Boolean => Validator::new(ValidatorKind::Boolean),
            SchemaType::Null => Validator::new(ValidatorKind::Null),
            SchemaType::Object => self.scan_object(node),
            SchemaType::Array => self.scan_array(node),
            SchemaType::Unrecognized(name) => {
                debug!("Unrecognized schema type '{}', accepting any value", name);
                Validator::unknown()
            }
        }
    }

    fn scan_object(&self, node: &SchemaNode) -> Validator {
        if let Some(properties) = &node.properties {
            if node.additional_properties.is_some() {
                debug!("Both properties and additionalProperties declared, using properties");
            }
            return Validator::new(ValidatorKind::Object(self.object_shape(properties, None)));
        }
        if let Some(values) = &node.additional_properties {
            return Validator::new(ValidatorKind::Record(Box::new(self.scan(values))));
        }
        Validator::unknown()
    }

    /// Object shape over `properties`
    ///
    /// With no `required` list every property is required; otherwise only
    /// the listed names are.
    pub(crate) fn object_shape(
        &self,
        properties: &IndexMap<String, SchemaNode>,
        required: Option<&[String]>,
    ) -> ObjectShape {
        let fields = properties
            .iter()
            .map(|(name, property)| {
                let optional = required.is_some_and(|names| !names.iter().any(|n| n == name));
                let field = ObjectField {
                    validator: self.scan(property),
                    optional,
                };
                (name.clone(), field)
            })
            .collect();
        ObjectShape {
            fields,
            unknown_keys: self.unknown_keys,
        }
    }

    fn scan_array(&self, node: &SchemaNode) -> Validator {
        if let Some(slots) = &node.prefix_items {
            let slots = slots.iter().map(|slot| self.scan(slot)).collect();
            return Validator::new(ValidatorKind::Tuple(slots));
        }
        if let Some(items) = &node.items {
            return Validator::new(ValidatorKind::Array(ArrayRules {
                items: Some(Box::new(self.scan(items))),
                min_items: node.min_items,
                max_items: node.max_items,
            }));
        }
        debug!("Array schema without items or prefixItems, elements are unchecked");
        Validator::new(ValidatorKind::Array(ArrayRules {
            items: None,
            min_items: None,
            max_items: None,
        }))
    }
}

fn scan_string(node: &SchemaNode) -> Validator {
    if let Some(values) = enum_values(node) {
        let strings: Option<Vec<String>> = values
            .iter()
            .map(|value| value.as_str().map(str::to_string))
            .collect();
        return match strings {
            Some(allowed) => Validator::new(ValidatorKind::String(StringRules {
                allowed: Some(allowed),
                ..StringRules::default()
            })),
            None => literal_union(values),
        };
    }

    let pattern = node.pattern.as_ref().and_then(|source| {
        let anchored = format!("^(?:{source})$");
        match Regex::new(&anchored) {
            Ok(regex) => Some((source.clone(), regex)),
            Err(e) => {
                warn!("Ignoring malformed pattern '{}': {}", source, e);
                None
            }
        }
    });

    let format = match &node.format {
        Some(StringFormat::Other(name)) => {
            debug!("Unrecognized string format '{}', not checked", name);
            None
        }
        other => other.clone(),
    };

    Validator::new(ValidatorKind::String(StringRules {
        allowed: None,
        min_length: node.min_length,
        max_length: node.max_length,
        pattern,
        format,
    }))
}

fn scan_number(node: &SchemaNode, integer: bool) -> Validator {
    if let Some(values) = enum_values(node) {
        return literal_union(values);
    }

    let rules = NumberRules {
        minimum: node.minimum,
        maximum: node.maximum,
        exclusive_minimum: node.exclusive_minimum,
        exclusive_maximum: node.exclusive_maximum,
    };
    if integer {
        Validator::new(ValidatorKind::Integer(rules))
    } else {
        Validator::new(ValidatorKind::Number(rules))
    }
}

fn enum_values(node: &SchemaNode) -> Option<&[Value]> {
    match node.enum_values.as_deref() {
        Some([]) => {
            debug!("Empty enum ignored");
            None
        }
        other => other,
    }
}

fn literal_union(values: &[Value]) -> Validator {
    let mut literals: Vec<Validator> = values.iter().cloned().map(Validator::literal).collect();
    if literals.len() == 1 {
        literals.remove(0)
    } else {
        Validator::new(ValidatorKind::Union(literals))
    }
}
