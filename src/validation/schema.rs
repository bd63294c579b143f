//! Schema descriptors attached to hub tool parameters
//!
//! A [`SchemaNode`] is read leniently: attributes with an unexpected JSON
//! type are treated as absent instead of failing the whole tool listing.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Declared `type` of a schema node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
    /// Any other `type` string, compiled permissively
    Unrecognized(String),
}

impl SchemaType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "object" => Self::Object,
            "array" => Self::Array,
            "null" => Self::Null,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
            Self::Unrecognized(other) => other,
        }
    }
}

/// Value of the `format` keyword on string nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    /// `url` and `uri`
    Url,
    Uuid,
    /// `date-time` and `datetime`
    DateTime,
    Date,
    Time,
    Ipv4,
    Ipv6,
    /// Either address family
    Ip,
    /// Anything else; accepted without checking
    Other(String),
}

impl StringFormat {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "email" => Self::Email,
            "url" | "uri" => Self::Url,
            "uuid" => Self::Uuid,
            "date-time" | "datetime" => Self::DateTime,
            "date" => Self::Date,
            "time" => Self::Time,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            "ip" => Self::Ip,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Email => "email",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Time => "time",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Ip => "ip",
            Self::Other(other) => other,
        }
    }
}

/// One node of a tool's declared input schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub schema_type: Option<SchemaType>,
    pub description: Option<String>,
    pub enum_values: Option<Vec<Value>>,
    pub const_value: Option<Value>,
    pub nullable: bool,

    // object
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub additional_properties: Option<Box<SchemaNode>>,

    // array
    pub items: Option<Box<SchemaNode>>,
    pub prefix_items: Option<Vec<SchemaNode>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,

    // string
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub format: Option<StringFormat>,

    // number
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,

    // composition
    pub any_of: Option<Vec<SchemaNode>>,
    pub one_of: Option<Vec<SchemaNode>>,
    pub all_of: Option<Vec<SchemaNode>>,
}

/// How a node compiles, in precedence order
///
/// `const` beats composition, `anyOf`/`oneOf` beat `allOf`, and the declared
/// `type` is only consulted when none of those are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a> {
    Const(&'a Value),
    Union(&'a [SchemaNode]),
    Intersection(&'a [SchemaNode]),
    Typed(Option<&'a SchemaType>),
}

impl SchemaNode {
    /// Read a node from raw JSON, ignoring attributes of the wrong shape
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self::from_map(object),
            None => {
                debug!("Schema node is not an object, treating as unconstrained: {value}");
                Self::default()
            }
        }
    }

    fn from_map(object: &Map<String, Value>) -> Self {
        Self {
            schema_type: object
                .get("type")
                .and_then(Value::as_str)
                .map(SchemaType::parse),
            description: object
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            enum_values: object.get("enum").and_then(Value::as_array).cloned(),
            const_value: object.get("const").cloned(),
            nullable: object
                .get("nullable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            properties: object.get("properties").and_then(Value::as_object).map(|props| {
                props
                    .iter()
                    .map(|(name, node)| (name.clone(), Self::from_value(node)))
                    .collect()
            }),
            additional_properties: object
                .get("additionalProperties")
                .filter(|node| node.is_object())
                .map(|node| Box::new(Self::from_value(node))),
            items: object
                .get("items")
                .filter(|node| node.is_object())
                .map(|node| Box::new(Self::from_value(node))),
            prefix_items: node_list(object.get("prefixItems")),
            min_items: count(object.get("minItems")),
            max_items: count(object.get("maxItems")),
            min_length: count(object.get("minLength")),
            max_length: count(object.get("maxLength")),
            pattern: object
                .get("pattern")
                .and_then(Value::as_str)
                .map(str::to_string),
            format: object
                .get("format")
                .and_then(Value::as_str)
                .map(StringFormat::parse),
            minimum: object.get("minimum").and_then(Value::as_f64),
            maximum: object.get("maximum").and_then(Value::as_f64),
            exclusive_minimum: object.get("exclusiveMinimum").and_then(Value::as_f64),
            exclusive_maximum: object.get("exclusiveMaximum").and_then(Value::as_f64),
            any_of: node_list(object.get("anyOf")),
            one_of: node_list(object.get("oneOf")),
            all_of: node_list(object.get("allOf")),
        }
    }

    /// Classify this node according to keyword precedence
    pub fn kind(&self) -> NodeKind<'_> {
        if let Some(value) = &self.const_value {
            return NodeKind::Const(value);
        }
        if let Some(branches) = self.any_of.as_deref().or(self.one_of.as_deref()) {
            return NodeKind::Union(branches);
        }
        if let Some(branches) = self.all_of.as_deref() {
            return NodeKind::Intersection(branches);
        }
        NodeKind::Typed(self.schema_type.as_ref())
    }

    /// Description, or the empty string when absent
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Render the node back to JSON-Schema form
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        if let Some(schema_type) = &self.schema_type {
            object.insert("type".into(), Value::from(schema_type.as_str()));
        }
        if let Some(description) = &self.description {
            object.insert("description".into(), Value::from(description.as_str()));
        }
        if let Some(values) = &self.enum_values {
            object.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(value) = &self.const_value {
            object.insert("const".into(), value.clone());
        }
        if self.nullable {
            object.insert("nullable".into(), Value::Bool(true));
        }
        if let Some(properties) = &self.properties {
            let rendered: Map<String, Value> = properties
                .iter()
                .map(|(name, node)| (name.clone(), node.to_value()))
                .collect();
            object.insert("properties".into(), Value::Object(rendered));
        }
        if let Some(node) = &self.additional_properties {
            object.insert("additionalProperties".into(), node.to_value());
        }
        if let Some(node) = &self.items {
            object.insert("items".into(), node.to_value());
        }
        insert_nodes(&mut object, "prefixItems", self.prefix_items.as_deref());
        insert_count(&mut object, "minItems", self.min_items);
        insert_count(&mut object, "maxItems", self.max_items);
        insert_count(&mut object, "minLength", self.min_length);
        insert_count(&mut object, "maxLength", self.max_length);
        if let Some(pattern) = &self.pattern {
            object.insert("pattern".into(), Value::from(pattern.as_str()));
        }
        if let Some(format) = &self.format {
            object.insert("format".into(), Value::from(format.as_str()));
        }
        insert_number(&mut object, "minimum", self.minimum);
        insert_number(&mut object, "maximum", self.maximum);
        insert_number(&mut object, "exclusiveMinimum", self.exclusive_minimum);
        insert_number(&mut object, "exclusiveMaximum", self.exclusive_maximum);
        insert_nodes(&mut object, "anyOf", self.any_of.as_deref());
        insert_nodes(&mut object, "oneOf", self.one_of.as_deref());
        insert_nodes(&mut object, "allOf", self.all_of.as_deref());
        Value::Object(object)
    }
}

fn node_list(value: Option<&Value>) -> Option<Vec<SchemaNode>> {
    value
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().map(SchemaNode::from_value).collect())
}

fn count(value: Option<&Value>) -> Option<usize> {
    let value = value?;
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u64)
        })
        .and_then(|n| usize::try_from(n).ok())
}

fn insert_nodes(object: &mut Map<String, Value>, key: &str, nodes: Option<&[SchemaNode]>) {
    if let Some(nodes) = nodes {
        let rendered = nodes.iter().map(SchemaNode::to_value).collect();
        object.insert(key.to_string(), Value::Array(rendered));
    }
}

fn insert_count(object: &mut Map<String, Value>, key: &str, value: Option<usize>) {
    if let Some(value) = value {
        object.insert(key.to_string(), Value::from(value));
    }
}

fn insert_number(object: &mut Map<String, Value>, key: &str, value: Option<f64>) {
    if let Some(number) = value.and_then(serde_json::Number::from_f64) {
        object.insert(key.to_string(), Value::Number(number));
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for SchemaNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
