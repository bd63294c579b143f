//! Compiled validators
//!
//! A [`Validator`] is an immutable tree produced once per schema node. It
//! holds no interior mutability and is `Send + Sync`, so one instance can
//! check arguments for any number of concurrent tool calls.

use crate::validation::formats::matches_format;
use crate::validation::schema::StringFormat;
use crate::validation::{
    type_name, FieldPath, IssueKind, ValidationFailure, ValidationIssue,
};
use indexmap::IndexMap;
use fancy_regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// Constraints refining a string validator
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    /// Exact set of accepted strings; other rules are not applied when set
    pub allowed: Option<Vec<String>>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Source text and the anchored expression built from it
    pub pattern: Option<(String, Regex)>,
    pub format: Option<StringFormat>,
}

/// Constraints refining a numeric validator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberRules {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
}

/// Homogeneous array validator
#[derive(Debug, Clone)]
pub struct ArrayRules {
    /// `None` leaves elements unchecked
    pub items: Option<Box<Validator>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// Handling of object keys that the shape does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Accept and drop them from the output
    Strip,
    /// Accept and keep them unchecked
    #[default]
    Passthrough,
    /// Reject them
    Strict,
}

/// One declared member of an object shape
#[derive(Debug, Clone)]
pub struct ObjectField {
    pub validator: Validator,
    /// Whether the member may be absent
    pub optional: bool,
}

/// Fixed-shape object validator
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
    pub fields: IndexMap<String, ObjectField>,
    pub unknown_keys: UnknownKeys,
}

impl ObjectShape {
    /// Check an object against this shape without wrapping it in a [`Validator`]
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationFailure> {
        let mut issues = Vec::new();
        match check_object(self, value, &FieldPath::root(), &mut issues) {
            Some(output) if issues.is_empty() => Ok(output),
            _ => Err(ValidationFailure::new(issues)),
        }
    }
}

/// The closed set of validator variants
#[derive(Debug, Clone)]
pub enum ValidatorKind {
    String(StringRules),
    Number(NumberRules),
    Integer(NumberRules),
    Boolean,
    Null,
    Unknown,
    Literal(Value),
    Array(ArrayRules),
    Tuple(Vec<Validator>),
    Object(ObjectShape),
    Record(Box<Validator>),
    Union(Vec<Validator>),
    Intersection(Vec<Validator>),
    /// Additionally accepts `null`
    Nullable(Box<Validator>),
}

/// A compiled, reusable value checker
#[derive(Debug, Clone)]
pub struct Validator {
    kind: ValidatorKind,
    description: String,
}

impl Validator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self {
            kind,
            description: String::new(),
        }
    }

    /// Accepts any value, including an absent one
    pub fn unknown() -> Self {
        Self::new(ValidatorKind::Unknown)
    }

    pub fn literal(value: Value) -> Self {
        Self::new(ValidatorKind::Literal(value))
    }

    /// Object shape with every field required
    pub fn object(fields: IndexMap<String, Validator>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, validator)| {
                (
                    name,
                    ObjectField {
                        validator,
                        optional: false,
                    },
                )
            })
            .collect();
        Self::new(ValidatorKind::Object(ObjectShape {
            fields,
            unknown_keys: UnknownKeys::default(),
        }))
    }

    /// Wrap so that `null` is also accepted
    pub fn nullable(self) -> Self {
        let description = self.description.clone();
        Self {
            kind: ValidatorKind::Nullable(Box::new(self)),
            description,
        }
    }

    #[must_use]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Change the unknown-key policy of an object shape (no-op otherwise)
    #[must_use]
    pub fn with_unknown_keys(mut self, policy: UnknownKeys) -> Self {
        match &mut self.kind {
            ValidatorKind::Object(shape) => shape.unknown_keys = policy,
            ValidatorKind::Nullable(inner) => {
                let inner_validator = std::mem::replace(inner.as_mut(), Validator::unknown());
                **inner = inner_validator.with_unknown_keys(policy);
            }
            _ => {}
        }
        self
    }

    pub fn kind(&self) -> &ValidatorKind {
        &self.kind
    }

    /// The originating node's `description`, empty when it had none
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, ValidatorKind::Nullable(_))
    }

    /// Variant name, for diagnostics and introspection
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ValidatorKind::String(_) => "string",
            ValidatorKind::Number(_) => "number",
            ValidatorKind::Integer(_) => "integer",
            ValidatorKind::Boolean => "boolean",
            ValidatorKind::Null => "null",
            ValidatorKind::Unknown => "unknown",
            ValidatorKind::Literal(_) => "literal",
            ValidatorKind::Array(_) => "array",
            ValidatorKind::Tuple(_) => "tuple",
            ValidatorKind::Object(_) => "object",
            ValidatorKind::Record(_) => "record",
            ValidatorKind::Union(_) => "union",
            ValidatorKind::Intersection(_) => "intersection",
            ValidatorKind::Nullable(_) => "nullable",
        }
    }

    /// Check a present value and return the parsed output
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationFailure> {
        self.parse(Some(value))
    }

    /// Check a value that may be absent (`None`), which is distinct from `null`
    pub fn parse(&self, value: Option<&Value>) -> Result<Value, ValidationFailure> {
        let mut issues = Vec::new();
        let root = FieldPath::root();
        let output = match value {
            Some(value) => self.check(value, &root, &mut issues),
            None => self.check_absent(&root, &mut issues),
        };
        match output {
            Some(output) if issues.is_empty() => Ok(output),
            _ => Err(ValidationFailure::new(issues)),
        }
    }

    /// Whether `value` would be accepted
    pub fn accepts(&self, value: &Value) -> bool {
        let mut issues = Vec::new();
        self.check(value, &FieldPath::root(), &mut issues).is_some() && issues.is_empty()
    }

    /// Output for an absent value, or `None` after recording why it is rejected
    fn check_absent(&self, path: &FieldPath, issues: &mut Vec<ValidationIssue>) -> Option<Value> {
        if self.allows_absent() {
            return Some(Value::Null);
        }
        issues.push(ValidationIssue::new(
            path.clone(),
            IssueKind::MissingRequired,
        ));
        None
    }

    /// Whether an absent member satisfies this validator
    fn allows_absent(&self) -> bool {
        match &self.kind {
            ValidatorKind::Unknown => true,
            ValidatorKind::Nullable(inner) => inner.allows_absent(),
            _ => false,
        }
    }

    pub(crate) fn check(
        &self,
        value: &Value,
        path: &FieldPath,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<Value> {
        match &self.kind {
            ValidatorKind::String(rules) => check_string(rules, value, path, issues),
            ValidatorKind::Number(rules) => check_number(rules, false, value, path, issues),
            ValidatorKind::Integer(rules) => check_number(rules, true, value, path, issues),
            ValidatorKind::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                _ => invalid_type("boolean", value, path, issues),
            },
            ValidatorKind::Null => match value {
                Value::Null => Some(Value::Null),
                _ => invalid_type("null", value, path, issues),
            },
            ValidatorKind::Unknown => Some(value.clone()),
            ValidatorKind::Literal(expected) => {
                if json_equal(expected, value) {
                    Some(expected.clone())
                } else {
                    issues.push(ValidationIssue::new(
                        path.clone(),
                        IssueKind::LiteralMismatch {
                            expected: expected.clone(),
                        },
                    ));
                    None
                }
            }
            ValidatorKind::Array(rules) => check_array(rules, value, path, issues),
            ValidatorKind::Tuple(slots) => check_tuple(slots, value, path, issues),
            ValidatorKind::Object(shape) => check_object(shape, value, path, issues),
            ValidatorKind::Record(values) => check_record(values, value, path, issues),
            ValidatorKind::Union(branches) => check_union(branches, value, path, issues),
            ValidatorKind::Intersection(branches) => {
                check_intersection(branches, value, path, issues)
            }
            ValidatorKind::Nullable(inner) => {
                if value.is_null() {
                    Some(Value::Null)
                } else {
                    inner.check(value, path, issues)
                }
            }
        }
    }
}

fn invalid_type(
    expected: &str,
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    issues.push(ValidationIssue::new(
        path.clone(),
        IssueKind::InvalidType {
            expected: expected.to_string(),
            received: type_name(value).to_string(),
        },
    ));
    None
}

/// JSON equality that treats `42` and `42.0` as the same number
pub(crate) fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| json_equal(a, b)))
        }
        _ => left == right,
    }
}

fn check_string(
    rules: &StringRules,
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Value::String(text) = value else {
        return invalid_type("string", value, path, issues);
    };

    if let Some(allowed) = &rules.allowed {
        if allowed.iter().any(|option| option == text) {
            return Some(value.clone());
        }
        issues.push(ValidationIssue::new(
            path.clone(),
            IssueKind::EnumMismatch {
                allowed: allowed.iter().map(|s| Value::from(s.as_str())).collect(),
            },
        ));
        return None;
    }

    let before = issues.len();
    let length = text.chars().count();
    if let Some(minimum) = rules.min_length {
        if length < minimum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::StringTooShort { minimum },
            ));
        }
    }
    if let Some(maximum) = rules.max_length {
        if length > maximum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::StringTooLong { maximum },
            ));
        }
    }
    if let Some((source, regex)) = &rules.pattern {
        // a pattern that exhausts the backtrack limit counts as a mismatch
        let matched = regex.is_match(text).unwrap_or_else(|e| {
            debug!("Pattern '{}' could not be evaluated: {}", source, e);
            false
        });
        if !matched {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::PatternMismatch {
                    pattern: source.clone(),
                },
            ));
        }
    }
    if let Some(format) = &rules.format {
        if !matches_format(format, text) {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::FormatMismatch {
                    format: format.as_str().to_string(),
                },
            ));
        }
    }

    (issues.len() == before).then(|| value.clone())
}

fn check_number(
    rules: &NumberRules,
    integer: bool,
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Some(number) = value.as_f64() else {
        let expected = if integer { "integer" } else { "number" };
        return invalid_type(expected, value, path, issues);
    };

    let before = issues.len();
    if integer && number.fract() != 0.0 {
        issues.push(ValidationIssue::new(path.clone(), IssueKind::NotAnInteger));
    }
    if let Some(minimum) = rules.minimum {
        if number < minimum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::BelowMinimum {
                    minimum,
                    exclusive: false,
                },
            ));
        }
    }
    if let Some(maximum) = rules.maximum {
        if number > maximum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::AboveMaximum {
                    maximum,
                    exclusive: false,
                },
            ));
        }
    }
    if let Some(minimum) = rules.exclusive_minimum {
        if number <= minimum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::BelowMinimum {
                    minimum,
                    exclusive: true,
                },
            ));
        }
    }
    if let Some(maximum) = rules.exclusive_maximum {
        if number >= maximum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::AboveMaximum {
                    maximum,
                    exclusive: true,
                },
            ));
        }
    }

    (issues.len() == before).then(|| value.clone())
}

fn check_array(
    rules: &ArrayRules,
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Value::Array(elements) = value else {
        return invalid_type("array", value, path, issues);
    };

    let before = issues.len();
    if let Some(minimum) = rules.min_items {
        if elements.len() < minimum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::TooFewItems { minimum },
            ));
        }
    }
    if let Some(maximum) = rules.max_items {
        if elements.len() > maximum {
            issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::TooManyItems { maximum },
            ));
        }
    }

    let Some(items) = &rules.items else {
        return (issues.len() == before).then(|| value.clone());
    };

    let mut output = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        if let Some(parsed) = items.check(element, &path.index(index), issues) {
            output.push(parsed);
        }
    }
    (issues.len() == before).then_some(Value::Array(output))
}

fn check_tuple(
    slots: &[Validator],
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Value::Array(elements) = value else {
        return invalid_type("array", value, path, issues);
    };
    if elements.len() != slots.len() {
        issues.push(ValidationIssue::new(
            path.clone(),
            IssueKind::TupleArity {
                expected: slots.len(),
                received: elements.len(),
            },
        ));
        return None;
    }

    let before = issues.len();
    let output: Vec<Value> = slots
        .iter()
        .zip(elements)
        .enumerate()
        .filter_map(|(index, (slot, element))| {
            slot.check(element, &path.index(index), issues)
        })
        .collect();
    (issues.len() == before).then_some(Value::Array(output))
}

fn check_object(
    shape: &ObjectShape,
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Value::Object(members) = value else {
        return invalid_type("object", value, path, issues);
    };

    let before = issues.len();
    let mut output = Map::new();
    for (name, field) in &shape.fields {
        let field_path = path.key(name.as_str());
        match members.get(name) {
            Some(member) => {
                if let Some(parsed) = field.validator.check(member, &field_path, issues) {
                    output.insert(name.clone(), parsed);
                }
            }
            None if field.optional || field.validator.allows_absent() => {}
            None => issues.push(ValidationIssue::new(field_path, IssueKind::MissingRequired)),
        }
    }

    for (key, member) in members {
        if shape.fields.contains_key(key) {
            continue;
        }
        match shape.unknown_keys {
            UnknownKeys::Strip => debug!("Dropping undeclared key '{}' at {}", key, path),
            UnknownKeys::Passthrough => {
                output.insert(key.clone(), member.clone());
            }
            UnknownKeys::Strict => issues.push(ValidationIssue::new(
                path.clone(),
                IssueKind::UnrecognizedKey { key: key.clone() },
            )),
        }
    }

    (issues.len() == before).then_some(Value::Object(output))
}

fn check_record(
    values: &Validator,
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Value::Object(members) = value else {
        return invalid_type("object", value, path, issues);
    };

    let before = issues.len();
    let mut output = Map::new();
    for (key, member) in members {
        if let Some(parsed) = values.check(member, &path.key(key.as_str()), issues) {
            output.insert(key.clone(), parsed);
        }
    }
    (issues.len() == before).then_some(Value::Object(output))
}

// First branch that accepts wins; its output is the union's output.
fn check_union(
    branches: &[Validator],
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    for branch in branches {
        let mut scratch = Vec::new();
        if let Some(output) = branch.check(value, path, &mut scratch) {
            if scratch.is_empty() {
                return Some(output);
            }
        }
    }
    issues.push(ValidationIssue::new(
        path.clone(),
        IssueKind::NoMatchingBranch {
            branches: branches.len(),
        },
    ));
    None
}

// Every branch validates the whole value; outputs are merged.
fn check_intersection(
    branches: &[Validator],
    value: &Value,
    path: &FieldPath,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let before = issues.len();
    let outputs: Vec<Value> = branches
        .iter()
        .filter_map(|branch| branch.check(value, path, issues))
        .collect();
    if issues.len() != before || outputs.len() != branches.len() {
        return None;
    }

    let mut outputs = outputs.into_iter();
    let first = outputs.next().unwrap_or_else(|| value.clone());
    let merged = outputs.try_fold(first, merge_values);
    if merged.is_none() {
        issues.push(ValidationIssue::new(
            path.clone(),
            IssueKind::UnmergeableIntersection,
        ));
    }
    merged
}

/// Combine two branch outputs: objects by key union, arrays elementwise
fn merge_values(left: Value, right: Value) -> Option<Value> {
    match (left, right) {
        (Value::Object(mut left), Value::Object(right)) => {
            for (key, right_value) in right {
                let merged = match left.remove(&key) {
                    Some(left_value) => merge_values(left_value, right_value)?,
                    None => right_value,
                };
                left.insert(key, merged);
            }
            Some(Value::Object(left))
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return None;
            }
            left.into_iter()
                .zip(right)
                .map(|(l, r)| merge_values(l, r))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
        }
        (left, right) if json_equal(&left, &right) => Some(left),
        _ => None,
    }
}
