//! Tool argument validation
//!
//! This module turns the JSON-Schema-like descriptors attached to hub tools
//! into reusable validators and reports every rejected value with the path
//! of the offending field and the constraint it violated.

pub mod compiler;
pub mod formats;
pub mod schema;
pub mod shape;
pub mod validator;

pub use compiler::{compile_schema, SchemaCompiler};
pub use schema::{NodeKind, SchemaNode, SchemaType, StringFormat};
pub use shape::{infer_shape, infer_shape_from_value, infer_shape_with, Shape, ShapeField};
pub use validator::{
    ArrayRules, NumberRules, ObjectField, ObjectShape, StringRules, UnknownKeys, Validator,
    ValidatorKind,
};

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One step into a nested value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object member
    Key(String),
    /// Array or tuple element
    Index(usize),
}

/// Location of a value inside the validated input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Path of the value handed to the validator
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of an object member below this one
    pub fn key<S: Into<String>>(&self, key: S) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Path of an array element below this one
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Constraint a value failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    /// Wrong runtime type
    InvalidType { expected: String, received: String },
    /// Required value or field is absent
    MissingRequired,
    /// Value differs from the declared constant
    LiteralMismatch { expected: Value },
    /// Value is not one of the enumerated options
    EnumMismatch { allowed: Vec<Value> },
    /// String shorter than `minLength`
    StringTooShort { minimum: usize },
    /// String longer than `maxLength`
    StringTooLong { maximum: usize },
    /// Array shorter than `minItems`
    TooFewItems { minimum: usize },
    /// Array longer than `maxItems`
    TooManyItems { maximum: usize },
    /// Number below `minimum` / at or below `exclusiveMinimum`
    BelowMinimum { minimum: f64, exclusive: bool },
    /// Number above `maximum` / at or above `exclusiveMaximum`
    AboveMaximum { maximum: f64, exclusive: bool },
    /// Number has a fractional part
    NotAnInteger,
    /// String does not match `pattern`
    PatternMismatch { pattern: String },
    /// String does not match `format`
    FormatMismatch { format: String },
    /// Tuple of the wrong length
    TupleArity { expected: usize, received: usize },
    /// Key not declared by a strict object shape
    UnrecognizedKey { key: String },
    /// No `anyOf`/`oneOf` branch accepted the value
    NoMatchingBranch { branches: usize },
    /// `allOf` branches produced outputs that cannot be merged
    UnmergeableIntersection,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::InvalidType { expected, received } => {
                write!(f, "expected {expected}, received {received}")
            }
            IssueKind::MissingRequired => write!(f, "required value is missing"),
            IssueKind::LiteralMismatch { expected } => write!(f, "expected literal {expected}"),
            IssueKind::EnumMismatch { allowed } => {
                let options: Vec<String> = allowed.iter().map(Value::to_string).collect();
                write!(f, "must be one of: {}", options.join(", "))
            }
            IssueKind::StringTooShort { minimum } => {
                write!(f, "must be at least {minimum} characters long")
            }
            IssueKind::StringTooLong { maximum } => {
                write!(f, "must be at most {maximum} characters long")
            }
            IssueKind::TooFewItems { minimum } => write!(f, "must have at least {minimum} items"),
            IssueKind::TooManyItems { maximum } => write!(f, "must have at most {maximum} items"),
            IssueKind::BelowMinimum { minimum, exclusive } => {
                if *exclusive {
                    write!(f, "must be greater than {minimum}")
                } else {
                    write!(f, "must be at least {minimum}")
                }
            }
            IssueKind::AboveMaximum { maximum, exclusive } => {
                if *exclusive {
                    write!(f, "must be less than {maximum}")
                } else {
                    write!(f, "must be at most {maximum}")
                }
            }
            IssueKind::NotAnInteger => write!(f, "expected integer, received float"),
            IssueKind::PatternMismatch { pattern } => write!(f, "must match pattern {pattern}"),
            IssueKind::FormatMismatch { format } => write!(f, "invalid {format}"),
            IssueKind::TupleArity { expected, received } => {
                write!(f, "expected tuple of {expected} items, received {received}")
            }
            IssueKind::UnrecognizedKey { key } => write!(f, "unrecognized key '{key}'"),
            IssueKind::NoMatchingBranch { branches } => {
                write!(f, "value matched none of the {branches} union branches")
            }
            IssueKind::UnmergeableIntersection => {
                write!(f, "intersection branches produced incompatible values")
            }
        }
    }
}

/// A single rejected constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Where in the input the problem is
    pub path: FieldPath,
    /// What went wrong
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: FieldPath, kind: IssueKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Rejection produced by a compiled validator
///
/// Always carries at least one issue.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{}", render_issues(.issues))]
pub struct ValidationFailure {
    issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
    rendered.join("; ")
}

impl ValidationFailure {
    pub(crate) fn new(issues: Vec<ValidationIssue>) -> Self {
        debug_assert!(!issues.is_empty());
        Self { issues }
    }

    /// Failure with exactly one issue
    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// Whether any issue sits exactly at `path`
    pub fn has_issue_at(&self, path: &FieldPath) -> bool {
        self.issues.iter().any(|issue| &issue.path == path)
    }
}

/// Short runtime type name used in `InvalidType` issues
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
