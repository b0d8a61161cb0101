use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One step into a JSON document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a field inside a validated payload.
///
/// Renders as `columns[1].type`; the document root renders as `$`. Keys that
/// would read as path syntax are written as quoted brackets: `meta["x.y"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

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
            return write!(f, "$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quoting(key) => {
                    let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                    write!(f, "[{}]", quoted)?
                }
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key == "$" || key.contains(['.', '[', ']', '"', '\\'])
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent.
    Required,
    InvalidType {
        expected: String,
        received: String,
    },
    /// A string outside a closed literal set.
    InvalidEnumValue {
        options: Vec<String>,
        received: String,
    },
    /// Only reported when unknown keys are rejected.
    UnrecognizedKey,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Required => write!(f, "Required"),
            IssueKind::InvalidType { expected, received } => {
                write!(f, "Expected {}, received {}", expected, received)
            }
            IssueKind::InvalidEnumValue { options, received } => {
                write!(
                    f,
                    "Invalid enum value. Expected {}, received '{}'",
                    quoted_options(options),
                    received
                )
            }
            IssueKind::UnrecognizedKey => write!(f, "Unrecognized key"),
        }
    }
}

fn quoted_options(options: &[String]) -> String {
    options
        .iter()
        .map(|option| format!("'{}'", option))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: FieldPath,
    #[serde(flatten)]
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(path: FieldPath, kind: IssueKind) -> Self {
        let message = kind.to_string();
        Self { path, kind, message }
    }

    pub fn required(path: FieldPath) -> Self {
        Self::new(path, IssueKind::Required)
    }

    pub fn invalid_type(path: FieldPath, expected: impl Into<String>, received: &Value) -> Self {
        Self::new(
            path,
            IssueKind::InvalidType {
                expected: expected.into(),
                received: json_type_name(received).to_string(),
            },
        )
    }

    pub fn invalid_enum_value(path: FieldPath, options: &[&str], received: &str) -> Self {
        Self::new(
            path,
            IssueKind::InvalidEnumValue {
                options: options.iter().map(|option| option.to_string()).collect(),
                received: received.to_string(),
            },
        )
    }

    pub fn unrecognized_key(path: FieldPath) -> Self {
        Self::new(path, IssueKind::UnrecognizedKey)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A payload did not conform to its declared shape.
///
/// Carries every offending field, not just the first one found.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid {shape} payload: {}", summarize(.issues))]
pub struct ValidationError {
    pub shape: &'static str,
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(shape: &'static str, issues: Vec<Issue>) -> Self {
        Self { shape, issues }
    }

    /// Issue recorded for the field at `path`, if any.
    pub fn issue_at(&self, path: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.path.to_string() == path)
    }

    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issue_at(path).is_some()
    }
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
