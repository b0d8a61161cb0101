//! Field reader over `serde_json::Value` documents.
//!
//! Validation never stops at the first bad field: every reader records its
//! issues into a shared [`Checker`] and returns `None`, and the caller
//! assembles the typed value only once all fields have been read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::error::{FieldPath, Issue, ValidationError};

/// A row of tabular data or any other open-ended string-keyed mapping.
pub type Record = Map<String, Value>;

/// What to do with keys a shape does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Drop them from the validated value.
    #[default]
    Strip,
    /// Report each one as an issue.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub unknown_keys: UnknownKeys,
}

impl ValidationOptions {
    pub fn rejecting_unknown_keys() -> Self {
        Self {
            unknown_keys: UnknownKeys::Reject,
        }
    }
}

/// A shape that can be validated from an arbitrary JSON value.
pub trait Validate: Sized {
    /// Registry name of the shape, e.g. `insert-query`.
    const SHAPE: &'static str;

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError>;

    fn validate(value: &Value) -> Result<Self, ValidationError> {
        Self::validate_with(value, &ValidationOptions::default())
    }
}

/// Issue accumulator for one validation call.
pub(crate) struct Checker<'o> {
    shape: &'static str,
    options: &'o ValidationOptions,
    issues: Vec<Issue>,
}

impl<'o> Checker<'o> {
    pub(crate) fn new(shape: &'static str, options: &'o ValidationOptions) -> Self {
        Self {
            shape,
            options,
            issues: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Reads a string that must be one of `literals`.
    pub(crate) fn literal<'v>(
        &mut self,
        value: &'v Value,
        path: &FieldPath,
        literals: &[&str],
    ) -> Option<&'v str> {
        match value {
            Value::String(s) if literals.contains(&s.as_str()) => Some(s.as_str()),
            Value::String(s) => {
                self.push(Issue::invalid_enum_value(path.clone(), literals, s));
                None
            }
            other => {
                let expected = literals
                    .iter()
                    .map(|literal| format!("'{}'", literal))
                    .collect::<Vec<_>>()
                    .join(" | ");
                self.push(Issue::invalid_type(path.clone(), expected, other));
                None
            }
        }
    }

    /// Returns `value` if no issue was recorded, otherwise every issue.
    ///
    /// Readers only yield `None` after recording an issue, so a `None` here
    /// always comes with a non-empty issue list.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ => Err(ValidationError::new(self.shape, self.issues)),
        }
    }
}

/// A value that can be read out of a JSON field.
pub(crate) trait FieldValue: Sized {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self>;
}

impl FieldValue for String {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                cx.push(Issue::invalid_type(path.clone(), "string", other));
                None
            }
        }
    }
}

impl FieldValue for Number {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        match value {
            Value::Number(n) => Some(n.clone()),
            other => {
                cx.push(Issue::invalid_type(path.clone(), "number", other));
                None
            }
        }
    }
}

impl FieldValue for bool {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                cx.push(Issue::invalid_type(path.clone(), "boolean", other));
                None
            }
        }
    }
}

// Values inside a record are unconstrained.
impl FieldValue for Record {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.clone()),
            other => {
                cx.push(Issue::invalid_type(path.clone(), "object", other));
                None
            }
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        let Value::Array(items) = value else {
            cx.push(Issue::invalid_type(path.clone(), "array", value));
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        let mut complete = true;
        for (i, item) in items.iter().enumerate() {
            match T::read(item, &path.index(i), cx) {
                Some(v) => out.push(v),
                None => complete = false,
            }
        }

        complete.then_some(out)
    }
}

/// Reads the declared fields of one JSON object.
pub(crate) struct Fields<'v> {
    map: &'v Record,
    path: FieldPath,
    declared: Vec<&'static str>,
}

impl<'v> Fields<'v> {
    pub(crate) fn open(value: &'v Value, path: FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                map,
                path,
                declared: Vec::new(),
            }),
            other => {
                cx.push(Issue::invalid_type(path, "object", other));
                None
            }
        }
    }

    pub(crate) fn required<T: FieldValue>(&mut self, cx: &mut Checker<'_>, key: &'static str) -> Option<T> {
        self.declared.push(key);
        let path = self.path.key(key);
        match self.map.get(key) {
            Some(value) => T::read(value, &path, cx),
            None => {
                cx.push(Issue::required(path));
                None
            }
        }
    }

    /// `Some(None)` when absent, `None` when present but invalid.
    pub(crate) fn optional<T: FieldValue>(
        &mut self,
        cx: &mut Checker<'_>,
        key: &'static str,
    ) -> Option<Option<T>> {
        self.declared.push(key);
        match self.map.get(key) {
            Some(value) => T::read(value, &self.path.key(key), cx).map(Some),
            None => Some(None),
        }
    }

    pub(crate) fn with_default<T: FieldValue>(
        &mut self,
        cx: &mut Checker<'_>,
        key: &'static str,
        default: T,
    ) -> Option<T> {
        self.optional(cx, key).map(|value| value.unwrap_or(default))
    }

    /// Server-assigned keys: accepted in the input, never carried to the output.
    pub(crate) fn strip(&mut self, keys: &[&'static str]) {
        self.declared.extend_from_slice(keys);
    }

    /// Applies the unknown-key policy to everything not read so far.
    pub(crate) fn close(self, cx: &mut Checker<'_>) {
        if cx.options.unknown_keys == UnknownKeys::Strip {
            return;
        }
        for key in self.map.keys() {
            if !self.declared.contains(&key.as_str()) {
                cx.push(Issue::unrecognized_key(self.path.key(key)));
            }
        }
    }
}

/// Validates `value` as the object shape `T` using `read` for its fields.
pub(crate) fn validate_object<T>(
    shape: &'static str,
    value: &Value,
    options: &ValidationOptions,
    read: impl FnOnce(&mut Fields<'_>, &mut Checker<'_>) -> Option<T>,
) -> Result<T, ValidationError> {
    let mut cx = Checker::new(shape, options);
    let built = match Fields::open(value, FieldPath::root(), &mut cx) {
        Some(mut fields) => {
            let built = read(&mut fields, &mut cx);
            fields.close(&mut cx);
            built
        }
        None => None,
    };
    cx.finish(built)
}

/// Declares a closed set of string literals as a Rust enum that serializes
/// to, and validates from, exactly those literals.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $($(#[$vmeta])* #[serde(rename = $literal)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const LITERALS: &'static [&'static str] = &[$($literal),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }

            pub fn from_literal(literal: &str) -> Option<Self> {
                match literal {
                    $($literal => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::schema::validator::FieldValue for $name {
            fn read(
                value: &serde_json::Value,
                path: &$crate::schema::error::FieldPath,
                cx: &mut $crate::schema::validator::Checker<'_>,
            ) -> Option<Self> {
                cx.literal(value, path, Self::LITERALS)
                    .and_then(Self::from_literal)
            }
        }
    };
}

pub(crate) use closed_set;
