//! Parameter descriptors and request values.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use nimbus_core::{CommandError, CommandResult};

/// Wire date format for `DATE` parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Boolean,
    /// `yyyy-MM-dd`.
    Date,
    Float,
    Integer,
    Short,
    Long,
    String,
    /// Comma-separated or repeated values, each coerced to the element kind.
    List(&'static ParamKind),
}

impl ParamKind {
    pub fn name(&self) -> String {
        match self {
            ParamKind::Boolean => "BOOLEAN".to_string(),
            ParamKind::Date => "DATE".to_string(),
            ParamKind::Float => "FLOAT".to_string(),
            ParamKind::Integer => "INTEGER".to_string(),
            ParamKind::Short => "SHORT".to_string(),
            ParamKind::Long => "LONG".to_string(),
            ParamKind::String => "STRING".to_string(),
            ParamKind::List(inner) => format!("LIST<{}>", inner.name()),
        }
    }
}

impl core::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Declares one named, typed input of a command.
///
/// Descriptors live in static tables and are shared read-only by every
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
    /// Value is redacted from logs and debug output.
    pub sensitive: bool,
}

impl ParamDescriptor {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
            sensitive: false,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
            sensitive: false,
        }
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// A raw request value before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

impl RawValue {
    /// Display form used in coercion errors.
    pub fn display(&self) -> String {
        match self {
            RawValue::Single(s) => s.clone(),
            RawValue::Many(values) => values.join(","),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Single(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::Many(values)
    }
}

/// Request parameters as received, keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    values: BTreeMap<String, RawValue>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<RawValue>) {
        self.values
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from a flat JSON object. Scalars become single values, arrays of
    /// scalars become repeated values and `null` entries are dropped. Keys that
    /// collide once lower-cased are rejected.
    pub fn from_json(value: &JsonValue) -> CommandResult<Self> {
        let JsonValue::Object(map) = value else {
            return Err(CommandError::coercion("<request>", "OBJECT", value.to_string()));
        };

        let mut params = RawParams::new();
        for (key, v) in map {
            if !v.is_null() && params.values.contains_key(&key.to_ascii_lowercase()) {
                return Err(CommandError::coercion(key, "UNIQUE NAME", v.to_string()));
            }
            match v {
                JsonValue::Null => {}
                JsonValue::Array(items) => {
                    let many = items
                        .iter()
                        .map(|item| scalar_to_string(key, item))
                        .collect::<CommandResult<Vec<_>>>()?;
                    params.insert(key, RawValue::Many(many));
                }
                other => {
                    let single = scalar_to_string(key, other)?;
                    params.insert(key, RawValue::Single(single));
                }
            }
        }
        Ok(params)
    }
}

fn scalar_to_string(key: &str, value: &JsonValue) -> CommandResult<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(CommandError::coercion(key, "SCALAR", other.to_string())),
    }
}

/// A parameter value after coercion to its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Boolean(bool),
    Date(NaiveDate),
    Float(f32),
    Integer(i32),
    Short(i16),
    Long(i64),
    String(String),
    List(Vec<BoundValue>),
}

impl core::fmt::Display for BoundValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoundValue::Boolean(b) => write!(f, "{b}"),
            BoundValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            BoundValue::Float(x) => write!(f, "{x}"),
            BoundValue::Integer(n) => write!(f, "{n}"),
            BoundValue::Short(n) => write!(f, "{n}"),
            BoundValue::Long(n) => write!(f, "{n}"),
            BoundValue::String(s) => f.write_str(s),
            BoundValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Coerce one raw value to `kind`. Strict: no trimming, no truncation.
pub fn coerce(name: &str, kind: ParamKind, raw: &RawValue) -> CommandResult<BoundValue> {
    match (kind, raw) {
        (ParamKind::List(inner), RawValue::Single(s)) => {
            if s.is_empty() {
                return Ok(BoundValue::List(vec![]));
            }
            s.split(',')
                .map(|part| coerce_scalar(name, kind, *inner, part))
                .collect::<CommandResult<Vec<_>>>()
                .map(BoundValue::List)
        }
        (ParamKind::List(inner), RawValue::Many(values)) => values
            .iter()
            .map(|part| coerce_scalar(name, kind, *inner, part))
            .collect::<CommandResult<Vec<_>>>()
            .map(BoundValue::List),
        (_, RawValue::Many(_)) => Err(CommandError::coercion(name, kind.name(), raw.display())),
        (_, RawValue::Single(s)) => coerce_scalar(name, kind, kind, s),
    }
}

fn coerce_scalar(
    name: &str,
    declared: ParamKind,
    kind: ParamKind,
    raw: &str,
) -> CommandResult<BoundValue> {
    let fail = || CommandError::coercion(name, declared.name(), raw);
    match kind {
        ParamKind::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(BoundValue::Boolean(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(BoundValue::Boolean(false))
            } else {
                Err(fail())
            }
        }
        ParamKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(BoundValue::Date)
            .map_err(|_| fail()),
        ParamKind::Float => match raw.parse::<f32>() {
            Ok(x) if x.is_finite() => Ok(BoundValue::Float(x)),
            _ => Err(fail()),
        },
        ParamKind::Integer => raw.parse::<i32>().map(BoundValue::Integer).map_err(|_| fail()),
        ParamKind::Short => raw.parse::<i16>().map(BoundValue::Short).map_err(|_| fail()),
        ParamKind::Long => raw.parse::<i64>().map(BoundValue::Long).map_err(|_| fail()),
        ParamKind::String => Ok(BoundValue::String(raw.to_string())),
        // Nested lists are not part of the wire format.
        ParamKind::List(_) => Err(fail()),
    }
}
