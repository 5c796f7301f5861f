//! Attribute specs and their resolution against feature properties
//!
//! Each feature gets a flat, ordered set of SVG attributes built from the
//! configured specs. Specs apply in order and a later spec overwrites an
//! earlier value of the same name (the name keeps its original position).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::geometry::Properties;

/// How one or more output attributes are derived
///
/// In configuration a spec is one of:
/// - a string, `"name"` or `"name newName"`;
/// - a table with `type = "static"` or `type = "dynamic"`;
/// - any other table, emitted verbatim in the order written.
///
/// A table with a `type` key must be a well-formed static or dynamic spec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum AttributeSpec {
    /// Always emit `property="value"`
    Static { property: String, value: String },
    /// Copy a feature property, renamed to `key` if given
    Dynamic {
        property: String,
        key: Option<String>,
    },
    /// Emit every pair verbatim, in order
    ObjectMap(Vec<(String, String)>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticFields {
    property: String,
    value: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DynamicFields {
    property: String,
    key: Option<String>,
}

impl TryFrom<Value> for AttributeSpec {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(s) => Ok(AttributeSpec::shorthand(&s)),
            Value::Object(mut map) => match map.remove("type") {
                Some(kind) => tagged(kind, map),
                None => Ok(AttributeSpec::ObjectMap(
                    map.into_iter().map(|(k, v)| (k, value_text(&v))).collect(),
                )),
            },
            other => Err(ConfigError::MalformedAttribute {
                reason: format!("expected a string or a table, found {}", other),
            }),
        }
    }
}

fn tagged(kind: Value, fields: Map<String, Value>) -> Result<AttributeSpec, ConfigError> {
    let malformed = |e: serde_json::Error| ConfigError::MalformedAttribute {
        reason: format!("{} attribute: {}", kind, e),
    };
    match kind.as_str() {
        Some("static") => {
            let f: StaticFields =
                serde_json::from_value(Value::Object(fields)).map_err(malformed)?;
            Ok(AttributeSpec::Static {
                property: f.property,
                value: value_text(&f.value),
            })
        }
        Some("dynamic") => {
            let f: DynamicFields =
                serde_json::from_value(Value::Object(fields)).map_err(malformed)?;
            Ok(AttributeSpec::Dynamic {
                property: f.property,
                key: f.key,
            })
        }
        _ => Err(ConfigError::MalformedAttribute {
            reason: format!("unknown attribute type {}, expected \"static\" or \"dynamic\"", kind),
        }),
    }
}

impl AttributeSpec {
    pub fn fixed(property: impl Into<String>, value: impl Into<String>) -> Self {
        AttributeSpec::Static {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn dynamic(property: impl Into<String>) -> Self {
        AttributeSpec::Dynamic {
            property: property.into(),
            key: None,
        }
    }

    pub fn renamed(property: impl Into<String>, key: impl Into<String>) -> Self {
        AttributeSpec::Dynamic {
            property: property.into(),
            key: Some(key.into()),
        }
    }

    /// Parse `"name"` or `"name newName"` into a dynamic spec
    pub fn shorthand(s: &str) -> Self {
        let mut parts = s.split_whitespace();
        let property = parts.next().unwrap_or_default().to_string();
        let key = parts.next().map(str::to_string);
        AttributeSpec::Dynamic { property, key }
    }

    /// Check the spec's shape; `position` is used in the error message
    pub fn validate(&self, position: usize) -> Result<(), ConfigError> {
        match self {
            AttributeSpec::Static { property, .. } => {
                if property.is_empty() {
                    return Err(ConfigError::EmptyProperty {
                        kind: "static",
                        position,
                    });
                }
                check_name(property)
            }
            AttributeSpec::Dynamic { property, key } => {
                if property.is_empty() {
                    return Err(ConfigError::EmptyProperty {
                        kind: "dynamic",
                        position,
                    });
                }
                check_name(key.as_deref().unwrap_or(property))
            }
            AttributeSpec::ObjectMap(pairs) => pairs.iter().try_for_each(|(k, _)| check_name(k)),
        }
    }
}

/// Validate a whole spec list before rendering
pub fn validate_specs(specs: &[AttributeSpec]) -> Result<(), ConfigError> {
    specs
        .iter()
        .enumerate()
        .try_for_each(|(i, spec)| spec.validate(i))
}

/// Resolved attributes for one feature, in first-insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; an overwritten name keeps its position
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Format as ` name="value"` pairs with escaped values
    pub fn to_svg(&self) -> String {
        self.0
            .iter()
            .map(|(n, v)| format!(r#" {}="{}""#, n, escape_xml(v)))
            .collect()
    }
}

/// Resolve specs against one feature's properties
pub fn resolve(specs: &[AttributeSpec], properties: &Properties) -> Attributes {
    let mut out = Attributes::new();
    for spec in specs {
        match spec {
            AttributeSpec::Static { property, value } => out.insert(property, value),
            AttributeSpec::Dynamic { property, key } => {
                // Absent or null properties are omitted
                if let Some(value) = lookup(properties, property).filter(|v| !v.is_null()) {
                    out.insert(key.as_deref().unwrap_or(property), value_text(value));
                }
            }
            AttributeSpec::ObjectMap(pairs) => {
                for (name, value) in pairs {
                    out.insert(name, value);
                }
            }
        }
    }
    out
}

/// Exact key first, then a dotted path into nested objects
fn lookup<'a>(properties: &'a Properties, property: &str) -> Option<&'a Value> {
    if let Some(value) = properties.get(property) {
        return Some(value);
    }
    let mut parts = property.split('.');
    let mut current = properties.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn check_name(name: &str) -> Result<(), ConfigError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '=' | '/' | '&'));
    if bad {
        Err(ConfigError::InvalidAttributeName {
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Escape special XML characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
