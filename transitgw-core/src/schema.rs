//! Schema - Attribute types and per-resource schemas
//!
//! A provider describes each resource type with a [`ResourceSchema`]. The
//! schema is checked before any remote call so that malformed configuration
//! never reaches the controller.

use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    String,
    Int,
    Bool,
    /// String restricted to a fixed set of values
    Enum(Vec<String>),
    /// A base type narrowed by a validation function
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
}

impl AttributeType {
    /// Check that `value` has this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_))
            | (AttributeType::Int, Value::Int(_))
            | (AttributeType::Bool, Value::Bool(_)) => Ok(()),
            (AttributeType::Enum(allowed), Value::String(s)) => {
                if allowed.contains(s) {
                    Ok(())
                } else {
                    Err(TypeError::NotAllowed {
                        value: s.clone(),
                        allowed: allowed.clone(),
                    })
                }
            }
            (AttributeType::Custom { base, validate, .. }, v) => {
                base.validate(v)?;
                validate(v).map_err(TypeError::Invalid)
            }
            (AttributeType::List(item_type), Value::List(items)) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| {
                    item_type.validate(item).map_err(|e| TypeError::Element {
                        position: format!("[{}]", index),
                        inner: Box::new(e),
                    })
                }),
            (AttributeType::Map(value_type), Value::Map(entries)) => {
                entries.iter().try_for_each(|(key, item)| {
                    value_type.validate(item).map_err(|e| TypeError::Element {
                        position: format!("[\"{}\"]", key),
                        inner: Box::new(e),
                    })
                })
            }
            (expected, got) => Err(TypeError::Mismatch {
                expected: expected.to_string(),
                got: kind_of(got),
            }),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => f.write_str("string"),
            AttributeType::Int => f.write_str("int"),
            AttributeType::Bool => f.write_str("bool"),
            AttributeType::Enum(allowed) => write!(f, "one of {}", allowed.join("|")),
            AttributeType::Custom { name, .. } => f.write_str(name),
            AttributeType::List(item_type) => write!(f, "list of {}", item_type),
            AttributeType::Map(value_type) => write!(f, "map of {}", value_type),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Int(_) => "int",
        Value::Bool(_) => "bool",
        Value::List(_) => "list",
        Value::Map(_) => "map",
    }
}

/// Why an attribute value was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("expected {expected}, got {got}")]
    Mismatch { expected: String, got: &'static str },

    #[error("'{value}' is not one of {}", allowed.join(", "))]
    NotAllowed { value: String, allowed: Vec<String> },

    #[error("{0}")]
    Invalid(String),

    #[error("missing required attribute '{name}'")]
    MissingRequired { name: String },

    #[error("{name}: {inner}")]
    Attribute { name: String, inner: Box<TypeError> },

    #[error("element {position}: {inner}")]
    Element {
        position: String,
        inner: Box<TypeError>,
    },
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Cannot change once the resource exists
    pub immutable: bool,
    /// Filled in by the controller when left empty
    pub computed: bool,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            default: None,
            description: None,
            immutable: false,
            computed: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Validate an attribute map, reporting every problem sorted by attribute
    ///
    /// Attributes the schema does not know are ignored.
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let missing = self
            .attributes
            .values()
            .filter(|a| a.required && a.default.is_none() && !attributes.contains_key(&a.name))
            .map(|a| (a.name.as_str(), TypeError::MissingRequired { name: a.name.clone() }));

        let mistyped = attributes.iter().filter_map(|(name, value)| {
            let schema = self.attributes.get(name)?;
            let inner = schema.attr_type.validate(value).err()?;
            Some((
                name.as_str(),
                TypeError::Attribute {
                    name: name.clone(),
                    inner: Box::new(inner),
                },
            ))
        });

        let mut errors: Vec<(&str, TypeError)> = missing.chain(mistyped).collect();
        if errors.is_empty() {
            return Ok(());
        }
        errors.sort_by(|a, b| a.0.cmp(b.0));
        Err(errors.into_iter().map(|(_, e)| e).collect())
    }

    /// Attribute map with schema defaults filled in where absent
    pub fn apply_defaults(&self, attributes: &HashMap<String, Value>) -> HashMap<String, Value> {
        let mut merged = attributes.clone();
        for schema in self.attributes.values() {
            if let Some(default) = &schema.default {
                merged
                    .entry(schema.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        merged
    }

    /// Names of attributes that cannot change after creation, sorted
    pub fn immutable_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attributes
            .values()
            .filter(|a| a.immutable)
            .map(|a| a.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn is_immutable(&self, name: &str) -> bool {
        self.attributes.get(name).is_some_and(|a| a.immutable)
    }
}

/// Commonly used custom types
pub mod types {
    use super::*;

    /// String with at least one non-whitespace character
    pub fn non_empty_string() -> AttributeType {
        AttributeType::Custom {
            name: "non-empty string".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| match value.as_str() {
                Some(s) if s.trim().is_empty() => Err("must not be empty".to_string()),
                _ => Ok(()),
            },
        }
    }

    /// IPv4 CIDR block, e.g. "10.0.0.0/24"
    pub fn cidr() -> AttributeType {
        AttributeType::Custom {
            name: "CIDR".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| value.as_str().map_or(Ok(()), validate_cidr),
        }
    }
}

/// Check an IPv4 CIDR block such as "10.0.0.0/24"
pub fn validate_cidr(cidr: &str) -> Result<(), String> {
    let (address, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| format!("'{}' is not a CIDR block: missing prefix length", cidr))?;

    address
        .parse::<Ipv4Addr>()
        .map_err(|_| format!("'{}' is not a CIDR block: bad address '{}'", cidr, address))?;

    match prefix.parse::<u8>() {
        Ok(bits) if bits <= 32 => Ok(()),
        _ => Err(format!(
            "'{}' is not a CIDR block: prefix length must be 0-32",
            cidr
        )),
    }
}
