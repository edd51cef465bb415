//! Declarative attribute schemas for lookup resource types.
//!
//! A [`Schema`] describes every attribute a resource type accepts or
//! produces: its value type and whether the caller must set it, may set it,
//! or only reads it back. Lookups validate their input parameters against the
//! schema before touching the remote service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ProviderError;

/// Value type of a schema attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Float,
    Bool,
    /// Ordered list of strings.
    StringList,
}

impl AttributeType {
    /// Whether `value` is a JSON value of this type.
    fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(serde_json::Value::is_string)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::StringList => "list(string)",
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be set by the caller.
    Required,
    /// May be set by the caller; never filled in by the lookup.
    Optional,
    /// Filled in by the lookup; the caller cannot set it.
    Computed,
    /// May be set by the caller as a filter, and is filled in by the lookup.
    OptionalComputed,
}

impl AttributeMode {
    /// Whether the caller is allowed to supply this attribute.
    pub fn is_settable(self) -> bool {
        !matches!(self, Self::Computed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Computed => "computed",
            Self::OptionalComputed => "optional+computed",
        }
    }
}

/// A single attribute in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub mode: AttributeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    pub fn new(attribute_type: AttributeType, mode: AttributeMode) -> Self {
        Self {
            attribute_type,
            mode,
            description: None,
        }
    }

    pub fn required(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::Required)
    }

    pub fn optional(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::Optional)
    }

    pub fn computed(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::Computed)
    }

    pub fn optional_computed(attribute_type: AttributeType) -> Self {
        Self::new(attribute_type, AttributeMode::OptionalComputed)
    }

    /// Attach a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Errors produced by [`Schema::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("lookup parameters must be a JSON object")]
    NotAnObject,

    #[error("missing required attribute '{0}'")]
    MissingRequired(String),

    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("attribute '{0}' is computed and cannot be set")]
    ComputedOnly(String),

    #[error("attribute '{name}' must be of type {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

impl From<SchemaError> for ProviderError {
    fn from(err: SchemaError) -> Self {
        ProviderError::Configuration(err.to_string())
    }
}

/// Attribute schema of a resource type, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Check caller-supplied parameters against the schema.
    ///
    /// `null` values are treated as unset. Attributes are checked in name
    /// order, so the first reported error is deterministic.
    pub fn validate(&self, params: &serde_json::Value) -> Result<(), SchemaError> {
        let empty = serde_json::Map::new();
        let object = match params {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => &empty,
            _ => return Err(SchemaError::NotAnObject),
        };

        let mut supplied: Vec<_> = object.iter().filter(|(_, v)| !v.is_null()).collect();
        supplied.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (name, value) in supplied {
            let attribute = self
                .attributes
                .get(name)
                .ok_or_else(|| SchemaError::UnknownAttribute(name.clone()))?;
            if !attribute.mode.is_settable() {
                return Err(SchemaError::ComputedOnly(name.clone()));
            }
            if !attribute.attribute_type.accepts(value) {
                return Err(SchemaError::TypeMismatch {
                    name: name.clone(),
                    expected: attribute.attribute_type.as_str(),
                });
            }
        }

        for (name, attribute) in &self.attributes {
            if attribute.mode == AttributeMode::Required
                && object.get(name).is_none_or(serde_json::Value::is_null)
            {
                return Err(SchemaError::MissingRequired(name.clone()));
            }
        }

        Ok(())
    }
}
