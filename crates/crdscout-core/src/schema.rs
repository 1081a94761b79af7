//! Declarative attribute trees
//!
//! Each data source declares its field structure once, at construction, as a
//! `Schema`: an ordered map of named, typed attributes with requiredness and
//! validators. Schemas are pure data; the only behavior is `validate`, which
//! walks a configuration value against the declared tree.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::validators::Validator;

/// Type of a single attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Bool,
    Int64,
    Float64,
    /// Map of string keys to string values
    Map,
    /// Homogeneous list of the given element type
    List(Box<AttributeType>),
    /// Nested object with its own attribute tree
    Object(IndexMap<String, Attribute>),
}

/// Whether an attribute is supplied by the caller or produced by the read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    Required,
    Optional,
    /// Populated by the provider, never supplied in configuration
    Computed,
}

/// A single named field in a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub attr_type: AttributeType,
    pub mode: AttributeMode,
    pub description: String,
    pub validators: Vec<Validator>,
}

impl Attribute {
    pub fn new(attr_type: AttributeType, mode: AttributeMode) -> Self {
        Self {
            attr_type,
            mode,
            description: String::new(),
            validators: Vec::new(),
        }
    }

    pub fn required(attr_type: AttributeType) -> Self {
        Self::new(attr_type, AttributeMode::Required)
    }

    pub fn optional(attr_type: AttributeType) -> Self {
        Self::new(attr_type, AttributeMode::Optional)
    }

    pub fn computed(attr_type: AttributeType) -> Self {
        Self::new(attr_type, AttributeMode::Computed)
    }

    pub fn required_string() -> Self {
        Self::required(AttributeType::String)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttributeType::String)
    }

    pub fn computed_string() -> Self {
        Self::computed(AttributeType::String)
    }

    pub fn optional_bool() -> Self {
        Self::optional(AttributeType::Bool)
    }

    pub fn optional_int64() -> Self {
        Self::optional(AttributeType::Int64)
    }

    pub fn optional_string_list() -> Self {
        Self::optional(AttributeType::List(Box::new(AttributeType::String)))
    }

    pub fn optional_map() -> Self {
        Self::optional(AttributeType::Map)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Nested attributes, if this is an object attribute
    pub fn nested(&self) -> Option<&IndexMap<String, Attribute>> {
        match &self.attr_type {
            AttributeType::Object(attrs) => Some(attrs),
            _ => None,
        }
    }
}

/// Helper for building nested object attributes
pub fn object(attrs: impl IntoIterator<Item = (&'static str, Attribute)>) -> AttributeType {
    AttributeType::Object(
        attrs
            .into_iter()
            .map(|(name, attr)| (name.to_string(), attr))
            .collect(),
    )
}

/// Declarative field tree of a data source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub description: String,
    pub attributes: IndexMap<String, Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validate a configuration value against the declared tree
    ///
    /// Checks requiredness and runs every attribute's validators, recursing
    /// into nested objects and lists of objects. Unknown keys are ignored;
    /// the host framework rejects those before the value reaches us.
    pub fn validate(&self, config: &JsonValue) -> Diagnostics {
        let mut diags = Diagnostics::new();
        validate_attributes(&self.attributes, config, "", &mut diags);
        diags
    }
}

fn validate_attributes(
    attributes: &IndexMap<String, Attribute>,
    value: &JsonValue,
    prefix: &str,
    diags: &mut Diagnostics,
) {
    let Some(map) = value.as_object() else {
        diags.push(
            Diagnostic::error(
                "Invalid configuration",
                "expected an object of attribute values",
            )
            .with_attribute(if prefix.is_empty() { "<root>" } else { prefix }),
        );
        return;
    };

    for (name, attribute) in attributes {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        let entry = map.get(name).filter(|v| !v.is_null());
        match entry {
            None => {
                if attribute.mode == AttributeMode::Required {
                    diags.push(
                        Diagnostic::error(
                            "Missing required attribute",
                            format!("attribute '{}' must be set", path),
                        )
                        .with_attribute(path),
                    );
                }
            }
            Some(value) => {
                for validator in &attribute.validators {
                    if let Some(diag) = validator.check(&path, value) {
                        diags.push(diag);
                    }
                }
                match &attribute.attr_type {
                    AttributeType::Object(nested) => {
                        validate_attributes(nested, value, &path, diags);
                    }
                    AttributeType::List(element) => {
                        if let (AttributeType::Object(nested), Some(items)) =
                            (element.as_ref(), value.as_array())
                        {
                            for (index, item) in items.iter().enumerate() {
                                let item_path = format!("{}[{}]", path, index);
                                validate_attributes(nested, item, &item_path, diags);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}
