//! Value validators
//!
//! Validators constrain configuration values before a read is attempted.
//! The generic constraints (length, regex, enum, integer bounds) are attached
//! per attribute; the Kubernetes name/label/annotation rules are shared by
//! the `metadata` block of every data source.

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;

use crate::diagnostics::Diagnostic;
use crate::error::{CoreError, Result};

static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("invalid DNS-1123 subdomain regex")
});

static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$")
        .expect("invalid qualified name regex")
});

static LABEL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$")
        .expect("invalid label value regex")
});

const DNS1123_SUBDOMAIN_MAX: usize = 253;
const QUALIFIED_NAME_MAX: usize = 63;
const LABEL_VALUE_MAX: usize = 63;

/// A single value constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// String length must be within the inclusive bounds
    LengthBetween { min: usize, max: usize },

    /// String must match the regex pattern
    RegexMatches { pattern: String, message: String },

    /// String must be one of the allowed values
    OneOf(Vec<String>),

    /// Integer must be within the inclusive bounds
    Int64Between { min: i64, max: i64 },

    /// String must be a valid RFC 1123 DNS subdomain (Kubernetes object name)
    Dns1123Subdomain,

    /// Map keys must be valid label/annotation keys, values valid label values
    LabelMap,

    /// Map keys must be valid annotation keys
    AnnotationMap,
}

impl Validator {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn regex_matches(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Validator::RegexMatches {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Compile-check the validator itself, ahead of any value check
    ///
    /// Only regex validators can be malformed; everything else is valid by
    /// construction.
    pub fn ensure_valid(&self) -> Result<()> {
        if let Validator::RegexMatches { pattern, .. } = self {
            Regex::new(pattern).map_err(|e| CoreError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Check a value against this validator, reporting at most one diagnostic
    ///
    /// Null values are ignored; requiredness is enforced by the schema walk,
    /// not by individual validators.
    pub fn check(&self, path: &str, value: &JsonValue) -> Option<Diagnostic> {
        if value.is_null() {
            return None;
        }

        match self {
            Validator::LengthBetween { min, max } => {
                let s = value.as_str()?;
                let len = s.chars().count();
                if len < *min || len > *max {
                    return Some(
                        Diagnostic::error(
                            "Invalid attribute length",
                            format!(
                                "expected between {} and {} characters, got {}",
                                min, max, len
                            ),
                        )
                        .with_attribute(path),
                    );
                }
                None
            }
            Validator::RegexMatches { pattern, message } => {
                let s = value.as_str()?;
                let re = match Regex::new(pattern) {
                    Ok(re) => re,
                    Err(e) => {
                        return Some(
                            Diagnostic::error(
                                "Invalid validator pattern",
                                format!("pattern '{}' failed to compile: {}", pattern, e),
                            )
                            .with_attribute(path),
                        );
                    }
                };
                if !re.is_match(s) {
                    return Some(
                        Diagnostic::error("Invalid attribute value", message.clone())
                            .with_attribute(path),
                    );
                }
                None
            }
            Validator::OneOf(allowed) => {
                let s = value.as_str()?;
                if !allowed.iter().any(|a| a == s) {
                    return Some(
                        Diagnostic::error(
                            "Invalid attribute value",
                            format!("'{}' is not one of [{}]", s, allowed.join(", ")),
                        )
                        .with_attribute(path),
                    );
                }
                None
            }
            Validator::Int64Between { min, max } => {
                let n = value.as_i64()?;
                if n < *min || n > *max {
                    return Some(
                        Diagnostic::error(
                            "Invalid attribute value",
                            format!("expected a value between {} and {}, got {}", min, max, n),
                        )
                        .with_attribute(path),
                    );
                }
                None
            }
            Validator::Dns1123Subdomain => {
                let s = value.as_str()?;
                validate_dns1123_subdomain(s).err().map(|message| {
                    Diagnostic::error("Invalid Kubernetes name", message).with_attribute(path)
                })
            }
            Validator::LabelMap => {
                let map = value.as_object()?;
                for (key, val) in map {
                    if let Err(message) = validate_label_key(key) {
                        return Some(
                            Diagnostic::error("Invalid label key", message).with_attribute(path),
                        );
                    }
                    let Some(val) = val.as_str() else {
                        return Some(
                            Diagnostic::error(
                                "Invalid label value",
                                format!("label '{}' must be a string", key),
                            )
                            .with_attribute(path),
                        );
                    };
                    if let Err(message) = validate_label_value(val) {
                        return Some(
                            Diagnostic::error("Invalid label value", message).with_attribute(path),
                        );
                    }
                }
                None
            }
            Validator::AnnotationMap => {
                let map = value.as_object()?;
                for key in map.keys() {
                    if let Err(message) = validate_annotation_key(key) {
                        return Some(
                            Diagnostic::error("Invalid annotation key", message)
                                .with_attribute(path),
                        );
                    }
                }
                None
            }
        }
    }
}

/// Validate an RFC 1123 DNS subdomain, the rule for Kubernetes object names
pub fn validate_dns1123_subdomain(value: &str) -> std::result::Result<(), String> {
    if value.len() > DNS1123_SUBDOMAIN_MAX {
        return Err(format!(
            "'{}' is longer than {} characters",
            value, DNS1123_SUBDOMAIN_MAX
        ));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        return Err(format!(
            "'{}' must consist of lowercase alphanumeric characters, '-' or '.', \
             and must start and end with an alphanumeric character",
            value
        ));
    }
    Ok(())
}

/// Validate a label key: optional DNS-subdomain prefix plus a qualified name
pub fn validate_label_key(key: &str) -> std::result::Result<(), String> {
    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            validate_dns1123_subdomain(prefix)
                .map_err(|e| format!("label key prefix is invalid: {}", e))?;
            name
        }
        None => key,
    };
    if name.is_empty() || name.len() > QUALIFIED_NAME_MAX {
        return Err(format!(
            "label key name part '{}' must be between 1 and {} characters",
            name, QUALIFIED_NAME_MAX
        ));
    }
    if !QUALIFIED_NAME.is_match(name) {
        return Err(format!(
            "label key name part '{}' must consist of alphanumeric characters, \
             '-', '_' or '.', and must start and end with an alphanumeric character",
            name
        ));
    }
    Ok(())
}

/// Validate a label value: empty or a qualified name of up to 63 characters
pub fn validate_label_value(value: &str) -> std::result::Result<(), String> {
    if value.len() > LABEL_VALUE_MAX {
        return Err(format!(
            "label value '{}' is longer than {} characters",
            value, LABEL_VALUE_MAX
        ));
    }
    if !LABEL_VALUE.is_match(value) {
        return Err(format!(
            "label value '{}' must consist of alphanumeric characters, \
             '-', '_' or '.', and must start and end with an alphanumeric character",
            value
        ));
    }
    Ok(())
}

/// Annotation keys follow the same shape as label keys
pub fn validate_annotation_key(key: &str) -> std::result::Result<(), String> {
    validate_label_key(key).map_err(|e| e.replace("label key", "annotation key"))
}
