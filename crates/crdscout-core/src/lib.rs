//! Crdscout Core - Schema model and validation for CRD data sources
//!
//! This crate provides the foundational types shared by every data source:
//! - `Schema`: the declarative attribute tree a data source exposes
//! - `Attribute`: a single typed field with requiredness and validators
//! - `Validator`: value constraints (length, regex, enum, Kubernetes names)
//! - `Diagnostics`: error/warning reporting back to the host framework

pub mod diagnostics;
pub mod error;
pub mod schema;
pub mod validators;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{CoreError, Result};
pub use schema::{Attribute, AttributeMode, AttributeType, Schema, object};
pub use validators::{
    Validator, validate_annotation_key, validate_dns1123_subdomain, validate_label_key,
    validate_label_value,
};
