//! Generated-style data sources, one module per API group and version

pub mod cert_manager;
pub mod external_secrets;
pub mod kubeblocks;
pub mod metadata;
