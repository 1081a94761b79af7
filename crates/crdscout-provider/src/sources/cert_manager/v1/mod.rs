pub mod cluster_issuer;
