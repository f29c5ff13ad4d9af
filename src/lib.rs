//! # Kube Catalog
//!
//! Types and helpers for a Kubernetes service catalog built on the Open
//! Service Broker API.
//!
//! - [`crd`]: the `OSBInstance` custom resource and its condition tracking
//! - [`scheme`]: registration of the catalog types by group, version and kind
//! - [`client`]: client configuration from environment, kubeconfig or cluster
//! - [`observability`]: tracing setup and broker log fields

pub mod client;
pub mod constants;
pub mod crd;
pub mod observability;
pub mod scheme;

// Re-export CRD types for convenience
pub use crd::*;
