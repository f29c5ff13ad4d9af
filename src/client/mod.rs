//! # Client Configuration
//!
//! Builds a `kube::Config` for talking to the API server. Configuration can
//! come from process environment variables, a kubeconfig file and context,
//! the in-cluster service account, or kube's own inference chain.
//!
//! Failures here are expected to abort process startup; nothing is retried.

mod config;

pub use config::{
    config_from_env, config_from_file, in_cluster_config, ClientConfigError, ConfigSource,
    EnvClusterConfig,
};
