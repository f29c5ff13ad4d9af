//! # Constants
//!
//! Resource identity for the OSBInstance CRD and environment variable names
//! read by the client configuration loader.

/// API group shared by all catalog resources
pub const GROUP_NAME: &str = "catalog.nilebox.github.com";

pub const OSB_INSTANCE_RESOURCE_SINGULAR: &str = "osbinstance";
pub const OSB_INSTANCE_RESOURCE_PLURAL: &str = "osbinstances";
pub const OSB_INSTANCE_RESOURCE_VERSION: &str = "v1";
pub const OSB_INSTANCE_RESOURCE_KIND: &str = "OSBInstance";
pub const OSB_INSTANCE_LIST_KIND: &str = "OSBInstanceList";

/// `apiVersion` of OSBInstance objects (`<group>/<version>`)
pub const OSB_INSTANCE_RESOURCE_API_VERSION: &str = "catalog.nilebox.github.com/v1";

/// CRD object name (`<plural>.<group>`)
pub const OSB_INSTANCE_RESOURCE_NAME: &str = "osbinstances.catalog.nilebox.github.com";

/// Environment variables consumed by `client::config_from_env`
pub const ENV_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
pub const ENV_SERVICE_PORT: &str = "KUBERNETES_SERVICE_PORT";
pub const ENV_CA_PATH: &str = "KUBERNETES_CA_PATH";
pub const ENV_CLIENT_CERT: &str = "KUBERNETES_CLIENT_CERT";
pub const ENV_CLIENT_KEY: &str = "KUBERNETES_CLIENT_KEY";

/// Name used for the synthesized cluster, user and context when building a
/// kubeconfig from environment variables
pub const ENV_KUBECONFIG_ENTRY_NAME: &str = "env";

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "kube_catalog=info";
