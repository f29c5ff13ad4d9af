//! Configuration loaders and their error type.

use crate::constants::{
    ENV_CA_PATH, ENV_CLIENT_CERT, ENV_CLIENT_KEY, ENV_KUBECONFIG_ENTRY_NAME, ENV_SERVICE_HOST,
    ENV_SERVICE_PORT,
};
use kube::config::{
    InClusterError, InferConfigError, KubeConfigOptions, Kubeconfig, KubeconfigError,
};
use kube::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while building a client configuration
#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("unable to load cluster configuration, KUBERNETES_SERVICE_HOST and KUBERNETES_SERVICE_PORT must be defined")]
    MissingClusterEnv,

    #[error("unable to load TLS configuration, KUBERNETES_CA_PATH, KUBERNETES_CLIENT_CERT and KUBERNETES_CLIENT_KEY must be defined")]
    MissingTlsEnv,

    #[error("failed to assemble kubeconfig for {server}")]
    AssembleKubeconfig {
        server: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build REST client configuration for {server} (CA {ca_path:?}, client certificate {client_cert:?}, client key {client_key:?})")]
    Environment {
        server: String,
        ca_path: String,
        client_cert: String,
        client_key: String,
        #[source]
        source: KubeconfigError,
    },

    #[error("failed to load REST client configuration from file {path:?}")]
    LoadFile {
        path: PathBuf,
        #[source]
        source: KubeconfigError,
    },

    #[error("failed to build REST client configuration for context {context:?} from file {path:?}")]
    Context {
        path: PathBuf,
        context: Option<String>,
        #[source]
        source: KubeconfigError,
    },

    #[error("failed to load in-cluster configuration")]
    InCluster(#[from] InClusterError),

    #[error("failed to infer client configuration")]
    Infer(#[from] InferConfigError),
}

/// Cluster endpoint and TLS material paths read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvClusterConfig {
    pub host: String,
    pub port: String,
    pub ca_path: String,
    pub client_cert_path: String,
    pub client_key_path: String,
}

impl EnvClusterConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self, ClientConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read variables through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let (Some(host), Some(port)) = (var(ENV_SERVICE_HOST), var(ENV_SERVICE_PORT)) else {
            return Err(ClientConfigError::MissingClusterEnv);
        };

        let (Some(ca_path), Some(client_cert_path), Some(client_key_path)) =
            (var(ENV_CA_PATH), var(ENV_CLIENT_CERT), var(ENV_CLIENT_KEY))
        else {
            return Err(ClientConfigError::MissingTlsEnv);
        };

        Ok(Self {
            host,
            port,
            ca_path,
            client_cert_path,
            client_key_path,
        })
    }

    /// API server URL, `https://host:port` with IPv6 hosts bracketed
    pub fn server_url(&self) -> String {
        format!("https://{}", join_host_port(&self.host, &self.port))
    }

    /// Kubeconfig with a single cluster, user and context pointing at the
    /// environment's endpoint and certificate files
    pub fn to_kubeconfig(&self) -> Result<Kubeconfig, ClientConfigError> {
        let server = self.server_url();
        let document = serde_json::json!({
            "apiVersion": "v1",
            "kind": "Config",
            "clusters": [{
                "name": ENV_KUBECONFIG_ENTRY_NAME,
                "cluster": {
                    "server": server,
                    "certificate-authority": self.ca_path,
                }
            }],
            "users": [{
                "name": ENV_KUBECONFIG_ENTRY_NAME,
                "user": {
                    "client-certificate": self.client_cert_path,
                    "client-key": self.client_key_path,
                }
            }],
            "contexts": [{
                "name": ENV_KUBECONFIG_ENTRY_NAME,
                "context": {
                    "cluster": ENV_KUBECONFIG_ENTRY_NAME,
                    "user": ENV_KUBECONFIG_ENTRY_NAME,
                }
            }],
            "current-context": ENV_KUBECONFIG_ENTRY_NAME,
        });
        serde_json::from_value(document)
            .map_err(|source| ClientConfigError::AssembleKubeconfig { server, source })
    }
}

fn join_host_port(host: &str, port: &str) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Build a client configuration from `KUBERNETES_*` environment variables
///
/// The CA bundle and client certificate are referenced by path and read while
/// the configuration is built, so missing files surface here.
pub async fn config_from_env() -> Result<Config, ClientConfigError> {
    let env = EnvClusterConfig::from_env()?;
    let server = env.server_url();
    debug!(server = %server, ca_path = %env.ca_path, "Loading client configuration from environment");

    let kubeconfig = env.to_kubeconfig()?;
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|source| ClientConfigError::Environment {
            server: server.clone(),
            ca_path: env.ca_path.clone(),
            client_cert: env.client_cert_path.clone(),
            client_key: env.client_key_path.clone(),
            source,
        })?;

    info!(server = %server, "Loaded client configuration from environment");
    Ok(config)
}

/// Build a client configuration from a kubeconfig file
///
/// An empty `context` selects the file's current-context.
pub async fn config_from_file(
    path: impl AsRef<Path>,
    context: &str,
) -> Result<Config, ClientConfigError> {
    let path = path.as_ref();
    let kubeconfig =
        Kubeconfig::read_from(path).map_err(|source| ClientConfigError::LoadFile {
            path: path.to_path_buf(),
            source,
        })?;

    let context = (!context.is_empty()).then(|| context.to_string());
    let options = KubeConfigOptions {
        context: context.clone(),
        ..KubeConfigOptions::default()
    };

    let config = Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|source| ClientConfigError::Context {
            path: path.to_path_buf(),
            context: context.clone(),
            source,
        })?;

    info!(
        path = %path.display(),
        context = context.as_deref().unwrap_or("<current>"),
        cluster_url = %config.cluster_url,
        "Loaded client configuration from file"
    );
    Ok(config)
}

/// Build a client configuration from the pod's service account
pub fn in_cluster_config() -> Result<Config, ClientConfigError> {
    Ok(Config::incluster()?)
}

/// Where a process should take its client configuration from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `KUBERNETES_*` environment variables
    Env,
    /// Kubeconfig file and context (empty for current-context)
    File { path: PathBuf, context: String },
    /// Pod service account
    InCluster,
    /// kube's default chain: `$KUBECONFIG`, `~/.kube/config`, then in-cluster
    Infer,
}

impl ConfigSource {
    pub async fn load(&self) -> Result<Config, ClientConfigError> {
        match self {
            ConfigSource::Env => config_from_env().await,
            ConfigSource::File { path, context } => config_from_file(path, context).await,
            ConfigSource::InCluster => in_cluster_config(),
            ConfigSource::Infer => Ok(Config::infer().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const FULL_ENV: &[(&str, &str)] = &[
        (ENV_SERVICE_HOST, "10.0.0.1"),
        (ENV_SERVICE_PORT, "443"),
        (ENV_CA_PATH, "/etc/kube/ca.crt"),
        (ENV_CLIENT_CERT, "/etc/kube/client.crt"),
        (ENV_CLIENT_KEY, "/etc/kube/client.key"),
    ];

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let env = EnvClusterConfig::from_lookup(lookup_from(FULL_ENV)).unwrap();
        assert_eq!(env.host, "10.0.0.1");
        assert_eq!(env.port, "443");
        assert_eq!(env.ca_path, "/etc/kube/ca.crt");
        assert_eq!(env.client_cert_path, "/etc/kube/client.crt");
        assert_eq!(env.client_key_path, "/etc/kube/client.key");
        assert_eq!(env.server_url(), "https://10.0.0.1:443");
    }

    #[test]
    fn test_missing_host_or_port() {
        let err = EnvClusterConfig::from_lookup(lookup_from(&[(ENV_SERVICE_HOST, "10.0.0.1")]))
            .unwrap_err();
        assert!(matches!(err, ClientConfigError::MissingClusterEnv));
        assert!(err.to_string().contains("KUBERNETES_SERVICE_PORT"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut pairs = FULL_ENV.to_vec();
        pairs[1] = (ENV_SERVICE_PORT, "");
        let err = EnvClusterConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ClientConfigError::MissingClusterEnv));
    }

    #[test]
    fn test_missing_tls_material() {
        let err = EnvClusterConfig::from_lookup(lookup_from(&FULL_ENV[..4])).unwrap_err();
        assert!(matches!(err, ClientConfigError::MissingTlsEnv));
        assert!(err.to_string().contains("KUBERNETES_CLIENT_KEY"));
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        assert_eq!(join_host_port("fd00::1", "6443"), "[fd00::1]:6443");
        assert_eq!(join_host_port("kubernetes", "6443"), "kubernetes:6443");
    }

    #[test]
    fn test_to_kubeconfig_references_certificate_paths() {
        let env = EnvClusterConfig::from_lookup(lookup_from(FULL_ENV)).unwrap();
        let kubeconfig = env.to_kubeconfig().unwrap();

        assert_eq!(
            kubeconfig.current_context.as_deref(),
            Some(ENV_KUBECONFIG_ENTRY_NAME)
        );
        let cluster = kubeconfig.clusters[0].cluster.as_ref().unwrap();
        assert_eq!(cluster.server.as_deref(), Some("https://10.0.0.1:443"));
        assert_eq!(
            cluster.certificate_authority.as_deref(),
            Some("/etc/kube/ca.crt")
        );
        let user = kubeconfig.auth_infos[0].auth_info.as_ref().unwrap();
        assert_eq!(
            user.client_certificate.as_deref(),
            Some("/etc/kube/client.crt")
        );
        assert_eq!(user.client_key.as_deref(), Some("/etc/kube/client.key"));
    }
}
