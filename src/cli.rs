//! # catalogctl
//!
//! Command-line interface for inspecting OSBInstance resources.
//!
//! ## Usage
//!
//! ```bash
//! # List OSBInstances in all namespaces
//! catalogctl list
//!
//! # Show status and conditions of one instance
//! catalogctl status --namespace default --name my-database
//!
//! # Use a specific kubeconfig and context
//! catalogctl --kubeconfig ~/.kube/staging --context admin list
//!
//! # Use KUBERNETES_SERVICE_HOST/PORT and KUBERNETES_CA_PATH/CLIENT_CERT/CLIENT_KEY
//! catalogctl --from-env list
//!
//! # Print the registered catalog kinds
//! catalogctl kinds
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kube::{api::Api, api::ListParams, Client};
use kube_catalog::client::ConfigSource;
use kube_catalog::observability::{self, fields};
use kube_catalog::{scheme, OSBInstance, OSBInstanceConditionType};
use std::path::PathBuf;
use tracing::{info, warn};

/// Service catalog CLI
#[derive(Debug, Parser)]
#[command(name = "catalogctl")]
#[command(about = "Inspect OSBInstance resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Kubernetes namespace (defaults to the configured namespace)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Path to a kubeconfig file
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context (defaults to the file's current-context)
    #[arg(short, long, global = true, requires = "kubeconfig")]
    context: Option<String>,

    /// Load configuration from KUBERNETES_* environment variables
    #[arg(long, global = true, conflicts_with_all = ["kubeconfig", "in_cluster"])]
    from_env: bool,

    /// Load configuration from the pod service account
    #[arg(long, global = true, conflicts_with = "kubeconfig")]
    in_cluster: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List OSBInstance resources (all namespaces unless --namespace is given)
    List,
    /// Show status of an OSBInstance resource
    Status {
        /// Name of the OSBInstance resource
        #[arg(long)]
        name: String,
    },
    /// Print the registered catalog kinds
    Kinds,
}

impl Cli {
    fn config_source(&self) -> ConfigSource {
        if self.from_env {
            ConfigSource::Env
        } else if self.in_cluster {
            ConfigSource::InCluster
        } else if let Some(path) = &self.kubeconfig {
            ConfigSource::File {
                path: path.clone(),
                context: self.context.clone().unwrap_or_default(),
            }
        } else {
            ConfigSource::Infer
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing("catalogctl");

    let cli = Cli::parse();

    if matches!(cli.command, Commands::Kinds) {
        kinds_command();
        return Ok(());
    }

    // rustls 0.23 needs a process-level crypto provider before the client is built
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    let config = cli
        .config_source()
        .load()
        .await
        .context("Failed to load Kubernetes client configuration")?;
    let default_namespace = config.default_namespace.clone();
    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;

    match cli.command {
        Commands::List => list_command(client, cli.namespace).await,
        Commands::Status { name } => {
            let ns = cli.namespace.unwrap_or(default_namespace);
            status_command(client, &name, &ns).await
        }
        Commands::Kinds => Ok(()),
    }
}

fn kinds_command() {
    println!("{:<40} {:<10} {:<20}", "GROUP", "VERSION", "KIND");
    for gvk in scheme::scheme().known_kinds() {
        println!("{:<40} {:<10} {:<20}", gvk.group, gvk.version, gvk.kind);
    }
}

/// List OSBInstance resources
async fn list_command(client: Client, namespace: Option<String>) -> Result<()> {
    let api: Api<OSBInstance> = if let Some(ns) = &namespace {
        info!(namespace = %ns, "Listing OSBInstance resources");
        Api::namespaced(client, ns)
    } else {
        info!("Listing OSBInstance resources in all namespaces");
        Api::all(client)
    };

    let instances = api
        .list(&ListParams::default())
        .await
        .context("Failed to list OSBInstance resources")?;

    if instances.items.is_empty() {
        println!("No OSBInstance resources found.");
        return Ok(());
    }

    println!(
        "{:<30} {:<20} {:<10} {:<12}",
        "NAME", "NAMESPACE", "READY", "OPERATION"
    );
    println!("{}", "-".repeat(75));

    for instance in instances.items {
        let name = instance.metadata.name.as_deref().unwrap_or("<unknown>");
        let ns = instance.metadata.namespace.as_deref().unwrap_or("<unknown>");
        let ready = instance
            .status
            .as_ref()
            .map(|s| s.condition_status(OSBInstanceConditionType::Ready).to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let operation = instance
            .last_operation_type()
            .map_or_else(|| "-".to_string(), |op| op.to_string());

        println!("{name:<30} {ns:<20} {ready:<10} {operation:<12}");
    }

    Ok(())
}

/// Show detailed status of an OSBInstance resource
async fn status_command(client: Client, name: &str, namespace: &str) -> Result<()> {
    let api: Api<OSBInstance> = Api::namespaced(client, namespace);

    let instance = api
        .get(name)
        .await
        .with_context(|| format!("Failed to get OSBInstance '{namespace}/{name}'"))?;

    let span = fields::broker_span("status");
    for field in fields::instance_fields(&instance) {
        field.record(&span);
    }
    let _guard = span.enter();
    info!(ready = instance.is_ready(), "Fetched OSBInstance");

    println!("Status for OSBInstance '{namespace}/{name}':\n");

    println!("Metadata:");
    println!("  Name: {}", instance.metadata.name.as_deref().unwrap_or("<unknown>"));
    println!(
        "  Namespace: {}",
        instance.metadata.namespace.as_deref().unwrap_or("<unknown>")
    );
    if let Some(uid) = &instance.metadata.uid {
        println!("  UID: {uid}");
    }

    println!("\nSpec:");
    println!("  Service ID: {}", instance.spec.service_id);
    println!("  Plan ID: {}", instance.spec.plan_id);
    if let Some(parameters) = &instance.spec.parameters {
        println!("  Parameters: {parameters}");
    }

    let Some(status) = &instance.status else {
        println!("\nStatus: No status available (instance may not have been processed yet)");
        return Ok(());
    };

    println!("\nStatus: {status}");
    if let Some(operation) = status.last_operation_type() {
        println!("  Last Operation: {operation}");
    }
    if let Some(error) = &status.error {
        println!("  Error: {error}");
    }

    if !status.conditions.is_empty() {
        println!("\nConditions:");
        for condition in &status.conditions {
            println!("  {}: {}", condition.r#type, condition.status);
            if !condition.reason.is_empty() {
                println!("    Reason: {}", condition.reason);
            }
            if !condition.message.is_empty() {
                println!("    Message: {}", condition.message);
            }
            if let Some(time) = condition.last_transition_time {
                println!("    Last Transition: {}", time.to_rfc3339());
            }
            if let Some(time) = condition.last_update_time {
                println!("    Last Update: {}", time.to_rfc3339());
            }
        }
    }

    Ok(())
}
