//! Prints the OSBInstance CustomResourceDefinition as YAML.
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/osbinstance.yaml
//! ```

use anyhow::{Context, Result};
use kube::CustomResourceExt;
use kube_catalog::OSBInstance;

fn main() -> Result<()> {
    let crd = serde_yaml::to_string(&OSBInstance::crd())
        .context("Failed to serialize OSBInstance CRD")?;
    print!("{crd}");
    Ok(())
}
