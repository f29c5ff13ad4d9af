//! # Custom Resource Definitions
//!
//! CRD types for the service catalog.
//!
//! `OSBInstance` represents a service instance provisioned through an Open
//! Service Broker. The spec carries what the user asked for (service, plan and
//! free-form parameters); the status carries what the controller observed.

mod status;

pub use status::*;

use kube::core::ObjectList;
use schemars::{json_schema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

/// OSBInstance Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: catalog.nilebox.github.com/v1
/// kind: OSBInstance
/// metadata:
///   name: my-database
///   namespace: default
/// spec:
///   serviceId: 4f6e6cf6-ffdd-425f-a2c7-3c9258ad2468
///   planId: 86064792-7ea2-467b-af93-ac9694d96d52
///   parameters:
///     size: small
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "OSBInstance",
    group = "catalog.nilebox.github.com",
    version = "v1",
    plural = "osbinstances",
    singular = "osbinstance",
    namespaced,
    status = "OSBInstanceStatus",
    shortname = "osbi",
    printcolumn = r#"{"name":"Service", "type":"string", "jsonPath":".spec.serviceId"}, {"name":"Plan", "type":"string", "jsonPath":".spec.planId"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}, {"name":"Operation", "type":"string", "jsonPath":".status.lastOperationType"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct OSBInstanceSpec {
    /// Broker service identifier
    pub service_id: String,
    /// Broker plan identifier
    pub plan_id: String,
    /// Provisioning parameters passed through to the broker
    // TODO: move parameters into a referenced Secret instead of storing them inline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "raw_extension")]
    pub parameters: Option<serde_json::Value>,
    /// Output returned by the broker after provisioning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "raw_extension")]
    pub output: Option<serde_json::Value>,
}

/// List of OSBInstances as returned by the API server
pub type OSBInstanceList = ObjectList<OSBInstance>;

/// Arbitrary JSON object, kept as-is by the API server
fn raw_extension(_gen: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "object",
        "x-kubernetes-preserve-unknown-fields": true
    })
}

impl OSBInstanceSpec {
    pub fn new(service_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            plan_id: plan_id.into(),
            parameters: None,
            output: None,
        }
    }
}

/// Condition bookkeeping on the resource itself
///
/// The status is optional on the wire; mutators create it on first use and
/// readers treat a missing status as empty.
impl OSBInstance {
    fn status_mut(&mut self) -> &mut OSBInstanceStatus {
        self.status.get_or_insert_with(OSBInstanceStatus::default)
    }

    /// See [`OSBInstanceStatus::get_condition`]
    pub fn get_condition(
        &self,
        condition_type: OSBInstanceConditionType,
    ) -> Option<(usize, OSBInstanceCondition)> {
        self.status
            .as_ref()
            .and_then(|status| status.get_condition(condition_type))
    }

    /// See [`OSBInstanceStatus::update_condition`]
    pub fn update_condition(&mut self, condition: OSBInstanceCondition) -> bool {
        self.status_mut().update_condition(condition)
    }

    /// See [`OSBInstanceStatus::update_condition_at`]
    pub fn update_condition_at(
        &mut self,
        condition: OSBInstanceCondition,
        now: chrono::DateTime<chrono::Utc>,
    ) -> bool {
        self.status_mut().update_condition_at(condition, now)
    }

    pub fn last_operation_type(&self) -> Option<OSBInstanceOperationType> {
        self.status
            .as_ref()
            .and_then(OSBInstanceStatus::last_operation_type)
    }

    pub fn update_last_operation_type(&mut self, operation: OSBInstanceOperationType) {
        self.status_mut().update_last_operation_type(operation);
    }

    /// Whether the Ready condition is currently True
    pub fn is_ready(&self) -> bool {
        self.get_condition(OSBInstanceConditionType::Ready)
            .is_some_and(|(_, condition)| condition.is_true())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use kube::{CustomResourceExt, Resource};

    #[test]
    fn test_resource_identity_matches_constants() {
        assert_eq!(OSBInstance::kind(&()), constants::OSB_INSTANCE_RESOURCE_KIND);
        assert_eq!(OSBInstance::group(&()), constants::GROUP_NAME);
        assert_eq!(
            OSBInstance::version(&()),
            constants::OSB_INSTANCE_RESOURCE_VERSION
        );
        assert_eq!(
            OSBInstance::plural(&()),
            constants::OSB_INSTANCE_RESOURCE_PLURAL
        );
        assert_eq!(
            OSBInstance::api_version(&()),
            constants::OSB_INSTANCE_RESOURCE_API_VERSION
        );
        assert_eq!(OSBInstance::crd_name(), constants::OSB_INSTANCE_RESOURCE_NAME);
    }

    #[test]
    fn test_crd_preserves_unknown_parameter_fields() {
        let crd = serde_json::to_value(OSBInstance::crd()).unwrap();
        let spec = &crd["spec"]["versions"][0]["schema"]["openAPIV3Schema"]["properties"]["spec"];
        assert_eq!(
            spec["properties"]["parameters"]["x-kubernetes-preserve-unknown-fields"],
            true
        );
        assert_eq!(crd["spec"]["names"]["shortNames"][0], "osbi");
        assert_eq!(
            crd["spec"]["names"]["singular"],
            constants::OSB_INSTANCE_RESOURCE_SINGULAR
        );
        assert_eq!(crd["spec"]["scope"], "Namespaced");
    }

    #[test]
    fn test_spec_round_trips_parameters() {
        let yaml = r#"
serviceId: svc-1
planId: plan-1
parameters:
  size: small
  replicas: 3
"#;
        let spec: OSBInstanceSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.service_id, "svc-1");
        assert_eq!(spec.parameters.as_ref().unwrap()["replicas"], 3);
        assert!(spec.output.is_none());

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["planId"], "plan-1");
        assert!(value.get("output").is_none());
    }

    #[test]
    fn test_conditions_on_resource_without_status() {
        let mut instance = OSBInstance::new("db", OSBInstanceSpec::new("svc", "plan"));
        assert!(instance.status.is_none());
        assert!(instance
            .get_condition(OSBInstanceConditionType::Ready)
            .is_none());
        assert_eq!(instance.last_operation_type(), None);
        assert!(!instance.is_ready());

        instance.update_last_operation_type(OSBInstanceOperationType::Create);
        assert!(instance.update_condition(
            OSBInstanceCondition::new(OSBInstanceConditionType::Ready, ConditionStatus::True)
                .with_reason("provisioned"),
        ));

        assert!(instance.is_ready());
        assert_eq!(
            instance.last_operation_type(),
            Some(OSBInstanceOperationType::Create)
        );
    }
}
