//! # Log Fields
//!
//! Labelled key/value pairs for broker-related log lines.
//!
//! `tracing` spans must declare their fields up front, so [`broker_span`]
//! opens a span with every key below left empty and [`LogField::record`]
//! fills them in as the values become known.

use crate::crd::OSBInstance;
use std::fmt;
use tracing::field::Empty;
use tracing::Span;

pub const BINDING_ID: &str = "binding_id";
pub const INSTANCE_ID: &str = "instance_id";
pub const OPERATION: &str = "operation";
pub const PLAN_ID: &str = "plan_id";
pub const SERVICE_ID: &str = "service_id";

/// A single structured log field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogField {
    key: &'static str,
    value: String,
}

impl LogField {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Record this field on `span`
    ///
    /// No-op if the span did not declare the key.
    pub fn record(&self, span: &Span) {
        span.record(self.key, self.value.as_str());
    }
}

impl fmt::Display for LogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

fn field(key: &'static str, value: &str) -> LogField {
    LogField {
        key,
        value: value.to_string(),
    }
}

pub fn binding_id(binding_id: &str) -> LogField {
    field(BINDING_ID, binding_id)
}

pub fn instance_id(instance_id: &str) -> LogField {
    field(INSTANCE_ID, instance_id)
}

pub fn operation(operation: &str) -> LogField {
    field(OPERATION, operation)
}

pub fn plan_id(plan_id: &str) -> LogField {
    field(PLAN_ID, plan_id)
}

pub fn service_id(service_id: &str) -> LogField {
    field(SERVICE_ID, service_id)
}

/// Fields identifying an instance: its UID (or name before it is persisted),
/// service and plan
pub fn instance_fields(instance: &OSBInstance) -> Vec<LogField> {
    let id = instance
        .metadata
        .uid
        .as_deref()
        .or(instance.metadata.name.as_deref())
        .unwrap_or("unknown");
    vec![
        instance_id(id),
        service_id(&instance.spec.service_id),
        plan_id(&instance.spec.plan_id),
    ]
}

/// Span declaring every broker field, with `operation` set
pub fn broker_span(operation: &str) -> Span {
    tracing::info_span!(
        "osb.broker",
        binding_id = Empty,
        instance_id = Empty,
        operation = operation,
        plan_id = Empty,
        service_id = Empty
    )
}
