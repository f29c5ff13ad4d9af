//! # OSBInstance Status
//!
//! Status types for tracking the lifecycle of a service instance: the
//! condition list, the last operation attempted and the last error.
//!
//! Conditions are keyed by type. Updating a condition only moves its
//! `lastTransitionTime` when the status itself flips, and only moves its
//! `lastUpdateTime` when something observable changed, so callers can use
//! the returned flag to skip no-op status patches.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Condition types reported on an OSBInstance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum OSBInstanceConditionType {
    /// A broker operation is running against the instance
    InProgress,
    /// The instance is provisioned and usable
    Ready,
    /// The last broker operation failed
    Error,
}

impl OSBInstanceConditionType {
    pub fn as_str(self) -> &'static str {
        match self {
            OSBInstanceConditionType::InProgress => "InProgress",
            OSBInstanceConditionType::Ready => "Ready",
            OSBInstanceConditionType::Error => "Error",
        }
    }
}

impl fmt::Display for OSBInstanceConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition status
///
/// `True` means the resource is in the condition, `False` means it is not,
/// `Unknown` means the controller cannot decide.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, JsonSchema,
)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-level broker operation most recently attempted on an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum OSBInstanceOperationType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for OSBInstanceOperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OSBInstanceOperationType::Create => "Create",
            OSBInstanceOperationType::Update => "Update",
            OSBInstanceOperationType::Delete => "Delete",
        })
    }
}

/// State of an OSBInstance at a certain point
///
/// Timestamps are owned by [`OSBInstanceStatus::update_condition`]; values
/// set by the caller are overwritten when the condition is applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OSBInstanceCondition {
    /// Type of condition
    pub r#type: OSBInstanceConditionType,
    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,
    /// The last time this condition was updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<DateTime<Utc>>,
    /// Last time the condition transitioned from one status to another
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
    /// The reason for the condition's last transition
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// A human readable message indicating details about the transition
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl OSBInstanceCondition {
    pub fn new(r#type: OSBInstanceConditionType, status: ConditionStatus) -> Self {
        Self {
            r#type,
            status,
            last_update_time: None,
            last_transition_time: None,
            reason: String::new(),
            message: String::new(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

impl fmt::Display for OSBInstanceCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.r#type, self.status)?;
        if !self.reason.is_empty() {
            write!(f, " {:?}", self.reason)?;
        }
        if !self.message.is_empty() {
            write!(f, " {:?}", self.message)?;
        }
        Ok(())
    }
}

/// Status of the OSBInstance resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OSBInstanceStatus {
    /// Latest available observations of the instance's current state
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<OSBInstanceCondition>,
    /// Most recent broker operation attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_operation_type: Option<OSBInstanceOperationType>,
    /// Last recorded error
    ///
    /// Omitted from the serialized status when `None`. Readers that expect an
    /// `error` key on every status should treat a missing key as an empty
    /// string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OSBInstanceStatus {
    fn position(&self, condition_type: OSBInstanceConditionType) -> Option<usize> {
        self.conditions
            .iter()
            .position(|c| c.r#type == condition_type)
    }

    /// Look up a condition by type
    ///
    /// Returns the index in the condition list together with a copy of the
    /// condition. Mutating the copy does not touch the status.
    pub fn get_condition(
        &self,
        condition_type: OSBInstanceConditionType,
    ) -> Option<(usize, OSBInstanceCondition)> {
        self.position(condition_type)
            .map(|index| (index, self.conditions[index].clone()))
    }

    /// Status of a condition, `Unknown` when the condition was never reported
    pub fn condition_status(&self, condition_type: OSBInstanceConditionType) -> ConditionStatus {
        self.position(condition_type)
            .map_or(ConditionStatus::Unknown, |index| {
                self.conditions[index].status
            })
    }

    /// Update an existing condition or append a new one, stamped with the
    /// current time
    ///
    /// Returns true if the condition was added or any of its fields changed.
    pub fn update_condition(&mut self, condition: OSBInstanceCondition) -> bool {
        self.update_condition_at(condition, Utc::now())
    }

    /// Same as [`update_condition`](Self::update_condition) with an explicit
    /// clock reading
    pub fn update_condition_at(
        &mut self,
        mut condition: OSBInstanceCondition,
        now: DateTime<Utc>,
    ) -> bool {
        condition.last_transition_time = Some(now);

        let Some(index) = self.position(condition.r#type) else {
            condition.last_update_time = Some(now);
            self.conditions.push(condition);
            return true;
        };

        let existing = &self.conditions[index];
        if condition.status == existing.status {
            condition.last_transition_time = existing.last_transition_time;
        } else {
            debug!(
                condition_type = %condition.r#type,
                from = %existing.status,
                to = %condition.status,
                "Condition status transitioned"
            );
        }

        let is_equal = condition.status == existing.status
            && condition.reason == existing.reason
            && condition.message == existing.message
            && condition.last_transition_time == existing.last_transition_time;

        condition.last_update_time = if is_equal {
            existing.last_update_time
        } else {
            Some(now)
        };

        self.conditions[index] = condition;
        !is_equal
    }

    pub fn last_operation_type(&self) -> Option<OSBInstanceOperationType> {
        self.last_operation_type
    }

    pub fn update_last_operation_type(&mut self, operation: OSBInstanceOperationType) {
        self.last_operation_type = Some(operation);
    }
}

impl fmt::Display for OSBInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{condition}")?;
        }
        f.write_str("]")
    }
}
