use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Severity bucket of a maintenance task.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_priority")]
pub enum TaskPriority {
    #[sea_orm(string_value = "High")]
    High,
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    /// Wire and database representation of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }

    /// Parses the wire representation, returning `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|priority| priority.as_str() == value)
    }
}

/// Workflow state of a maintenance task.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status")]
pub enum TaskStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Complete")]
    Complete,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    /// Wire and database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Complete => "Complete",
        }
    }

    /// Parses the wire representation, returning `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|status| status.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_every_priority_from_its_wire_value() {
        for priority in TaskPriority::iter() {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
            assert_eq!(priority.to_value(), priority.as_str());
        }
        assert_eq!(TaskPriority::parse("high"), None);
        assert_eq!(TaskPriority::parse("Urgent"), None);
    }

    #[test]
    fn can_parse_every_status_from_its_wire_value() {
        for status in TaskStatus::iter() {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
            assert_eq!(status.to_value(), status.as_str());
        }
        assert_eq!(TaskStatus::parse("InProgress"), None);
    }

    #[test]
    fn can_serialize_in_progress_with_a_space() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");

        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn can_default_to_medium_priority_and_pending_status() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }
}
