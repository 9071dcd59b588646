//! Event types emitted after store mutations.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The mutation a store event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOperation {
    CreateApp,
    PatchApp,
    CreateProcess,
    PatchProcess,
    GetOrCreateRoute,
    AddDestinations,
    RemoveDestination,
    CreateServiceBinding,
}

impl StoreOperation {
    /// Returns the string representation of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::CreateApp => "app.create",
            StoreOperation::PatchApp => "app.patch",
            StoreOperation::CreateProcess => "process.create",
            StoreOperation::PatchProcess => "process.patch",
            StoreOperation::GetOrCreateRoute => "route.get_or_create",
            StoreOperation::AddDestinations => "route.add_destinations",
            StoreOperation::RemoveDestination => "route.remove_destination",
            StoreOperation::CreateServiceBinding => "service_binding.create",
        }
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed store mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    pub operation: StoreOperation,
    /// GUID of the record the mutation produced or touched. Empty when the
    /// store does not report one (process creation).
    pub resource_guid: String,
    pub space_guid: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl StoreEvent {
    pub fn new(
        operation: StoreOperation,
        resource_guid: impl Into<String>,
        space_guid: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            resource_guid: resource_guid.into(),
            space_guid: space_guid.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(StoreOperation::CreateApp.to_string(), "app.create");
        assert_eq!(
            StoreOperation::RemoveDestination.to_string(),
            "route.remove_destination"
        );
    }

    #[test]
    fn test_event_to_json() {
        let event = StoreEvent::new(StoreOperation::PatchProcess, "proc-guid", "space-guid");
        let json = event.to_json().unwrap();
        assert_eq!(json["operation"], "patch_process");
        assert_eq!(json["resource_guid"], "proc-guid");
        assert_eq!(json["space_guid"], "space-guid");
        assert!(json["timestamp"].is_string());
    }
}
