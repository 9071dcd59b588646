//! Filter helpers for list operations.
//!
//! List messages carry one `Vec<String>` per filterable field. An empty list
//! means "no filter on this field"; a non-empty list matches any of its
//! values.

use cfkube_storage::{
    ListProcessesMessage, ListServiceBindingsMessage, ListServiceInstancesMessage, ProcessRecord,
    ServiceBindingRecord, ServiceInstanceRecord,
};

/// Returns true when `value` passes the filter.
pub fn matches_any(filter: &[String], value: &str) -> bool {
    filter.is_empty() || filter.iter().any(|candidate| candidate == value)
}

pub trait RecordFilter<R> {
    fn matches(&self, record: &R) -> bool;
}

impl RecordFilter<ProcessRecord> for ListProcessesMessage {
    fn matches(&self, record: &ProcessRecord) -> bool {
        matches_any(&self.app_guids, &record.app_guid)
            && matches_any(&self.space_guids, &record.space_guid)
    }
}

impl RecordFilter<ServiceInstanceRecord> for ListServiceInstancesMessage {
    fn matches(&self, record: &ServiceInstanceRecord) -> bool {
        matches_any(&self.names, &record.name)
            && matches_any(&self.guids, &record.guid)
            && matches_any(&self.space_guids, &record.space_guid)
    }
}

impl RecordFilter<ServiceBindingRecord> for ListServiceBindingsMessage {
    fn matches(&self, record: &ServiceBindingRecord) -> bool {
        matches_any(&self.app_guids, &record.app_guid)
            && matches_any(&self.service_instance_guids, &record.service_instance_guid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches_any(&[], "anything"));
    }

    #[test]
    fn test_non_empty_filter_matches_listed_values_only() {
        let filter = vec!["a".to_string(), "b".to_string()];
        assert!(matches_any(&filter, "a"));
        assert!(matches_any(&filter, "b"));
        assert!(!matches_any(&filter, "c"));
    }

    #[test]
    fn test_service_instance_filter_combines_fields() {
        let record = ServiceInstanceRecord {
            guid: "si-1".into(),
            name: "db".into(),
            space_guid: "space-1".into(),
            ..Default::default()
        };

        let by_name = ListServiceInstancesMessage {
            names: vec!["db".into()],
            space_guids: vec!["space-1".into()],
            ..Default::default()
        };
        assert!(by_name.matches(&record));

        let other_space = ListServiceInstancesMessage {
            names: vec!["db".into()],
            space_guids: vec!["space-2".into()],
            ..Default::default()
        };
        assert!(!other_space.matches(&record));
    }
}
