use contracts::master::record::MasterRecord;
use contracts::master::table::MasterTable;
use futures::future::join_all;

use crate::master_data::api::MasterApi;
use crate::master_data::renderer::{foreign_key_sources, RelatedOptions};
use crate::shared::error::{CoreError, CoreResult};
use crate::system::permissions::MutationGate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated(String),
}

/// Outcome of [`MasterListController::bulk_delete`].
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, CoreError)>,
    /// The list as reloaded after every delete settled.
    pub refreshed: CoreResult<Vec<MasterRecord>>,
}

impl BulkDeleteReport {
    /// Banner text when at least one delete failed.
    pub fn failure_message(&self) -> Option<String> {
        let (id, first) = self.failed.first()?;
        Some(format!(
            "{} of {} records could not be deleted (first: {} - {})",
            self.failed.len(),
            self.failed.len() + self.deleted.len(),
            id,
            first.user_message()
        ))
    }
}

/// CRUD operations of one master table.
///
/// Mutations trust the caller-supplied [`MutationGate`]; the backend remains
/// the authority of record.
#[derive(Clone)]
pub struct MasterListController<A> {
    api: A,
    table: MasterTable,
    endpoint: String,
}

impl<A: MasterApi> MasterListController<A> {
    /// Controller on the table's conventional endpoint.
    pub fn new(api: A, table: MasterTable) -> Self {
        let endpoint = table.endpoint();
        Self { api, table, endpoint }
    }

    /// Use `endpoint` instead of the conventional one.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn table(&self) -> &MasterTable {
        &self.table
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn list(&self) -> CoreResult<Vec<MasterRecord>> {
        self.api.list(&self.endpoint, &[]).await
    }

    /// Option lists for this table's foreign-key selects.
    ///
    /// A source that fails to load simply has no options.
    pub async fn load_related(&self) -> RelatedOptions {
        let mut related = RelatedOptions::default();
        for (field, source) in foreign_key_sources(self.table.name()) {
            let endpoint = MasterTable::new(source.table).endpoint();
            match self.api.list(&endpoint, &[]).await {
                Ok(records) => related.insert_records(&source, &records),
                Err(e) => log::warn!(
                    "Options for {}.{} unavailable: {}",
                    self.table,
                    field,
                    e
                ),
            }
        }
        related
    }

    /// Insert when the record has no `<TABLE>_ID` value, update otherwise.
    pub async fn save(&self, gate: MutationGate, record: &MasterRecord) -> CoreResult<SaveOutcome> {
        let primary_key = self.table.primary_key();
        let mut payload = record.without_audit_fields();
        let endpoint = self.endpoint.as_str();

        match record.id_of(&primary_key) {
            None => {
                if !gate.allows_insert() {
                    return Err(CoreError::PermissionDenied);
                }
                payload.remove(&primary_key);
                self.api.create(endpoint, &payload).await?;
                log::info!("Created {} record", self.table);
                Ok(SaveOutcome::Created)
            }
            Some(id) => {
                if !gate.allows_update() {
                    return Err(CoreError::PermissionDenied);
                }
                self.api.update(endpoint, &id, &payload).await?;
                log::info!("Updated {} {}", self.table, id);
                Ok(SaveOutcome::Updated(id))
            }
        }
    }

    /// Save, then reload once the save has completed.
    pub async fn save_and_refresh(
        &self,
        gate: MutationGate,
        record: &MasterRecord,
    ) -> CoreResult<Vec<MasterRecord>> {
        self.save(gate, record).await?;
        self.list().await
    }

    /// Delete every id concurrently, then reload the list exactly once.
    pub async fn bulk_delete(&self, gate: MutationGate, ids: &[String]) -> CoreResult<BulkDeleteReport> {
        if !gate.allows_delete() {
            return Err(CoreError::PermissionDenied);
        }

        let endpoint = self.endpoint.as_str();
        let results = join_all(ids.iter().map(|id| {
            async move { (id.clone(), self.api.delete(endpoint, id).await) }
        }))
        .await;

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => deleted.push(id),
                Err(e) => {
                    log::error!("Failed to delete {} {}: {}", self.table, id, e);
                    failed.push((id, e));
                }
            }
        }

        Ok(BulkDeleteReport {
            deleted,
            failed,
            refreshed: self.list().await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master_data::api::fake::FakeMasterApi;
    use contracts::master::record::FieldValue;

    fn shift(id: i64, name: &str) -> MasterRecord {
        [
            ("SHIFT_ID", FieldValue::from(id)),
            ("NAME", FieldValue::from(name)),
            ("CREATED_AT", FieldValue::from("2024-01-01")),
        ]
        .into_iter()
        .collect()
    }

    fn controller(api: FakeMasterApi) -> MasterListController<FakeMasterApi> {
        MasterListController::new(api, MasterTable::new("shift"))
    }

    fn ids(records: &[MasterRecord]) -> Vec<String> {
        records.iter().filter_map(|r| r.id_of("SHIFT_ID")).collect()
    }

    #[tokio::test]
    async fn test_bulk_delete_partial_failure_still_refreshes() {
        let api = FakeMasterApi::with_table(
            "shifts",
            "SHIFT_ID",
            vec![shift(1, "Morning"), shift(2, "Evening"), shift(3, "Night")],
        );
        api.fail_delete("2");
        let c = controller(api);

        let report = c
            .bulk_delete(MutationGate::allow_all(), &["1".into(), "2".into(), "3".into()])
            .await
            .unwrap();

        assert_eq!(report.deleted, vec!["1".to_string(), "3".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failure_message().unwrap().starts_with("1 of 3"));
        assert_eq!(ids(report.refreshed.as_ref().unwrap()), vec!["2".to_string()]);
        assert_eq!(c.api.list_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_bulk_delete_denied_makes_no_calls() {
        let c = controller(FakeMasterApi::with_table("shifts", "SHIFT_ID", vec![shift(1, "A")]));
        let gate = MutationGate {
            can_add: true,
            can_edit: true,
            ..MutationGate::default()
        };
        let err = c.bulk_delete(gate, &["1".into()]).await.unwrap_err();
        assert_eq!(err, CoreError::PermissionDenied);
        assert!(c.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_without_id_inserts_clean_payload() {
        let c = controller(FakeMasterApi::with_table("shifts", "SHIFT_ID", vec![]));
        let mut record = shift(0, "Weekend");
        record.set("SHIFT_ID", FieldValue::Null);

        let gate = MutationGate {
            can_add: true,
            ..MutationGate::default()
        };
        let refreshed = c.save_and_refresh(gate, &record).await.unwrap();

        assert_eq!(c.api.calls(), vec!["POST shifts", "/api/master/shifts/"]);
        assert_eq!(refreshed.len(), 1);
        let stored = &refreshed[0];
        assert!(!stored.contains_key("SHIFT_ID"));
        assert!(!stored.contains_key("CREATED_AT"));
        assert_eq!(stored.get("NAME"), Some(&FieldValue::from("Weekend")));
    }

    #[tokio::test]
    async fn test_save_with_id_updates() {
        let c = controller(FakeMasterApi::with_table(
            "shifts",
            "SHIFT_ID",
            vec![shift(5, "Old")],
        ));
        let gate = MutationGate {
            can_edit: true,
            ..MutationGate::default()
        };
        let outcome = c.save(gate, &shift(5, "New")).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Updated("5".into()));
        assert_eq!(c.api.calls(), vec!["PUT shifts/5"]);
        assert_eq!(
            c.api.rows("shifts")[0].get("NAME"),
            Some(&FieldValue::from("New"))
        );
    }

    #[tokio::test]
    async fn test_save_respects_gate() {
        let c = controller(FakeMasterApi::default());
        let add_only = MutationGate {
            can_add: true,
            ..MutationGate::default()
        };
        assert_eq!(
            c.save(add_only, &shift(5, "x")).await,
            Err(CoreError::PermissionDenied)
        );
        let edit_only = MutationGate {
            can_edit: true,
            ..MutationGate::default()
        };
        let mut fresh = MasterRecord::new();
        fresh.set("NAME", "y");
        assert_eq!(c.save(edit_only, &fresh).await, Err(CoreError::PermissionDenied));
        assert!(c.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_and_no_refresh() {
        let api = FakeMasterApi::default();
        api.fail_endpoint("shifts");
        let c = controller(api);
        let result = c.save_and_refresh(MutationGate::allow_all(), &shift(1, "x")).await;
        assert!(matches!(result, Err(CoreError::Server { status: 500, .. })));
        assert_eq!(c.api.list_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_load_related_for_city() {
        let api = FakeMasterApi::with_table(
            "states",
            "STATE_ID",
            vec![[
                ("STATE_ID", FieldValue::from(2_i64)),
                ("NAME", FieldValue::from("Goa")),
            ]
            .into_iter()
            .collect()],
        );
        let c = MasterListController::new(api, MasterTable::new("city"));
        let related = c.load_related().await;
        assert_eq!(related.get("state").len(), 1);
        assert_eq!(related.get("state")[0].label, "Goa");
        assert_eq!(c.api.calls(), vec!["/api/master/states/"]);
    }

    #[tokio::test]
    async fn test_load_related_failure_leaves_empty_options() {
        let api = FakeMasterApi::default();
        api.fail_endpoint("countries");
        let c = MasterListController::new(api, MasterTable::new("state"));
        let related = c.load_related().await;
        assert!(related.get("country").is_empty());
    }

    #[tokio::test]
    async fn test_unknown_table_uses_default_endpoint() {
        let c = MasterListController::new(FakeMasterApi::default(), MasterTable::new("widget"));
        c.list().await.unwrap();
        assert_eq!(c.api.calls(), vec!["/api/master/widgets/"]);
    }

    #[tokio::test]
    async fn test_explicit_endpoint_is_used_for_every_call() {
        let api = FakeMasterApi::with_table(
            "universities",
            "UNIVERSITY_ID",
            vec![[("UNIVERSITY_ID", 1_i64)].into_iter().collect()],
        );
        let c = MasterListController::new(api, MasterTable::new("university"))
            .with_endpoint("universities");
        assert_eq!(c.endpoint(), "universities");

        assert_eq!(c.list().await.unwrap().len(), 1);
        let mut edited = MasterRecord::new();
        edited.set("UNIVERSITY_ID", 1_i64);
        edited.set("NAME", "Pune University");
        c.save(MutationGate::allow_all(), &edited).await.unwrap();
        let report = c.bulk_delete(MutationGate::allow_all(), &["1".into()]).await.unwrap();

        assert_eq!(report.deleted, vec!["1".to_string()]);
        assert_eq!(
            c.api.calls(),
            vec![
                "/api/master/universities/",
                "PUT universities/1",
                "DELETE universities/1",
                "/api/master/universities/",
            ]
        );
    }
}
