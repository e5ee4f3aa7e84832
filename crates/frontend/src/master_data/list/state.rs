use std::collections::BTreeSet;

use contracts::master::record::{is_audit_field, MasterRecord};
use contracts::master::table::MasterTable;

/// Loaded rows plus the multi-row selection, keyed by `<TABLE>_ID`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    primary_key: String,
    records: Vec<MasterRecord>,
    columns: Vec<String>,
    selected: BTreeSet<String>,
}

impl ListState {
    pub fn new(table: &MasterTable) -> Self {
        Self {
            primary_key: table.primary_key(),
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[MasterRecord] {
        &self.records
    }

    pub fn id_of(&self, record: &MasterRecord) -> Option<String> {
        record.id_of(&self.primary_key)
    }

    /// Replace the rows; selected ids that disappeared are dropped.
    pub fn set_records(&mut self, records: Vec<MasterRecord>) {
        self.records = records;
        self.columns = collect_columns(&self.records);
        let ids: BTreeSet<String> = self.ids().into_iter().collect();
        self.selected.retain(|id| ids.contains(id));
    }

    /// Non-audit keys in first-seen order across the loaded rows.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.iter().filter_map(|r| self.id_of(r)).collect()
    }

    pub fn find(&self, id: &str) -> Option<&MasterRecord> {
        self.records
            .iter()
            .find(|r| self.id_of(r).as_deref() == Some(id))
    }

    /// `true` selects exactly the current ids; `false` always clears.
    pub fn select_all(&mut self, on: bool) {
        self.selected = if on {
            self.ids().into_iter().collect()
        } else {
            BTreeSet::new()
        };
    }

    pub fn toggle_one(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn set_selected(&mut self, id: &str, checked: bool) {
        if checked {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }
}

fn collect_columns(records: &[MasterRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if !is_audit_field(key) && !columns.iter().any(|c| c == key) {
            columns.push(key.to_string());
        }
    }
    columns
}
