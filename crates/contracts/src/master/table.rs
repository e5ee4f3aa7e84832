//! Naming conventions for master tables.
//!
//! The primary key of table `t` is always `T_ID`. REST endpoints pluralize with
//! a trailing `s` except for the two closed exception lists below.

use serde::{Deserialize, Serialize};

const IRREGULAR_PLURALS: [(&str, &str); 4] = [
    ("country", "countries"),
    ("city", "cities"),
    ("currency", "currencies"),
    ("category", "categories"),
];

const SINGULAR_ENDPOINTS: [&str; 4] = ["program", "branch", "year", "semester"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterTable(String);

impl MasterTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_lowercase())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// `<TABLE>_ID`
    pub fn primary_key(&self) -> String {
        format!("{}_ID", self.0.to_uppercase())
    }

    pub fn endpoint(&self) -> String {
        endpoint_for(&self.0)
    }
}

impl std::fmt::Display for MasterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn endpoint_for(table: &str) -> String {
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(t, _)| *t == table) {
        return (*plural).to_string();
    }
    if SINGULAR_ENDPOINTS.contains(&table) {
        return table.to_string();
    }
    format!("{table}s")
}
