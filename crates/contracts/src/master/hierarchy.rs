//! The fixed academic hierarchy used by cascading dropdowns.
//!
//! University → Institute → Program → Branch → Year → Semester. Each level is
//! described by a [`LevelDescriptor`]; forms use a contiguous slice of the chain.
//!
//! Note: the department table references its institute by `INSTITUTE_CODE`
//! (a string) instead of `INSTITUTE_ID`. Node ids are therefore kept as strings
//! and that table is not part of the chain.

use serde::{Deserialize, Serialize};

use super::record::MasterRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyLevel {
    University,
    Institute,
    Program,
    Branch,
    Year,
    Semester,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub level: HierarchyLevel,
    /// Table name, also the lower-case stem of the id column.
    pub table: &'static str,
    /// REST collection under `/api/master/`.
    pub endpoint: &'static str,
    /// Primary key column of this level's records.
    pub id_field: &'static str,
    /// Query parameter used when this level filters its child.
    pub query_param: &'static str,
    pub label: &'static str,
    /// Extra ancestors (besides the direct parent) that scope this level's fetch.
    pub extra_scope: &'static [HierarchyLevel],
}

pub const CHAIN: [LevelDescriptor; 6] = [
    LevelDescriptor {
        level: HierarchyLevel::University,
        table: "university",
        endpoint: "universities",
        id_field: "UNIVERSITY_ID",
        query_param: "university_id",
        label: "University",
        extra_scope: &[],
    },
    LevelDescriptor {
        level: HierarchyLevel::Institute,
        table: "institute",
        endpoint: "institutes",
        id_field: "INSTITUTE_ID",
        query_param: "institute_id",
        label: "Institute",
        extra_scope: &[],
    },
    LevelDescriptor {
        level: HierarchyLevel::Program,
        table: "program",
        endpoint: "program",
        id_field: "PROGRAM_ID",
        query_param: "program_id",
        label: "Program",
        extra_scope: &[],
    },
    LevelDescriptor {
        level: HierarchyLevel::Branch,
        table: "branch",
        endpoint: "branch",
        id_field: "BRANCH_ID",
        query_param: "branch_id",
        label: "Branch",
        extra_scope: &[],
    },
    LevelDescriptor {
        level: HierarchyLevel::Year,
        table: "year",
        endpoint: "year",
        id_field: "YEAR_ID",
        query_param: "year_id",
        label: "Year",
        extra_scope: &[],
    },
    LevelDescriptor {
        level: HierarchyLevel::Semester,
        table: "semester",
        endpoint: "semester",
        id_field: "SEMESTER_ID",
        query_param: "semester_id",
        label: "Semester",
        extra_scope: &[HierarchyLevel::Branch],
    },
];

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 6] = [
        Self::University,
        Self::Institute,
        Self::Program,
        Self::Branch,
        Self::Year,
        Self::Semester,
    ];

    pub fn descriptor(self) -> &'static LevelDescriptor {
        &CHAIN[self as usize]
    }

    pub fn parent(self) -> Option<HierarchyLevel> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn child(self) -> Option<HierarchyLevel> {
        Self::ALL.get(self as usize + 1).copied()
    }

    /// Level whose table is `table`, if the table belongs to the chain.
    pub fn for_table(table: &str) -> Option<HierarchyLevel> {
        CHAIN.iter().find(|d| d.table == table).map(|d| d.level)
    }

    /// Contiguous chain from `from` through `to`, both inclusive.
    pub fn span(from: HierarchyLevel, to: HierarchyLevel) -> Vec<HierarchyLevel> {
        Self::ALL[from as usize..=to as usize].to_vec()
    }

    /// Every ancestor from the root down to the direct parent.
    pub fn ancestors(self) -> Vec<HierarchyLevel> {
        Self::ALL[..self as usize].to_vec()
    }
}

/// One selectable option in a cascade level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl HierarchyNode {
    /// Builds a node from a raw record of `level`'s table.
    ///
    /// The display name is taken from `NAME`, then `<TABLE>_NAME`, then falls
    /// back to the id. Returns `None` when the id column is missing.
    pub fn from_record(level: HierarchyLevel, record: &MasterRecord) -> Option<Self> {
        let desc = level.descriptor();
        let id = record.id_of(desc.id_field)?;
        let own_name = format!("{}_NAME", desc.table.to_uppercase());
        let name = record
            .id_of("NAME")
            .or_else(|| record.id_of(&own_name))
            .unwrap_or_else(|| id.clone());
        let parent_id = level
            .parent()
            .and_then(|p| record.id_of(p.descriptor().id_field));
        Some(Self { id, name, parent_id })
    }
}
