//! Sidebar registry of master-data screens.
//!
//! Every single-entity CRUD screen is one row here; the generic list page
//! does the rest.

use contracts::master::hierarchy::HierarchyLevel;
use contracts::master::table::MasterTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageGroup {
    Geography,
    Academic,
    General,
}

impl PageGroup {
    pub fn title(self) -> &'static str {
        match self {
            PageGroup::Geography => "Geography",
            PageGroup::Academic => "Academic structure",
            PageGroup::General => "General",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterPage {
    /// Path the permission rows are keyed by.
    pub menu_path: &'static str,
    pub table: &'static str,
    pub title: &'static str,
    pub group: PageGroup,
}

impl MasterPage {
    pub fn table(&self) -> MasterTable {
        MasterTable::new(self.table)
    }

    /// Level of the hierarchy chain this page edits, if any.
    pub fn hierarchy_level(&self) -> Option<HierarchyLevel> {
        HierarchyLevel::for_table(self.table)
    }

    /// REST collection of the page.
    ///
    /// Hierarchy tables use their level descriptor's endpoint so the list and
    /// the cascade selects hit the same collection; every other table follows
    /// the naming convention.
    pub fn endpoint(&self) -> String {
        match self.hierarchy_level() {
            Some(level) => level.descriptor().endpoint.to_string(),
            None => self.table().endpoint(),
        }
    }
}

const fn page(menu_path: &'static str, table: &'static str, title: &'static str, group: PageGroup) -> MasterPage {
    MasterPage {
        menu_path,
        table,
        title,
        group,
    }
}

pub const PAGES: &[MasterPage] = &[
    page("/master/country", "country", "Countries", PageGroup::Geography),
    page("/master/state", "state", "States", PageGroup::Geography),
    page("/master/city", "city", "Cities", PageGroup::Geography),
    page("/master/university", "university", "Universities", PageGroup::Academic),
    page("/master/institute", "institute", "Institutes", PageGroup::Academic),
    page("/master/program", "program", "Programs", PageGroup::Academic),
    page("/master/branch", "branch", "Branches", PageGroup::Academic),
    page("/master/year", "year", "Years", PageGroup::Academic),
    page("/master/semester", "semester", "Semesters", PageGroup::Academic),
    page("/master/currency", "currency", "Currencies", PageGroup::General),
    page("/master/category", "category", "Categories", PageGroup::General),
    page("/master/quota", "quota", "Quotas", PageGroup::General),
    page("/master/shift", "shift", "Shifts", PageGroup::General),
    page("/master/religion", "religion", "Religions", PageGroup::General),
    page("/master/nationality", "nationality", "Nationalities", PageGroup::General),
];

pub fn grouped() -> Vec<(PageGroup, Vec<&'static MasterPage>)> {
    let mut groups: Vec<(PageGroup, Vec<&'static MasterPage>)> = Vec::new();
    for page in PAGES {
        match groups.iter_mut().find(|(g, _)| *g == page.group) {
            Some((_, pages)) => pages.push(page),
            None => groups.push((page.group, vec![page])),
        }
    }
    groups
}
