use contracts::master::hierarchy::{HierarchyLevel, HierarchyNode};
use contracts::master::record::MasterRecord;

use crate::shared::error::CoreResult;

/// A child-options fetch issued by [`CascadeState`].
///
/// The result may only be applied through [`CascadeState::apply`], which
/// discards it when a newer selection superseded the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: HierarchyLevel,
    /// Selected parent id the fetch is filtered by; `None` for the root level.
    pub parent_id: Option<String>,
    /// Query parameters, e.g. `[("program_id", "3")]`.
    pub scope: Vec<(String, String)>,
    seq: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct LevelSlot {
    selected: Option<String>,
    options: Vec<HierarchyNode>,
    pending: Option<u64>,
}

impl LevelSlot {
    fn clear(&mut self) {
        self.selected = None;
        self.options.clear();
        self.pending = None;
    }
}

/// Selection state of one cascading form.
///
/// Invariant: the options of a level are valid only for the currently
/// selected parent; changing a selection clears every level below it.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeState {
    levels: Vec<HierarchyLevel>,
    slots: Vec<LevelSlot>,
    next_seq: u64,
}

impl CascadeState {
    /// Chain `from..=to`.
    pub fn span(from: HierarchyLevel, to: HierarchyLevel) -> Self {
        let levels = HierarchyLevel::span(from, to);
        let slots = vec![LevelSlot::default(); levels.len()];
        Self {
            levels,
            slots,
            next_seq: 0,
        }
    }

    pub fn full() -> Self {
        Self::span(HierarchyLevel::University, HierarchyLevel::Semester)
    }

    pub fn levels(&self) -> &[HierarchyLevel] {
        &self.levels
    }

    fn index_of(&self, level: HierarchyLevel) -> Option<usize> {
        self.levels.iter().position(|l| *l == level)
    }

    fn issue(&mut self, index: usize, parent_id: Option<String>, scope: Vec<(String, String)>) -> FetchTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.slots[index].pending = Some(seq);
        FetchTicket {
            level: self.levels[index],
            parent_id,
            scope,
            seq,
        }
    }

    /// Unscoped fetch for the first level of the chain.
    pub fn load_root(&mut self) -> FetchTicket {
        self.issue(0, None, Vec::new())
    }

    /// Select `id` at `level`.
    ///
    /// Clears the selection and options of every deeper level, then returns the
    /// fetch for the next level. A blank `id` clears without fetching.
    pub fn select(&mut self, level: HierarchyLevel, id: &str) -> Option<FetchTicket> {
        let Some(index) = self.index_of(level) else {
            log::warn!("Level {:?} is not part of this cascade", level);
            return None;
        };

        for slot in &mut self.slots[index + 1..] {
            slot.clear();
        }

        let id = id.trim();
        if id.is_empty() {
            self.slots[index].selected = None;
            return None;
        }
        self.slots[index].selected = Some(id.to_string());

        let child_index = index + 1;
        let child = *self.levels.get(child_index)?;
        let mut scope = vec![(level.descriptor().query_param.to_string(), id.to_string())];
        for extra in child.descriptor().extra_scope {
            if *extra == level {
                continue;
            }
            if let Some(value) = self.selected(*extra) {
                scope.push((extra.descriptor().query_param.to_string(), value.to_string()));
            }
        }
        Some(self.issue(child_index, Some(id.to_string()), scope))
    }

    /// Apply a finished fetch. Returns `false` when the ticket is stale.
    ///
    /// A failed fetch leaves the level without options; other levels are untouched.
    pub fn apply(&mut self, ticket: &FetchTicket, result: CoreResult<Vec<HierarchyNode>>) -> bool {
        let Some(index) = self.index_of(ticket.level) else {
            return false;
        };
        if self.slots[index].pending != Some(ticket.seq) {
            log::debug!(
                "Discarding stale {:?} options for parent {:?}",
                ticket.level,
                ticket.parent_id
            );
            return false;
        }
        let parent_selected = index
            .checked_sub(1)
            .and_then(|p| self.slots[p].selected.clone());
        if parent_selected != ticket.parent_id {
            return false;
        }

        let slot = &mut self.slots[index];
        slot.pending = None;
        slot.options = match result {
            Ok(nodes) => nodes,
            Err(e) => {
                log::warn!("Failed to load {:?} options: {}", ticket.level, e);
                Vec::new()
            }
        };
        true
    }

    /// Drop every selection, option list and in-flight ticket.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    pub fn selected(&self, level: HierarchyLevel) -> Option<&str> {
        let index = self.index_of(level)?;
        self.slots[index].selected.as_deref()
    }

    pub fn options(&self, level: HierarchyLevel) -> &[HierarchyNode] {
        self.index_of(level)
            .map(|i| self.slots[i].options.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_loading(&self, level: HierarchyLevel) -> bool {
        self.index_of(level)
            .map(|i| self.slots[i].pending.is_some())
            .unwrap_or(false)
    }

    /// Select the ancestors `record` already points at, root first.
    ///
    /// Stops at the first level whose id column is blank. Returns every child
    /// fetch the selections issued, in chain order.
    pub fn preselect(&mut self, record: &MasterRecord) -> Vec<FetchTicket> {
        let seeded: Vec<(HierarchyLevel, String)> = self
            .levels
            .iter()
            .map_while(|level| record.id_of(level.descriptor().id_field).map(|id| (*level, id)))
            .collect();
        seeded
            .into_iter()
            .filter_map(|(level, id)| self.select(level, &id))
            .collect()
    }

    /// Copy the selected ancestor ids into `record`.
    ///
    /// The last level of the chain is the record's direct parent and is always
    /// written; other levels only when `record` already has their column. An
    /// untouched chain leaves the record as it is. A chain selected only part
    /// of the way fails with the first unselected level and writes nothing.
    pub fn write_selection(&self, record: &mut MasterRecord) -> Result<(), HierarchyLevel> {
        let Some(deepest) = self.slots.iter().rposition(|s| s.selected.is_some()) else {
            return Ok(());
        };
        let last = self.levels.len() - 1;
        if deepest != last {
            return Err(self.levels[deepest + 1]);
        }
        for (index, (level, slot)) in self.levels.iter().zip(&self.slots).enumerate() {
            let Some(id) = slot.selected.as_deref() else {
                continue;
            };
            let column = level.descriptor().id_field;
            if index == last || record.contains_key(column) {
                record.set(column, id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::CoreError;
    use contracts::master::record::FieldValue;
    use HierarchyLevel::*;

    fn nodes(ids: &[&str]) -> Vec<HierarchyNode> {
        ids.iter()
            .map(|id| HierarchyNode {
                id: id.to_string(),
                name: format!("node {id}"),
                parent_id: None,
            })
            .collect()
    }

    fn ids(state: &CascadeState, level: HierarchyLevel) -> Vec<String> {
        state.options(level).iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_select_issues_scoped_child_fetch() {
        let mut state = CascadeState::full();
        let ticket = state.select(University, "1").unwrap();
        assert_eq!(ticket.level, Institute);
        assert_eq!(ticket.parent_id.as_deref(), Some("1"));
        assert_eq!(
            ticket.scope,
            vec![("university_id".to_string(), "1".to_string())]
        );
        assert!(state.is_loading(Institute));
        assert!(!state.is_loading(Program));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = CascadeState::full();
        let for_a = state.select(University, "A").unwrap();
        let for_b = state.select(University, "B").unwrap();

        // B settles first, A afterwards
        assert!(state.apply(&for_b, Ok(nodes(&["b1", "b2"]))));
        assert!(!state.apply(&for_a, Ok(nodes(&["a1"]))));
        assert_eq!(ids(&state, Institute), vec!["b1", "b2"]);

        // and in the opposite order
        let mut state = CascadeState::full();
        let for_a = state.select(University, "A").unwrap();
        let for_b = state.select(University, "B").unwrap();
        assert!(!state.apply(&for_a, Ok(nodes(&["a1"]))));
        assert!(state.apply(&for_b, Ok(nodes(&["b1"]))));
        assert_eq!(ids(&state, Institute), vec!["b1"]);
    }

    #[test]
    fn test_reselecting_same_parent_only_latest_applies() {
        let mut state = CascadeState::full();
        let first = state.select(University, "A").unwrap();
        let _b = state.select(University, "B").unwrap();
        let again = state.select(University, "A").unwrap();
        assert!(!state.apply(&first, Ok(nodes(&["old"]))));
        assert!(state.apply(&again, Ok(nodes(&["new"]))));
        assert_eq!(ids(&state, Institute), vec!["new"]);
    }

    #[test]
    fn test_ancestor_change_clears_descendants() {
        let mut state = CascadeState::full();
        let t = state.select(University, "1").unwrap();
        state.apply(&t, Ok(nodes(&["10"])));
        let t = state.select(Institute, "10").unwrap();
        state.apply(&t, Ok(nodes(&["100"])));
        let t = state.select(Program, "100").unwrap();
        state.apply(&t, Ok(nodes(&["1000"])));
        state.select(Branch, "1000");

        let t = state.select(Institute, "11").unwrap();
        assert_eq!(t.level, Program);
        assert_eq!(state.selected(Institute), Some("11"));
        for level in [Program, Branch, Year, Semester] {
            assert_eq!(state.selected(level), None, "{level:?}");
        }
        assert!(state.options(Branch).is_empty());
        assert!(state.options(Year).is_empty());
        assert_eq!(ids(&state, Institute), vec!["10"]);
    }

    #[test]
    fn test_empty_selection_clears_without_fetch() {
        let mut state = CascadeState::full();
        let t = state.select(University, "1").unwrap();
        state.apply(&t, Ok(nodes(&["10"])));
        let t = state.select(Institute, "10").unwrap();
        state.apply(&t, Ok(nodes(&["100"])));

        assert!(state.select(Institute, "").is_none());
        assert_eq!(state.selected(Institute), None);
        assert!(state.options(Program).is_empty());
        assert!(!state.is_loading(Program));
        assert_eq!(state.selected(University), Some("1"));

        assert!(state.select(University, "   ").is_none());
        assert!(state.options(Institute).is_empty());
    }

    #[test]
    fn test_empty_selection_invalidates_in_flight_fetch() {
        let mut state = CascadeState::full();
        let t = state.select(University, "1").unwrap();
        state.select(University, "");
        assert!(!state.apply(&t, Ok(nodes(&["10"]))));
        assert!(state.options(Institute).is_empty());
    }

    #[test]
    fn test_failed_fetch_leaves_level_empty_and_siblings_intact() {
        let mut state = CascadeState::full();
        let t = state.select(University, "1").unwrap();
        state.apply(&t, Ok(nodes(&["10", "11"])));
        let t = state.select(Institute, "10").unwrap();
        assert!(state.apply(&t, Err(CoreError::Network("timeout".into()))));
        assert!(state.options(Program).is_empty());
        assert!(!state.is_loading(Program));
        assert_eq!(ids(&state, Institute), vec!["10", "11"]);
    }

    #[test]
    fn test_semester_is_scoped_by_year_and_branch() {
        let mut state = CascadeState::span(Branch, Semester);
        state.select(Branch, "7");
        let t = state.select(Year, "3").unwrap();
        assert_eq!(t.level, Semester);
        assert_eq!(
            t.scope,
            vec![
                ("year_id".to_string(), "3".to_string()),
                ("branch_id".to_string(), "7".to_string()),
            ]
        );

        let mut state = CascadeState::span(Year, Semester);
        let t = state.select(Year, "3").unwrap();
        assert_eq!(t.scope, vec![("year_id".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_suffix_chain_root_and_unknown_level() {
        let mut state = CascadeState::span(Institute, Branch);
        assert_eq!(state.levels(), &[Institute, Program, Branch]);

        let root = state.load_root();
        assert_eq!(root.level, Institute);
        assert!(root.scope.is_empty());
        assert!(state.apply(&root, Ok(nodes(&["i1"]))));

        assert!(state.select(University, "1").is_none());
        assert!(state.select(Year, "1").is_none());
        assert_eq!(ids(&state, Institute), vec!["i1"]);

        // last level has no child to fetch
        assert!(state.select(Branch, "b").is_none());
        assert_eq!(state.selected(Branch), Some("b"));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut state = CascadeState::full();
        let root = state.load_root();
        state.apply(&root, Ok(nodes(&["u"])));
        let t = state.select(University, "u").unwrap();
        state.reset();
        assert!(!state.apply(&t, Ok(nodes(&["i"]))));
        assert!(state.options(University).is_empty());
        assert_eq!(state.selected(University), None);
    }

    #[test]
    fn test_write_selection_sets_parent_columns() {
        let mut state = CascadeState::span(University, Year);
        state.select(University, "u");
        state.select(Institute, "i");
        state.select(Program, "p");
        state.select(Branch, "b");
        state.select(Year, "y");

        let mut semester: MasterRecord = [
            ("SEMESTER_ID", FieldValue::Null),
            ("BRANCH_ID", FieldValue::from("old")),
            ("NAME", FieldValue::from("Sem 1")),
        ]
        .into_iter()
        .collect();
        assert_eq!(state.write_selection(&mut semester), Ok(()));

        assert_eq!(semester.id_of("YEAR_ID").as_deref(), Some("y"));
        assert_eq!(semester.id_of("BRANCH_ID").as_deref(), Some("b"));
        assert!(!semester.contains_key("UNIVERSITY_ID"));
        assert!(!semester.contains_key("PROGRAM_ID"));
    }

    #[test]
    fn test_write_selection_keeps_existing_parent_when_untouched() {
        let state = CascadeState::span(University, Institute);
        let mut program: MasterRecord = [("PROGRAM_ID", FieldValue::from(5i64)), ("INSTITUTE_ID", FieldValue::from(2i64))]
            .into_iter()
            .collect();
        assert_eq!(state.write_selection(&mut program), Ok(()));
        assert_eq!(program.id_of("INSTITUTE_ID").as_deref(), Some("2"));
    }

    #[test]
    fn test_write_selection_rejects_unselected_direct_parent() {
        let mut state = CascadeState::span(University, Institute);
        let mut program: MasterRecord = [("PROGRAM_ID", FieldValue::from(5i64)), ("INSTITUTE_ID", FieldValue::from(2i64))]
            .into_iter()
            .collect();
        let before = program.clone();

        // university changed, institute left blank
        state.select(University, "B");
        assert_eq!(state.write_selection(&mut program), Err(Institute));
        assert_eq!(program, before);

        // and after clearing a previously chosen institute
        state.select(Institute, "20");
        state.select(Institute, "");
        assert_eq!(state.write_selection(&mut program), Err(Institute));
        assert_eq!(program.id_of("INSTITUTE_ID").as_deref(), Some("2"));

        state.select(Institute, "21");
        assert_eq!(state.write_selection(&mut program), Ok(()));
        assert_eq!(program.id_of("INSTITUTE_ID").as_deref(), Some("21"));
    }

    #[test]
    fn test_preselect_follows_the_record_parents() {
        let mut state = CascadeState::span(University, Year);
        let root = state.load_root();
        let semester: MasterRecord = [
            ("SEMESTER_ID", FieldValue::from(9i64)),
            ("UNIVERSITY_ID", FieldValue::from(1i64)),
            ("INSTITUTE_ID", FieldValue::from(2i64)),
            ("PROGRAM_ID", FieldValue::from(3i64)),
            ("BRANCH_ID", FieldValue::from(4i64)),
            ("YEAR_ID", FieldValue::from(5i64)),
        ]
        .into_iter()
        .collect();

        let tickets = state.preselect(&semester);
        assert_eq!(
            tickets.iter().map(|t| t.level).collect::<Vec<_>>(),
            vec![Institute, Program, Branch, Year]
        );
        assert_eq!(tickets[3].parent_id.as_deref(), Some("4"));
        for level in [University, Institute, Program, Branch, Year] {
            assert!(state.selected(level).is_some(), "{level:?}");
        }

        assert!(state.apply(&root, Ok(nodes(&["1"]))));
        for t in &tickets {
            assert!(state.apply(t, Ok(nodes(&["x"]))), "{:?}", t.level);
        }

        let mut saved = semester.clone();
        assert_eq!(state.write_selection(&mut saved), Ok(()));
        for key in ["UNIVERSITY_ID", "INSTITUTE_ID", "PROGRAM_ID", "BRANCH_ID", "YEAR_ID"] {
            assert_eq!(saved.id_of(key), semester.id_of(key), "{key}");
        }
    }

    #[test]
    fn test_preselect_stops_at_first_blank_ancestor() {
        let mut state = CascadeState::span(University, Institute);
        let program: MasterRecord = [
            ("PROGRAM_ID", FieldValue::from(5i64)),
            ("UNIVERSITY_ID", FieldValue::Null),
            ("INSTITUTE_ID", FieldValue::from(2i64)),
        ]
        .into_iter()
        .collect();

        assert!(state.preselect(&program).is_empty());
        assert_eq!(state.selected(University), None);
        assert_eq!(state.selected(Institute), None);
    }
}
