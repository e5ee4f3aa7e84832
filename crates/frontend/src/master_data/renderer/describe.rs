use std::collections::HashMap;

use contracts::master::record::{is_audit_field, FieldValue, MasterRecord};
use contracts::master::table::MasterTable;


/// Where a foreign-key select takes its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeySource {
    pub table: &'static str,
    pub value_key: &'static str,
    pub label_key: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Text,
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Boolean,
    ForeignKeySelect {
        source: ForeignKeySource,
        options: Vec<SelectOption>,
    },
}

/// Editable field derived from a record at the moment it is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    pub widget: WidgetKind,
    pub required: bool,
    /// The primary key is shown but never edited.
    pub read_only: bool,
    pub value: FieldValue,
}

#[derive(Debug, Clone, Copy)]
enum FieldRule {
    Boolean,
    ForeignKey(ForeignKeySource),
    Percentage,
}

struct FieldOverride {
    /// `None` applies to every table.
    table: Option<&'static str>,
    key: &'static str,
    rule: FieldRule,
}

const COUNTRY_SOURCE: ForeignKeySource = ForeignKeySource {
    table: "country",
    value_key: "COUNTRY_ID",
    label_key: "NAME",
};

const STATE_SOURCE: ForeignKeySource = ForeignKeySource {
    table: "state",
    value_key: "STATE_ID",
    label_key: "NAME",
};

/// Checked in order; first match wins.
const FIELD_OVERRIDES: [FieldOverride; 4] = [
    FieldOverride {
        table: None,
        key: "IS_ACTIVE",
        rule: FieldRule::Boolean,
    },
    FieldOverride {
        table: Some("state"),
        key: "COUNTRY",
        rule: FieldRule::ForeignKey(COUNTRY_SOURCE),
    },
    FieldOverride {
        table: Some("city"),
        key: "STATE",
        rule: FieldRule::ForeignKey(STATE_SOURCE),
    },
    FieldOverride {
        table: None,
        key: "RESERVATION_PERCENTAGE",
        rule: FieldRule::Percentage,
    },
];

const OPTIONAL_TEXT_FIELDS: [&str; 1] = ["DESCRIPTION"];

fn rule_for(table: &str, key: &str) -> Option<FieldRule> {
    FIELD_OVERRIDES
        .iter()
        .find(|o| o.key == key && o.table.map_or(true, |t| t == table))
        .map(|o| o.rule)
}

/// Foreign-key sources that `table`'s edit form needs, as `(field, source)`.
pub fn foreign_key_sources(table: &str) -> Vec<(&'static str, ForeignKeySource)> {
    FIELD_OVERRIDES
        .iter()
        .filter(|o| o.table == Some(table))
        .filter_map(|o| match o.rule {
            FieldRule::ForeignKey(source) => Some((o.key, source)),
            _ => None,
        })
        .collect()
}

/// Option lists for foreign-key selects, keyed by source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedOptions {
    by_table: HashMap<String, Vec<SelectOption>>,
}

impl RelatedOptions {
    pub fn insert_records(&mut self, source: &ForeignKeySource, records: &[MasterRecord]) {
        let options = records
            .iter()
            .filter_map(|r| {
                let value = r.id_of(source.value_key)?;
                let label = r.id_of(source.label_key).unwrap_or_else(|| value.clone());
                Some(SelectOption { value, label })
            })
            .collect();
        self.by_table.insert(source.table.to_string(), options);
    }

    pub fn get(&self, table: &str) -> &[SelectOption] {
        self.by_table.get(table).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `STATE_ID` → `STATE ID`
pub fn label_for(key: &str) -> String {
    key.replace('_', " ")
}

/// Field descriptors of `record`, in the record's own field order.
pub fn describe(table: &MasterTable, record: &MasterRecord, related: &RelatedOptions) -> Vec<FieldDescriptor> {
    let primary_key = table.primary_key();

    record
        .iter()
        .filter(|(key, _)| !is_audit_field(key))
        .map(|(key, value)| {
            let (widget, required) = match rule_for(table.name(), key) {
                Some(FieldRule::Boolean) => (WidgetKind::Boolean, false),
                Some(FieldRule::ForeignKey(source)) => (
                    WidgetKind::ForeignKeySelect {
                        source,
                        options: related.get(source.table).to_vec(),
                    },
                    true,
                ),
                Some(FieldRule::Percentage) => (
                    WidgetKind::Number {
                        min: Some(0.0),
                        max: Some(100.0),
                        step: Some(0.01),
                    },
                    true,
                ),
                None => (WidgetKind::Text, !OPTIONAL_TEXT_FIELDS.contains(&key)),
            };
            let read_only = key == primary_key;
            FieldDescriptor {
                key: key.to_string(),
                label: label_for(key),
                widget,
                required: required && !read_only,
                read_only,
                value: value.clone(),
            }
        })
        .collect()
}

/// Empty record for the create form, shaped like `template` when one exists.
pub fn blank_record(table: &MasterTable, template: Option<&MasterRecord>) -> MasterRecord {
    let keys: Vec<String> = match template {
        Some(t) => t.keys().map(str::to_string).collect(),
        None => vec![
            table.primary_key(),
            "NAME".to_string(),
            "DESCRIPTION".to_string(),
            "IS_ACTIVE".to_string(),
        ],
    };
    keys.into_iter()
        .filter(|k| !is_audit_field(k))
        .map(|k| {
            let value = if k == "IS_ACTIVE" {
                FieldValue::Bool(true)
            } else {
                FieldValue::Null
            };
            (k, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_record() -> MasterRecord {
        [
            ("CITY_ID", FieldValue::from(4_i64)),
            ("NAME", FieldValue::from("Nagpur")),
            ("STATE", FieldValue::from(2_i64)),
            ("DESCRIPTION", FieldValue::Null),
            ("IS_ACTIVE", FieldValue::from(true)),
            ("CREATED_AT", FieldValue::from("2024-01-01")),
            ("UPDATED_BY", FieldValue::from("admin")),
        ]
        .into_iter()
        .collect()
    }

    fn keys(descs: &[FieldDescriptor]) -> Vec<&str> {
        descs.iter().map(|d| d.key.as_str()).collect()
    }

    #[test]
    fn test_city_state_is_foreign_key_and_audit_hidden() {
        let mut related = RelatedOptions::default();
        let states: Vec<MasterRecord> = vec![
            [("STATE_ID", FieldValue::from(2_i64)), ("NAME", FieldValue::from("Maharashtra"))]
                .into_iter()
                .collect(),
        ];
        related.insert_records(&STATE_SOURCE, &states);

        let descs = describe(&MasterTable::new("city"), &city_record(), &related);
        assert_eq!(keys(&descs), vec!["CITY_ID", "NAME", "STATE", "DESCRIPTION", "IS_ACTIVE"]);
        assert!(descs.iter().all(|d| d.key != "CREATED_AT"));

        let state = descs.iter().find(|d| d.key == "STATE").unwrap();
        assert!(state.required);
        match &state.widget {
            WidgetKind::ForeignKeySelect { source, options } => {
                assert_eq!(source.value_key, "STATE_ID");
                assert_eq!(
                    options,
                    &vec![SelectOption {
                        value: "2".into(),
                        label: "Maharashtra".into()
                    }]
                );
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_field_order_is_source_order() {
        let rec: MasterRecord =
            serde_json::from_str(r#"{"Z_FIELD":"z","SHIFT_ID":1,"A_FIELD":"a","M_FIELD":"m"}"#)
                .unwrap();
        let descs = describe(&MasterTable::new("shift"), &rec, &RelatedOptions::default());
        assert_eq!(keys(&descs), vec!["Z_FIELD", "SHIFT_ID", "A_FIELD", "M_FIELD"]);
    }

    #[test]
    fn test_state_country_only_on_state_table() {
        let rec: MasterRecord = [("STATE_ID", 1_i64), ("COUNTRY", 3_i64)].into_iter().collect();
        let on_state = describe(&MasterTable::new("state"), &rec, &RelatedOptions::default());
        assert!(matches!(on_state[1].widget, WidgetKind::ForeignKeySelect { .. }));

        let on_other = describe(&MasterTable::new("university"), &rec, &RelatedOptions::default());
        assert_eq!(on_other[1].widget, WidgetKind::Text);

        // select without loaded options still renders
        match &on_state[1].widget {
            WidgetKind::ForeignKeySelect { options, .. } => assert!(options.is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_percentage_and_boolean_and_description() {
        let rec: MasterRecord = [
            ("CATEGORY_ID", FieldValue::from(1_i64)),
            ("RESERVATION_PERCENTAGE", FieldValue::from("12.5")),
            ("IS_ACTIVE", FieldValue::from(false)),
            ("DESCRIPTION", FieldValue::Null),
            ("SHORT_NAME", FieldValue::Null),
        ]
        .into_iter()
        .collect();
        let descs = describe(&MasterTable::new("category"), &rec, &RelatedOptions::default());

        assert_eq!(
            descs[1].widget,
            WidgetKind::Number {
                min: Some(0.0),
                max: Some(100.0),
                step: Some(0.01)
            }
        );
        assert!(descs[1].required);
        assert_eq!(descs[2].widget, WidgetKind::Boolean);
        assert!(!descs[3].required);
        assert_eq!(descs[4].widget, WidgetKind::Text);
        assert!(descs[4].required);
        assert_eq!(descs[4].label, "SHORT NAME");
    }

    #[test]
    fn test_primary_key_is_read_only() {
        let descs = describe(&MasterTable::new("city"), &city_record(), &RelatedOptions::default());
        assert!(descs[0].read_only);
        assert!(!descs[0].required);
        assert!(!descs[1].read_only);
    }

    #[test]
    fn test_foreign_key_sources() {
        assert_eq!(foreign_key_sources("city"), vec![("STATE", STATE_SOURCE)]);
        assert_eq!(foreign_key_sources("state"), vec![("COUNTRY", COUNTRY_SOURCE)]);
        assert!(foreign_key_sources("country").is_empty());
    }

    #[test]
    fn test_blank_record() {
        let blank = blank_record(&MasterTable::new("city"), Some(&city_record()));
        assert_eq!(
            blank.keys().collect::<Vec<_>>(),
            vec!["CITY_ID", "NAME", "STATE", "DESCRIPTION", "IS_ACTIVE"]
        );
        assert_eq!(blank.get("NAME"), Some(&FieldValue::Null));
        assert_eq!(blank.get("IS_ACTIVE"), Some(&FieldValue::Bool(true)));

        let fallback = blank_record(&MasterTable::new("shift"), None);
        assert_eq!(fallback.keys().next(), Some("SHIFT_ID"));
    }
}
