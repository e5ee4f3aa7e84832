use contracts::master::record::MasterRecord;
use contracts::master::table::MasterTable;
use leptos::prelude::*;

use super::coerce::{apply, RawInput};
use super::describe::{describe, FieldDescriptor, RelatedOptions, WidgetKind};

fn current_value(record: RwSignal<MasterRecord>, key: &str) -> String {
    record.with(|r| r.get(key).map(|v| v.to_input_string()).unwrap_or_default())
}

fn write(record: RwSignal<MasterRecord>, descriptor: &FieldDescriptor, raw: RawInput) {
    let value = apply(descriptor, &raw);
    record.update(|r| r.set(descriptor.key.clone(), value));
}

fn field_view(
    descriptor: FieldDescriptor,
    record: RwSignal<MasterRecord>,
    disabled: Signal<bool>,
) -> AnyView {
    let key = descriptor.key.clone();
    let id = format!("field-{}", key.to_lowercase());
    let label = descriptor.label.clone();
    let required = descriptor.required;
    let read_only = descriptor.read_only;

    let input = match descriptor.widget.clone() {
        WidgetKind::Boolean => {
            let k = key.clone();
            view! {
                <input
                    type="checkbox"
                    id=id.clone()
                    class="form-checkbox"
                    prop:checked=move || record.with(|r| r.get(&k).map(|v| v.as_bool()).unwrap_or(false))
                    disabled=move || disabled.get()
                    on:change=move |ev| write(record, &descriptor, RawInput::checkbox(event_target_checked(&ev)))
                />
            }
            .into_any()
        }
        WidgetKind::Number { min, max, step } => {
            let k = key.clone();
            view! {
                <input
                    type="number"
                    id=id.clone()
                    min=min.map(|v| v.to_string())
                    max=max.map(|v| v.to_string())
                    step=step.map(|v| v.to_string())
                    required=required
                    prop:value=move || current_value(record, &k)
                    disabled=move || disabled.get()
                    on:input=move |ev| write(record, &descriptor, RawInput::number(event_target_value(&ev)))
                />
            }
            .into_any()
        }
        WidgetKind::ForeignKeySelect { options, source } => {
            let selected = current_value(record, &key);
            view! {
                <select
                    id=id.clone()
                    class="form-select"
                    required=required
                    disabled=move || disabled.get()
                    on:change=move |ev| write(record, &descriptor, RawInput::select(event_target_value(&ev)))
                >
                    <option value="">{format!("Select {}", source.table)}</option>
                    {options
                        .into_iter()
                        .map(|o| {
                            let is_selected = o.value == selected;
                            view! { <option value=o.value selected=is_selected>{o.label}</option> }
                        })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
        WidgetKind::Text => {
            let k = key.clone();
            view! {
                <input
                    type="text"
                    id=id.clone()
                    required=required
                    readonly=read_only
                    prop:value=move || current_value(record, &k)
                    disabled=move || disabled.get()
                    on:input=move |ev| write(record, &descriptor, RawInput::text(event_target_value(&ev)))
                />
            }
            .into_any()
        }
    };

    view! {
        <div class="form-group">
            <label for=id>
                {label}
                {required.then(|| view! { <span class="form-required">" *"</span> })}
            </label>
            {input}
        </div>
    }
    .into_any()
}

/// Generic edit form for any master record.
///
/// Descriptors are derived once when the form opens and again only when the
/// related option lists change; typing never re-derives them.
#[component]
pub fn RecordEditForm(
    table: MasterTable,
    record: RwSignal<MasterRecord>,
    #[prop(into)] related: Signal<RelatedOptions>,
    #[prop(into)] disabled: Signal<bool>,
    /// Keys rendered elsewhere (cascade parents).
    #[prop(optional)]
    hidden_keys: Vec<String>,
) -> impl IntoView {
    view! {
        <div class="details-form">
            {move || {
                let descriptors = related.with(|rel| describe(&table, &record.get_untracked(), rel));
                descriptors
                    .into_iter()
                    .filter(|d| !hidden_keys.contains(&d.key))
                    .map(|d| field_view(d, record, disabled))
                    .collect_view()
            }}
        </div>
    }
}
