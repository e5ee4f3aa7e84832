use contracts::master::hierarchy::{HierarchyLevel, HierarchyNode};
use contracts::master::record::MasterRecord;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::fetch::fetch_options;
use super::state::{CascadeState, FetchTicket};
use crate::shared::error::CoreResult;
use crate::shared::http_client::HttpClient;
use crate::system::session::context::use_http_client;

/// Apply a finished fetch if the form still exists.
///
/// `None` once the form is disposed, otherwise whether the ticket was current.
fn apply_fetched(
    state: RwSignal<CascadeState>,
    ticket: &FetchTicket,
    result: CoreResult<Vec<HierarchyNode>>,
) -> Option<bool> {
    let applied = state.try_update(|s| s.apply(ticket, result));
    match applied {
        None => log::debug!("Cascade form closed before {:?} options arrived", ticket.level),
        Some(false) => {}
        Some(true) => log::debug!("Applied {:?} options", ticket.level),
    }
    applied
}

fn spawn_fetch(client: HttpClient, state: RwSignal<CascadeState>, ticket: FetchTicket) {
    spawn_local(async move {
        let result = fetch_options(&client, &ticket).await;
        apply_fetched(state, &ticket, result);
    });
}

/// One `<select>` per level of `state`'s chain.
///
/// The first level is loaded on mount and the chain is preselected from the
/// parent ids `seed` carries. The caller owns `state`, so dropping the form
/// drops the option caches with it.
#[component]
pub fn CascadeSelector(
    state: RwSignal<CascadeState>,
    seed: MasterRecord,
    #[prop(into, optional)] disabled: Signal<bool>,
) -> impl IntoView {
    let client = StoredValue::new(use_http_client());

    if let Some(tickets) = state.try_update(|s| {
        let mut tickets = vec![s.load_root()];
        tickets.extend(s.preselect(&seed));
        tickets
    }) {
        for ticket in tickets {
            spawn_fetch(client.get_value(), state, ticket);
        }
    }

    let on_select = move |level: HierarchyLevel, value: String| {
        if let Some(Some(ticket)) = state.try_update(|s| s.select(level, &value)) {
            spawn_fetch(client.get_value(), state, ticket);
        }
    };

    let levels = state.with_untracked(|s| s.levels().to_vec());

    view! {
        <div class="cascade-selector">
            {levels
                .into_iter()
                .map(|level| {
                    let desc = level.descriptor();
                    let current = seed.id_of(desc.id_field);
                    view! {
                        <div class="form-group">
                            <label for=desc.query_param>{desc.label}</label>
                            <select
                                id=desc.query_param
                                class="form-select"
                                disabled=move || disabled.get()
                                on:change=move |ev| on_select(level, event_target_value(&ev))
                            >
                                <option value="">{format!("Select {}", desc.label)}</option>
                                {move || {
                                    let (selected, options) = state.with(|s| {
                                        (
                                            s.selected(level).map(str::to_string),
                                            s.options(level).to_vec(),
                                        )
                                    });
                                    options
                                        .into_iter()
                                        .map(|node| {
                                            let is_selected = selected.as_deref() == Some(node.id.as_str());
                                            view! {
                                                <option value=node.id.clone() selected=is_selected>
                                                    {node.name}
                                                </option>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </select>
                            {move || state.with(|s| s.is_loading(level)).then(|| view! {
                                <span class="form-hint">"Loading…"</span>
                            })}
                            {move || {
                                let unselected = state.with(|s| s.selected(level).is_none());
                                current.clone().filter(|_| unselected).map(|id| view! {
                                    <span class="form-hint">{format!("Current {}: {}", desc.label, id)}</span>
                                })
                            }}
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
