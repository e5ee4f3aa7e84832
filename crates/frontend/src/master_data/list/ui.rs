use contracts::master::hierarchy::HierarchyLevel;
use contracts::master::record::MasterRecord;
use contracts::master::table::MasterTable;
use contracts::system::auth::Session;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::controller::MasterListController;
use super::state::ListState;
use crate::master_data::cascade::{CascadeSelector, CascadeState};
use crate::master_data::pages::MasterPage;
use crate::master_data::renderer::{blank_record, label_for, RecordEditForm, RelatedOptions};
use crate::shared::components::error_banner::ErrorBanner;
use crate::shared::components::table_checkbox::{SelectionCellCheckbox, SelectionHeaderCheckbox};
use crate::shared::error::{CoreError, CoreResult};
use crate::shared::http_client::HttpClient;
use crate::system::permissions::{use_page_permissions, PageAccess};
use crate::system::session::context::{end_session, use_http_client, use_session};

type Controller = StoredValue<MasterListController<HttpClient>>;

/// Log `e`, end the session on 401 and show the message in `banner`.
fn report(
    banner: RwSignal<Option<String>>,
    set_session: WriteSignal<Option<Session>>,
    e: &CoreError,
) {
    log::error!("{}", e);
    if e.requires_login() {
        end_session(set_session);
    }
    let _ = banner.try_set(Some(e.user_message()));
}

/// Apply a finished list call if the page still exists.
///
/// `None` once the page is disposed; otherwise the error still to report.
fn apply_refresh(
    list: RwSignal<ListState>,
    loading: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    result: CoreResult<Vec<MasterRecord>>,
) -> Option<CoreResult<()>> {
    if loading.try_set(false).is_some() {
        return None;
    }
    match result {
        Ok(records) => {
            list.try_update(|s| s.set_records(records))?;
            let _ = error.try_set(None);
            Some(Ok(()))
        }
        Err(e) => Some(Err(e)),
    }
}

fn refresh(
    controller: Controller,
    list: RwSignal<ListState>,
    loading: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    set_session: WriteSignal<Option<Session>>,
) {
    let Some(c) = controller.try_get_value() else {
        return;
    };
    loading.set(true);
    spawn_local(async move {
        let result = c.list().await;
        match apply_refresh(list, loading, error, result) {
            None => log::debug!("{} list closed before the refresh finished", c.table()),
            Some(Ok(())) => {}
            Some(Err(e)) => report(error, set_session, &e),
        }
    });
}

/// Generic CRUD screen for one master table.
#[component]
pub fn MasterListPage(page: &'static MasterPage) -> impl IntoView {
    let table = page.table();
    let (_, set_session) = use_session();
    let controller: Controller = StoredValue::new(
        MasterListController::new(use_http_client(), table.clone()).with_endpoint(page.endpoint()),
    );
    let access = use_page_permissions(page.menu_path.to_string());

    let list = RwSignal::new(ListState::new(&table));
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let deleting = RwSignal::new(false);
    let editing = RwSignal::new(None::<MasterRecord>);

    let load = move || refresh(controller, list, loading, error, set_session);

    let open_create = move || {
        let template = list.with(|s| s.records().first().cloned());
        let table = controller.with_value(|c| c.table().clone());
        editing.set(Some(blank_record(&table, template.as_ref())));
    };

    let open_edit = move |id: String| {
        if let Some(record) = list.with(|s| s.find(&id).cloned()) {
            editing.set(Some(record));
        }
    };

    let delete_selected = move || {
        let ids = list.with(|s| s.selected_ids());
        if ids.is_empty() {
            return;
        }
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("Delete {} selected record(s)?", ids.len()))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let gate = access.gate();
        let c = controller.get_value();
        deleting.set(true);
        spawn_local(async move {
            let result = c.bulk_delete(gate, &ids).await;
            if deleting.try_set(false).is_some() {
                return;
            }
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => return report(error, set_session, &e),
            };
            if let Some((_, e)) = outcome.failed.iter().find(|(_, e)| e.requires_login()) {
                return report(error, set_session, e);
            }
            match &outcome.refreshed {
                Ok(records) => list.update(|s| s.set_records(records.clone())),
                Err(e) => report(error, set_session, e),
            }
            match outcome.failure_message() {
                Some(message) => error.set(Some(message)),
                None => log::info!("Deleted {} {} record(s)", outcome.deleted.len(), c.table()),
            }
        });
    };

    // First load once viewing is allowed; denied pages never hit the list.
    let started = StoredValue::new(false);
    Effect::new(move |_| {
        if access.can_list() && !started.get_value() {
            started.set_value(true);
            load();
        }
    });

    let can_view = Signal::derive(move || access.get().can_view);
    let can_add = Signal::derive(move || access.get().can_add);
    let can_delete = Signal::derive(move || access.get().can_delete);
    let selection_len = Signal::derive(move || list.with(|s| s.selection_len()));

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{page.title}</h1>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| open_create()
                        disabled=Signal::derive(move || !can_add.get())
                    >
                        "New"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(move || !can_view.get() || loading.get())
                    >
                        "Refresh"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| delete_selected()
                        disabled=Signal::derive(move || {
                            !can_delete.get() || selection_len.get() == 0 || deleting.get()
                        })
                    >
                        {move || format!("Delete ({})", selection_len.get())}
                    </Button>
                </div>
            </div>

            <ErrorBanner error=error />

            {move || {
                (access.loaded.get() && !can_view.get()).then(|| view! {
                    <div class="warning-box">
                        <span class="warning-box__text">"You do not have access to this page."</span>
                    </div>
                })
            }}

            <Table>
                <TableHeader>
                    <TableRow>
                        <SelectionHeaderCheckbox
                            total=Signal::derive(move || list.with(|s| s.ids().len()))
                            selected=selection_len
                            on_change=Callback::new(move |all: bool| list.update(|s| s.select_all(all)))
                            disabled=Signal::derive(move || !can_delete.get())
                        />
                        {move || {
                            list.with(|s| s.columns().to_vec())
                                .into_iter()
                                .map(|key| view! { <TableHeaderCell>{label_for(&key)}</TableHeaderCell> })
                                .collect_view()
                        }}
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || {
                        if !can_view.get() {
                            return ().into_any();
                        }
                        if loading.get() {
                            return view! {
                                <TableRow>
                                    <TableCell attr:style="padding: 40px; text-align: center;">
                                        <Spinner />
                                    </TableCell>
                                </TableRow>
                            }
                            .into_any();
                        }
                        let (columns, rows) = list.with(|s| {
                            let rows: Vec<(Option<String>, MasterRecord)> = s
                                .records()
                                .iter()
                                .map(|r| (s.id_of(r), r.clone()))
                                .collect();
                            (s.columns().to_vec(), rows)
                        });
                        if rows.is_empty() {
                            return view! {
                                <TableRow>
                                    <TableCell attr:style="padding: 40px; text-align: center;">
                                        "No records"
                                    </TableCell>
                                </TableRow>
                            }
                            .into_any();
                        }
                        rows.into_iter()
                            .map(|(id, record)| {
                                let id = id.unwrap_or_default();
                                let id_for_click = id.clone();
                                let id_for_checked = id.clone();
                                let id_for_toggle = id.clone();
                                let cells = columns
                                    .iter()
                                    .map(|key| {
                                        let text = record.get(key).map(|v| v.to_input_string()).unwrap_or_default();
                                        view! { <TableCell>{text}</TableCell> }
                                    })
                                    .collect_view();
                                view! {
                                    <TableRow
                                        on:dblclick=move |_| open_edit(id_for_click.clone())
                                        attr:style="cursor: pointer;"
                                    >
                                        <SelectionCellCheckbox
                                            checked=Signal::derive(move || list.with(|s| s.is_selected(&id_for_checked)))
                                            on_change=Callback::new(move |checked: bool| {
                                                list.update(|s| s.set_selected(&id_for_toggle, checked))
                                            })
                                        />
                                        {cells}
                                    </TableRow>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </TableBody>
            </Table>

            {move || {
                editing.get().map(|record| view! {
                    <RecordEditModal
                        table=table.clone()
                        initial=record
                        access=access
                        controller=controller
                        list=list
                        editing=editing
                        set_session=set_session
                    />
                })
            }}
        </div>
    }
}

/// Parent chain and hidden id columns for a table of the hierarchy.
fn cascade_for(table: &MasterTable) -> (Option<CascadeState>, Vec<String>) {
    let Some(level) = HierarchyLevel::for_table(table.name()) else {
        return (None, Vec::new());
    };
    let hidden = level
        .ancestors()
        .iter()
        .map(|a| a.descriptor().id_field.to_string())
        .collect();
    let cascade = level
        .parent()
        .map(|parent| CascadeState::span(HierarchyLevel::University, parent));
    (cascade, hidden)
}

/// Create/edit dialog. Owns the record draft, related options and cascade
/// state; closing the dialog disposes all three.
#[component]
fn RecordEditModal(
    table: MasterTable,
    initial: MasterRecord,
    access: PageAccess,
    controller: Controller,
    list: RwSignal<ListState>,
    editing: RwSignal<Option<MasterRecord>>,
    set_session: WriteSignal<Option<Session>>,
) -> impl IntoView {
    let primary_key = table.primary_key();
    let seed = initial.clone();
    let record = RwSignal::new(initial);
    let related = RwSignal::new(RelatedOptions::default());
    let form_error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let (cascade, hidden_keys) = cascade_for(&table);
    let cascade = cascade.map(RwSignal::new);

    let is_editing = Signal::derive(move || record.with(|r| r.id_of(&primary_key).is_some()));
    let form_disabled = access.form_disabled(is_editing);

    let c = controller.get_value();
    spawn_local(async move {
        let options = c.load_related().await;
        if related.try_set(options).is_some() {
            log::debug!("{} form closed before related options arrived", c.table());
        }
    });

    let close = move || {
        if let Some(state) = cascade {
            state.update(|s| s.reset());
        }
        editing.set(None);
    };

    let save = move || {
        let mut payload = record.get_untracked();
        if let Some(state) = cascade {
            if let Err(level) = state.with_untracked(|s| s.write_selection(&mut payload)) {
                form_error.set(Some(format!("Select a {}", level.descriptor().label)));
                return;
            }
        }
        let gate = access.gate();
        let c = controller.get_value();
        saving.set(true);
        spawn_local(async move {
            let result = c.save_and_refresh(gate, &payload).await;
            let form_alive = saving.try_set(false).is_none();
            match result {
                Ok(records) => {
                    let _ = list.try_update(|s| s.set_records(records));
                    let _ = editing.try_set(None);
                }
                Err(e) if form_alive => report(form_error, set_session, &e),
                Err(e) => log::error!("Saving {} failed after its form closed: {}", c.table(), e),
            }
        });
    };

    let title = format!(
        "{} {}",
        if is_editing.get_untracked() { "Edit" } else { "New" },
        table.name()
    );

    view! {
        <div class="modal-overlay">
            <div class="modal-dialog">
                <div class="modal-header modal-header--compact">
                    <h3 class="modal-title">{title}</h3>
                </div>
                <ErrorBanner error=form_error />
                {cascade.map(|state| view! { <CascadeSelector state=state seed=seed disabled=form_disabled /> })}
                <RecordEditForm
                    table=table.clone()
                    record=record
                    related=related
                    disabled=form_disabled
                    hidden_keys=hidden_keys
                />
                <div class="modal-footer">
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| close()>
                        "Cancel"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| save()
                        disabled=Signal::derive(move || form_disabled.get() || saving.get())
                    >
                        {move || if saving.get() { "Saving…" } else { "Save" }}
                    </Button>
                </div>
            </div>
        </div>
    }
}
