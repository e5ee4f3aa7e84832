//! Чекбоксы выбора строк для таблиц master-списков
//!
//! # Пример
//!
//! ```rust,ignore
//! <SelectionHeaderCheckbox
//!     total=Signal::derive(move || list.with(|s| s.ids().len()))
//!     selected=Signal::derive(move || list.with(|s| s.selection_len()))
//!     on_change=Callback::new(move |all: bool| list.update(|s| s.select_all(all)))
//! />
//! ```

use leptos::prelude::*;
use thaw::*;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CheckboxState {
    Unchecked,
    Checked,
    Indeterminate,
}

/// Чекбокс в заголовке: unchecked / checked / indeterminate
#[component]
pub fn SelectionHeaderCheckbox(
    /// Количество строк
    #[prop(into)]
    total: Signal<usize>,
    /// Количество выбранных строк
    #[prop(into)]
    selected: Signal<usize>,
    /// true = выбрать все, false = снять все
    on_change: Callback<bool>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let checkbox_state = Signal::derive(move || {
        let (total, selected) = (total.get(), selected.get());
        if total == 0 || selected == 0 {
            CheckboxState::Unchecked
        } else if selected >= total {
            CheckboxState::Checked
        } else {
            CheckboxState::Indeterminate
        }
    });

    let checkbox_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        let state = checkbox_state.get();
        if let Some(input) = checkbox_ref.get() {
            input.set_indeterminate(matches!(state, CheckboxState::Indeterminate));
        }
    });

    view! {
        <TableHeaderCell class="fixed-checkbox-column">
            <input
                node_ref=checkbox_ref
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || matches!(checkbox_state.get(), CheckboxState::Checked)
                prop:disabled=move || disabled.get()
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </TableHeaderCell>
    }
}

/// Чекбокс в ячейке строки. Клик не всплывает до строки.
#[component]
pub fn SelectionCellCheckbox(
    #[prop(into)] checked: Signal<bool>,
    on_change: Callback<bool>,
) -> impl IntoView {
    view! {
        <TableCell class="fixed-checkbox-column" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || checked.get()
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </TableCell>
    }
}
