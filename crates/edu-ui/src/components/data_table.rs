use std::sync::Arc;

use leptos::prelude::*;

use crate::table::{apply_sort, Column, RowAction, SortDirection, SortState};

/// Desktop table with sortable headers and per-row action buttons.
#[component]
pub fn DataTable<T>(
    #[prop(into)] rows: Signal<Vec<T>>,
    columns: Vec<Column<T>>,
    #[prop(optional)] actions: Vec<RowAction<T>>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    let columns = Arc::new(columns);
    let actions = Arc::new(actions);
    let sort = RwSignal::new(SortState::default());

    let headers = columns
        .iter()
        .map(|column| {
            let key = column.key;
            let label = column.label;
            if column.is_sortable() {
                let indicator = move || match sort.get().direction_of(key) {
                    Some(SortDirection::Ascending) => " \u{25B2}",
                    Some(SortDirection::Descending) => " \u{25BC}",
                    None => "",
                };
                view! {
                    <th class="sortable" on:click=move |_| sort.update(|s| *s = s.toggled(key))>
                        {label}
                        {indicator}
                    </th>
                }
                .into_any()
            } else {
                view! { <th>{label}</th> }.into_any()
            }
        })
        .collect_view();

    let hasActions = !actions.is_empty();
    let body = move || {
        let sorted = apply_sort(rows.get(), &columns, sort.get());
        sorted
            .into_iter()
            .map(|row| {
                let cells = columns
                    .iter()
                    .map(|column| view! { <td>{(column.cell)(&row)}</td> })
                    .collect_view();
                let buttons = hasActions.then(|| {
                    view! { <td class="row-actions">{action_buttons(&actions, &row)}</td> }
                });
                view! {
                    <tr>
                        {cells}
                        {buttons}
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <div class="table-wrap">
            <table class="data-table">
                <thead>
                    <tr>
                        {headers}
                        {hasActions.then(|| view! { <th class="row-actions">"Actions"</th> })}
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}

pub(crate) fn action_buttons<T>(actions: &[RowAction<T>], row: &T) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    actions
        .iter()
        .map(|action| {
            let handler = Arc::clone(&action.handler);
            let row = row.clone();
            view! {
                <button class=action.style.class() on:click=move |_| handler(row.clone())>
                    {action.label}
                </button>
            }
        })
        .collect_view()
}
