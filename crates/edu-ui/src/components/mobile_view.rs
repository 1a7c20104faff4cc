use leptos::prelude::*;

use crate::components::data_table::action_buttons;
use crate::table::{Column, RowAction};

/// One card per row; columns flagged `hide_on_mobile` are left out.
#[component]
pub fn MobileDataView<T>(
    #[prop(into)] rows: Signal<Vec<T>>,
    columns: Vec<Column<T>>,
    #[prop(optional)] actions: Vec<RowAction<T>>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    let columns: Vec<Column<T>> = columns.into_iter().filter(|c| !c.hide_on_mobile).collect();

    view! {
        <div class="card-list">
            {move || {
                rows.get()
                    .into_iter()
                    .map(|row| {
                        let fields = columns
                            .iter()
                            .map(|column| {
                                view! {
                                    <div class="card-row">
                                        <span class="card-label">{column.label}</span>
                                        <span class="card-value">{(column.cell)(&row)}</span>
                                    </div>
                                }
                            })
                            .collect_view();
                        let buttons = (!actions.is_empty())
                            .then(|| view! { <div class="card-actions">{action_buttons(&actions, &row)}</div> });
                        view! {
                            <div class="card data-card">
                                {fields}
                                {buttons}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
