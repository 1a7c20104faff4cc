use leptos::prelude::*;

use crate::api::Loaded;
use crate::components::data_table::DataTable;
use crate::components::mobile_view::MobileDataView;
use crate::components::status::{EmptyState, ErrorNotice, Spinner};
use crate::table::{Column, RowAction};
use crate::viewport::use_is_mobile;

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Loading,
    Failed(String),
    Empty,
    Rows,
}

/// Table on desktop, cards below the mobile breakpoint, plus the loading,
/// error and empty states.
#[component]
pub fn ResponsiveDataView<T>(
    #[prop(into)] data: Signal<Loaded<Vec<T>>>,
    columns: Vec<Column<T>>,
    #[prop(optional)] actions: Vec<RowAction<T>>,
    #[prop(into, default = "Nothing to show yet.".to_string())] empty_message: String,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    let mobile = use_is_mobile();
    let phase = Memo::new(move |_| {
        data.with(|d| match d {
            Loaded::Loading => Phase::Loading,
            Loaded::Failed(e) => Phase::Failed(e.clone()),
            Loaded::Ready(rows) if rows.is_empty() => Phase::Empty,
            Loaded::Ready(_) => Phase::Rows,
        })
    });
    let rows = Signal::derive(move || data.with(|d| d.ready().cloned().unwrap_or_default()));

    move || match phase.get() {
        Phase::Loading => view! { <Spinner /> }.into_any(),
        Phase::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Phase::Empty => view! { <EmptyState message=empty_message.clone() /> }.into_any(),
        Phase::Rows if mobile.get() => {
            view! { <MobileDataView rows=rows columns=columns.clone() actions=actions.clone() /> }
                .into_any()
        }
        Phase::Rows => {
            view! { <DataTable rows=rows columns=columns.clone() actions=actions.clone() /> }.into_any()
        }
    }
}
