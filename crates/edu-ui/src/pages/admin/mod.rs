//! Admin console: a dashboard plus one generic CRUD page per entity.

mod dashboard;
mod entities;

pub use dashboard::AdminDashboard;

use edu_client::{ApiError, Endpoint};
use edu_types::validation::FieldErrors;
use edu_types::{Id, ListQuery, Page, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;
use serde_json::Value;

use crate::api::{self, load, Latest, Loaded};
use crate::components::form::{EntityForm, FormField, FormValues};
use crate::components::modal::{ConfirmDialog, Modal};
use crate::components::pagination::Pager;
use crate::components::responsive_view::ResponsiveDataView;
use crate::components::search_box::SearchBox;
use crate::components::toast::use_toast;
use crate::table::{ActionStyle, Column, Pagination, RowAction};

/// Everything the generic CRUD page needs to know about one collection.
pub trait AdminEntity: Endpoint + Clone + Send + Sync + 'static {
    /// Plural heading, e.g. "Centers".
    const TITLE: &'static str;
    const SINGULAR: &'static str;
    /// `false` hides create and edit, leaving list and delete.
    const EDITABLE: bool = true;

    fn id(&self) -> Id;

    fn columns() -> Vec<Column<Self>>;

    /// Form layout. `editing` is true when an existing row is opened.
    fn form_fields(editing: bool) -> Vec<FormField>;

    /// Current row as form strings.
    fn form_values(&self) -> FormValues;

    fn defaults() -> FormValues {
        FormValues::new()
    }

    /// Short human label used in confirmations and toasts.
    fn describe(&self) -> String;
}

#[derive(Clone)]
enum Editing<E> {
    Create,
    Update(E),
}

/// Page number to show after deleting one row from `page`, given how many
/// rows that page held.
fn page_after_delete(page: u32, rows_on_page: usize) -> u32 {
    if rows_on_page <= 1 && page > 1 {
        page - 1
    } else {
        page
    }
}

fn bump(counter: RwSignal<u32>) {
    counter.update(|n| *n = n.wrapping_add(1));
}

pub fn crud_page<E: AdminEntity>() -> impl IntoView {
    let toast = use_toast();
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1u32);
    let reload = RwSignal::new(0u32);
    let rows = RwSignal::new(Loaded::<Page<E>>::Loading);
    let latest = Latest::new();

    let editing = RwSignal::new(None::<Editing<E>>);
    let deleting = RwSignal::new(None::<E>);
    let busy = RwSignal::new(false);
    let serverErrors = RwSignal::new(FieldErrors::new());

    Effect::new(move |_| {
        reload.track();
        let query = ListQuery::new(page.get(), DEFAULT_PAGE_SIZE).search(search.get());
        load(rows, latest, async move { api::client().list::<E>(&query).await });
    });

    let data = Signal::derive(move || rows.get().into_results());
    let total = move || rows.with(|r| r.ready().map(|p| p.count).unwrap_or(0));
    let pagination = Signal::derive(move || Pagination::new(page.get(), DEFAULT_PAGE_SIZE, total()));

    let mut actions = Vec::new();
    if E::EDITABLE {
        actions.push(RowAction::new("Edit", ActionStyle::Secondary, move |row: E| {
            serverErrors.set(FieldErrors::new());
            editing.set(Some(Editing::Update(row)));
        }));
    }
    actions.push(RowAction::new("Delete", ActionStyle::Danger, move |row: E| {
        deleting.set(Some(row));
    }));

    let openCreate = move |_: leptos::ev::MouseEvent| {
        serverErrors.set(FieldErrors::new());
        editing.set(Some(Editing::Create));
    };
    let closeEditor = Callback::new(move |_: ()| editing.set(None));
    let cancelDelete = Callback::new(move |_: ()| deleting.set(None));

    let save = Callback::new(move |payload: Value| {
        let Some(mode) = editing.get_untracked() else {
            return;
        };
        busy.set(true);
        serverErrors.set(FieldErrors::new());

        api::spawn(async move {
            let client = api::client();
            let result = match &mode {
                Editing::Create => client.create::<E>(&payload).await,
                Editing::Update(row) => client.update::<E>(row.id(), &payload).await,
            };
            match result {
                Ok(saved) => {
                    let verb = if matches!(mode, Editing::Create) { "created" } else { "updated" };
                    toast.success(format!("{} \"{}\" {verb}.", E::SINGULAR, saved.describe()));
                    editing.set(None);
                    bump(reload);
                }
                Err(ApiError::Validation(errors)) => serverErrors.set(errors),
                Err(e) => {
                    log::warn!("{}: save failed: {e}", E::PATH);
                    toast.error(e.to_string());
                }
            }
            busy.set(false);
        });
    });

    let confirmDelete = Callback::new(move |_: ()| {
        let Some(row) = deleting.get_untracked() else {
            return;
        };
        let onPage = rows.with_untracked(|r| r.ready().map(|p| p.results.len()).unwrap_or(0));
        busy.set(true);

        api::spawn(async move {
            match api::client().remove::<E>(row.id()).await {
                Ok(()) => {
                    toast.success(format!("{} \"{}\" deleted.", E::SINGULAR, row.describe()));
                    deleting.set(None);
                    let current = page.get_untracked();
                    let next = page_after_delete(current, onPage);
                    if next == current {
                        bump(reload);
                    } else {
                        page.set(next);
                    }
                }
                Err(e) => {
                    log::warn!("{}: delete failed: {e}", E::PATH);
                    toast.error(e.to_string());
                }
            }
            busy.set(false);
        });
    });

    view! {
        <div class="page-header">
            <h1>{E::TITLE}</h1>
            {E::EDITABLE
                .then(|| {
                    view! {
                        <button class="btn btn-primary" on:click=openCreate>
                            {format!("New {}", E::SINGULAR.to_lowercase())}
                        </button>
                    }
                })}
        </div>
        <div class="toolbar">
            <SearchBox
                value=search
                on_search=Callback::new(move |term: String| {
                    search.set(term);
                    page.set(1);
                })
                placeholder=format!("Search {}...", E::TITLE.to_lowercase())
            />
        </div>
        <ResponsiveDataView
            data=data
            columns=E::columns()
            actions=actions
            empty_message=format!("No {} found.", E::TITLE.to_lowercase())
        />
        <Pager pagination=pagination on_page=Callback::new(move |p: u32| page.set(p)) />
        {move || {
            editing
                .get()
                .map(|mode| {
                    let (title, fields, initial) = match &mode {
                        Editing::Create => {
                            (format!("New {}", E::SINGULAR.to_lowercase()), E::form_fields(false), E::defaults())
                        }
                        Editing::Update(row) => {
                            (format!("Edit {}", row.describe()), E::form_fields(true), row.form_values())
                        }
                    };
                    view! {
                        <Modal title=title on_close=closeEditor>
                            <EntityForm
                                fields=fields
                                initial=initial
                                busy=busy
                                server_errors=serverErrors
                                on_submit=save
                                on_cancel=closeEditor
                            />
                        </Modal>
                    }
                })
        }}
        {move || {
            deleting
                .get()
                .map(|row| {
                    view! {
                        <ConfirmDialog
                            message=format!(
                                "Delete {} \"{}\"? This cannot be undone.",
                                E::SINGULAR.to_lowercase(),
                                row.describe(),
                            )
                            busy=busy
                            on_confirm=confirmDelete
                            on_cancel=cancelDelete
                        />
                    }
                })
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleting_last_row_steps_back_a_page() {
        assert_eq!(page_after_delete(3, 1), 2);
        assert_eq!(page_after_delete(3, 5), 3);
        assert_eq!(page_after_delete(1, 1), 1);
    }
}
