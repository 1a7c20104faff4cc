//! Column model, sorting and pagination math shared by the table and card
//! views.

use std::cmp::Ordering;
use std::sync::Arc;

/// Value a column sorts by.
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortValue::Text(a), SortValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

type CellFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type SortFn<T> = Arc<dyn Fn(&T) -> Option<SortValue> + Send + Sync>;

pub struct Column<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub cell: CellFn<T>,
    pub sort: Option<SortFn<T>>,
    pub hide_on_mobile: bool,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            label: self.label,
            cell: Arc::clone(&self.cell),
            sort: self.sort.clone(),
            hide_on_mobile: self.hide_on_mobile,
        }
    }
}

impl<T: 'static> Column<T> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        cell: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            label,
            cell: Arc::new(cell),
            sort: None,
            hide_on_mobile: false,
        }
    }

    pub fn sort_by(mut self, sort: impl Fn(&T) -> Option<SortValue> + Send + Sync + 'static) -> Self {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Sort on the rendered cell text; blank cells count as missing.
    pub fn sort_text(mut self) -> Self {
        let cell = Arc::clone(&self.cell);
        self.sort = Some(Arc::new(move |row: &T| {
            let text = cell(row);
            (!text.trim().is_empty()).then_some(SortValue::Text(text))
        }));
        self
    }

    pub fn hide_on_mobile(mut self) -> Self {
        self.hide_on_mobile = true;
        self
    }

    pub fn is_sortable(&self) -> bool {
        self.sort.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStyle {
    Primary,
    Secondary,
    Danger,
}

impl ActionStyle {
    pub fn class(&self) -> &'static str {
        match self {
            ActionStyle::Primary => "btn btn-sm btn-primary",
            ActionStyle::Secondary => "btn btn-sm btn-secondary",
            ActionStyle::Danger => "btn btn-sm btn-danger",
        }
    }
}

pub struct RowAction<T> {
    pub label: &'static str,
    pub style: ActionStyle,
    pub handler: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            style: self.style,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> RowAction<T> {
    pub fn new(label: &'static str, style: ActionStyle, handler: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            label,
            style,
            handler: Arc::new(handler),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState(Option<(&'static str, SortDirection)>);

impl SortState {
    pub fn active(&self) -> Option<(&'static str, SortDirection)> {
        self.0
    }

    pub fn direction_of(&self, key: &str) -> Option<SortDirection> {
        self.0.filter(|(k, _)| *k == key).map(|(_, d)| d)
    }

    /// Header click: ascending, then descending, then unsorted. A different
    /// column starts over at ascending.
    pub fn toggled(self, key: &'static str) -> Self {
        match self.0 {
            Some((k, SortDirection::Ascending)) if k == key => Self(Some((key, SortDirection::Descending))),
            Some((k, SortDirection::Descending)) if k == key => Self(None),
            _ => Self(Some((key, SortDirection::Ascending))),
        }
    }
}

/// Stable sort; rows without a value go last in either direction.
pub fn sort_rows<T>(rows: &mut [T], key: impl Fn(&T) -> Option<SortValue>, direction: SortDirection) {
    rows.sort_by(|a, b| match (key(a), key(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering = x.compare(&y);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    });
}

pub fn apply_sort<T>(mut rows: Vec<T>, columns: &[Column<T>], state: SortState) -> Vec<T> {
    let Some((key, direction)) = state.active() else {
        return rows;
    };
    if let Some(sort) = columns.iter().find(|c| c.key == key).and_then(|c| c.sort.as_ref()) {
        sort_rows(&mut rows, |row| sort(row), direction);
    }
    rows
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Gap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let mut pagination = Self {
            page,
            page_size: page_size.max(1),
            total,
        };
        pagination.page = pagination.clamp(page);
        pagination
    }

    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        self.total.div_ceil(size).min(u64::from(u32::MAX)) as u32
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.page_count().max(1))
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// "Showing 11–20 of 53".
    pub fn range_text(&self) -> String {
        if self.total == 0 {
            return "No results".to_string();
        }
        let size = u64::from(self.page_size);
        let start = u64::from(self.page - 1) * size + 1;
        let end = (start + size - 1).min(self.total);
        format!("Showing {start}\u{2013}{end} of {}", self.total)
    }

    /// First, last and the current page with one neighbour each side;
    /// skipped runs collapse into a gap.
    pub fn window(&self) -> Vec<PageItem> {
        let last = self.page_count();
        if last == 0 {
            return Vec::new();
        }

        let mut pages: Vec<u32> = vec![1, last, self.page.saturating_sub(1), self.page, self.page + 1];
        pages.retain(|p| (1..=last).contains(p));
        pages.sort_unstable();
        pages.dedup();

        let mut items = Vec::with_capacity(pages.len() + 2);
        let mut previous = 0;
        for page in pages {
            if previous != 0 && page > previous + 1 {
                items.push(PageItem::Gap);
            }
            items.push(PageItem::Page(page));
            previous = page;
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: &'static str,
        rating: Option<f64>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "beta", rating: Some(4.5) },
            Row { name: "Alpha", rating: None },
            Row { name: "gamma", rating: Some(10.0) },
            Row { name: "delta", rating: Some(4.5) },
        ]
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", "Name", |r: &Row| r.name.to_string()).sort_text(),
            Column::new("rating", "Rating", |r: &Row| r.rating.map(|v| v.to_string()).unwrap_or_default())
                .sort_by(|r| r.rating.map(SortValue::Number)),
            Column::new("notes", "Notes", |_: &Row| String::new()),
        ]
    }

    fn names(rows: &[Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn sort_cycle() {
        let state = SortState::default().toggled("name");
        assert_eq!(state.active(), Some(("name", SortDirection::Ascending)));
        let state = state.toggled("name");
        assert_eq!(state.direction_of("name"), Some(SortDirection::Descending));
        assert_eq!(state.toggled("name"), SortState::default());
        assert_eq!(
            state.toggled("rating").active(),
            Some(("rating", SortDirection::Ascending))
        );
    }

    #[test]
    fn text_sort_ignores_case() {
        let sorted = apply_sort(rows(), &columns(), SortState::default().toggled("name"));
        assert_eq!(names(&sorted), ["Alpha", "beta", "delta", "gamma"]);
    }

    #[test]
    fn numbers_sort_numerically_missing_last_and_stable() {
        let ascending = SortState::default().toggled("rating");
        assert_eq!(names(&apply_sort(rows(), &columns(), ascending)), ["beta", "delta", "gamma", "Alpha"]);

        let descending = ascending.toggled("rating");
        assert_eq!(names(&apply_sort(rows(), &columns(), descending)), ["gamma", "beta", "delta", "Alpha"]);
    }

    #[test]
    fn unsortable_column_keeps_order() {
        let state = SortState::default().toggled("notes");
        assert_eq!(apply_sort(rows(), &columns(), state), rows());
        assert!(!columns()[2].is_sortable());
    }

    #[test]
    fn page_count_and_clamp() {
        assert_eq!(Pagination::new(1, 10, 0).page_count(), 0);
        assert_eq!(Pagination::new(1, 10, 53).page_count(), 6);
        assert_eq!(Pagination::new(1, 10, 50).page_count(), 5);
        assert_eq!(Pagination::new(9, 10, 53).page, 6);
        assert_eq!(Pagination::new(0, 10, 53).page, 1);
        assert_eq!(Pagination::new(3, 10, 0).page, 1);
    }

    #[test]
    fn range_text() {
        assert_eq!(Pagination::new(2, 10, 53).range_text(), "Showing 11\u{2013}20 of 53");
        assert_eq!(Pagination::new(6, 10, 53).range_text(), "Showing 51\u{2013}53 of 53");
        assert_eq!(Pagination::new(1, 10, 0).range_text(), "No results");
    }

    #[test]
    fn window_with_gaps() {
        use PageItem::{Gap, Page};

        assert_eq!(Pagination::new(5, 10, 100).window(), [Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]);
        assert_eq!(Pagination::new(1, 10, 100).window(), [Page(1), Page(2), Gap, Page(10)]);
        assert_eq!(Pagination::new(2, 10, 30).window(), [Page(1), Page(2), Page(3)]);
        assert!(Pagination::new(1, 10, 0).window().is_empty());
    }

    #[test]
    fn prev_next() {
        let first = Pagination::new(1, 10, 25);
        assert!(!first.has_prev());
        assert!(first.has_next());
        let last = Pagination::new(3, 10, 25);
        assert!(last.has_prev());
        assert!(!last.has_next());
    }
}
