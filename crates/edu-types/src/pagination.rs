use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a paginated list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Append the next page's rows, adopting its cursor.
    pub fn merge(&mut self, other: Page<T>) {
        self.count = other.count.max(self.count);
        self.next = other.next;
        self.results.extend(other.results);
    }

    /// Like [`Page::merge`], but skips rows whose key is already present.
    /// Rows inserted locally shift server offsets, so the next page can
    /// repeat them.
    pub fn merge_unique_by<K, F>(&mut self, other: Page<T>, key: F)
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let Page { count, next, results, .. } = other;
        self.count = count.max(self.count);
        self.next = next;
        for row in results {
            let k = key(&row);
            if !self.results.iter().any(|seen| key(seen) == k) {
                self.results.push(row);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            ordering: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    /// Insert the filter only when a value is present and not blank.
    pub fn filter_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value.map(|v| v.to_string()).filter(|v| !v.trim().is_empty()) {
            Some(v) => self.filter(key, v),
            None => self,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering".to_string(), ordering.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_render_in_stable_order() {
        let query = ListQuery::new(2, 12)
            .search("  python ")
            .ordering("-rating")
            .filter("region", 7)
            .filter("field", 3);

        let pairs = query.pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["page", "page_size", "search", "ordering", "field", "region"]);
        assert_eq!(pairs[2].1, "python");
    }

    #[test]
    fn blank_search_and_filters_are_dropped() {
        let query = ListQuery::default()
            .search("   ")
            .filter_opt("region", Some(""))
            .filter_opt("field", None::<i64>);
        assert_eq!(query.pairs().len(), 2);
    }

    #[test]
    fn page_decodes_without_cursors() {
        let page: Page<i64> = serde_json::from_str(r#"{"count": 2, "results": [1, 2]}"#).unwrap();
        assert!(!page.has_next());
        assert_eq!(page.results, vec![1, 2]);
    }

    #[test]
    fn merge_appends_rows_and_moves_cursor() {
        let mut first = Page {
            count: 3,
            next: Some("/centers/?page=2".into()),
            previous: None,
            results: vec![1, 2],
        };
        first.merge(Page {
            count: 3,
            next: None,
            previous: Some("/centers/?page=1".into()),
            results: vec![3],
        });
        assert_eq!(first.results, vec![1, 2, 3]);
        assert!(!first.has_next());
    }

    #[test]
    fn merge_unique_skips_rows_already_shown() {
        let mut first = Page {
            count: 4,
            next: Some("/comments/?page=2".into()),
            previous: None,
            results: vec![(9, "fresh"), (1, "a"), (2, "b")],
        };
        first.merge_unique_by(
            Page {
                count: 4,
                next: None,
                previous: Some("/comments/?page=1".into()),
                results: vec![(2, "b"), (3, "c")],
            },
            |row| row.0,
        );
        assert_eq!(first.results, vec![(9, "fresh"), (1, "a"), (2, "b"), (3, "c")]);
        assert!(!first.has_next());
    }
}
