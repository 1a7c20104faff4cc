//! Site-wide search across every public entity type.
//!
//! One filtered list request per kind goes out concurrently; results are
//! re-ranked locally with a simple text-match score and cut to the top N.
//! A kind whose request fails is skipped.

use std::cmp::Reverse;

use edu_types::{Branch, EducationalCenter, Field, Id, ListQuery, Page, Resource, Subject};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::transport::Transport;

pub const DEFAULT_LIMIT: usize = 20;
pub const PER_KIND: u32 = 10;

const EXACT: u32 = 100;
const PREFIX: u32 = 80;
const SUBSTRING: u32 = 60;
const WORD: u32 = 15;
const WORD_CAP: u32 = 45;

/// Declaration order doubles as the tie-break order between kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchKind {
    Center,
    Course,
    Subject,
    Resource,
    Branch,
}

impl SearchKind {
    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Center => "Center",
            SearchKind::Course => "Course",
            SearchKind::Subject => "Subject",
            SearchKind::Resource => "Resource",
            SearchKind::Branch => "Branch",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub kind: SearchKind,
    pub id: Id,
    pub title: String,
    pub subtitle: Option<String>,
    pub href: String,
    pub score: u32,
}

impl SearchHit {
    fn new(kind: SearchKind, id: Id, title: &str, subtitle: Option<String>, href: String) -> Self {
        Self {
            kind,
            id,
            title: title.to_string(),
            subtitle: subtitle.filter(|s| !s.trim().is_empty()),
            href,
            score: 0,
        }
    }
}

/// Match quality of `text` against `query`, case-insensitive.
pub fn score_text(query: &str, text: &str) -> u32 {
    let query = query.trim().to_lowercase();
    let text = text.trim().to_lowercase();
    if query.is_empty() || text.is_empty() {
        return 0;
    }
    if text == query {
        return EXACT;
    }
    if text.starts_with(&query) {
        return PREFIX;
    }
    if text.contains(&query) {
        return SUBSTRING;
    }

    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let matched = query
        .split_whitespace()
        .filter(|qw| words.iter().any(|w| w.starts_with(qw)))
        .count() as u32;
    (matched * WORD).min(WORD_CAP)
}

/// Title counts fully, subtitle at half weight.
pub fn score_hit(query: &str, title: &str, subtitle: Option<&str>) -> u32 {
    let titleScore = score_text(query, title);
    let subtitleScore = subtitle.map(|s| score_text(query, s) / 2).unwrap_or(0);
    titleScore.max(subtitleScore)
}

/// Score, drop non-matches, order and truncate.
pub fn rank(query: &str, hits: Vec<SearchHit>, limit: usize) -> Vec<SearchHit> {
    let mut scored: Vec<SearchHit> = hits
        .into_iter()
        .map(|mut hit| {
            hit.score = score_hit(query, &hit.title, hit.subtitle.as_deref());
            hit
        })
        .filter(|hit| hit.score > 0)
        .collect();

    scored.sort_by(|a, b| {
        (Reverse(a.score), a.kind, a.title.to_lowercase())
            .cmp(&(Reverse(b.score), b.kind, b.title.to_lowercase()))
    });
    scored.truncate(limit);
    scored
}

fn center_hits(page: Page<EducationalCenter>) -> Vec<SearchHit> {
    page.results
        .iter()
        .map(|c| {
            let subtitle = c
                .region_name()
                .map(str::to_string)
                .or_else(|| c.description.clone());
            SearchHit::new(SearchKind::Center, c.id, &c.name, subtitle, format!("/centers/{}", c.id))
        })
        .collect()
}

fn course_hits(page: Page<Field>) -> Vec<SearchHit> {
    page.results
        .iter()
        .map(|f| {
            SearchHit::new(SearchKind::Course, f.id, &f.name, f.description.clone(), format!("/courses/{}", f.id))
        })
        .collect()
}

fn subject_hits(page: Page<Subject>) -> Vec<SearchHit> {
    page.results
        .iter()
        .map(|s| {
            let href = match s.field_id.or(s.field.as_ref().map(|f| f.id)) {
                Some(fieldId) => format!("/courses/{fieldId}"),
                None => "/subjects".to_string(),
            };
            SearchHit::new(SearchKind::Subject, s.id, &s.name, s.field_name().map(str::to_string), href)
        })
        .collect()
}

fn resource_hits(page: Page<Resource>) -> Vec<SearchHit> {
    page.results
        .iter()
        .map(|r| {
            SearchHit::new(SearchKind::Resource, r.id, &r.title, r.description.clone(), format!("/resources/{}", r.id))
        })
        .collect()
}

fn branch_hits(page: Page<Branch>) -> Vec<SearchHit> {
    page.results
        .iter()
        .map(|b| {
            let subtitle = b.center_name.clone().or_else(|| b.address.clone());
            SearchHit::new(SearchKind::Branch, b.id, &b.name, subtitle, format!("/centers/{}", b.center_id))
        })
        .collect()
}

fn keep<E>(kind: SearchKind, result: Result<Page<E>, ApiError>, toHits: fn(Page<E>) -> Vec<SearchHit>) -> Vec<SearchHit> {
    match result {
        Ok(page) => toHits(page),
        Err(e) => {
            log::warn!("search: {} lookup failed: {e}", kind.label());
            Vec::new()
        }
    }
}

pub async fn global_search<T: Transport, S: TokenStore>(
    client: &ApiClient<T, S>,
    query: &str,
    limit: usize,
) -> Vec<SearchHit> {
    let term = query.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let listQuery = ListQuery::new(1, PER_KIND).search(term);
    let (centers, courses, subjects, resources, branches) = futures::join!(
        client.list::<EducationalCenter>(&listQuery),
        client.list::<Field>(&listQuery),
        client.list::<Subject>(&listQuery),
        client.list::<Resource>(&listQuery),
        client.list::<Branch>(&listQuery),
    );

    let mut hits = keep(SearchKind::Center, centers, center_hits);
    hits.extend(keep(SearchKind::Course, courses, course_hits));
    hits.extend(keep(SearchKind::Subject, subjects, subject_hits));
    hits.extend(keep(SearchKind::Resource, resources, resource_hits));
    hits.extend(keep(SearchKind::Branch, branches, branch_hits));

    rank(term, hits, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{query_value, respond, MockTransport};
    use crate::tokens::MemoryTokens;

    fn hit(kind: SearchKind, title: &str, subtitle: Option<&str>) -> SearchHit {
        SearchHit::new(kind, 1, title, subtitle.map(str::to_string), String::new())
    }

    #[test]
    fn score_tiers() {
        assert_eq!(score_text("Python", "python"), EXACT);
        assert_eq!(score_text("py", "Python Academy"), PREFIX);
        assert_eq!(score_text("academy", "Python Academy"), SUBSTRING);
        assert_eq!(score_text("python math", "Applied Mathematics for Python-ers"), 30);
        assert_eq!(score_text("  ", "anything"), 0);
        assert_eq!(score_text("chemistry", "Physics"), 0);
    }

    #[test]
    fn word_overlap_is_capped() {
        let score = score_text("a b c", "alpha beta gamma delta epsilon zeta");
        assert_eq!(score, 30);
        let capped = score_text("al be ga de ep", "gamma delta alpha beta epsilon x");
        assert_eq!(capped, WORD_CAP);
    }

    #[test]
    fn subtitle_counts_half() {
        assert_eq!(score_hit("tashkent", "Bright Minds", Some("Tashkent")), EXACT / 2);
        assert_eq!(score_hit("bright", "Bright Minds", Some("bright")), PREFIX);
    }

    #[test]
    fn rank_orders_by_score_then_kind_then_title() {
        let hits = vec![
            hit(SearchKind::Branch, "English Club", None),
            hit(SearchKind::Center, "english", None),
            hit(SearchKind::Subject, "Business English", None),
            hit(SearchKind::Center, "English Club", None),
            hit(SearchKind::Resource, "Grammar", None),
        ];

        let ranked = rank("English", hits, 10);

        let order: Vec<(SearchKind, &str)> = ranked.iter().map(|h| (h.kind, h.title.as_str())).collect();
        assert_eq!(
            order,
            [
                (SearchKind::Center, "english"),
                (SearchKind::Center, "English Club"),
                (SearchKind::Branch, "English Club"),
                (SearchKind::Subject, "Business English"),
            ]
        );
    }

    #[test]
    fn rank_truncates() {
        let hits = (0..30).map(|i| hit(SearchKind::Course, &format!("Math {i}"), None)).collect();
        assert_eq!(rank("math", hits, 5).len(), 5);
    }

    #[tokio::test]
    async fn blank_query_issues_no_requests() {
        let client = ApiClient::new(MockTransport::new(|_| respond(200, "{}")), MemoryTokens::default());
        assert!(global_search(&client, "   ", DEFAULT_LIMIT).await.is_empty());
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn failed_kind_is_skipped() {
        let transport = MockTransport::new(|req| {
            assert_eq!(query_value(req, "search"), Some("Robotics"));
            match req.path.as_str() {
                "/centers/" => respond(200, r#"{"count": 1, "results": [{"id": 3, "name": "Robotics Lab"}]}"#),
                "/subjects/" => respond(500, ""),
                "/fields/" => respond(200, r#"{"count": 1, "results": [{"id": 8, "name": "Robotics"}]}"#),
                _ => respond(200, r#"{"count": 0, "results": []}"#),
            }
        });
        let client = ApiClient::new(transport, MemoryTokens::default());

        let hits = global_search(&client, " Robotics ", DEFAULT_LIMIT).await;

        assert_eq!(client.transport().requests().len(), 5);
        let found: Vec<(SearchKind, &str, &str)> = hits
            .iter()
            .map(|h| (h.kind, h.title.as_str(), h.href.as_str()))
            .collect();
        assert_eq!(
            found,
            [
                (SearchKind::Course, "Robotics", "/courses/8"),
                (SearchKind::Center, "Robotics Lab", "/centers/3"),
            ]
        );
    }
}
