use edu_types::{
    Branch, Comment, EducationalCenter, Field, Id, ListQuery, Named, Page, Region, Resource,
    ResourceCategory, Star, Subject, User,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, Method, Transport};

/// Upper bound on pages walked by `fetch_all`.
pub const MAX_FETCH_PAGES: u32 = 50;
const OPTIONS_PAGE_SIZE: u32 = 100;

/// Binds a DTO to its REST collection.
pub trait Endpoint: DeserializeOwned + 'static {
    /// Collection path with leading and trailing slash.
    const PATH: &'static str;
}

macro_rules! endpoint {
    ($ty:ty, $path:literal) => {
        impl Endpoint for $ty {
            const PATH: &'static str = $path;
        }
    };
}

endpoint!(User, "/users/");
endpoint!(EducationalCenter, "/centers/");
endpoint!(Branch, "/branches/");
endpoint!(Region, "/regions/");
endpoint!(Field, "/fields/");
endpoint!(Subject, "/subjects/");
endpoint!(Resource, "/resources/");
endpoint!(ResourceCategory, "/resource-categories/");
endpoint!(Comment, "/comments/");
endpoint!(Star, "/stars/");

pub fn item_path(collection: &str, id: Id) -> String {
    format!("{}/{id}/", collection.trim_end_matches('/'))
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list<E: Endpoint>(&self, query: &ListQuery) -> Result<Page<E>, ApiError> {
        self.list_at(E::PATH, query).await
    }

    pub async fn list_at<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<Page<R>, ApiError> {
        self.send_json(ApiRequest::get(path).query(query.pairs())).await
    }

    pub async fn get<E: Endpoint>(&self, id: Id) -> Result<E, ApiError> {
        self.send_json(ApiRequest::get(item_path(E::PATH, id))).await
    }

    pub async fn create<E: Endpoint>(&self, payload: &Value) -> Result<E, ApiError> {
        self.send_json(ApiRequest::post(E::PATH, payload.clone())).await
    }

    pub async fn update<E: Endpoint>(&self, id: Id, payload: &Value) -> Result<E, ApiError> {
        self.send_json(ApiRequest::patch(item_path(E::PATH, id), payload.clone()))
            .await
    }

    pub async fn remove<E: Endpoint>(&self, id: Id) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::new(Method::Delete, item_path(E::PATH, id)))
            .await
    }

    pub async fn count<E: Endpoint>(&self, query: &ListQuery) -> Result<u64, ApiError> {
        let mut query = query.clone();
        query.page = 1;
        query.page_size = 1;
        let page: Page<Value> = self.list_at(E::PATH, &query).await?;
        Ok(page.count)
    }

    pub async fn fetch_all<E: Endpoint>(&self, query: &ListQuery) -> Result<Vec<E>, ApiError> {
        self.fetch_all_at(E::PATH, query).await
    }

    /// Walk pages from `query.page` while the API reports a next page,
    /// merging the rows.
    pub async fn fetch_all_at<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<Vec<R>, ApiError> {
        let mut query = query.clone();
        let mut merged: Page<R> = self.list_at(path, &query).await?;
        let mut fetched = 1;

        while merged.has_next() && fetched < MAX_FETCH_PAGES {
            query.page += 1;
            let next = self.list_at(path, &query).await?;
            merged.merge(next);
            fetched += 1;
        }

        if merged.has_next() {
            log::warn!("{path}: stopped after {MAX_FETCH_PAGES} pages");
        }
        Ok(merged.results)
    }

    /// `{id, name}` options for select inputs.
    pub async fn list_named(&self, path: &str) -> Result<Vec<Named>, ApiError> {
        self.fetch_all_at(path, &ListQuery::new(1, OPTIONS_PAGE_SIZE))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{query_value, respond, MockTransport};
    use crate::tokens::MemoryTokens;

    #[test]
    fn item_path_normalizes_slashes() {
        assert_eq!(item_path("/centers/", 5), "/centers/5/");
        assert_eq!(item_path("/centers", 5), "/centers/5/");
    }

    #[tokio::test]
    async fn fetch_all_merges_pages() {
        let transport = MockTransport::new(|req| match query_value(req, "page") {
            Some("1") => respond(
                200,
                r#"{"count": 3, "next": "/regions/?page=2", "results": [{"id": 1, "name": "North"}, {"id": 2, "name": "South"}]}"#,
            ),
            _ => respond(200, r#"{"count": 3, "next": null, "results": [{"id": 3, "name": "East"}]}"#),
        });
        let client = ApiClient::new(transport, MemoryTokens::default());

        let regions: Vec<Region> = client.fetch_all(&ListQuery::new(1, 2)).await.unwrap();

        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["North", "South", "East"]);
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn fetch_all_stops_at_page_cap() {
        let transport = MockTransport::new(|_| {
            respond(200, r#"{"count": 9999, "next": "more", "results": [{"id": 1, "name": "x"}]}"#)
        });
        let client = ApiClient::new(transport, MemoryTokens::default());

        let rows = client.list_named("/fields/").await.unwrap();

        assert_eq!(rows.len(), MAX_FETCH_PAGES as usize);
    }

    #[tokio::test]
    async fn count_requests_single_row() {
        let transport = MockTransport::new(|req| {
            assert_eq!(query_value(req, "page_size"), Some("1"));
            respond(200, r#"{"count": 42, "results": []}"#)
        });
        let client = ApiClient::new(transport, MemoryTokens::default());

        let total = client.count::<User>(&ListQuery::new(3, 50)).await.unwrap();

        assert_eq!(total, 42);
    }

    #[tokio::test]
    async fn update_patches_item_path() {
        let transport = MockTransport::new(|_| respond(200, r#"{"id": 7, "name": "West"}"#));
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a", "r"));

        let region: Region = client.update(7, &json!({"name": "West"})).await.unwrap();

        assert_eq!(region.name, "West");
        let sent = &client.transport().requests()[0];
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.path, "/regions/7/");
        assert_eq!(sent.body, Some(json!({"name": "West"})));
    }
}
