use edu_types::{Comment, CommentInput, Id, ListQuery, Page, Resource, Star, StarInput};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::transport::Transport;

pub const COMMENTS_PAGE_SIZE: u32 = 10;
pub const ACTIVITY_PAGE_SIZE: u32 = 10;

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn center_comments(&self, center_id: Id, page: u32) -> Result<Page<Comment>, ApiError> {
        let query = ListQuery::new(page, COMMENTS_PAGE_SIZE)
            .filter("center", center_id)
            .ordering("-created_at");
        self.list(&query).await
    }

    pub async fn my_comments(&self, user_id: Id, page: u32) -> Result<Page<Comment>, ApiError> {
        let query = ListQuery::new(page, ACTIVITY_PAGE_SIZE)
            .filter("user", user_id)
            .ordering("-created_at");
        self.list(&query).await
    }

    pub async fn my_stars(&self, user_id: Id, page: u32) -> Result<Page<Star>, ApiError> {
        let query = ListQuery::new(page, ACTIVITY_PAGE_SIZE)
            .filter("user", user_id)
            .ordering("-created_at");
        self.list(&query).await
    }

    pub async fn my_resources(&self, user_id: Id, page: u32) -> Result<Page<Resource>, ApiError> {
        let query = ListQuery::new(page, ACTIVITY_PAGE_SIZE)
            .filter("author", user_id)
            .ordering("-created_at");
        self.list(&query).await
    }

    pub async fn post_comment(&self, input: &CommentInput) -> Result<Comment, ApiError> {
        let body = serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.create::<Comment>(&body).await
    }

    pub async fn post_star(&self, input: &StarInput) -> Result<Star, ApiError> {
        let body = serde_json::to_value(input).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.create::<Star>(&body).await
    }

    pub async fn delete_comment(&self, comment_id: Id) -> Result<(), ApiError> {
        self.remove::<Comment>(comment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{query_value, respond, MockTransport};
    use crate::tokens::MemoryTokens;

    #[tokio::test]
    async fn center_comments_filter_by_center() {
        let transport = MockTransport::new(|req| {
            assert_eq!(req.path, "/comments/");
            assert_eq!(query_value(req, "center"), Some("12"));
            assert_eq!(query_value(req, "page"), Some("2"));
            respond(200, r#"{"count": 11, "results": [{"id": 1, "center_id": 12, "user_id": 3, "text": "Great teachers"}]}"#)
        });
        let client = ApiClient::new(transport, MemoryTokens::default());

        let page = client.center_comments(12, 2).await.unwrap();

        assert_eq!(page.results[0].text, "Great teachers");
    }

    #[tokio::test]
    async fn my_resources_filter_by_author() {
        let transport = MockTransport::new(|req| {
            assert_eq!(query_value(req, "author"), Some("5"));
            respond(200, r#"{"count": 0, "results": []}"#)
        });
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a", "r"));

        let page = client.my_resources(5, 1).await.unwrap();

        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn post_star_sends_value() {
        let transport = MockTransport::new(|req| {
            assert_eq!(req.body, Some(serde_json::json!({"center": 4, "value": 5})));
            respond(201, r#"{"id": 9, "center_id": 4, "user_id": 1, "value": 5}"#)
        });
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a", "r"));

        let star = client.post_star(&StarInput { center: 4, value: 5 }).await.unwrap();

        assert_eq!(star.id, 9);
    }
}
