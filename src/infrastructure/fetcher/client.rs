//! Upstream HTTP content client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::dto::{CommentListDto, EntityDto, EntityListDto, Envelope, PostListDto};
use crate::domain::entities::{Comment, Credential, Post, ThreadLocator, TrackedEntity};
use crate::domain::errors::FetchError;
use crate::domain::ports::{ContentFetcherPort, ReplyPage};

/// Default upstream API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.postwatch.dev/v1";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Content fetcher over the upstream JSON API.
pub struct HttpContentFetcher {
    client: Client,
    base_url: String,
}

impl HttpContentFetcher {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        credential: &Credential,
    ) -> Result<Option<T>, FetchError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .header(header::COOKIE, credential.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, path, "Upstream request failed");
                if e.is_timeout() {
                    FetchError::network("request timed out")
                } else if e.is_connect() {
                    FetchError::network("failed to connect to upstream")
                } else {
                    FetchError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            warn!(error = %e, path, "Failed to parse upstream response");
            FetchError::malformed(e.to_string())
        })?;

        unwrap_envelope(envelope)
    }
}

fn error_for_status(status: StatusCode, body: &str) -> FetchError {
    let detail = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .map(|envelope| envelope.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::unauthorized(detail),
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
        s if s.is_server_error() => FetchError::network(format!("upstream unavailable: {detail}")),
        _ => FetchError::unexpected(format!("unexpected response: {status} - {detail}")),
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<Option<T>, FetchError> {
    if envelope.code != 0 {
        return Err(FetchError::api(envelope.code, envelope.message));
    }
    Ok(envelope.data)
}

#[async_trait]
impl ContentFetcherPort for HttpContentFetcher {
    #[instrument(skip(self, credential))]
    async fn fetch_posts(
        &self,
        entity_id: &str,
        credential: &Credential,
    ) -> Result<Vec<Post>, FetchError> {
        let list: PostListDto = self
            .get(&format!("/entities/{entity_id}/posts"), &[], credential)
            .await?
            .unwrap_or_default();

        debug!(count = list.items.len(), "Fetched posts");
        Ok(list
            .items
            .into_iter()
            .map(|dto| dto.into_post(entity_id))
            .collect())
    }

    #[instrument(skip(self, credential), fields(oid = %thread.oid))]
    async fn fetch_comments(
        &self,
        thread: &ThreadLocator,
        credential: &Credential,
    ) -> Result<Vec<Comment>, FetchError> {
        let path = format!("/threads/{}/{}/comments", thread.kind, thread.oid);
        let list: CommentListDto = self.get(&path, &[], credential).await?.unwrap_or_default();

        Ok(list.into_comments())
    }

    #[instrument(skip(self, credential), fields(oid = %thread.oid))]
    async fn fetch_replies(
        &self,
        thread: &ThreadLocator,
        root_id: &str,
        credential: &Credential,
        page: ReplyPage,
    ) -> Result<Vec<Comment>, FetchError> {
        let path = format!(
            "/threads/{}/{}/comments/{root_id}/replies",
            thread.kind, thread.oid
        );
        let query = [("ps", page.size.to_string()), ("pn", page.number.to_string())];
        let list: CommentListDto = self.get(&path, &query, credential).await?.unwrap_or_default();

        Ok(list
            .into_comments()
            .into_iter()
            .map(|mut reply| {
                reply.root_id.get_or_insert_with(|| root_id.to_string());
                reply
            })
            .collect())
    }

    #[instrument(skip(self, credential))]
    async fn fetch_entity(
        &self,
        entity_id: &str,
        credential: &Credential,
    ) -> Result<Option<TrackedEntity>, FetchError> {
        let entity: Option<EntityDto> = self
            .get(&format!("/entities/{entity_id}"), &[], credential)
            .await?;

        Ok(entity.map(TrackedEntity::from))
    }

    #[instrument(skip(self, credential))]
    async fn search_entities(
        &self,
        keyword: &str,
        credential: &Credential,
    ) -> Result<Vec<TrackedEntity>, FetchError> {
        let query = [("keyword", keyword.to_string())];
        let list: EntityListDto = self
            .get("/entities/search", &query, credential)
            .await?
            .unwrap_or_default();

        Ok(list.items.into_iter().map(TrackedEntity::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_client_creation() {
        let client = HttpContentFetcher::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpContentFetcher::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(
            client.endpoint("/entities/1"),
            "http://localhost:8080/entities/1"
        );
    }

    #[test_case(StatusCode::UNAUTHORIZED ; "unauthorized")]
    #[test_case(StatusCode::FORBIDDEN ; "forbidden")]
    fn test_auth_statuses_map_to_unauthorized(status: StatusCode) {
        let error = error_for_status(status, "");
        assert!(matches!(error, FetchError::Unauthorized { .. }));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::TOO_MANY_REQUESTS, ""),
            FetchError::RateLimited
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_GATEWAY, ""),
            FetchError::Network { .. }
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, ""),
            FetchError::Unexpected { .. }
        ));
    }

    #[test]
    fn test_status_detail_uses_envelope_message() {
        let error = error_for_status(
            StatusCode::FORBIDDEN,
            r#"{"code": -101, "message": "not logged in"}"#,
        );
        assert_eq!(
            error.to_string(),
            "credential rejected upstream: not logged in"
        );
    }

    #[test]
    fn test_nonzero_code_is_api_error() {
        let envelope: Envelope<PostListDto> =
            serde_json::from_str(r#"{"code": -352, "message": "risk control", "data": null}"#)
                .unwrap();

        match unwrap_envelope(envelope) {
            Err(FetchError::Api { code, message }) => {
                assert_eq!(code, -352);
                assert_eq!(message, "risk control");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_code_yields_data() {
        let envelope: Envelope<PostListDto> = serde_json::from_str(
            r#"{"code": 0, "data": {"items": [{"id": "p1", "timestamp": 1}]}}"#,
        )
        .unwrap();

        let data = unwrap_envelope(envelope).unwrap().unwrap();
        assert_eq!(data.items.len(), 1);
    }
}
