//! HTTP clients for the external services.
//!
//! Every client is a thin wrapper around a shared [`reqwest::Client`] with a
//! base URL and, for the authenticated services, a static bearer token. There
//! is no caching, retrying or timeout: a call either completes or fails once.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

/// Employee information API client.
pub mod empinfo;
/// Resource-management ("Insider") API client.
pub mod insider;
/// AI matching service client.
pub mod matcher;

pub use empinfo::EmployeeClient;
pub use insider::{InsiderClient, RequestFilter};
pub use matcher::MatchClient;

/// Longest response body excerpt kept in an error.
const MAX_ERROR_BODY: usize = 512;

/// Errors raised by the API clients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or the response could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status.
        status: StatusCode,
        /// An excerpt of the response body.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        /// The requested URL.
        url: String,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A path segment could not be placed in a URL.
    #[error("cannot address '{segment}' under {url}")]
    InvalidSegment {
        /// The URL the segment was appended to.
        url: String,
        /// The rejected segment.
        segment: String,
    },

    /// The matching service returned no candidates.
    #[error("{0}")]
    NoCandidates(String),
}

/// Base URL, optional bearer token and a shared HTTP client.
#[derive(Clone)]
pub(crate) struct Endpoint {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl Endpoint {
    pub(crate) fn new(http: reqwest::Client, base_url: &str, token: Option<&str>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(ToString::to_string),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Joins `path` and appends `segment` as a single percent-encoded path
    /// segment, so an opaque id can never reach another resource.
    pub(crate) fn segment_url(&self, path: &str, segment: &str) -> Result<String, Error> {
        let base = self.url(path);
        let invalid = || Error::InvalidSegment {
            url: base.clone(),
            segment: segment.to_string(),
        };
        if matches!(segment, "" | "." | "..") {
            return Err(invalid());
        }

        let mut url = reqwest::Url::parse(&base).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|()| invalid())?.push(segment);
        Ok(url.into())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) async fn get<T>(&self, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get_url(self.url(path)).await
    }

    pub(crate) async fn get_url<T>(&self, url: String) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "GET");
        let request = self.authorize(self.http.get(&url));
        Self::send(request, url).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let request = self.authorize(self.http.post(&url)).json(body);
        Self::send(request, url).await
    }

    async fn send<T>(request: RequestBuilder, url: String) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;
        let response = Self::check_status(response, &url).await?;

        let bytes = response.bytes().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| Error::Decode { url, source })
    }

    async fn check_status(response: Response, url: &str) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|idx| body.is_char_boundary(*idx))
                .unwrap_or(0);
            body.truncate(cut);
            body.push('…');
        }

        tracing::warn!(%url, %status, "request failed");
        Err(Error::Status {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let endpoint = Endpoint::new(reqwest::Client::new(), "http://api.local/", None);
        assert_eq!(endpoint.url("/api/user"), "http://api.local/api/user");
        assert_eq!(endpoint.url("api/user"), "http://api.local/api/user");
    }

    #[test]
    fn segment_url_encodes_reserved_characters() {
        let endpoint = Endpoint::new(reqwest::Client::new(), "http://api.local/", None);
        assert_eq!(
            endpoint.segment_url("/items", "a/b?c").unwrap(),
            "http://api.local/items/a%2Fb%3Fc"
        );
        assert!(matches!(
            endpoint.segment_url("/items", ".."),
            Err(Error::InvalidSegment { .. })
        ));
    }

    #[tokio::test]
    async fn bearer_token_is_sent_when_configured() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/ping")
                    .header("authorization", "Bearer t0k3n");
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let endpoint = Endpoint::new(reqwest::Client::new(), &server.base_url(), Some("t0k3n"));
        let body: Value = endpoint.get("/ping").await.unwrap();

        mock.assert_async().await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not here");
        })
        .await;

        let endpoint = Endpoint::new(reqwest::Client::new(), &server.base_url(), None);
        let error = endpoint.get::<Value>("/missing").await.unwrap_err();

        match error {
            Error::Status { status, body, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(body, "not here");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/broken");
            then.status(200).body("<html>");
        })
        .await;

        let endpoint = Endpoint::new(reqwest::Client::new(), &server.base_url(), None);
        let error = endpoint.get::<Value>("/broken").await.unwrap_err();
        assert!(matches!(error, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let endpoint = Endpoint::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        let error = endpoint.get::<Value>("/").await.unwrap_err();
        assert!(matches!(error, Error::Transport { .. }));
    }
}
