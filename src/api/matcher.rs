use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Endpoint, Error};
use crate::domain::matching::{MatchOutcome, MatchQuery, MatchResponse};

const MATCH_PATH: &str = "/api/match";
const HEALTH_PATH: &str = "/health";

/// Health report of the matching service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Status label, `healthy` when the service is up.
    pub status: String,
}

impl Health {
    /// Whether the service reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Client for the AI matching service.
///
/// The service is called without the bearer token of the internal APIs.
#[derive(Debug, Clone)]
pub struct MatchClient {
    endpoint: Endpoint,
}

impl MatchClient {
    /// Creates a client for the service at `base_url`.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            endpoint: Endpoint::new(http, base_url, None),
        }
    }

    /// Asks the service for the employees best matching `description`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCandidates`] with the service's message when nobody
    /// was recommended, or a transport, status or decode error.
    #[instrument(level = "debug", skip_all, fields(chars = description.len()))]
    pub async fn match_candidates(&self, description: String) -> Result<MatchOutcome, Error> {
        let query = MatchQuery { description };
        let response: MatchResponse = self.endpoint.post(MATCH_PATH, &query).await?;
        let outcome = response.into_outcome().map_err(Error::NoCandidates)?;
        tracing::debug!(candidates = outcome.candidates.len(), "match complete");
        Ok(outcome)
    }

    /// Probes the service's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or answers with a
    /// non-success status.
    #[instrument(level = "debug", skip(self))]
    pub async fn health(&self) -> Result<Health, Error> {
        self.endpoint.get(HEALTH_PATH).await
    }
}
