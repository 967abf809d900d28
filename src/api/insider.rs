use serde::Serialize;
use tracing::instrument;

use super::{Endpoint, Error};
use crate::domain::request::{RequestPage, ResourceRequestDetail, User, UserList};

const FILTER_PATH: &str = "/apiv2/resource-requests/assignments/filter";
const DETAIL_PATH: &str = "/apiv2/resource-requests";
const USERS_PATH: &str = "/api/user";

/// Sort field the request list is always ordered by.
const SORT_BY: &str = "RequestDate";

/// An inclusive range in a filter body. Either bound may be open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range<T> {
    /// Lower bound.
    pub from: Option<T>,
    /// Upper bound.
    pub to: Option<T>,
}

/// Body of the request list filter call.
///
/// Only the search term and the skip/take window vary; every facet is left
/// empty and the list is always sorted by request date, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilter {
    assignee_ids: Vec<String>,
    completion_status: Range<u8>,
    creator_ids: Vec<String>,
    departments: Vec<String>,
    is_descending: bool,
    primary_skills: Vec<String>,
    request_date: Range<String>,
    request_types: Vec<String>,
    skip: usize,
    take: usize,
    sort_by: &'static str,
    terms: String,
}

impl RequestFilter {
    /// Builds the filter for `page` (1-based) of `page_size` rows matching
    /// `terms`.
    #[must_use]
    pub fn new(page: usize, page_size: usize, terms: impl Into<String>) -> Self {
        Self {
            assignee_ids: Vec::new(),
            completion_status: Range {
                from: Some(0),
                to: Some(100),
            },
            creator_ids: Vec::new(),
            departments: Vec::new(),
            is_descending: true,
            primary_skills: Vec::new(),
            request_date: Range {
                from: None,
                to: None,
            },
            request_types: Vec::new(),
            skip: page.saturating_sub(1).saturating_mul(page_size),
            take: page_size,
            sort_by: SORT_BY,
            terms: terms.into(),
        }
    }

    /// Number of rows skipped.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.skip
    }

    /// Number of rows requested.
    #[must_use]
    pub const fn take(&self) -> usize {
        self.take
    }

    /// The free-text search term.
    #[must_use]
    pub fn terms(&self) -> &str {
        &self.terms
    }
}

/// Client for the resource-management API.
#[derive(Debug, Clone)]
pub struct InsiderClient {
    endpoint: Endpoint,
}

impl InsiderClient {
    /// Creates a client for the API at `base_url`, authenticating with
    /// `token` when given.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, token: Option<&str>) -> Self {
        Self {
            endpoint: Endpoint::new(http, base_url, token),
        }
    }

    /// Fetches one page of resource requests.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// unexpected body.
    #[instrument(level = "debug", skip(self), fields(skip = filter.skip(), take = filter.take()))]
    pub async fn filter_requests(&self, filter: &RequestFilter) -> Result<RequestPage, Error> {
        let page: RequestPage = self.endpoint.post(FILTER_PATH, filter).await?;
        if page.total < page.result.len() {
            tracing::warn!(
                total = page.total,
                rows = page.result.len(),
                "list total is smaller than the page it came with"
            );
        }
        Ok(page)
    }

    /// Fetches a single resource request with its resource lines.
    ///
    /// The id is opaque and is sent as one encoded path segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the id cannot be addressed, on transport failure,
    /// a non-success status or an unexpected body.
    #[instrument(level = "debug", skip(self))]
    pub async fn request_detail(&self, id: &str) -> Result<ResourceRequestDetail, Error> {
        let url = self.endpoint.segment_url(DETAIL_PATH, id.trim())?;
        self.endpoint.get_url(url).await
    }

    /// Fetches the full user directory.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// unexpected body.
    #[instrument(level = "debug", skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, Error> {
        let list: UserList = self.endpoint.get(USERS_PATH).await?;
        Ok(list.data)
    }
}
