use tracing::instrument;

use super::{Phase, Sequence, Ticket};
use crate::{
    api::{self, InsiderClient, RequestFilter},
    domain::{
        pagination::{PageItem, Pager},
        request::{RequestPage, ResourceRequestSummary},
    },
};

/// A list fetch the caller must perform and hand back through
/// [`RequestList::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFetch {
    /// Ticket to return with the result.
    pub ticket: Ticket,
    /// Body of the filter call.
    pub filter: RequestFilter,
}

/// State of the paginated, searchable resource request list.
///
/// Rows and total are always replaced together from a single response, so
/// the footer can never disagree with the rows it sits under.
#[derive(Debug)]
pub struct RequestList {
    pager: Pager,
    search: String,
    rows: Vec<ResourceRequestSummary>,
    phase: Phase,
    sequence: Sequence,
}

impl RequestList {
    /// Creates an empty list showing `page_size` rows per page.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            search: String::new(),
            rows: Vec::new(),
            phase: Phase::Idle,
            sequence: Sequence::default(),
        }
    }

    /// Enters the view on `page` with `search` prefilled.
    ///
    /// The page is taken as given because the total is not known yet.
    pub fn on_route_enter(&mut self, page: usize, search: impl Into<String>) -> ListFetch {
        self.search = search.into();
        self.pager.start_at(page);
        self.fetch()
    }

    /// Applies a new search term and returns to page 1.
    ///
    /// Returns `None` when the term did not change.
    pub fn on_search_changed(&mut self, search: impl Into<String>) -> Option<ListFetch> {
        let search = search.into();
        if search == self.search {
            return None;
        }
        self.search = search;
        self.pager.reset();
        Some(self.fetch())
    }

    /// Moves to `page`, clamped to the known page range.
    ///
    /// Returns `None` when the page did not change.
    pub fn on_page_changed(&mut self, page: usize) -> Option<ListFetch> {
        self.pager.go_to(page).then(|| self.fetch())
    }

    /// Moves one page forward.
    pub fn next_page(&mut self) -> Option<ListFetch> {
        self.pager.next().then(|| self.fetch())
    }

    /// Moves one page back.
    pub fn previous_page(&mut self) -> Option<ListFetch> {
        self.pager.previous().then(|| self.fetch())
    }

    /// Refetches the current page.
    pub fn reload(&mut self) -> ListFetch {
        self.fetch()
    }

    fn fetch(&mut self) -> ListFetch {
        self.phase = Phase::Loading;
        ListFetch {
            ticket: self.sequence.issue(),
            filter: RequestFilter::new(self.pager.current(), self.pager.per_page(), &*self.search),
        }
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `false` if the result was stale and has been dropped. On
    /// failure the previous rows are kept and the error is recorded.
    pub fn apply(&mut self, ticket: Ticket, result: Result<RequestPage, api::Error>) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(%ticket, "dropping stale request list response");
            return false;
        }
        match result {
            Ok(page) => {
                self.pager.set_total_items(page.total);
                self.rows = page.result;
                self.phase = Phase::Ready;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load resource requests");
                self.phase = Phase::Failed(error.to_string());
            }
        }
        true
    }

    /// Performs `fetch` against `client` and applies the result.
    #[instrument(level = "debug", skip_all, fields(ticket = %fetch.ticket))]
    pub async fn load(&mut self, client: &InsiderClient, fetch: ListFetch) -> bool {
        let result = client.filter_requests(&fetch.filter).await;
        self.apply(fetch.ticket, result)
    }

    /// Leaves the view; responses still in flight are discarded.
    pub const fn close(&mut self) {
        self.sequence.close();
    }

    /// Rows of the current page.
    #[must_use]
    pub fn rows(&self) -> &[ResourceRequestSummary] {
        &self.rows
    }

    /// Total rows matching the search, as last reported.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pager.total_items()
    }

    /// Current search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Page bookkeeping.
    #[must_use]
    pub const fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Footer window for the current page.
    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        self.pager.window()
    }

    /// Loading state.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use httpmock::prelude::*;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::domain::request::RequestStatus;

    fn row(id: &str) -> ResourceRequestSummary {
        ResourceRequestSummary {
            request_id: id.to_string(),
            resource_request_id: id.to_string(),
            creator_user_code: "E001".to_string(),
            status: RequestStatus::Waiting,
            request_type: "Resource".to_string(),
            request_date: DateTime::<chrono::Utc>::UNIX_EPOCH,
            requested_quantity: 1,
            primary_skill_name: "Java".to_string(),
        }
    }

    fn page(ids: &[&str], total: usize) -> RequestPage {
        RequestPage {
            result: ids.iter().map(|id| row(id)).collect(),
            total,
        }
    }

    fn server_error() -> api::Error {
        api::Error::Status {
            url: "http://insider/filter".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    #[test]
    fn route_enter_requests_given_page() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(3, "java");

        assert_eq!(fetch.filter.skip(), 20);
        assert_eq!(fetch.filter.take(), 10);
        assert_eq!(fetch.filter.terms(), "java");
        assert!(list.phase().is_loading());
    }

    #[test]
    fn route_enter_with_huge_page_does_not_overflow() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(usize::MAX, "");

        assert_eq!(list.pager().current(), usize::MAX);
        assert_eq!(fetch.filter.skip(), usize::MAX);
    }

    #[test]
    fn rows_and_total_replaced_together() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(1, "");
        assert!(list.apply(fetch.ticket, Ok(page(&["RR-1", "RR-2"], 25))));

        assert_eq!(list.rows().len(), 2);
        assert_eq!(list.total(), 25);
        assert_eq!(list.pager().total_pages(), 3);
        assert_eq!(list.phase(), &Phase::Ready);
    }

    #[test]
    fn search_change_resets_to_first_page() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(1, "");
        list.apply(fetch.ticket, Ok(page(&["RR-1"], 50)));
        let fetch = list.on_page_changed(4).unwrap();
        list.apply(fetch.ticket, Ok(page(&["RR-31"], 50)));
        assert_eq!(list.pager().current(), 4);

        let fetch = list.on_search_changed("react").unwrap();
        assert_eq!(list.pager().current(), 1);
        assert_eq!(fetch.filter.skip(), 0);
        assert_eq!(fetch.filter.terms(), "react");

        assert!(list.on_search_changed("react").is_none());
    }

    #[test]
    fn navigation_is_clamped() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(1, "");
        list.apply(fetch.ticket, Ok(page(&["RR-1"], 30)));

        assert!(list.previous_page().is_none());
        let fetch = list.on_page_changed(99).unwrap();
        assert_eq!(fetch.filter.skip(), 20);
        assert!(list.next_page().is_none());
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut list = RequestList::new(10);
        let first = list.on_route_enter(1, "");
        let second = list.on_search_changed("java").unwrap();

        assert!(list.apply(second.ticket, Ok(page(&["RR-9"], 1))));
        assert!(!list.apply(first.ticket, Ok(page(&["RR-1", "RR-2"], 2))));

        assert_eq!(list.rows()[0].request_id, "RR-9");
        assert_eq!(list.total(), 1);
    }

    #[test]
    fn earlier_page_arriving_late_is_dropped() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(1, "");
        list.apply(fetch.ticket, Ok(page(&["RR-1"], 30)));

        let first_page = list.reload();
        let second_page = list.on_page_changed(2).unwrap();
        assert_eq!(second_page.filter.skip(), 10);

        assert!(list.apply(second_page.ticket, Ok(page(&["RR-11", "RR-12"], 30))));
        assert!(!list.apply(first_page.ticket, Ok(page(&["RR-1"], 30))));

        assert_eq!(list.pager().current(), 2);
        assert_eq!(list.rows()[0].request_id, "RR-11");
        assert_eq!(list.phase(), &Phase::Ready);
    }

    #[test]
    fn response_after_close_is_dropped() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(1, "");
        list.close();

        assert!(!list.apply(fetch.ticket, Ok(page(&["RR-1"], 1))));
        assert!(list.rows().is_empty());
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(1, "");
        list.apply(fetch.ticket, Ok(page(&["RR-1"], 1)));

        let fetch = list.reload();
        assert!(list.apply(fetch.ticket, Err(server_error())));

        assert_eq!(list.rows().len(), 1);
        assert!(list.phase().error().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn load_applies_server_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/apiv2/resource-requests/assignments/filter")
                    .json_body_partial(r#"{ "skip": 10, "take": 10 }"#);
                then.status(200).json_body(json!({
                    "result": [{
                        "requestId": "RR-11",
                        "resourceRequestId": 11,
                        "status": "In Progress",
                        "requestDate": "2025-03-20T08:05:00Z"
                    }],
                    "total": 11
                }));
            })
            .await;

        let client = InsiderClient::new(reqwest::Client::new(), &server.base_url(), None);
        let mut list = RequestList::new(10);
        let fetch = list.on_route_enter(2, "");

        assert!(list.load(&client, fetch).await);
        assert_eq!(list.rows()[0].status, RequestStatus::InProgress);
        assert_eq!(list.pager().total_pages(), 2);
    }
}
