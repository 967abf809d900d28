use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{Phase, Sequence, Ticket};
use crate::{
    api::{self, EmployeeClient},
    domain::{
        employee::{Employee, EmployeeDirectory, positions_by_code},
        pagination::{PageItem, Pager},
    },
};

/// State of the employee list: loaded once, then searched and paginated
/// locally.
#[derive(Debug)]
pub struct EmployeeList {
    employees: Vec<Employee>,
    matches: Vec<usize>,
    search: String,
    pager: Pager,
    is_syncing: bool,
    last_sync_date: Option<DateTime<Utc>>,
    phase: Phase,
    sequence: Sequence,
}

impl EmployeeList {
    /// Creates an empty list showing `page_size` employees per page.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            employees: Vec::new(),
            matches: Vec::new(),
            search: String::new(),
            pager: Pager::new(page_size),
            is_syncing: false,
            last_sync_date: None,
            phase: Phase::Idle,
            sequence: Sequence::default(),
        }
    }

    /// Enters the view and requests the full directory.
    pub fn on_route_enter(&mut self) -> Ticket {
        self.phase = Phase::Loading;
        self.sequence.issue()
    }

    /// Applies the directory fetched for `ticket`.
    ///
    /// On success the search is reapplied and the view returns to page 1. On
    /// failure the previously loaded employees are kept.
    pub fn apply(&mut self, ticket: Ticket, result: Result<EmployeeDirectory, api::Error>) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(%ticket, "dropping stale employee list");
            return false;
        }
        match result {
            Ok(directory) => {
                self.employees = directory.employees;
                self.is_syncing = directory.is_syncing;
                self.last_sync_date = directory.last_sync_date;
                self.phase = Phase::Ready;
                self.refilter();
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load employees");
                self.phase = Phase::Failed(error.to_string());
            }
        }
        true
    }

    /// Fetches the directory from `client` and applies it.
    #[instrument(level = "debug", skip_all, fields(%ticket))]
    pub async fn load(&mut self, client: &EmployeeClient, ticket: Ticket) -> bool {
        let result = client.employees().await;
        self.apply(ticket, result)
    }

    /// Applies a new search term and returns to page 1.
    pub fn on_search_changed(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.refilter();
    }

    /// Moves to `page`, clamped to the filtered page range.
    pub fn on_page_changed(&mut self, page: usize) -> bool {
        self.pager.go_to(page)
    }

    /// Moves one page forward.
    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    /// Moves one page back.
    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    fn refilter(&mut self) {
        self.matches = positions_by_code(&self.employees, &self.search);
        self.pager.set_total_items(self.matches.len());
        self.pager.reset();
    }

    /// Leaves the view; a directory still in flight is discarded.
    pub const fn close(&mut self) {
        self.sequence.close();
    }

    /// Employees on the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&Employee> {
        self.matches[self.pager.slice_range()]
            .iter()
            .map(|&index| &self.employees[index])
            .collect()
    }

    /// Number of employees matching the search.
    #[must_use]
    pub const fn match_count(&self) -> usize {
        self.matches.len()
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

    /// Whether the directory was still synchronising when it was served.
    #[must_use]
    pub const fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    /// When the directory was last synchronised.
    #[must_use]
    pub const fn last_sync_date(&self) -> Option<DateTime<Utc>> {
        self.last_sync_date
    }

    /// Loading state.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }
}
