//! Per-view state controllers.
//!
//! Each view owns its state and changes it only through explicit events
//! (`on_route_enter`, `on_search_changed`, `on_page_changed`, ...). An event
//! that needs remote data returns a fetch command stamped with a [`Ticket`];
//! the caller performs the fetch and hands the result back together with the
//! ticket. Results whose ticket has been superseded, or that arrive after the
//! view was closed, are dropped.

use std::fmt;

/// Resource request detail view.
pub mod detail;
/// Employee list view.
pub mod employees;
/// Resource request list view.
pub mod requests;

pub use detail::RequestDetailView;
pub use employees::EmployeeList;
pub use requests::RequestList;

/// Identifies one fetch issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A monotonically increasing ticket counter.
///
/// Only the most recently issued ticket is current. Closing the sequence
/// makes every outstanding ticket stale until the next one is issued.
#[derive(Debug, Default)]
pub struct Sequence {
    latest: u64,
    open: bool,
}

impl Sequence {
    /// Issues a new ticket, superseding all earlier ones.
    pub const fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.open = true;
        Ticket(self.latest)
    }

    /// Whether a result carrying `ticket` may still be applied.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        self.open && ticket.0 == self.latest
    }

    /// Retires every outstanding ticket.
    pub const fn close(&mut self) {
        self.open = false;
    }
}

/// Loading state of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed; the message is shown to the user.
    Failed(String),
}

impl Phase {
    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The error to display, if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut sequence = Sequence::default();
        let first = sequence.issue();
        let second = sequence.issue();

        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn closing_retires_outstanding_tickets() {
        let mut sequence = Sequence::default();
        let ticket = sequence.issue();
        sequence.close();
        assert!(!sequence.is_current(ticket));

        let reopened = sequence.issue();
        assert!(sequence.is_current(reopened));
    }

    #[test]
    fn phase_error_only_when_failed() {
        assert_eq!(Phase::Failed("boom".to_string()).error(), Some("boom"));
        assert_eq!(Phase::Ready.error(), None);
        assert!(Phase::Loading.is_loading());
    }
}
