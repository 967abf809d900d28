use tracing::instrument;

use super::{Phase, Sequence, Ticket};
use crate::{
    api::{self, InsiderClient, MatchClient},
    domain::{
        matching::{MatchOutcome, compose_description},
        request::{Assignment, ResourceRequestDetail, User, emp_code_for},
    },
};

/// A detail fetch the caller must perform and hand back through
/// [`RequestDetailView::apply_detail`] and [`RequestDetailView::apply_users`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFetch {
    /// Ticket to return with both results.
    pub ticket: Ticket,
    /// Identifier of the request to load.
    pub id: String,
}

/// A match query the caller must send and hand back through
/// [`RequestDetailView::apply_suggestion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestFetch {
    /// Ticket to return with the result.
    pub ticket: Ticket,
    /// Description composed from the loaded request.
    pub description: String,
}

/// State of the AI suggestion panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Suggestion {
    /// No suggestion requested.
    #[default]
    Idle,
    /// A match query is in flight.
    Pending,
    /// Ranked candidates are available.
    Ready(MatchOutcome),
    /// The query failed or found nobody.
    Failed(String),
}

/// State of a single resource request with its assignee names and AI
/// suggestions.
#[derive(Debug, Default)]
pub struct RequestDetailView {
    detail: Option<ResourceRequestDetail>,
    users: Vec<User>,
    users_error: Option<String>,
    phase: Phase,
    suggestion: Suggestion,
    sequence: Sequence,
    suggestions: Sequence,
}

impl RequestDetailView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the view for request `id`, discarding anything shown before.
    pub fn on_route_enter(&mut self, id: impl Into<String>) -> DetailFetch {
        self.detail = None;
        self.users.clear();
        self.users_error = None;
        self.suggestion = Suggestion::Idle;
        self.suggestions.close();
        self.phase = Phase::Loading;
        DetailFetch {
            ticket: self.sequence.issue(),
            id: id.into(),
        }
    }

    /// Applies the request detail. A failure here leaves the view without
    /// content.
    pub fn apply_detail(
        &mut self,
        ticket: Ticket,
        result: Result<ResourceRequestDetail, api::Error>,
    ) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(%ticket, "dropping stale request detail");
            return false;
        }
        match result {
            Ok(detail) => {
                self.detail = Some(detail);
                self.phase = Phase::Ready;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load resource request");
                self.phase = Phase::Failed(error.to_string());
            }
        }
        true
    }

    /// Applies the user directory used to name assignees.
    ///
    /// A failure is not fatal: assignees are then shown by their raw id.
    pub fn apply_users(&mut self, ticket: Ticket, result: Result<Vec<User>, api::Error>) -> bool {
        if !self.sequence.is_current(ticket) {
            tracing::debug!(%ticket, "dropping stale user list");
            return false;
        }
        match result {
            Ok(users) => {
                self.users = users;
                self.users_error = None;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load users, showing raw assignee ids");
                self.users.clear();
                self.users_error = Some(error.to_string());
            }
        }
        true
    }

    /// Loads the detail and the user directory concurrently and applies
    /// both.
    #[instrument(level = "debug", skip_all, fields(id = %fetch.id))]
    pub async fn load(&mut self, client: &InsiderClient, fetch: DetailFetch) -> bool {
        let (detail, users) = tokio::join!(client.request_detail(&fetch.id), client.users());
        let applied = self.apply_detail(fetch.ticket, detail);
        self.apply_users(fetch.ticket, users) && applied
    }

    /// Starts a suggestion for the loaded request.
    ///
    /// Returns `None` when nothing is loaded or a suggestion is already in
    /// flight.
    pub fn begin_suggestion(&mut self) -> Option<SuggestFetch> {
        if matches!(self.suggestion, Suggestion::Pending) {
            tracing::debug!("suggestion already in flight");
            return None;
        }
        let description = compose_description(self.detail.as_ref()?);
        self.suggestion = Suggestion::Pending;
        Some(SuggestFetch {
            ticket: self.suggestions.issue(),
            description,
        })
    }

    /// Applies the outcome of a suggestion query.
    pub fn apply_suggestion(
        &mut self,
        ticket: Ticket,
        result: Result<MatchOutcome, api::Error>,
    ) -> bool {
        if !self.suggestions.is_current(ticket) {
            tracing::debug!(%ticket, "dropping stale suggestion");
            return false;
        }
        self.suggestion = match result {
            Ok(outcome) => Suggestion::Ready(outcome),
            Err(error) => {
                tracing::warn!(%error, "no suggestion available");
                Suggestion::Failed(error.to_string())
            }
        };
        true
    }

    /// Sends a suggestion query to `client` and applies the result.
    ///
    /// Returns `false` if no query was started or its result was stale.
    #[instrument(level = "debug", skip_all)]
    pub async fn suggest(&mut self, client: &MatchClient) -> bool {
        let Some(fetch) = self.begin_suggestion() else {
            return false;
        };
        let result = client.match_candidates(fetch.description).await;
        self.apply_suggestion(fetch.ticket, result)
    }

    /// Display label of an assignee: the employee code when the user
    /// directory knows the id, otherwise the raw id.
    #[must_use]
    pub fn assignee_label(&self, assignment: &Assignment) -> String {
        assignment
            .assignee_id
            .as_deref()
            .map(|id| emp_code_for(&self.users, id).unwrap_or(id).to_string())
            .unwrap_or_default()
    }

    /// Leaves the view; responses still in flight are discarded.
    pub const fn close(&mut self) {
        self.sequence.close();
        self.suggestions.close();
    }

    /// The loaded request, if any.
    #[must_use]
    pub const fn detail(&self) -> Option<&ResourceRequestDetail> {
        self.detail.as_ref()
    }

    /// Why assignee names could not be resolved, if they could not.
    #[must_use]
    pub fn users_error(&self) -> Option<&str> {
        self.users_error.as_deref()
    }

    /// Loading state of the request detail.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// State of the suggestion panel.
    #[must_use]
    pub const fn suggestion(&self) -> &Suggestion {
        &self.suggestion
    }
}
