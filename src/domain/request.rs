//! Resource requests as reported by the resource-management API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// Workflow status of a resource request.
///
/// Labels other than the three well-known ones are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    /// Waiting for a resource manager to pick it up.
    Waiting,
    /// Being staffed.
    InProgress,
    /// Withdrawn by the requester.
    Cancelled,
    /// Any other label.
    Other(String),
}

impl From<String> for RequestStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Waiting" => Self::Waiting,
            "In Progress" | "InProgress" => Self::InProgress,
            "Cancelled" => Self::Cancelled,
            _ => Self::Other(label),
        }
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl RequestStatus {
    /// Display label of the status.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Waiting => "Waiting",
            Self::InProgress => "In Progress",
            Self::Cancelled => "Cancelled",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the resource request list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestSummary {
    /// Human-facing request number.
    #[serde(deserialize_with = "wire::id")]
    pub request_id: String,
    /// Identifier used to open the request detail.
    #[serde(deserialize_with = "wire::id")]
    pub resource_request_id: String,
    /// Employee code of the requester.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub creator_user_code: String,
    /// Workflow status.
    pub status: RequestStatus,
    /// Kind of request, e.g. `Resource`.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub request_type: String,
    /// When the request was raised.
    #[serde(deserialize_with = "wire::timestamp")]
    pub request_date: DateTime<Utc>,
    /// Number of people requested.
    #[serde(default)]
    pub requested_quantity: u32,
    /// Main skill requested.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub primary_skill_name: String,
}

/// One page of the filtered request list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestPage {
    /// Rows of the requested page.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub result: Vec<ResourceRequestSummary>,
    /// Number of rows matching the filter across all pages.
    #[serde(default)]
    pub total: usize,
}

/// A full resource request with its resource lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequestDetail {
    /// Human-facing request number.
    #[serde(deserialize_with = "wire::id")]
    pub request_id: String,
    /// Project the request staffs.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub target_name: String,
    /// Employee code of the requester.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub creator_user_code: String,
    /// When the request was created.
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub creation_time: Option<DateTime<Utc>>,
    /// Free-text note from the requester.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub request_note: String,
    /// Requested resources, in display order.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub resource_details: Vec<ResourceLine>,
}

/// A single skill/quantity requirement within a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLine {
    /// Line identifier.
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    /// Number of people requested for this line.
    #[serde(default)]
    pub requested_quantity: u32,
    /// Whether the skill is flagged as in demand.
    #[serde(default, deserialize_with = "wire::flag")]
    pub in_demand: bool,
    /// Main skill requested.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub primary_skill_name: String,
    /// Secondary skills.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub additional_skills: Vec<AdditionalSkill>,
    /// Free-text requirement note.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub requirement_note: String,
    /// Employees assigned to this line.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub resource_assignments: Vec<Assignment>,
}

impl ResourceLine {
    /// Names of the additional skills, in order.
    pub fn additional_skill_names(&self) -> impl Iterator<Item = &str> {
        self.additional_skills.iter().map(|skill| skill.skill_name.as_str())
    }
}

/// Secondary skill of a resource line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalSkill {
    /// Skill name.
    pub skill_name: String,
}

/// An employee tentatively or finally matched to a resource line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// User id of the assignee; resolved through the user directory.
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub assignee_id: Option<String>,
    /// Quantity the assignee is expected to cover.
    #[serde(default)]
    pub expected_quantity: u32,
    /// Free-text note.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub note: String,
    /// Free-form status label.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub status: String,
}

/// A user of the resource-management system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id, referenced by [`Assignment::assignee_id`].
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    /// Employee code.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub emp_code: String,
}

/// Envelope of the user list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserList {
    /// All users.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub data: Vec<User>,
}

/// Resolves a user id to an employee code by linear scan.
#[must_use]
pub fn emp_code_for<'a>(users: &'a [User], id: &str) -> Option<&'a str> {
    users
        .iter()
        .find(|user| user.id == id)
        .map(|user| user.emp_code.as_str())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case("Waiting", RequestStatus::Waiting; "waiting")]
    #[test_case("In Progress", RequestStatus::InProgress; "in progress")]
    #[test_case("Cancelled", RequestStatus::Cancelled; "cancelled")]
    #[test_case("Done", RequestStatus::Other("Done".to_string()); "other")]
    fn status_labels(label: &str, expected: RequestStatus) {
        let status = RequestStatus::from(label.to_string());
        assert_eq!(status, expected);
        assert_eq!(status.label(), label);
    }

    #[test]
    fn summary_from_api_payload() {
        let summary: ResourceRequestSummary = serde_json::from_value(json!({
            "requestId": "RR-0042",
            "resourceRequestId": 42,
            "creatorUserCode": "E001",
            "status": "In Progress",
            "requestType": "Resource",
            "requestDate": "2025-03-20T08:05:00",
            "requestedQuantity": 3,
            "primarySkillName": "Java"
        }))
        .unwrap();

        assert_eq!(summary.resource_request_id, "42");
        assert_eq!(summary.status, RequestStatus::InProgress);
        assert_eq!(summary.requested_quantity, 3);
    }

    #[test]
    fn detail_tolerates_nulls() {
        let detail: ResourceRequestDetail = serde_json::from_value(json!({
            "requestId": "RR-7",
            "targetName": "Storefront",
            "creatorUserCode": "E001",
            "creationTime": null,
            "requestNote": null,
            "resourceDetails": [{
                "id": 1,
                "requestedQuantity": 2,
                "inDemand": 1,
                "primarySkillName": "Dev",
                "additionalSkills": null,
                "requirementNote": null,
                "resourceAssignments": [
                    { "assigneeId": 9, "expectedQuantity": 1, "note": null, "status": "Proposed" }
                ]
            }]
        }))
        .unwrap();

        assert!(detail.creation_time.is_none());
        assert!(detail.request_note.is_empty());
        let line = &detail.resource_details[0];
        assert!(line.in_demand);
        assert!(line.additional_skills.is_empty());
        assert_eq!(line.resource_assignments[0].assignee_id.as_deref(), Some("9"));
    }

    #[test]
    fn emp_code_lookup() {
        let users = vec![
            User { id: "1".to_string(), emp_code: "E001".to_string() },
            User { id: "2".to_string(), emp_code: "E002".to_string() },
        ];
        assert_eq!(emp_code_for(&users, "2"), Some("E002"));
        assert_eq!(emp_code_for(&users, "3"), None);
    }
}
