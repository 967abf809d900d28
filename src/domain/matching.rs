//! AI match suggestions for a resource request.

use std::fmt::Write as _;

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use super::{request::ResourceRequestDetail, wire};

/// Builds the free-text description sent to the matching service.
///
/// The description is the request note followed by one `Need ...` clause per
/// resource line, with its additional skills and requirement note when
/// present.
#[must_use]
pub fn compose_description(request: &ResourceRequestDetail) -> String {
    let mut description = request.request_note.clone();

    for line in &request.resource_details {
        let _ = write!(
            description,
            "\n Need {} {}",
            line.requested_quantity, line.primary_skill_name
        );

        let skills: Vec<&str> = line.additional_skill_names().collect();
        if !skills.is_empty() {
            let _ = write!(description, " with additional skills: {}", skills.join(","));
        }

        if !line.requirement_note.is_empty() {
            let _ = write!(description, " and note: {}", line.requirement_note);
        }
    }

    description
}

/// Body of a match request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchQuery {
    /// Free-text project description.
    pub description: String,
}

/// Sub-scores of a match, each in `0..=1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// How well the employee's skills fit.
    #[serde(default)]
    pub skill_fit: f64,
    /// Overlap with the project's business domain.
    #[serde(default)]
    pub domain_expertise_alignment: f64,
    /// Whether the seniority fits the request.
    #[serde(default)]
    pub experience_level_appropriateness: f64,
}

/// An employee ranked against a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Employee name or code.
    pub employee: String,
    /// Overall score in `0..=1`.
    #[serde(default)]
    pub overall_match_score: f64,
    /// Named sub-scores.
    #[serde(default)]
    pub detailed_scoring_breakdown: ScoreBreakdown,
    /// Reasons the employee may not fit.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub potential_concerns_or_limitations: Vec<String>,
    /// Reasons the employee fits.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub key_strengths_and_relevant_experience: Vec<String>,
    /// Availability commentary.
    #[serde(default)]
    pub workload_compatibility_assessment: Option<String>,
}

/// Raw response of the matching endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchResponse {
    /// Ranked candidates; empty when matching failed.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub recommended_employees: Vec<MatchCandidate>,
    /// Criteria the service applied.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub selection_criteria: Vec<String>,
    /// Narrative summary of the recommendation.
    #[serde(default)]
    pub recommendation_summary: Option<String>,
    /// Error reported by the service.
    #[serde(default)]
    pub error: Option<String>,
}

/// A successful match: at least one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Ranked candidates, best first.
    pub candidates: NonEmpty<MatchCandidate>,
    /// Criteria the service applied.
    pub selection_criteria: Vec<String>,
    /// Narrative summary, if the service gave one.
    pub summary: Option<String>,
}

impl MatchResponse {
    /// Converts the response into an outcome.
    ///
    /// # Errors
    ///
    /// Returns the service's error message, or a generic one, when no
    /// candidates were recommended.
    pub fn into_outcome(self) -> Result<MatchOutcome, String> {
        let Some(candidates) = NonEmpty::from_vec(self.recommended_employees) else {
            return Err(self
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "No matching employees were recommended".to_string()));
        };

        Ok(MatchOutcome {
            candidates,
            selection_criteria: self.selection_criteria,
            summary: self.recommendation_summary.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::request::{AdditionalSkill, ResourceLine};

    fn line(quantity: u32, skill: &str, extra: &[&str], note: &str) -> ResourceLine {
        ResourceLine {
            id: "1".to_string(),
            requested_quantity: quantity,
            in_demand: false,
            primary_skill_name: skill.to_string(),
            additional_skills: extra
                .iter()
                .map(|name| AdditionalSkill {
                    skill_name: (*name).to_string(),
                })
                .collect(),
            requirement_note: note.to_string(),
            resource_assignments: Vec::new(),
        }
    }

    fn request(note: &str, lines: Vec<ResourceLine>) -> ResourceRequestDetail {
        ResourceRequestDetail {
            request_id: "RR-1".to_string(),
            target_name: "App".to_string(),
            creator_user_code: "E001".to_string(),
            creation_time: None,
            request_note: note.to_string(),
            resource_details: lines,
        }
    }

    #[test]
    fn single_line_with_skills_and_note() {
        let request = request("Build app", vec![line(2, "Dev", &["React"], "urgent")]);
        assert_eq!(
            compose_description(&request),
            "Build app\n Need 2 Dev with additional skills: React and note: urgent"
        );
    }

    #[test]
    fn optional_clauses_are_omitted() {
        let request = request(
            "Platform",
            vec![line(1, "QA", &[], ""), line(3, "Java", &["Spring", "Kafka"], "")],
        );
        assert_eq!(
            compose_description(&request),
            "Platform\n Need 1 QA\n Need 3 Java with additional skills: Spring,Kafka"
        );
    }

    #[test]
    fn empty_response_reports_service_error() {
        let response: MatchResponse = serde_json::from_value(json!({
            "recommended_employees": [],
            "error": "No employees available"
        }))
        .unwrap();

        assert_eq!(response.into_outcome().unwrap_err(), "No employees available");
    }

    #[test]
    fn empty_response_without_error_has_generic_message() {
        let response = MatchResponse::default();
        assert!(!response.into_outcome().unwrap_err().is_empty());
    }

    #[test]
    fn candidates_keep_their_rank() {
        let response: MatchResponse = serde_json::from_value(json!({
            "recommended_employees": [
                {
                    "employee": "E010",
                    "overall_match_score": 0.91,
                    "detailed_scoring_breakdown": {
                        "skill_fit": 0.9,
                        "domain_expertise_alignment": 0.8,
                        "experience_level_appropriateness": 1.0
                    },
                    "key_strengths_and_relevant_experience": ["React"],
                    "potential_concerns_or_limitations": []
                },
                { "employee": "E011", "overall_match_score": 0.5 }
            ],
            "selection_criteria": ["skills"],
            "recommendation_summary": ""
        }))
        .unwrap();

        let outcome = response.into_outcome().unwrap();
        assert_eq!(outcome.candidates.head.employee, "E010");
        assert_eq!(outcome.candidates.len(), 2);
        assert!(outcome.summary.is_none());
    }
}
