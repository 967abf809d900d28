use clap::{Parser, ValueEnum};
use resalloc::{
    RequestDetailView,
    domain::{
        format::{format_date_time, to_percent},
        matching::{MatchCandidate, MatchOutcome},
        request::{ResourceLine, ResourceRequestDetail},
    },
    view::detail::Suggestion,
};
use serde::Serialize;
use tracing::instrument;

use super::{
    Context,
    terminal::{self, Cell, Colorize},
};

#[derive(Debug, Parser)]
#[command(about = "Display a resource request with its lines and assignees")]
pub struct Request {
    /// Identifier of the resource request
    id: String,

    /// Ask the AI matching service for candidates
    #[arg(long)]
    suggest: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestJson<'a> {
    request: &'a ResourceRequestDetail,
    assignees: Vec<AssigneeJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    users_error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a MatchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion_error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssigneeJson {
    line_id: String,
    assignee_id: Option<String>,
    label: String,
}

impl Request {
    #[instrument(level = "debug", skip_all, fields(id = %self.id))]
    pub async fn run(self, context: &Context) -> anyhow::Result<()> {
        let client = context.insider()?;
        let mut view = RequestDetailView::new();

        let fetch = view.on_route_enter(self.id.as_str());
        let spinner = terminal::spinner(format!("Loading request {}", self.id));
        view.load(&client, fetch).await;
        spinner.finish_and_clear();

        if let Some(error) = view.phase().error() {
            anyhow::bail!("failed to load resource request {}: {error}", self.id);
        }

        if self.suggest {
            let matcher = context.matcher()?;
            let spinner = terminal::spinner("Asking for match suggestions");
            view.suggest(&matcher).await;
            spinner.finish_and_clear();
        }

        let Some(request) = view.detail() else {
            anyhow::bail!("resource request {} was not loaded", self.id);
        };

        match self.output {
            OutputFormat::Pretty => {
                print_detail(&view, request);
                if self.suggest {
                    print_suggestion(view.suggestion(), context.config().confidence_threshold);
                }
            }
            OutputFormat::Json => {
                let json = to_json(&view, request);
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }

        Ok(())
    }
}

fn to_json<'a>(view: &'a RequestDetailView, request: &'a ResourceRequestDetail) -> RequestJson<'a> {
    let assignees = request
        .resource_details
        .iter()
        .flat_map(|line| {
            line.resource_assignments
                .iter()
                .map(|assignment| AssigneeJson {
                    line_id: line.id.clone(),
                    assignee_id: assignment.assignee_id.clone(),
                    label: view.assignee_label(assignment),
                })
        })
        .collect();

    let (suggestion, suggestion_error) = match view.suggestion() {
        Suggestion::Ready(outcome) => (Some(outcome), None),
        Suggestion::Failed(message) => (None, Some(message.as_str())),
        Suggestion::Idle | Suggestion::Pending => (None, None),
    };

    RequestJson {
        request,
        assignees,
        users_error: view.users_error(),
        suggestion,
        suggestion_error,
    }
}

/// Prints the request header, its resource lines and their assignees.
pub fn print_detail(view: &RequestDetailView, request: &ResourceRequestDetail) {
    println!("# {}", request.request_id);
    if !request.target_name.is_empty() {
        println!("{}", request.target_name);
    }
    println!();

    println!("{}", "Metadata".dim());
    println!("  Requester: {}", or_dash(&request.creator_user_code));
    println!(
        "  Created:   {}",
        request
            .creation_time
            .as_ref()
            .map_or_else(|| "-".to_string(), format_date_time)
    );
    if !request.request_note.is_empty() {
        println!("  Note:      {}", request.request_note);
    }

    if let Some(error) = view.users_error() {
        println!(
            "\n{}",
            format!("Assignee names unavailable ({error}); showing user ids").dim()
        );
    }

    if request.resource_details.is_empty() {
        println!("\n{}", "No resources requested".dim());
        return;
    }

    for (index, line) in request.resource_details.iter().enumerate() {
        print_line(view, index + 1, line);
    }
}

fn print_line(view: &RequestDetailView, number: usize, line: &ResourceLine) {
    let demand = if line.in_demand {
        format!("  {}", "in demand".warning())
    } else {
        String::new()
    };
    println!(
        "\n{} {} × {}{demand}",
        format!("Resource {number}").info(),
        line.requested_quantity,
        or_dash(&line.primary_skill_name)
    );

    let skills: Vec<&str> = line.additional_skill_names().collect();
    if !skills.is_empty() {
        println!("  Additional skills: {}", skills.join(", "));
    }
    if !line.requirement_note.is_empty() {
        println!("  Note: {}", line.requirement_note);
    }

    if line.resource_assignments.is_empty() {
        println!("  {}", "No assignments".dim());
        return;
    }

    let rows: Vec<Vec<Cell>> = line
        .resource_assignments
        .iter()
        .map(|assignment| {
            vec![
                Cell::from(view.assignee_label(assignment)),
                Cell::from(assignment.expected_quantity.to_string()),
                Cell::from(assignment.status.as_str()),
                Cell::from(assignment.note.as_str()),
            ]
        })
        .collect();
    for table_line in terminal::format_table(&["Assignee", "Qty", "Status", "Note"], &rows).lines()
    {
        println!("  {table_line}");
    }
}

/// Prints the suggestion panel.
///
/// Candidates scoring below `threshold` are flagged.
pub fn print_suggestion(suggestion: &Suggestion, threshold: f64) {
    println!("\n{}", "AI suggestions".info());
    match suggestion {
        Suggestion::Idle => println!("  {}", "No suggestion requested".dim()),
        Suggestion::Pending => println!("  {}", "Waiting for the matching service".dim()),
        Suggestion::Failed(message) => println!("  {}", message.warning()),
        Suggestion::Ready(outcome) => {
            if let Some(summary) = &outcome.summary {
                println!("  {summary}");
            }
            if !outcome.selection_criteria.is_empty() {
                println!(
                    "  {}",
                    format!("Criteria: {}", outcome.selection_criteria.join(", ")).dim()
                );
            }
            for (rank, candidate) in outcome.candidates.iter().enumerate() {
                print_candidate(rank + 1, candidate, threshold);
            }
        }
    }
}

fn print_candidate(rank: usize, candidate: &MatchCandidate, threshold: f64) {
    let score = format!("{}%", to_percent(candidate.overall_match_score));
    let score = if candidate.overall_match_score < threshold {
        format!("{}  {}", score.warning(), "below confidence threshold".dim())
    } else {
        score.success()
    };
    println!("\n  {rank}. {}  {score}", candidate.employee);

    let breakdown = &candidate.detailed_scoring_breakdown;
    println!(
        "     {}",
        format!(
            "skill fit {}%  domain {}%  experience {}%",
            to_percent(breakdown.skill_fit),
            to_percent(breakdown.domain_expertise_alignment),
            to_percent(breakdown.experience_level_appropriateness)
        )
        .dim()
    );

    for strength in &candidate.key_strengths_and_relevant_experience {
        println!("     + {strength}");
    }
    for concern in &candidate.potential_concerns_or_limitations {
        println!("     - {concern}");
    }
    if let Some(workload) = &candidate.workload_compatibility_assessment {
        println!("     {}", format!("Workload: {workload}").dim());
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
