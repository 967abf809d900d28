use clap::{Parser, ValueEnum};
use resalloc::{
    RequestList,
    domain::{format::format_date, pagination::PageItem, request::ResourceRequestSummary},
};
use serde::Serialize;
use tracing::instrument;

use super::{
    Context,
    terminal::{self, Cell, Colorize, Tone},
};

/// Command arguments for `resalloc requests`.
#[derive(Debug, Default, Parser)]
#[command(about = "List resource requests, newest first")]
pub struct Requests {
    /// Page to show (1-based)
    #[arg(long, short, default_value_t = 1)]
    page: usize,

    /// Free-text search, matched by the server
    #[arg(long, short, default_value = "")]
    search: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageJson<'a> {
    page: usize,
    total_pages: usize,
    total: usize,
    pages: Vec<PageItem>,
    rows: &'a [ResourceRequestSummary],
}

impl Requests {
    #[instrument(level = "debug", skip_all, fields(page = self.page))]
    pub async fn run(self, context: &Context) -> anyhow::Result<()> {
        let client = context.insider()?;
        let mut list = RequestList::new(context.config().page_size());

        let fetch = list.on_route_enter(self.page, self.search);
        let spinner = terminal::spinner("Loading resource requests");
        list.load(&client, fetch).await;
        spinner.finish_and_clear();

        if let Some(error) = list.phase().error() {
            anyhow::bail!("failed to load resource requests: {error}");
        }

        match self.output {
            OutputFormat::Table => print_page(&list),
            OutputFormat::Json => {
                let page = PageJson {
                    page: list.pager().current(),
                    total_pages: list.pager().total_pages(),
                    total: list.total(),
                    pages: list.window(),
                    rows: list.rows(),
                };
                println!("{}", serde_json::to_string_pretty(&page)?);
            }
        }

        Ok(())
    }
}

/// Prints the current page of `list` with its pagination footer.
pub fn print_page(list: &RequestList) {
    if list.rows().is_empty() {
        println!("{}", empty_notice(list).dim());
        if list.total() == 0 {
            return;
        }
    } else {
        let narrow = terminal::is_narrow();
        let headers: &[&str] = if narrow {
            &["Request", "Status", "Date", "Qty"]
        } else {
            &[
                "Request", "Requester", "Status", "Type", "Date", "Qty", "Skill",
            ]
        };
        let rows: Vec<Vec<Cell>> = list.rows().iter().map(|row| cells(row, narrow)).collect();
        terminal::print_table(headers, &rows);
    }

    let pager = list.pager();
    terminal::print_footer(
        &list.window(),
        pager.current(),
        pager.total_pages(),
        list.total(),
        "requests",
    );
}

/// Message shown in place of an empty table.
fn empty_notice(list: &RequestList) -> String {
    let pager = list.pager();
    if list.total() > 0 {
        format!(
            "Page {} is past the end, there are {} pages",
            pager.current(),
            pager.total_pages()
        )
    } else if list.search().is_empty() {
        "No resource requests found".to_string()
    } else {
        format!("No resource requests match '{}'", list.search())
    }
}

fn cells(row: &ResourceRequestSummary, narrow: bool) -> Vec<Cell> {
    let status = Cell::new(row.status.label(), terminal::status_tone(&row.status));
    let date = Cell::from(format_date(&row.request_date));
    let quantity = Cell::new(row.requested_quantity.to_string(), Tone::Plain);

    if narrow {
        vec![Cell::from(row.request_id.as_str()), status, date, quantity]
    } else {
        vec![
            Cell::from(row.request_id.as_str()),
            Cell::from(row.creator_user_code.as_str()),
            status,
            Cell::from(row.request_type.as_str()),
            date,
            quantity,
            Cell::from(row.primary_skill_name.as_str()),
        ]
    }
}
