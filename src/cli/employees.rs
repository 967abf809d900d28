use clap::{Parser, ValueEnum};
use resalloc::{
    EmployeeList,
    domain::{
        employee::Employee,
        format::format_date_time,
        pagination::PageItem,
    },
};
use serde::Serialize;
use tracing::instrument;

use super::{
    Context,
    terminal::{self, Cell, Colorize},
};

/// Command arguments for `resalloc employees`.
#[derive(Debug, Default, Parser)]
#[command(about = "List employees with their position and skills")]
pub struct Employees {
    /// Page to show (1-based)
    #[arg(long, short, default_value_t = 1)]
    page: usize,

    /// Only show employees whose code contains this text (case-insensitive)
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
    is_syncing: bool,
    rows: Vec<&'a Employee>,
}

impl Employees {
    #[instrument(level = "debug", skip_all, fields(page = self.page))]
    pub async fn run(self, context: &Context) -> anyhow::Result<()> {
        let client = context.employees()?;
        let mut list = EmployeeList::new(context.config().page_size());

        let ticket = list.on_route_enter();
        let spinner = terminal::spinner("Loading employees");
        list.load(&client, ticket).await;
        spinner.finish_and_clear();

        if let Some(error) = list.phase().error() {
            anyhow::bail!("failed to load employees: {error}");
        }

        list.on_search_changed(self.search);
        list.on_page_changed(self.page);

        match self.output {
            OutputFormat::Table => print_page(&list),
            OutputFormat::Json => {
                let page = PageJson {
                    page: list.pager().current(),
                    total_pages: list.pager().total_pages(),
                    total: list.match_count(),
                    pages: list.window(),
                    is_syncing: list.is_syncing(),
                    rows: list.page_rows(),
                };
                println!("{}", serde_json::to_string_pretty(&page)?);
            }
        }

        Ok(())
    }
}

fn print_page(list: &EmployeeList) {
    if list.is_syncing() {
        println!(
            "{}",
            "The employee directory is synchronising; some records may be missing".warning()
        );
    }

    let rows = list.page_rows();
    if rows.is_empty() {
        println!("{}", "No employees found".dim());
        return;
    }

    let narrow = terminal::is_narrow();
    let headers: &[&str] = if narrow {
        &["Code", "Position", "Skills"]
    } else {
        &[
            "Code",
            "Name",
            "Position",
            "Skills",
            "Additional skills",
            "Domains",
        ]
    };
    let rows: Vec<Vec<Cell>> = rows.iter().map(|employee| cells(employee, narrow)).collect();
    terminal::print_table(headers, &rows);

    let pager = list.pager();
    terminal::print_footer(
        &list.window(),
        pager.current(),
        pager.total_pages(),
        list.match_count(),
        "employees",
    );
    if let Some(synced) = list.last_sync_date() {
        println!(
            "{}",
            format!("last synchronised {}", format_date_time(&synced)).dim()
        );
    }
}

fn cells(employee: &Employee, narrow: bool) -> Vec<Cell> {
    let skills = employee
        .skills
        .iter()
        .map(|skill| {
            let marker = if skill.is_primary { "*" } else { "" };
            format!("{}{marker} ({})", skill.skill_name, skill.proficiency_name)
        })
        .collect::<Vec<_>>()
        .join(", ");

    if narrow {
        return vec![
            Cell::from(employee.emp_code.as_str()),
            Cell::from(employee.position_label()),
            Cell::from(skills),
        ];
    }

    let additional = employee
        .additional_skills
        .iter()
        .map(|skill| format!("{} ({})", skill.additional_skill_name, skill.proficiency_name))
        .collect::<Vec<_>>()
        .join(", ");
    let domains = employee
        .business_domains
        .iter()
        .map(|domain| domain.business_domain_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        Cell::from(employee.emp_code.as_str()),
        Cell::from(employee.name.as_deref().unwrap_or("-")),
        Cell::from(employee.position_label()),
        Cell::from(skills),
        Cell::from(additional),
        Cell::from(domains),
    ]
}
