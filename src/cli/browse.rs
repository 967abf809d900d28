use std::io::IsTerminal;

use clap::Parser;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use resalloc::{
    InsiderClient, MatchClient, RequestDetailView, RequestList,
    domain::{format::format_date, request::ResourceRequestSummary},
    view::detail::Suggestion,
};
use tracing::instrument;

use super::{
    Context, request, requests,
    terminal::{self, Colorize},
};

#[derive(Debug, Parser)]
#[command(about = "Browse resource requests and their suggestions interactively")]
pub struct Browse {
    /// Initial search term
    #[arg(long, short, default_value = "")]
    search: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListAction {
    Open(String),
    Next,
    Previous,
    Search,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailAction {
    Suggest,
    Back,
}

impl Browse {
    #[instrument(level = "debug", skip_all)]
    pub async fn run(self, context: &Context) -> anyhow::Result<()> {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("browse needs an interactive terminal");
        }

        let insider = context.insider()?;
        let matcher = match context.matcher() {
            Ok(matcher) => Some(matcher),
            Err(error) => {
                tracing::info!(%error, "suggestions disabled");
                None
            }
        };
        let threshold = context.config().confidence_threshold;
        let theme = ColorfulTheme::default();

        let mut list = RequestList::new(context.config().page_size());
        let mut detail = RequestDetailView::new();
        let mut pending = Some(list.on_route_enter(1, self.search));

        loop {
            if let Some(fetch) = pending.take() {
                let spinner = terminal::spinner("Loading resource requests");
                list.load(&insider, fetch).await;
                spinner.finish_and_clear();
            }

            println!();
            if let Some(error) = list.phase().error() {
                println!("{}", format!("Could not refresh the list: {error}").warning());
            }
            requests::print_page(&list);

            let menu = list_menu(&list);
            let labels: Vec<&str> = menu.iter().map(|(label, _)| label.as_str()).collect();
            let choice = Select::with_theme(&theme)
                .with_prompt("Resource requests")
                .items(&labels)
                .default(0)
                .interact_opt()?;

            let action = choice.map_or(ListAction::Quit, |index| menu[index].1.clone());
            match action {
                ListAction::Open(id) => {
                    open_request(&mut detail, &insider, matcher.as_ref(), threshold, &theme, id)
                        .await?;
                }
                ListAction::Next => pending = list.next_page(),
                ListAction::Previous => pending = list.previous_page(),
                ListAction::Search => {
                    let term: String = Input::with_theme(&theme)
                        .with_prompt("Search")
                        .with_initial_text(list.search())
                        .allow_empty(true)
                        .interact_text()?;
                    pending = list.on_search_changed(term.trim());
                }
                ListAction::Quit => break,
            }
        }

        list.close();
        detail.close();
        Ok(())
    }
}

fn list_menu(list: &RequestList) -> Vec<(String, ListAction)> {
    let mut menu: Vec<(String, ListAction)> = list
        .rows()
        .iter()
        .map(|row| (row_label(row), ListAction::Open(row.resource_request_id.clone())))
        .collect();

    let pager = list.pager();
    if pager.current() < pager.total_pages() {
        menu.push(("Next page".to_string(), ListAction::Next));
    }
    if pager.current() > 1 {
        menu.push(("Previous page".to_string(), ListAction::Previous));
    }
    menu.push(("Search…".to_string(), ListAction::Search));
    menu.push(("Quit".to_string(), ListAction::Quit));
    menu
}

fn row_label(row: &ResourceRequestSummary) -> String {
    format!(
        "{:<12} {:<12} {:<12} {}",
        row.request_id,
        row.status.label(),
        format_date(&row.request_date),
        row.primary_skill_name
    )
}

async fn open_request(
    view: &mut RequestDetailView,
    insider: &InsiderClient,
    matcher: Option<&MatchClient>,
    threshold: f64,
    theme: &ColorfulTheme,
    id: String,
) -> anyhow::Result<()> {
    let fetch = view.on_route_enter(id);
    let spinner = terminal::spinner("Loading request");
    view.load(insider, fetch).await;
    spinner.finish_and_clear();

    if let Some(error) = view.phase().error() {
        println!("{}", format!("Could not load the request: {error}").warning());
        return Ok(());
    }

    loop {
        let Some(request) = view.detail() else {
            return Ok(());
        };
        println!();
        request::print_detail(view, request);
        if !matches!(view.suggestion(), Suggestion::Idle) {
            request::print_suggestion(view.suggestion(), threshold);
        }

        let mut menu = Vec::new();
        if matcher.is_some() {
            menu.push(("Suggest matches", DetailAction::Suggest));
        }
        menu.push(("Back to list", DetailAction::Back));
        let labels: Vec<&str> = menu.iter().map(|(label, _)| *label).collect();

        let choice = Select::with_theme(theme)
            .with_prompt("Request")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        match (choice.map(|index| menu[index].1), matcher) {
            (Some(DetailAction::Suggest), Some(matcher)) => {
                let spinner = terminal::spinner("Asking for match suggestions");
                view.suggest(matcher).await;
                spinner.finish_and_clear();
            }
            _ => {
                view.close();
                return Ok(());
            }
        }
    }
}
