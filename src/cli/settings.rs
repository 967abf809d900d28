use std::fmt::Write as _;

use clap::Parser;
use resalloc::{Config, domain::format::to_percent};

use super::{
    Context,
    terminal::{self, Cell, Colorize},
};

#[derive(Debug, Parser)]
#[command(about = "Show the matching criteria weights and confidence threshold")]
pub struct Settings {}

impl Settings {
    pub fn run(self, context: &Context) {
        print!("{}", render(context.config()));
    }
}

/// Lays out the criteria weights and the confidence threshold.
fn render(config: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Criteria rate".info());
    let rows: Vec<Vec<Cell>> = config
        .criteria
        .labelled()
        .into_iter()
        .map(|(label, weight)| vec![Cell::from(label), Cell::from(format!("{}%", to_percent(weight)))])
        .collect();
    for line in terminal::format_table(&["Criterion", "Weight"], &rows).lines() {
        let _ = writeln!(out, "  {line}");
    }

    out.push('\n');
    let _ = writeln!(out, "{}", "Confidence score".info());
    let _ = writeln!(
        out,
        "  Candidates below {}% are flagged in suggestions",
        to_percent(config.confidence_threshold)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_and_threshold() {
        let out = render(&Config::default());
        let weight = |label: &str| {
            out.lines()
                .find(|line| line.trim_start().starts_with(label))
                .map(|line| line.split_whitespace().last().unwrap_or_default().to_string())
        };

        assert_eq!(weight("Skill Fit").as_deref(), Some("45.00%"));
        assert_eq!(weight("Experience Match").as_deref(), Some("40.00%"));
        assert_eq!(weight("Domain Match").as_deref(), Some("15.00%"));
        assert!(out.contains("Candidates below 40.00% are flagged"));
    }

    #[test]
    fn custom_threshold_is_shown() {
        let mut config = Config::default();
        config.confidence_threshold = 0.5;
        assert!(render(&config).contains("below 50.00%"));
    }
}
