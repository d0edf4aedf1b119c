//! Terminal output utilities

use console::style;
use kiln_projects::pipeline::{PipelineReport, StepStatus};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

#[derive(Tabled)]
struct StepRow {
    step: &'static str,
    status: String,
    #[tabled(rename = "details")]
    detail: String,
}

fn status_cell(status: &StepStatus) -> String {
    match status {
        StepStatus::Applied => style(status.label()).green().to_string(),
        StepStatus::Warned(_) => style(status.label()).yellow().to_string(),
        StepStatus::Skipped(_) => style(status.label()).dim().to_string(),
    }
}

/// Print the outcome of every pipeline step as a table
pub fn report(report: &PipelineReport) {
    let rows: Vec<StepRow> = report
        .records()
        .iter()
        .map(|r| StepRow {
            step: r.name,
            status: status_cell(&r.status),
            detail: r.status.detail(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
}

#[derive(Tabled)]
struct PlanRow {
    step: &'static str,
    #[tabled(rename = "will run")]
    enabled: &'static str,
}

/// Print which steps would run
pub fn plan(plan: &[(&'static str, bool)]) {
    let rows: Vec<PlanRow> = plan
        .iter()
        .map(|&(step, enabled)| PlanRow {
            step,
            enabled: if enabled { "yes" } else { "no" },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
}
