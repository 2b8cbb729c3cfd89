//! Output formatting helpers for CLI commands

use crate::matrix::{CaseReport, ReportSink, RequestSpec, RunReport, Suite};
use crate::protocol::Protocol;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 20;

/// Streams progress to stdout as the matrix runs.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ReportSink for ConsoleReporter {
    fn suite_started(&mut self, suite: Suite) {
        println!("{}", format_suite_header(suite.title()));
    }

    fn protocol_started(&mut self, protocol: Protocol) {
        println!("{}", format_protocol_header(protocol));
    }

    fn case_finished(&mut self, case: &CaseReport) {
        println!("{}", format_case_line(case));
    }
}

pub fn format_suite_header(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{}\n{}\n{}",
        rule.blue(),
        format!("  {}", title).blue(),
        rule.blue()
    )
}

pub fn format_protocol_header(protocol: Protocol) -> String {
    format!("\n{}", format!("--- Testing Protocol: {} ---", protocol).yellow())
}

/// `[PASS] Text -> /switch        | Text: Hi...`
pub fn format_case_line(case: &CaseReport) -> String {
    let tag = if case.passed() {
        "[PASS]".green()
    } else {
        "[FAIL]".red()
    };
    format!(
        "{} {:<width$} | {}",
        tag,
        case.meta.label,
        case.verdict.message,
        width = LABEL_WIDTH
    )
}

/// Closing banner plus pass/fail totals and a per-fault breakdown.
pub fn format_summary(report: &RunReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Suite", "Total", "Passed", "Failed"]);

    for suite in Suite::ALL {
        let cases: Vec<&CaseReport> = report
            .cases
            .iter()
            .filter(|c| c.meta.suite == suite)
            .collect();
        if cases.is_empty() {
            continue;
        }
        let failed = cases.iter().filter(|c| !c.passed()).count();
        let failed_cell = if failed == 0 {
            "0".green().to_string()
        } else {
            failed.to_string().red().to_string()
        };
        table.add_row(vec![
            Cell::new(suite.title()),
            Cell::new(cases.len()),
            Cell::new(cases.len() - failed),
            Cell::new(failed_cell),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(report.summary.total),
        Cell::new(report.summary.passed),
        Cell::new(report.summary.failed),
    ]);

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!(
        "\n{}\n  Testing Completed.\n{}\n{}",
        rule.blue(),
        rule.blue(),
        table
    );

    if !report.summary.faults.is_empty() {
        let faults: Vec<String> = report
            .summary
            .faults
            .iter()
            .map(|(kind, count)| format!("{}: {}", kind, count))
            .collect();
        out.push_str(&format!("\nFailures by kind: {}", faults.join(", ")));
    }
    out
}

/// Format the run report as pretty JSON
pub fn format_report_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// View model for one planned chat case
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCaseView {
    pub protocol: Protocol,
    pub route: String,
    pub model: String,
    pub scenario: String,
    pub expects: String,
    pub url: String,
}

impl PlannedCaseView {
    pub fn new(spec: &RequestSpec, strict_compat: bool, url: String) -> Self {
        Self {
            protocol: spec.protocol,
            route: spec.route.label(),
            model: spec.model.clone(),
            scenario: spec.scenario.label().to_string(),
            expects: spec.expectation(strict_compat).to_string(),
            url,
        }
    }
}

/// Format planned chat cases as a table
pub fn format_plan_table(cases: &[PlannedCaseView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Protocol", "Route", "Model", "Scenario", "Expects", "URL"]);

    for c in cases {
        table.add_row(vec![
            Cell::new(c.protocol),
            Cell::new(&c.route),
            Cell::new(&c.model),
            Cell::new(&c.scenario),
            Cell::new(&c.expects),
            Cell::new(&c.url),
        ]);
    }

    table.to_string()
}

/// Format planned chat cases as JSON
pub fn format_plan_json(cases: &[PlannedCaseView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "cases": cases }))
}
