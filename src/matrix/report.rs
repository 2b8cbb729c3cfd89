//! Aggregated results of a run.

use super::case::CaseReport;
use crate::validate::FaultKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(target: String, started_at: DateTime<Utc>, cases: Vec<CaseReport>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            target,
            started_at,
            finished_at: Utc::now(),
            summary: Summary::from_cases(&cases),
            cases,
        }
    }

    /// True when at least one case printed a FAIL line.
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

/// Pass/fail counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failure counts per fault kind
    pub faults: BTreeMap<FaultKind, usize>,
}

impl Summary {
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        let mut summary = Summary::default();
        for case in cases {
            summary.total += 1;
            if case.passed() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
                if let Some(fault) = case.verdict.fault {
                    *summary.faults.entry(fault).or_insert(0) += 1;
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::case::{CaseMeta, Suite};
    use crate::protocol::Protocol;
    use crate::validate::{Extracted, Verdict};

    fn case(verdict: Verdict) -> CaseReport {
        CaseReport {
            meta: CaseMeta {
                suite: Suite::Models,
                protocol: Protocol::OpenAI,
                route: None,
                scenario: None,
                label: "OpenAI List".to_string(),
                method: "GET".to_string(),
                url: "http://localhost:11435/v1/models".to_string(),
            },
            verdict,
            elapsed_ms: 3,
        }
    }

    #[test]
    fn test_summary_counts() {
        let cases = vec![
            case(Verdict::pass("ok", Extracted::Count(1))),
            case(Verdict::fail(FaultKind::Status, "HTTP 500: ")),
            case(Verdict::fail(FaultKind::Status, "HTTP 404: ")),
            case(Verdict::fail(FaultKind::Transport, "HTTP -1 (no response): refused")),
        ];
        let summary = Summary::from_cases(&cases);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.faults[&FaultKind::Status], 2);
        assert_eq!(summary.faults[&FaultKind::Transport], 1);
    }

    #[test]
    fn test_report_without_failures() {
        let report = RunReport::new(
            "http://localhost:11435".to_string(),
            Utc::now(),
            vec![case(Verdict::pass("ok", Extracted::Count(2)))],
        );
        assert!(!report.has_failures());
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn test_report_json_shape() {
        let report = RunReport::new(
            "http://localhost:11435".to_string(),
            Utc::now(),
            vec![case(Verdict::fail(FaultKind::Shape, "Missing 'data'"))],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["summary"]["faults"]["shape"], 1);
        assert_eq!(json["cases"][0]["label"], "OpenAI List");
        assert_eq!(json["cases"][0]["verdict"]["passed"], false);
    }
}
