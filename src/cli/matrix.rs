//! Matrix command implementation

use crate::cli::output::{format_plan_json, format_plan_table, PlannedCaseView};
use crate::cli::MatrixArgs;
use crate::config::HarnessConfig;
use crate::logging::redact_api_key;
use crate::matrix::{MatrixRunner, RunPlan};

/// Handle `gatecheck matrix` command
pub fn handle_matrix(args: &MatrixArgs) -> anyhow::Result<String> {
    let config = if args.config.exists() {
        HarnessConfig::load(Some(&args.config))?
    } else {
        HarnessConfig::default()
    }
    .with_env_overrides();

    let runner = MatrixRunner::from_config(config)?;
    let views = planned_cases(&runner, &RunPlan::new(&[], &args.protocols));

    if args.json {
        Ok(format_plan_json(&views)?)
    } else {
        Ok(format_plan_table(&views))
    }
}

/// Every chat case the runner would send for `plan`, without sending any.
pub fn planned_cases(runner: &MatrixRunner, plan: &RunPlan) -> Vec<PlannedCaseView> {
    let strict_compat = runner.config().matrix.strict_compat;
    plan.protocols
        .iter()
        .flat_map(|protocol| runner.chat_cases(*protocol))
        .map(|spec| {
            let url = redact_api_key(&runner.chat_url(&spec));
            PlannedCaseView::new(&spec, strict_compat, url)
        })
        .collect()
}
