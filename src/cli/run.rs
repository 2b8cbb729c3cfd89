//! Run command implementation

use crate::cli::output::{format_report_json, format_summary, ConsoleReporter};
use crate::cli::RunArgs;
use crate::config::{HarnessConfig, LogFormat, LoggingConfig};
use crate::matrix::{MatrixRunner, NullSink, RunPlan};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &RunArgs) -> anyhow::Result<HarnessConfig> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        HarnessConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        HarnessConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.target.port = port;
    }
    if let Some(ref host) = args.host {
        config.target.host = host.clone();
    }
    if let Some(ref api_key) = args.api_key {
        config.target.api_key = api_key.clone();
    }
    if let Some(timeout) = args.timeout {
        config.target.timeout_seconds = timeout;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Initialize tracing based on configuration. Logs go to stderr so the
/// report on stdout stays machine-readable.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Handle `gatecheck run`. Returns whether every case passed.
pub async fn handle_run(args: &RunArgs) -> anyhow::Result<bool> {
    let config = load_config_with_overrides(args)?;
    init_tracing(&config.logging)?;

    let runner = MatrixRunner::from_config(config)?;
    let plan = RunPlan::new(&args.suites, &args.protocols);

    let report = if args.json {
        let report = runner.run(&plan, &mut NullSink).await;
        println!("{}", format_report_json(&report)?);
        report
    } else {
        println!("Target: {}", runner.base_url());
        let report = runner.run(&plan, &mut ConsoleReporter).await;
        println!("{}", format_summary(&report));
        report
    };

    Ok(!report.has_failures())
}
