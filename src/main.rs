use clap::Parser;
use gatecheck::cli::{
    handle_completions, handle_config_init, handle_matrix, handle_run, Cli, Commands,
    ConfigCommands,
};
use std::process::ExitCode;

/// Exit code when at least one case failed.
const EXIT_CASES_FAILED: u8 = 1;
/// Exit code for errors that stopped the run before or outside the matrix.
const EXIT_FATAL: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => handle_run(&args).await,
        Commands::Matrix(args) => handle_matrix(&args).map(|output| {
            println!("{}", output);
            true
        }),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args).map(|_| true),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_CASES_FAILED),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
