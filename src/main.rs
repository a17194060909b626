use clap::Parser;
use old2new::cli::{exit_code, one_line, run, Cli};
use old2new::logging;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::info!("CLI arguments parsed, invoking run");

    let yaml = old2new_core::default_yaml_codec();
    let result = run(&cli, io::stdin().lock(), io::stdout().lock(), yaml.as_deref());
    match result {
        Ok(summary) => {
            tracing::info!(?summary, "CLI completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", one_line(&e));
            ExitCode::from(exit_code(&e))
        }
    }
}
