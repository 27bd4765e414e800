use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use kinship_cli::args::{APP_NAME, VERSION};
use kinship_cli::{CliCommand, Graphviz, Settings, parse_arguments, run, usage};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KINSHIP_LOG";

fn main() -> ExitCode {
    init_tracing();

    let raw_args = env::args().skip(1).collect::<Vec<_>>();
    match execute(&raw_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("build aborted: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(raw_args: &[String]) -> Result<()> {
    match parse_arguments(raw_args, Settings::from_env())? {
        CliCommand::Help => println!("{}", usage()),
        CliCommand::Version => println!("{APP_NAME} {VERSION}"),
        CliCommand::Usage(reason) => {
            eprintln!("{reason}");
            println!("{}", usage());
        }
        CliCommand::Build(config) => {
            let renderer = Graphviz::new(config.renderer.as_str());
            let report = run(&config, &renderer).with_context(|| {
                format!("building views from {}", config.data_dir.display())
            })?;
            info!(
                "rendered {} view(s) into {}",
                report.artifacts.len(),
                config.image_dir().display()
            );
        }
    }
    Ok(())
}
