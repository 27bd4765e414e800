//! Command-line argument parsing

use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::config::{BuildConfig, OutputFormat, Settings};

pub const APP_NAME: &str = "kinship";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub enum CliCommand {
    Build(BuildConfig),
    /// Wrong positional arguments; print the reason and usage, then exit cleanly.
    Usage(String),
    Help,
    Version,
}

pub fn parse_arguments(args: &[String], mut settings: Settings) -> Result<CliCommand> {
    let mut positional: Vec<&str> = Vec::new();

    for arg in args {
        if matches!(arg.as_str(), "-h" | "--help") {
            return Ok(CliCommand::Help);
        }

        if matches!(arg.as_str(), "-v" | "--version") {
            return Ok(CliCommand::Version);
        }

        if let Some(value) = arg.strip_prefix("--data=") {
            settings.data_dir = non_empty_path(arg, value)?;
            continue;
        }

        if let Some(value) = arg.strip_prefix("--out=") {
            settings.out_dir = non_empty_path(arg, value)?;
            continue;
        }

        if let Some(value) = arg.strip_prefix("--renderer=") {
            if value.is_empty() {
                return Err(anyhow!("{arg} needs a value"));
            }
            settings.renderer = value.to_string();
            continue;
        }

        if arg.starts_with('-') {
            return Err(anyhow!("unknown flag: {arg}"));
        }

        positional.push(arg);
    }

    let [file_type] = positional.as_slice() else {
        return Ok(CliCommand::Usage(format!(
            "expected exactly one file type, got {}",
            positional.len()
        )));
    };

    match file_type.parse::<OutputFormat>() {
        Ok(format) => Ok(CliCommand::Build(BuildConfig::new(settings, format))),
        Err(err) => Ok(CliCommand::Usage(err.to_string())),
    }
}

fn non_empty_path(arg: &str, value: &str) -> Result<PathBuf> {
    if value.is_empty() {
        Err(anyhow!("{arg} needs a value"))
    } else {
        Ok(PathBuf::from(value))
    }
}

pub fn usage() -> String {
    let formats = OutputFormat::ALL
        .iter()
        .map(|format| format.as_str())
        .collect::<Vec<_>>()
        .join(" or ");
    format!(
        "{APP_NAME} — render family diagrams with Graphviz\n\
         Usage: {APP_NAME} [OPTIONS] <FILE_TYPE>\n    \
         (FILE_TYPE is {formats})\n\n\
         Options:\n  \
         --data=DIR              Record directory (default: data, env: KINSHIP_DATA_DIR)\n  \
         --out=DIR               Output directory (default: download, env: KINSHIP_OUT_DIR)\n  \
         --renderer=PROGRAM      Graphviz program (default: dot, env: KINSHIP_RENDERER)\n  \
         -v, --version           Show version information\n  \
         -h, --help              Show this help message"
    )
}
