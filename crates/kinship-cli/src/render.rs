//! External renderer invocation

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use kinship_core::{Error, Result};
use tracing::info;

use crate::config::OutputFormat;

/// Turns one DOT file into one image file.
pub trait RenderCommand {
    fn render(&self, input: &Path, format: OutputFormat, output: &Path) -> Result<()>;
}

/// Runs a Graphviz program as `<program> <input> -T<format> -o<output>`.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: String,
}

impl Graphviz {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, input: &Path, format: OutputFormat, output: &Path) -> Command {
        let mut output_arg = OsString::from("-o");
        output_arg.push(output);

        let mut command = Command::new(&self.program);
        command
            .arg(input)
            .arg(format!("-T{format}"))
            .arg(output_arg);
        command
    }
}

impl RenderCommand for Graphviz {
    fn render(&self, input: &Path, format: OutputFormat, output: &Path) -> Result<()> {
        let mut command = self.command(input, format, output);
        let line = describe(&command);
        info!("{line}");

        let status = command
            .status()
            .map_err(|err| Error::ExternalCommandFailure {
                command: line.clone(),
                reason: err.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::command_status(line, status))
        }
    }
}

fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
