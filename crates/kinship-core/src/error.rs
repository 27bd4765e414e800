use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Node id conflict: \"{0}\"")]
    DuplicateIdentity(String),

    #[error("Invalid {context}: \"{id}\" is not a known node")]
    InvalidReference { context: String, id: String },

    #[error("Relation name conflict: \"{0}\"")]
    DuplicateRelation(String),

    #[error("Invalid record {}: {message}", path.display())]
    InvalidRecord { path: PathBuf, message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Render command `{command}` failed: {reason}")]
    ExternalCommandFailure { command: String, reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_reference(context: impl Into<String>, id: impl Into<String>) -> Self {
        Error::InvalidReference {
            context: context.into(),
            id: id.into(),
        }
    }

    /// Build the failure for a render command that ran but did not succeed.
    pub fn command_status(command: impl Into<String>, status: ExitStatus) -> Self {
        let reason = match status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        Error::ExternalCommandFailure {
            command: command.into(),
            reason,
        }
    }
}
