//! # kinship-cli
//!
//! Command-line driver: parses arguments, loads records, and renders every
//! configured view through an external Graphviz program.

pub mod args;
pub mod config;
pub mod pipeline;
pub mod render;

pub use args::{CliCommand, parse_arguments, usage};
pub use config::{BuildConfig, OutputFormat, Settings};
pub use pipeline::{Artifact, BuildReport, run};
pub use render::{Graphviz, RenderCommand};
