//! Build configuration: where records live, where output goes, which
//! renderer to run and which image format to ask it for.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};

pub const DATA_DIR_ENV: &str = "KINSHIP_DATA_DIR";
pub const OUT_DIR_ENV: &str = "KINSHIP_OUT_DIR";
pub const RENDERER_ENV: &str = "KINSHIP_RENDERER";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUT_DIR: &str = "download";
pub const DEFAULT_RENDERER: &str = "dot";

/// Image formats accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Jpg,
    Png,
    Gif,
    Tiff,
    Svg,
    Ps,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::Pdf,
        OutputFormat::Jpg,
        OutputFormat::Png,
        OutputFormat::Gif,
        OutputFormat::Tiff,
        OutputFormat::Svg,
        OutputFormat::Ps,
    ];

    /// Name used both for the renderer's `-T` flag and as the file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Svg => "svg",
            OutputFormat::Ps => "ps",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| anyhow!("unsupported file type: {value}"))
    }
}

/// Locations and renderer, before the output format is known
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub renderer: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            renderer: DEFAULT_RENDERER.to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `KINSHIP_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUT_DIR_ENV).filter(|v| !v.is_empty()) {
            settings.out_dir = PathBuf::from(dir);
        }
        if let Some(program) = lookup(RENDERER_ENV).filter(|v| !v.is_empty()) {
            settings.renderer = program;
        }
        settings
    }
}

/// Everything one pipeline run needs
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub renderer: String,
    pub format: OutputFormat,
}

impl BuildConfig {
    pub fn new(settings: Settings, format: OutputFormat) -> Self {
        Self {
            data_dir: settings.data_dir,
            out_dir: settings.out_dir,
            renderer: settings.renderer,
            format,
        }
    }

    pub fn views_file(&self) -> PathBuf {
        self.data_dir.join(kinship_core::store::VIEWS_FILE)
    }

    /// Directory for the intermediate DOT files.
    pub fn dot_dir(&self) -> PathBuf {
        self.out_dir.join("dot")
    }

    /// Directory for the rendered images, named after the format.
    pub fn image_dir(&self) -> PathBuf {
        self.out_dir.join(self.format.as_str())
    }
}
