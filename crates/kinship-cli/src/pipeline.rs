//! The build: load records once, then write and render every view in order.

use std::fs;
use std::path::{Path, PathBuf};

use kinship_core::{Error, RecordStore, Result, View, render_view};
use tracing::info;

use crate::config::BuildConfig;
use crate::render::RenderCommand;

/// Files produced for one view
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub view: String,
    pub dot_file: PathBuf,
    pub image_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub artifacts: Vec<Artifact>,
}

/// Run the whole build.
///
/// Both output directories are emptied first. The first failure stops the
/// run; files written for earlier views are left in place.
pub fn run<R: RenderCommand>(config: &BuildConfig, renderer: &R) -> Result<BuildReport> {
    let store = RecordStore::load(&config.data_dir)?;
    let views = store.load_views(config.views_file())?;

    let dot_dir = config.dot_dir();
    let image_dir = config.image_dir();
    reset_dir(&dot_dir)?;
    reset_dir(&image_dir)?;

    let mut report = BuildReport::default();
    for (index, spec) in views.iter().enumerate() {
        let base = output_basename(index + 1, &spec.name);
        let dot_file = dot_dir.join(format!("{base}.dot"));
        let image_file = image_dir.join(format!("{base}.{}", config.format));

        let view = View::assemble(&store, spec);
        info!(
            "view {base}: {} nodes, {} relations",
            view.nodes.len(),
            view.relations.len()
        );
        fs::write(&dot_file, render_view(&view, &store)).map_err(|err| Error::io(&dot_file, err))?;

        renderer.render(&dot_file, config.format, &image_file)?;

        report.artifacts.push(Artifact {
            view: spec.name.clone(),
            dot_file,
            image_file,
        });
    }

    Ok(report)
}

/// `NN-<name>`, with path separators in the name replaced.
pub fn output_basename(sequence: usize, name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{sequence:02}-{name}")
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|err| Error::io(dir, err))?;
    }
    fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_basename() {
        assert_eq!(output_basename(1, "张家"), "01-张家");
        assert_eq!(output_basename(12, "a/b\\c"), "12-a_b_c");
        assert_eq!(output_basename(100, "x"), "100-x");
    }
}
