//! CLI commands for texture operations

use std::path::Path;
use std::time::Instant;

use super::load_model;
use crate::cli::progress::{DISK, LOOKING_GLASS, PICTURE, Steps};
use crate::formats::GloFormat;

/// Rename a texture on every face and sprite, saving in the input's format
pub fn swap(
    from: &str,
    to: &str,
    path: &Path,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let dest = output.unwrap_or(path);
    let mut steps = Steps::new(3, quiet);

    steps.step(LOOKING_GLASS, &format!("Reading {}...", path.display()));
    let mut doc = load_model(path)?;

    steps.step(PICTURE, &format!("Renaming texture '{from}' to '{to}'..."));
    let renamed = doc.rename_texture(from, to);

    steps.step(DISK, &format!("Writing {}...", dest.display()));
    GloFormat::from_path(dest).write(&doc, dest)?;

    if !quiet {
        println!("{}", rename_report(from, renamed));
    }
    steps.done(started.elapsed());
    Ok(())
}

/// Result line for a rename. Matching nothing is a normal outcome.
fn rename_report(from: &str, renamed: usize) -> String {
    if renamed == 0 {
        format!("No faces or sprites use texture '{from}'")
    } else {
        format!("Renamed {renamed} faces and sprites")
    }
}

/// List wrap-dependent textures, one per line, sorted
pub fn wrap(path: &Path) -> anyhow::Result<()> {
    let doc = load_model(path)?;
    for texture in doc.wrapped_textures() {
        println!("{texture}");
    }
    Ok(())
}
