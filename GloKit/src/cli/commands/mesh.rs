//! CLI commands for mesh operations

use std::path::Path;
use std::time::Instant;

use super::load_model;
use crate::cli::progress::{CUBE, DISK, LOOKING_GLASS, Steps};
use crate::formats::GloFormat;

/// Delete root meshes named `name` from every object
pub fn delete(name: &str, path: &Path, output: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let dest = output.unwrap_or(path);
    let mut steps = Steps::new(3, quiet);

    steps.step(LOOKING_GLASS, &format!("Reading {}...", path.display()));
    let mut doc = load_model(path)?;

    steps.step(CUBE, &format!("Deleting meshes named '{name}'..."));
    let removed = doc.delete_meshes_named(name);

    steps.step(DISK, &format!("Writing {}...", dest.display()));
    GloFormat::from_path(dest).write(&doc, dest)?;

    if !quiet {
        println!("Deleted {removed} meshes");
    }
    steps.done(started.elapsed());
    Ok(())
}
