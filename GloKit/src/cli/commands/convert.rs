//! CLI interface for format conversion
use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, Steps};
use crate::converter::convert_glo_with_progress;
use crate::formats::GloFormat;

pub fn execute(
    source: &Path,
    destination: &Path,
    input_format: Option<&str>,
    output_format: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    // Auto-detect or use provided formats
    let input = resolve_format(input_format, source)?;
    let output = resolve_format(output_format, destination)?;

    let steps = std::cell::RefCell::new(Steps::new(3, quiet));
    steps
        .borrow_mut()
        .step(GEAR, &format!("Converting {input} -> {output}"));
    let report = |msg: &str| {
        let emoji = if msg.starts_with("Reading") { LOOKING_GLASS } else { DISK };
        steps.borrow_mut().step(emoji, msg);
    };
    convert_glo_with_progress(source, destination, input, output, &report)?;

    steps.borrow().done(started.elapsed());
    Ok(())
}

fn resolve_format(name: Option<&str>, path: &Path) -> anyhow::Result<GloFormat> {
    match name {
        Some(name) => GloFormat::from_name(name).ok_or_else(|| {
            anyhow::anyhow!("Unsupported format '{name}'. Valid values: glo, txt, glt")
        }),
        None => Ok(GloFormat::from_path(path)),
    }
}
