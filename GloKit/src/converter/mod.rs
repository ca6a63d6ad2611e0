//! Format conversion utilities
//!
//! Converts GLO models between the binary layout (`.glo`) and the text
//! layout (`.txt`/`.glt`). Same-format conversions re-encode the model, which
//! normalizes text formatting.

use std::path::Path;

use crate::error::Result;
use crate::formats::GloFormat;

/// Progress callback type for conversion operations.
/// The callback receives a message describing the current step.
pub type ProgressCallback<'a> = &'a dyn Fn(&str);

/// Convert a binary GLO file to text
pub fn glo_to_text<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_glo(source.as_ref(), dest.as_ref(), GloFormat::Binary, GloFormat::Text)
}

/// Convert a GLO text file to binary
pub fn text_to_glo<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_glo(source.as_ref(), dest.as_ref(), GloFormat::Text, GloFormat::Binary)
}

/// Convert between any two GLO representations
pub fn convert_glo(source: &Path, dest: &Path, from: GloFormat, to: GloFormat) -> Result<()> {
    convert_glo_with_progress(source, dest, from, to, &|_| {})
}

/// Convert between any two GLO representations, reporting each step
pub fn convert_glo_with_progress(
    source: &Path,
    dest: &Path,
    from: GloFormat,
    to: GloFormat,
    progress: ProgressCallback,
) -> Result<()> {
    tracing::info!("Converting {from}→{to}: {:?} → {:?}", source, dest);

    progress(&format!("Reading {from} file..."));
    let doc = from.read(source)?;

    progress(&format!("Writing {to} file..."));
    to.write(&doc, dest)?;

    tracing::info!("Conversion complete");
    Ok(())
}
