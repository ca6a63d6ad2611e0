//! GLO model formats
//!
//! - `glo` - the binary layout consumed by the runtime, plus the model tree
//!   and editing operations shared by both formats
//! - `glo_text` - the human-editable text layout

pub mod glo;
pub mod glo_text;

// Re-export main document types
pub use glo::{
    GloAnim, GloFace, GloFile, GloMesh, GloObject, GloSprite, GloSummary, TextureName,
    parse_glo_bytes, read_glo, serialize_glo, write_glo,
};
pub use glo_text::{parse_glo_text, read_glo_text, serialize_glo_text, write_glo_text};

/// On-disk representation of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GloFormat {
    Binary,
    Text,
}

impl GloFormat {
    /// Guess the format from a file extension. `txt` and `glt` are text,
    /// anything else is binary.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("txt" | "glt") => GloFormat::Text,
            _ => GloFormat::Binary,
        }
    }

    /// Guess the format of a path from its extension.
    pub fn from_path(path: &std::path::Path) -> Self {
        Self::from_extension(path.extension().and_then(|ext| ext.to_str()))
    }

    /// Parse a format name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "glo" | "bin" | "binary" => Some(GloFormat::Binary),
            "txt" | "glt" | "text" => Some(GloFormat::Text),
            _ => None,
        }
    }

    /// Load a model from disk in this format.
    pub fn read(self, path: &std::path::Path) -> crate::Result<GloFile> {
        match self {
            GloFormat::Binary => read_glo(path),
            GloFormat::Text => read_glo_text(path),
        }
    }

    /// Save a model to disk in this format.
    pub fn write(self, doc: &GloFile, path: &std::path::Path) -> crate::Result<()> {
        match self {
            GloFormat::Binary => write_glo(doc, path),
            GloFormat::Text => write_glo_text(doc, path),
        }
    }
}

impl std::fmt::Display for GloFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GloFormat::Binary => f.write_str("GLO"),
            GloFormat::Text => f.write_str("GLO text"),
        }
    }
}
