use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::formats::GloFormat;

pub mod convert;
pub mod inspect;
pub mod mesh;
pub mod texture;
pub mod verify;

#[derive(Subcommand)]
pub enum Commands {
    /// Verify that loading and saving a binary GLO file reproduces it exactly
    #[command(alias = "test")]
    Verify {
        /// GLO file to check
        path: PathBuf,
    },

    /// Rename a texture on every face and sprite
    Texswap {
        /// Texture name to replace
        from: String,

        /// New texture name (truncated to 16 bytes)
        to: String,

        /// Input model
        path: PathBuf,

        /// Output file (overwrites the input if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// List textures whose UVs go above 1.0 and so need wrapping
    Texwrap {
        /// Input model
        path: PathBuf,
    },

    /// Delete root meshes with the given name
    Meshdel {
        /// Mesh name to delete
        name: String,

        /// Input model
        path: PathBuf,

        /// Output file (overwrites the input if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert between binary and text GLO
    Convert {
        /// Source file
        #[arg(short, long)]
        source: PathBuf,

        /// Destination file
        #[arg(short, long)]
        destination: PathBuf,

        /// Input format: glo or txt (auto-detected from extension if not specified)
        #[arg(short = 'i', long)]
        input_format: Option<String>,

        /// Output format: glo or txt (auto-detected from extension if not specified)
        #[arg(short = 'o', long)]
        output_format: Option<String>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert a binary GLO file to text
    #[command(name = "glo2txt")]
    GloToText {
        /// Binary GLO file
        source: PathBuf,

        /// Text file to write
        destination: PathBuf,
    },

    /// Convert a text file back into binary GLO
    #[command(name = "txt2glo")]
    TextToGlo {
        /// Text GLO file
        source: PathBuf,

        /// Binary file to write
        destination: PathBuf,
    },

    /// Show model statistics
    Inspect {
        /// Input model
        path: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Verify { path } => verify::execute(path),
            Commands::Texswap {
                from,
                to,
                path,
                output,
                quiet,
            } => texture::swap(from, to, path, output.as_deref(), *quiet),
            Commands::Texwrap { path } => texture::wrap(path),
            Commands::Meshdel {
                name,
                path,
                output,
                quiet,
            } => mesh::delete(name, path, output.as_deref(), *quiet),
            Commands::Convert {
                source,
                destination,
                input_format,
                output_format,
                quiet,
            } => convert::execute(
                source,
                destination,
                input_format.as_deref(),
                output_format.as_deref(),
                *quiet,
            ),
            Commands::GloToText { source, destination } => {
                convert::execute(source, destination, Some("glo"), Some("txt"), true)
            }
            Commands::TextToGlo { source, destination } => {
                convert::execute(source, destination, Some("txt"), Some("glo"), true)
            }
            Commands::Inspect { path, json } => inspect::execute(path, *json),
        }
    }
}

/// Load a model, picking the codec from the file extension.
pub(crate) fn load_model(path: &Path) -> anyhow::Result<crate::formats::GloFile> {
    let format = GloFormat::from_path(path);
    format
        .read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {format} file {}: {e}", path.display()))
}
