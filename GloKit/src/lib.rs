//! # GloKit
//!
//! A pure-Rust library for reading, editing and writing GLO models: keyframed
//! mesh trees with textured faces and billboard sprites.
//!
//! ## Supported Formats
//!
//! - **GLO binary** - the compact little-endian layout read by the runtime
//! - **GLO text** - a keyword-tagged layout for authoring and diffing
//!
//! Both formats carry the same tree. Converting to text keeps every number
//! exactly (NaN payloads aside), but name fields keep only the bytes before
//! their NUL terminator, and a name containing `"` has no text form.
//!
//! ## Quick Start
//!
//! ### Converting Between Formats
//!
//! ```no_run
//! use glokit::converter::glo_to_text;
//!
//! glo_to_text("model.glo", "model.txt")?;
//! # Ok::<(), glokit::Error>(())
//! ```
//!
//! ### Editing a Model
//!
//! ```no_run
//! use glokit::formats::glo::{read_glo, write_glo};
//!
//! let mut model = read_glo("model.glo")?;
//! model.rename_texture("old.tex", "new.tex");
//! model.delete_meshes_named("Helmet");
//! for texture in model.wrapped_textures() {
//!     println!("{texture}");
//! }
//! write_glo(&model, "model.glo")?;
//! # Ok::<(), glokit::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use glokit::prelude::*;
//!
//! let model = GloFile::new();
//! let bytes = serialize_glo(&model)?;
//! assert_eq!(parse_glo_bytes(&bytes)?, model);
//! # Ok::<(), glokit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `glokit` command-line binary

pub mod codec;
pub mod converter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::formats::GloFormat;
    pub use crate::formats::glo::{
        Color, GloAnim, GloFace, GloFile, GloMesh, GloObject, GloSprite, GloSummary, Keyframe,
        MeshName, Quat, TextureName, Vec2, Vec3, VertexRef, parse_glo_bytes, read_glo,
        serialize_glo, write_glo,
    };
    pub use crate::formats::glo_text::{
        parse_glo_text, read_glo_text, serialize_glo_text, write_glo_text,
    };

    pub use crate::codec;
    pub use crate::converter;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
