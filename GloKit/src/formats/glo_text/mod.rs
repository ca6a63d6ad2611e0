//! GLO text model format
//!
//! A keyword-tagged, whitespace-insensitive rendering of the same tree the
//! binary format stores. Files start with a `;` banner comment naming the
//! file and format version; comments are ignored on input.
//!
//! ```text
//! ; model.glt - 0.1
//!
//! object {
//!     anim "walk" 0 30 00000000 1
//!     mesh "Body" 0000 0000 {
//!         vertex 0 0 0
//!         face "skin" FFFFFFFF 0000 {
//!             vref 0 0 0
//!             vref 0 1 0
//!             vref 0 0 1
//!         }
//!         child "Arm" 0000 0000 {
//!         }
//!     }
//! }
//! ```
//!
//! Names are printed as raw bytes up to their first NUL. Bytes stored after
//! the terminator in the binary format, and names containing `"`, have no
//! text form.

mod parser;
mod tokenizer;
mod writer;

pub use parser::{parse_glo_text, read_glo_text};
pub use tokenizer::{Token, Tokenizer};
pub use writer::{serialize_glo_text, write_glo_text};
