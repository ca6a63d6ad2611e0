//! CLI command for round-trip verification

use std::path::Path;

use crate::formats::glo::{parse_glo_bytes, serialize_glo};

/// How a re-encoded file compares with its source.
#[derive(Debug, PartialEq, Eq)]
pub enum Comparison {
    /// Byte-for-byte identical.
    Identical,
    /// Same size, differing at a 32-bit word.
    Differs { offset: usize, original: u32, saved: u32 },
    /// Different sizes. `first_difference` is the first differing word
    /// within the shorter length, if any.
    SizeMismatch {
        original: usize,
        saved: usize,
        first_difference: Option<(usize, u32, u32)>,
    },
}

/// Compare two buffers word by word (little-endian 32-bit words).
///
/// A trailing partial word in either buffer only shows up as a size mismatch.
pub fn compare(original: &[u8], saved: &[u8]) -> Comparison {
    let first_difference = original
        .chunks_exact(4)
        .zip(saved.chunks_exact(4))
        .enumerate()
        .find(|(_, (a, b))| a != b)
        .map(|(i, (a, b))| (i * 4, word(a), word(b)));

    if original.len() != saved.len() {
        return Comparison::SizeMismatch {
            original: original.len(),
            saved: saved.len(),
            first_difference,
        };
    }
    match first_difference {
        Some((offset, original, saved)) => Comparison::Differs {
            offset,
            original,
            saved,
        },
        // Same length: any remaining difference is in the last partial word
        None if original != saved => {
            let offset = original.len() / 4 * 4;
            Comparison::Differs {
                offset,
                original: tail_word(&original[offset..]),
                saved: tail_word(&saved[offset..]),
            }
        }
        None => Comparison::Identical,
    }
}

fn word(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn tail_word(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf[..bytes.len()].copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// Load a binary GLO file, re-encode it in memory and compare the bytes
pub fn execute(path: &Path) -> anyhow::Result<()> {
    let original = std::fs::read(path)?;
    let doc = parse_glo_bytes(&original)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let saved = serialize_glo(&doc)?;

    match compare(&original, &saved) {
        Comparison::Identical => {
            println!("SUCCESS - Files match exactly.");
            Ok(())
        }
        Comparison::Differs {
            offset,
            original,
            saved,
        } => {
            println!("FAIL - Data does not match at {offset:X}!");
            println!("  {original:08X} vs {saved:08X}");
            std::process::exit(1);
        }
        Comparison::SizeMismatch {
            original,
            saved,
            first_difference,
        } => {
            println!("FAIL - Sizes don't match!");
            println!("  {original} vs {saved}");
            match first_difference {
                Some((offset, a, b)) => {
                    println!("  First difference at {offset:X}:");
                    println!("  {a:08X} vs {b:08X}");
                }
                None => println!("  Data matches until end of shortest file."),
            }
            std::process::exit(1);
        }
    }
}
