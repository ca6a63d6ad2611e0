//! Format-neutral codec entry points
//!
//! Thin wrappers over the binary and text codecs that also record the message
//! of the most recent failure for callers that report errors after the fact.
//!
//! ```
//! use glokit::codec;
//!
//! assert!(codec::decode_binary(b"not a model").is_err());
//! assert!(codec::last_error().unwrap().contains("GLO"));
//! ```

use std::cell::RefCell;

use crate::error::Result;
use crate::formats::glo::{GloFile, parse_glo_bytes, serialize_glo};
use crate::formats::glo_text::{parse_glo_text, serialize_glo_text};

/// Banner label used when no file name is known.
pub const TEXT_BANNER: &str = "glokit";

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Decode a binary GLO buffer.
pub fn decode_binary(bytes: &[u8]) -> Result<GloFile> {
    record(parse_glo_bytes(bytes))
}

/// Encode a model in the binary layout.
pub fn encode_binary(doc: &GloFile) -> Result<Vec<u8>> {
    record(serialize_glo(doc))
}

/// Decode a GLO text buffer.
pub fn decode_text(bytes: &[u8]) -> Result<GloFile> {
    record(parse_glo_text(bytes))
}

/// Print a model as GLO text.
///
/// There is no file name to put in the banner comment, so the banner names
/// the tool instead: `; glokit - 0.1`.
pub fn encode_text(doc: &GloFile) -> Vec<u8> {
    serialize_glo_text(doc, Some(TEXT_BANNER))
}

/// Message of the last failed codec call on this thread.
///
/// The slot is per thread and is overwritten by the next failing call, so it
/// only describes the latest operation. Successful calls leave it untouched.
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Empty this thread's error slot.
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

fn record<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        let message = err.to_string();
        tracing::debug!("Codec call failed: {message}");
        LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
    }
    result
}
