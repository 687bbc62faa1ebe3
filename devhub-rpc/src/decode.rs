//! Decoding of raw `call_function` results
//!
//! The devhub contract returns its values as an array of character codes.
//! Scalars and objects occasionally come back as-is, so decoding is
//! best-effort: anything that is not a clean code-unit sequence passes
//! through unchanged.

use serde_json::Value;
use tracing::warn;

/// Decode a raw contract result into the value callers expect.
///
/// An array of integer code units is rebuilt into a string (UTF-16 code
/// units, matching the byte layout the contract uses); an empty array
/// becomes `""`. Any other value, including an array with non-numeric or
/// out-of-range entries, is returned unchanged. Total; never panics.
pub fn decode_call_result(raw: Value) -> Value {
    let units: Option<Vec<u16>> = match &raw {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| entry.as_u64().and_then(|n| u16::try_from(n).ok()))
            .collect(),
        _ => return raw,
    };

    match units {
        Some(units) => Value::String(String::from_utf16_lossy(&units)),
        None => {
            warn!("contract result is not a code-unit sequence, passing through raw");
            raw
        }
    }
}
