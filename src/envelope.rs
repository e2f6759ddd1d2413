//! Transport envelope extraction
//!
//! Strips the transport wrapping from an import request body and yields the
//! raw JSON document. Two envelopes exist: a direct JSON body, and a
//! multipart form body that is treated as text containing an embedded JSON
//! blob. The multipart path is a deliberate fallback scanner rather than a
//! structured multipart parser; it is isolated behind [`extract`] so a real
//! parser can replace it without touching downstream stages.

use serde_json::Value;

use crate::error::ImportError;

/// Transport wrapping declared by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// The whole body is the candidate JSON document
    Json,
    /// The body is a multipart form containing an embedded JSON blob
    Multipart,
}

impl Transport {
    /// Map a content-type hint onto a transport kind.
    ///
    /// Anything that is not multipart form data is treated as a direct JSON
    /// body; the exporters send no other content types.
    pub fn from_content_type(content_type: &str) -> Transport {
        if content_type.contains("multipart/form-data") {
            Transport::Multipart
        } else {
            Transport::Json
        }
    }
}

/// Opening markers for the embedded JSON blob, tried in order. The exporters
/// emit the payload either pretty-printed or compact; no other leading keys
/// are recognized.
const MARKERS: [&str; 2] = ["{\n  \"data\"", "{\"data\""];

/// Extract the raw JSON document from a request body.
///
/// Returns `EmptyPayload` when the envelope holds no JSON at all (blank
/// direct body, missing multipart marker, unbalanced braces) and
/// `MalformedDocument` when a candidate document is found but does not parse.
/// Never panics on malformed input.
pub fn extract(payload: &[u8], transport: Transport) -> Result<Value, ImportError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| ImportError::MalformedDocument("body is not valid UTF-8".to_string()))?;

    match transport {
        Transport::Json => extract_json(text),
        Transport::Multipart => extract_multipart(text),
    }
}

fn extract_json(text: &str) -> Result<Value, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::EmptyPayload);
    }
    serde_json::from_str(text).map_err(ImportError::from)
}

fn extract_multipart(text: &str) -> Result<Value, ImportError> {
    let start = MARKERS
        .iter()
        .find_map(|marker| text.find(marker))
        .ok_or(ImportError::EmptyPayload)?;

    let candidate = &text[start..];
    let end = balanced_end(candidate).ok_or(ImportError::EmptyPayload)?;

    serde_json::from_str(&candidate[..=end]).map_err(ImportError::from)
}

/// Byte offset of the brace closing the object opened at offset zero.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count toward the balance, so a literal `}` in a field value cannot
/// mis-terminate the scan.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}
