//! Turns a raw playlist body into text, rejecting bodies that are clearly not playlists

use std::borrow::Cow;

use encoding_rs::UTF_8;
use tracing::debug;

use crate::{
    error::{PlaylistError, Result},
    util::{SNIPPET_LEN, byte_head, escaped_head},
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Mandatory playlist header
pub const M3U_HEADER: &str = "#EXTM3U";

/// Candidate encodings, tried in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, leading BOM removed
    Utf8Sig,
    Utf8,
    /// ISO-8859-1, every byte maps to a code point so this never fails
    Latin1,
}

impl TextEncoding {
    pub const CANDIDATES: [Self; 3] = [Self::Utf8Sig, Self::Utf8, Self::Latin1];

    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Utf8Sig => UTF_8.decode_without_bom_handling_and_without_replacement(
                bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            ),
            Self::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
        }
    }
}

/// Decodes with the first candidate encoding that accepts the whole buffer,
/// falling back to lossy UTF-8
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    for encoding in TextEncoding::CANDIDATES {
        if let Some(text) = encoding.decode(bytes) {
            debug!("Decoded playlist as {encoding:?}");
            return text;
        }
    }

    let (text, _) = UTF_8.decode_with_bom_removal(bytes);
    text
}

fn looks_like_html(body: &[u8], content_type: &str) -> bool {
    body.windows(5).any(|w| w.eq_ignore_ascii_case(b"<html"))
        || content_type.to_ascii_lowercase().contains("text/html")
}

/// Decodes a fetched body and performs the sanity checks a playlist must pass
///
/// # Errors
/// * Body is an HTML page (or declared as one)
/// * Decoded text lacks the `#EXTM3U` header
pub fn validate_and_decode(body: &[u8], content_type: &str) -> Result<String> {
    let text = decode_text(body);

    if looks_like_html(body, content_type) {
        return Err(PlaylistError::format(
            format!("Server returned HTML, not M3U. Content-Type={content_type}"),
            byte_head(body, SNIPPET_LEN),
        ));
    }

    if !text.contains(M3U_HEADER) {
        return Err(PlaylistError::format(
            "Not an M3U playlist (missing #EXTM3U)",
            escaped_head(&text, SNIPPET_LEN),
        ));
    }

    Ok(text.into_owned())
}
