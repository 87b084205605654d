use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    decode::M3U_HEADER,
    error::{PlaylistError, Result},
    util::{SNIPPET_LEN, escaped_head},
};

pub mod hls;
pub mod m3u;

/// A single playable item, whatever dialect it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub title: String,
    pub uri: String,
}

impl PlaylistEntry {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// IPTV style, `#EXTINF:` metadata followed by a URI line
    ClassicM3u,
    /// HLS master playlist listing alternate-quality streams
    HlsVariant,
    /// HLS media playlist listing segments
    HlsMedia,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ClassicM3u => "classic M3U",
            Self::HlsVariant => "HLS variant",
            Self::HlsMedia => "HLS media",
        })
    }
}

/// Figures out which parser understands `text`
///
/// `#EXTINF:` wins over `#EXT-X-`, so HLS media playlists carrying `#EXTINF:`
/// durations go through the classic parser.
///
/// # Errors
/// Errors when none of the known markers is present
pub fn detect(text: &str) -> Result<Dialect> {
    if text.contains("#EXTINF:") {
        return Ok(Dialect::ClassicM3u);
    }

    if text.contains("#EXT-X-") {
        return Ok(if m3u8_rs::is_master_playlist(text.as_bytes()) {
            Dialect::HlsVariant
        } else {
            Dialect::HlsMedia
        });
    }

    if text.contains(M3U_HEADER) {
        return Ok(Dialect::ClassicM3u);
    }

    Err(PlaylistError::format(
        "Could not determine playlist type (HLS or IPTV M3U). Missing #EXTM3U, #EXTINF: or #EXT-X-",
        escaped_head(text, SNIPPET_LEN),
    ))
}

/// Parses `text` with the parser matching an already detected dialect
///
/// # Errors
/// Errors when an HLS document is malformed
pub fn parse_as(dialect: Dialect, text: &str) -> Result<Vec<PlaylistEntry>> {
    match dialect {
        Dialect::ClassicM3u => Ok(m3u::parse(text)),
        Dialect::HlsVariant => hls::parse_variants(text),
        Dialect::HlsMedia => hls::parse_segments(text),
    }
}

/// Detects the dialect of `text` and converts it into entries
///
/// # Errors
/// See [`detect`] and [`parse_as`]
pub fn parse(text: &str) -> Result<Vec<PlaylistEntry>> {
    parse_as(detect(text)?, text)
}
