use std::borrow::Cow;

use m3u8_rs::{MasterPlaylist, MediaPlaylist};
use tracing::debug;

use super::PlaylistEntry;
use crate::{
    decode::M3U_HEADER,
    error::{PlaylistError, Result},
    util::{SNIPPET_LEN, escaped_head},
};

const STREAM_INF: &str = "#EXT-X-STREAM-INF:";

/// `m3u8-rs` wants the header on the very first line
fn from_header(text: &str) -> &str {
    text.find(M3U_HEADER).map_or(text, |start| &text[start..])
}

/// Splits an attribute list on the commas that are not inside a quoted value
fn split_attributes(attributes: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in attributes.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&attributes[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&attributes[start..]);
    parts
}

fn has_bandwidth(attributes: &str) -> bool {
    split_attributes(attributes)
        .into_iter()
        .filter_map(|attr| attr.split('=').next())
        .any(|key| key.trim() == "BANDWIDTH")
}

/// Gives every `#EXT-X-STREAM-INF` lacking a `BANDWIDTH` attribute a zero bandwidth.
///
/// `m3u8-rs` treats the attribute as mandatory and silently skips such variants,
/// a zero bandwidth is then rendered as "no bandwidth" in the label.
fn with_default_bandwidth(text: &str) -> Cow<'_, str> {
    let missing = |line: &str| {
        line.trim_start()
            .strip_prefix(STREAM_INF)
            .is_some_and(|attrs| !has_bandwidth(attrs))
    };
    if !text.lines().any(missing) {
        return Cow::Borrowed(text);
    }

    let mut patched = String::with_capacity(text.len() + 64);
    for line in text.lines() {
        if missing(line) {
            let attrs = line.trim().trim_start_matches(STREAM_INF);
            patched.push_str(STREAM_INF);
            patched.push_str("BANDWIDTH=0");
            if !attrs.is_empty() {
                patched.push(',');
                patched.push_str(attrs);
            }
        } else {
            patched.push_str(line);
        }
        patched.push('\n');
    }

    Cow::Owned(patched)
}

fn malformed(kind: &str, text: &str) -> PlaylistError {
    PlaylistError::format(
        format!("Malformed HLS {kind} playlist"),
        escaped_head(text, SNIPPET_LEN),
    )
}

/// Label for a variant stream, e.g. `1280kbps / 1920x1080`
fn variant_label(index: usize, variant: &m3u8_rs::VariantStream) -> String {
    let mut attrs = Vec::with_capacity(2);
    if variant.bandwidth > 0 {
        attrs.push(format!("{}kbps", variant.bandwidth / 1000));
    }
    if let Some(resolution) = variant.resolution {
        attrs.push(format!("{}x{}", resolution.width, resolution.height));
    }

    if attrs.is_empty() {
        format!("Variant {index}")
    } else {
        attrs.join(" / ")
    }
}

fn variant_entries(playlist: &MasterPlaylist) -> Vec<PlaylistEntry> {
    playlist
        .variants
        .iter()
        .filter(|v| !v.is_i_frame)
        .enumerate()
        .filter_map(|(i, variant)| {
            if variant.uri.is_empty() {
                debug!("Skipping variant {} without URI", i + 1);
                return None;
            }
            Some(PlaylistEntry::new(
                variant_label(i + 1, variant),
                variant.uri.as_str(),
            ))
        })
        .collect()
}

fn segment_entries(playlist: &MediaPlaylist) -> Vec<PlaylistEntry> {
    playlist
        .segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| !segment.uri.is_empty())
        .map(|(i, segment)| {
            let title = segment
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .map_or_else(|| format!("Segment {}", i + 1), str::to_string);
            PlaylistEntry::new(title, segment.uri.as_str())
        })
        .collect()
}

/// Parses an HLS master playlist, one entry per (non I-frame) variant stream
///
/// # Errors
/// Errors when `m3u8-rs` rejects the document
pub fn parse_variants(text: &str) -> Result<Vec<PlaylistEntry>> {
    let text = with_default_bandwidth(from_header(text));
    let playlist = m3u8_rs::parse_master_playlist_res(text.as_bytes())
        .map_err(|_| malformed("master", &text))?;

    Ok(variant_entries(&playlist))
}

/// Parses an HLS media playlist, one entry per segment
///
/// # Errors
/// Errors when `m3u8-rs` rejects the document
pub fn parse_segments(text: &str) -> Result<Vec<PlaylistEntry>> {
    let text = from_header(text);
    let playlist =
        m3u8_rs::parse_media_playlist_res(text.as_bytes()).map_err(|_| malformed("media", text))?;

    Ok(segment_entries(&playlist))
}
