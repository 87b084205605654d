use std::time::Duration;

use reqwest::header::{ACCEPT, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A lot of IPTV portals block unknown user agents, so we pretend to be VLC
pub const MEDIA_PLAYER_USER_AGENT: &str = "VLC/3.0.20 LibVLC/3.0.20";

/// How much of a misbehaving body gets quoted back in error messages
pub const SNIPPET_LEN: usize = 300;

/// Returns the first `max_chars` characters of a string with CR / LF escaped,
/// so the result fits on a single log line
pub fn escaped_head(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .collect::<String>()
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// Lossy UTF-8 rendition of the first `max_bytes` bytes of a body.
/// Invalid sequences (including a code point cut in half) are dropped.
pub fn byte_head(bytes: &[u8], max_bytes: usize) -> String {
    bytes[..bytes.len().min(max_bytes)]
        .utf8_chunks()
        .map(|chunk| chunk.valid())
        .collect()
}

/// # Errors
/// Errors when the TLS backend cannot be initialized
pub fn init_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(MEDIA_PLAYER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .timeout(timeout)
        .build()
}

/// Spawn a task that watches for CTRL + C signal and cancels a [`CancellationToken`] when caught
pub fn spawn_ct_watcher(ct: CancellationToken) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Caught CTRL+C signal!");
        ct.cancel();
    });
}
