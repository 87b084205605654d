use std::path::Path;

use tracing::{info, instrument};

use crate::{
    error::{PlaylistError, Result},
    fetch::fetch,
    source::PlaylistSource,
};

/// Saves the raw playlist body from `source` into `output`, unvalidated.
/// The saved file can then be served with a local source.
///
/// Returns the number of bytes written
///
/// # Errors
/// * Fetch errors, see [`fetch`]
/// * `output` cannot be written
#[instrument(skip(client))]
pub async fn download(
    client: &reqwest::Client,
    source: &PlaylistSource,
    output: &Path,
    max_body_bytes: usize,
) -> Result<usize> {
    info!("Downloading playlist from {source}...");
    let fetched = fetch(client, source, max_body_bytes).await?;

    tokio::fs::write(output, &fetched.body).await.map_err(|e| {
        PlaylistError::transport(format!(
            "Writing playlist to {}: {e}",
            output.display()
        ))
    })?;
    info!("Playlist successfully downloaded to {}", output.display());

    Ok(fetched.body.len())
}
