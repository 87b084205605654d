use tracing::{error, info, instrument};

use crate::{
    decode::validate_and_decode,
    error::Result,
    fetch::fetch,
    playlist,
    source::PlaylistSource,
    store::{PlaylistSnapshot, PlaylistStore},
};

/// Everything needed to run one fetch → decode → parse cycle
#[derive(Debug, Clone)]
pub struct Loader {
    pub client: reqwest::Client,
    pub source: PlaylistSource,
    pub max_body_bytes: usize,
}

impl Loader {
    /// Fetches and parses the configured playlist
    ///
    /// # Errors
    /// Transport errors from fetching, format errors from decoding / parsing
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self) -> Result<PlaylistSnapshot> {
        let fetched = fetch(&self.client, &self.source, self.max_body_bytes).await?;
        let text = validate_and_decode(&fetched.body, &fetched.content_type)?;

        let dialect = playlist::detect(&text)?;
        let entries = playlist::parse_as(dialect, &text)?;
        info!("Parsed {} entries as {dialect}", entries.len());

        Ok(PlaylistSnapshot::loaded(entries, dialect))
    }

    /// Loads the playlist and swaps it into `store`. On error `store` is left as it was.
    ///
    /// Returns the number of entries now held
    ///
    /// # Errors
    /// See [`Loader::load`]
    pub async fn reload(&self, store: &PlaylistStore) -> Result<usize> {
        let snapshot = self.load().await?;
        let count = snapshot.entries.len();
        store.replace(snapshot);

        Ok(count)
    }

    /// Initial load. Failure is not fatal, the store is emptied and `/reload` can be used later.
    pub async fn startup(&self, store: &PlaylistStore) {
        match self.reload(store).await {
            Ok(count) => info!("Loaded {count} playlist items."),
            Err(e) => {
                error!("Playlist load failed: {e}");
                store.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write as _, time::Duration};

    use super::*;
    use crate::{
        playlist::{Dialect, PlaylistEntry},
        util::init_http_client,
    };

    fn loader_for(file: &tempfile::NamedTempFile) -> Loader {
        Loader {
            client: init_http_client(Duration::from_secs(5)).unwrap(),
            source: PlaylistSource::local(file.path()).unwrap(),
            max_body_bytes: 1024 * 1024,
        }
    }

    fn playlist_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_classic_playlist() {
        let file = playlist_file(b"#EXTM3U\nhttp://x/a.ts\n#EXTINF:-1,Foo\nhttp://x/b.ts\n");
        let snapshot = loader_for(&file).load().await.unwrap();

        assert_eq!(snapshot.dialect, Some(Dialect::ClassicM3u));
        assert_eq!(
            snapshot.entries,
            vec![PlaylistEntry::new("Foo", "http://x/b.ts")]
        );
        assert!(snapshot.loaded_at.is_some());
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_list() {
        let file = playlist_file(b"#EXTM3U\n#EXTINF:-1,Foo\nhttp://x/b.ts\n");
        let loader = loader_for(&file);
        let store = PlaylistStore::new();
        assert_eq!(loader.reload(&store).await.unwrap(), 1);

        std::fs::write(file.path(), b"<html>502 Bad Gateway</html>").unwrap();
        assert!(loader.reload(&store).await.is_err());
        assert_eq!(store.snapshot().entries.len(), 1);
    }

    #[tokio::test]
    async fn failed_startup_clears_store() {
        let file = playlist_file(b"#EXTM3U\n#EXTINF:-1,Foo\nhttp://x/b.ts\n");
        let loader = loader_for(&file);
        let store = PlaylistStore::new();
        loader.startup(&store).await;
        assert_eq!(store.snapshot().entries.len(), 1);

        std::fs::write(file.path(), b"not a playlist").unwrap();
        loader.startup(&store).await;
        assert!(store.snapshot().entries.is_empty());
    }
}
