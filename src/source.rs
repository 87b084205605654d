use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use reqwest::Url;

/// Where the playlist is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSource {
    /// Absolute path on the local filesystem
    File(PathBuf),
    /// `http(s)` URL
    Remote(Url),
}

impl PlaylistSource {
    /// Builds a local source, resolving relative paths against the current working directory
    ///
    /// # Errors
    /// Errors when the working directory cannot be determined
    pub fn local(path: impl AsRef<Path>) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())
            .with_context(|| format!("Resolving playlist path {}", path.as_ref().display()))?;
        Ok(Self::File(path))
    }
}

impl FromStr for PlaylistSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        anyhow::ensure!(!s.is_empty(), "Playlist source is empty");

        if let Some(path) = s.strip_prefix("file://") {
            return Self::local(path);
        }

        let lowercase = s.to_ascii_lowercase();
        if lowercase.starts_with("http://") || lowercase.starts_with("https://") {
            let url = Url::parse(s).with_context(|| format!("Parsing playlist URL {s}"))?;
            return Ok(Self::Remote(url));
        }

        Self::local(s)
    }
}

impl fmt::Display for PlaylistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file://{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_urls() {
        let source: PlaylistSource = "https://iptv-org.github.io/iptv/countries/us.m3u"
            .parse()
            .unwrap();
        assert!(matches!(source, PlaylistSource::Remote(ref u) if u.host_str() == Some("iptv-org.github.io")));
    }

    #[test]
    fn file_scheme_keeps_absolute_path() {
        let source: PlaylistSource = "file:///srv/playlists/list.m3u".parse().unwrap();
        assert_eq!(
            source,
            PlaylistSource::File(PathBuf::from("/srv/playlists/list.m3u"))
        );
        assert_eq!(source.to_string(), "file:///srv/playlists/list.m3u");
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let source: PlaylistSource = "lists/local.m3u".parse().unwrap();
        let expected = std::env::current_dir().unwrap().join("lists/local.m3u");
        assert_eq!(source, PlaylistSource::File(expected));
    }

    #[test]
    fn bad_input() {
        assert!("   ".parse::<PlaylistSource>().is_err());
        assert!("http://".parse::<PlaylistSource>().is_err());
    }
}
