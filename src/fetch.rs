use reqwest::header::CONTENT_TYPE;
use tokio_stream::StreamExt;
use tracing::{info, instrument};

use crate::{
    error::{PlaylistError, Result},
    source::PlaylistSource,
};

/// Content-type assumed for local files, there is no transport header to go by
pub const LOCAL_CONTENT_TYPE: &str = "application/x-mpegURL";

/// Raw playlist body, as received
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Reads the playlist bytes from wherever `source` points to
///
/// # Errors
/// * Local file missing / unreadable
/// * Network error, timeout or non-2xx status
/// * Body larger than `max_body_bytes`
#[instrument(skip(client))]
pub async fn fetch(
    client: &reqwest::Client,
    source: &PlaylistSource,
    max_body_bytes: usize,
) -> Result<Fetched> {
    match source {
        PlaylistSource::File(path) => {
            let body = tokio::fs::read(path)
                .await
                .map_err(|e| PlaylistError::from_file_read(path, &e))?;
            info!("Read playlist from local file: {}", path.display());

            Ok(Fetched {
                body,
                content_type: LOCAL_CONTENT_TYPE.to_string(),
            })
        }
        PlaylistSource::Remote(url) => {
            let res = client.get(url.clone()).send().await?.error_for_status()?;

            let content_type = res
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            let mut body = Vec::new();
            let mut stream = res.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                if body.len() + chunk.len() > max_body_bytes {
                    return Err(PlaylistError::transport(format!(
                        "Playlist body from {url} exceeds {max_body_bytes} bytes"
                    )));
                }
                body.extend_from_slice(&chunk);
            }
            info!("Fetched playlist from URL: {url} ({} bytes)", body.len());

            Ok(Fetched {
                body,
                content_type,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write as _, net::SocketAddr, time::Duration};

    use axum::{
        Router,
        http::{StatusCode, header},
        routing::get,
    };
    use tokio::net::TcpListener;

    use super::*;
    use crate::util::{MEDIA_PLAYER_USER_AGENT, init_http_client};

    async fn spawn_upstream(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client() -> reqwest::Client {
        init_http_client(Duration::from_secs(5)).unwrap()
    }

    fn remote(addr: SocketAddr, path: &str) -> PlaylistSource {
        format!("http://{addr}{path}").parse().unwrap()
    }

    #[tokio::test]
    async fn reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"#EXTM3U\n").unwrap();

        let source = PlaylistSource::local(file.path()).unwrap();
        let fetched = fetch(&client(), &source, 1024).await.unwrap();

        assert_eq!(&fetched.body[..], b"#EXTM3U\n");
        assert_eq!(fetched.content_type, LOCAL_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = PlaylistSource::local(dir.path().join("nope.m3u")).unwrap();

        let err = fetch(&client(), &source, 1024).await.unwrap_err();
        assert!(matches!(err, PlaylistError::NotFound { .. }));
    }

    #[tokio::test]
    async fn fetches_remote_with_player_headers() {
        let app = Router::new().route(
            "/list.m3u",
            get(|headers: axum::http::HeaderMap| async move {
                let echo = [header::USER_AGENT, header::ACCEPT, header::CONNECTION]
                    .map(|name| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string()
                    })
                    .join("|");
                ([(header::CONTENT_TYPE, "audio/x-mpegurl")], format!("#EXTM3U\n#{echo}\n"))
            }),
        );
        let addr = spawn_upstream(app).await;

        let fetched = fetch(&client(), &remote(addr, "/list.m3u"), 1024)
            .await
            .unwrap();

        assert_eq!(fetched.content_type, "audio/x-mpegurl");
        assert_eq!(
            std::str::from_utf8(&fetched.body).unwrap(),
            format!("#EXTM3U\n#{MEDIA_PLAYER_USER_AGENT}|*/*|keep-alive\n")
        );
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let app = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "#EXTM3U\n"
            }),
        );
        let addr = spawn_upstream(app).await;

        let client = init_http_client(Duration::from_secs(1)).unwrap();
        let err = fetch(&client, &remote(addr, "/slow"), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, PlaylistError::Transport { .. }));
        assert!(err.to_string().contains("Timed out"), "{err}");
    }

    #[tokio::test]
    async fn error_status_is_transport_error() {
        let app = Router::new().route("/gone", get(|| async { StatusCode::NOT_FOUND }));
        let addr = spawn_upstream(app).await;

        let err = fetch(&client(), &remote(addr, "/gone"), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, PlaylistError::Transport { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = Router::new().route("/big", get(|| async { "#EXTM3U\n".repeat(100) }));
        let addr = spawn_upstream(app).await;

        let err = fetch(&client(), &remote(addr, "/big"), 64)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceeds 64 bytes"));
    }
}
