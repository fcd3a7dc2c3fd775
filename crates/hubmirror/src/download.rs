use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use futures_util::TryStreamExt;
use hubmirror_fetch::{BoxStream, HttpClient, ResourceInfo};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::utils::ui::tracker::{ProgressTracker, ProgressTrackerConfig, Tracker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
}

/// File name to save `url` under: its last non-empty path segment.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.contains(':'))
        .unwrap_or("download")
        .to_string()
}

/// Where to save `url`: `output` if given, else the name the server
/// suggested, else the last segment of the URL.
pub fn destination(output: Option<&Path>, info: &ResourceInfo, url: &str) -> PathBuf {
    match (output, &info.file_name) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(name)) => PathBuf::from(name),
        (None, None) => PathBuf::from(file_name_from_url(url)),
    }
}

/// Stream `url` to disk. A partially written file is removed on failure.
pub async fn download_to<C>(client: &C, url: &str, output: Option<&Path>) -> Result<Downloaded>
where
    C: HttpClient,
    C::Error: Sync,
{
    let info = client.head(url).await.unwrap_or_default();
    let body = client
        .stream(url, &[])
        .await
        .with_context(|| format!("failed to fetch {url}"))?;

    let dest = destination(output, &info, url);
    let file = File::create(&dest)
        .await
        .with_context(|| format!("failed to create {}", dest.display()))?;

    let tracker = ProgressTracker::new(ProgressTrackerConfig {
        len: info.content_length,
        msg: dest.file_name().map(|n| n.to_string_lossy().into_owned()),
    });

    let bytes = match write_body(body, file, &tracker)
        .await
        .with_context(|| format!("download of {url} interrupted"))
    {
        Ok(bytes) => bytes,
        Err(e) => {
            tracker.finish(Some("Download failed".to_string()));
            if let Err(remove) = tokio::fs::remove_file(&dest).await {
                warn!(dest = %dest.display(), error = %remove, "failed to remove partial download");
            }
            return Err(e);
        }
    };

    tracker.finish(Some("Download completed".to_string()));
    info!(url, bytes, dest = %dest.display(), "download finished");
    Ok(Downloaded { path: dest, bytes })
}

async fn write_body<E>(
    mut body: BoxStream<'static, Result<Bytes, E>>,
    mut file: File,
    tracker: &ProgressTracker,
) -> Result<u64>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut written = 0u64;
    while let Some(chunk) = body.try_next().await? {
        file.write_all(&chunk).await?;
        tracker.step(chunk.len() as u64);
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubmirror_fetch::{ClientSetting, ReqwestClient};
    use std::io;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves one chunk, then drops the connection.
    struct TruncatingClient;

    impl HttpClient for TruncatingClient {
        type Error = io::Error;

        async fn stream(
            &self,
            _url: &str,
            _headers: &[(String, String)],
        ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, io::Error> {
            let chunks = vec![
                Ok(Bytes::from_static(b"first half")),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
            ];
            Ok(Box::pin(futures_util::stream::iter(chunks)))
        }

        async fn head(&self, _url: &str) -> Result<ResourceInfo, io::Error> {
            Ok(ResourceInfo::default())
        }
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://github.com/o/r/releases/download/v1/tool.zip"),
            "tool.zip"
        );
        assert_eq!(
            file_name_from_url("https://gh-proxy.com/github.com/o/r/archive/main.tar.gz?raw=1"),
            "main.tar.gz"
        );
        assert_eq!(file_name_from_url("https://example.com/dir/"), "dir");
        assert_eq!(file_name_from_url("https://example.com"), "example.com");
        assert_eq!(file_name_from_url("https://"), "download");
    }

    #[test]
    fn test_destination_precedence() {
        let url = "https://github.com/o/r/archive/main.zip";
        let suggested = ResourceInfo {
            content_length: None,
            file_name: Some("repo-main.zip".to_string()),
        };

        assert_eq!(
            destination(Some(Path::new("out.zip")), &suggested, url),
            PathBuf::from("out.zip")
        );
        assert_eq!(destination(None, &suggested, url), PathBuf::from("repo-main.zip"));
        assert_eq!(
            destination(None, &ResourceInfo::default(), url),
            PathBuf::from("main.zip")
        );
    }

    #[tokio::test]
    async fn test_download_to_file() {
        let server = MockServer::start().await;
        let body = b"release payload".repeat(1000);
        Mock::given(method("GET"))
            .and(path("/tool.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("tool.zip");
        let client = ReqwestClient::new(&ClientSetting::default()).unwrap();

        let downloaded = download_to(&client, &format!("{}/tool.zip", server.uri()), Some(&dest))
            .await
            .unwrap();

        assert_eq!(downloaded.path, dest);
        assert_eq!(downloaded.bytes, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing.zip");
        let client = ReqwestClient::new(&ClientSetting::default()).unwrap();

        let result =
            download_to(&client, &format!("{}/missing.zip", server.uri()), Some(&dest)).await;

        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_interrupted_download_leaves_no_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("partial.zip");

        let result = download_to(&TruncatingClient, "https://host/partial.zip", Some(&dest)).await;

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("reset by peer"));
        assert!(!dest.exists());
    }
}
