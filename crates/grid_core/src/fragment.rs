use std::path::PathBuf;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use shared::error::GridError;
use url::Url;

/// Source of HTML fragments keyed by path. A non-2xx status is a `Fetch`
/// error carrying the status; failures before any status is produced are
/// `Transport` errors. Both are handled identically by the controller.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String, GridError>;
}

/// Fetches fragments relative to a base URL.
pub struct HttpFragmentSource {
    http: Client,
    base_url: Url,
}

impl HttpFragmentSource {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn from_base(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self::new(Url::parse(base_url)?))
    }
}

#[async_trait]
impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, GridError> {
        let url = self.base_url.join(path).map_err(|err| GridError::Transport {
            path: path.to_string(),
            cause: err.into(),
        })?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| GridError::Transport {
                path: path.to_string(),
                cause: err.into(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridError::Fetch {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|err| GridError::Transport {
            path: path.to_string(),
            cause: err.into(),
        })
    }
}

/// Serves fragments from a local directory. A missing file maps to a 404
/// `Fetch` error so the failure surface matches the HTTP source.
pub struct DirFragmentSource {
    root: PathBuf,
}

impl DirFragmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FragmentSource for DirFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, GridError> {
        let file = self.root.join(path);
        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(body),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(GridError::Fetch {
                path: path.to_string(),
                status: 404,
            }),
            Err(err) => Err(GridError::Transport {
                path: path.to_string(),
                cause: err.into(),
            }),
        }
    }
}

/// Fallback source for controllers wired without content; every fetch
/// fails, so fragment-backed options land on the in-cell error path.
pub struct MissingFragmentSource;

#[async_trait]
impl FragmentSource for MissingFragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, GridError> {
        Err(GridError::Transport {
            path: path.to_string(),
            cause: anyhow!("no fragment source configured"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("cellgrid_fragments_{suffix}"));
        std::fs::create_dir_all(dir.join("content")).expect("temp dir");
        dir
    }

    #[tokio::test]
    async fn dir_source_reads_existing_fragment() {
        let root = temp_dir();
        std::fs::write(root.join("content/option01.html"), "<p>hello</p>").expect("write");

        let source = DirFragmentSource::new(&root);
        let body = source.fetch("content/option01.html").await.expect("fetch");
        assert_eq!(body, "<p>hello</p>");

        std::fs::remove_dir_all(root).expect("cleanup");
    }

    #[tokio::test]
    async fn dir_source_maps_missing_file_to_404() {
        let root = temp_dir();
        let source = DirFragmentSource::new(&root);

        let err = source
            .fetch("content/absent.html")
            .await
            .expect_err("missing file");
        match err {
            GridError::Fetch { status, .. } => assert_eq!(status, 404),
            other => panic!("expected Fetch, got {other:?}"),
        }

        std::fs::remove_dir_all(root).expect("cleanup");
    }
}
