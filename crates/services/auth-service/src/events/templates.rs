//! Template endpoint client.

use async_trait::async_trait;
use tracing::debug;

use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fetches raw HTML assets by path.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Body of the asset at `path`. Any non-success answer is
    /// `TemplateUnavailable`.
    async fn fetch(&self, path: &str) -> AppResult<String>;
}

/// [`TemplateSource`] over HTTP GET.
#[derive(Clone)]
pub struct HttpTemplateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self, path: &str) -> AppResult<String> {
        let url = self.url_for(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::TemplateUnavailable(format!("{}: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::TemplateUnavailable(format!(
                "{}: status {}",
                path, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::TemplateUnavailable(format!("{}: {}", path, e)))?;

        debug!(path, bytes = body.len(), "Template fetched");
        Ok(body)
    }
}
