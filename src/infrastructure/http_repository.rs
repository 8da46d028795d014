// Remote dashboard repository over HTTP
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::DashboardConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardRepository {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDashboardRepository {
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn dashboard_url(&self) -> String {
        format!("{}/dashboard", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DashboardRepository for HttpDashboardRepository {
    async fn fetch(&self) -> Result<DashboardConfig> {
        let url = self.dashboard_url();
        tracing::debug!("Fetching dashboard from {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to dashboard service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Dashboard fetch failed with status {}: {}", status, body);
        }

        response
            .json::<DashboardConfig>()
            .await
            .context("Failed to parse dashboard payload")
    }

    async fn store(&self, config: &DashboardConfig) -> Result<()> {
        let url = self.dashboard_url();
        tracing::debug!("Storing dashboard to {}", url);

        let response = self
            .authorize(self.client.put(&url))
            .json(config)
            .send()
            .await
            .context("Failed to send request to dashboard service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Dashboard save failed with status {}: {}", status, body);
        }

        Ok(())
    }
}
