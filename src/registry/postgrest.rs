use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::registry::{ItemQuery, ItemSource, RegistryItem};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;
const ITEMS_PATH: &str = "/rest/v1/registry_items";
const ITEMS_SELECT: &str = "*,registry:registries!inner(*)";

/// Reads registry items from a hosted PostgREST endpoint.
pub struct PostgrestSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PostgrestSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(anyhow!("postgrest source requires source.base_url"));
        }
        let client = Client::builder()
            .user_agent(concat!("gift-recommender/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            warn!(
                "{} is not set; registry requests will be anonymous",
                config.api_key_env
            );
        }
        Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    pub fn items_url(&self) -> String {
        format!("{}{ITEMS_PATH}", self.base_url)
    }
}

pub fn query_params(query: &ItemQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("select".to_string(), ITEMS_SELECT.to_string()),
        ("price".to_string(), "not.is.null".to_string()),
    ];
    if let Some(friend_id) = &query.friend_id {
        params.push(("registry.user_id".to_string(), format!("eq.{friend_id}")));
    }
    if let Some(registry_id) = &query.registry_id {
        params.push(("registry_id".to_string(), format!("eq.{registry_id}")));
    }
    params
}

#[async_trait]
impl ItemSource for PostgrestSource {
    fn name(&self) -> &str {
        "postgrest"
    }

    async fn fetch_items(&self, query: &ItemQuery) -> Result<Vec<RegistryItem>> {
        let url = self.items_url();
        let mut request = self.client.get(&url).query(&query_params(query));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("failed GET request: {url}"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("failed reading response body: {url}"))?;
        if !status.is_success() {
            let preview: String = body.chars().take(180).collect();
            return Err(anyhow!("GET {url} returned {status}: {preview}"));
        }
        let items: Vec<RegistryItem> =
            serde_json::from_str(&body).with_context(|| format!("invalid JSON response: {url}"))?;
        debug!("fetched {} registry items from {url}", items.len());
        Ok(items)
    }
}
