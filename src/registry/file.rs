use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::registry::{ItemQuery, ItemSource, RegistryItem};

/// Registry export stored as a JSON array of items.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load_all(&self) -> Result<Vec<RegistryItem>> {
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading items file: {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed parsing items file: {}", self.path.display()))
    }
}

#[async_trait]
impl ItemSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_items(&self, query: &ItemQuery) -> Result<Vec<RegistryItem>> {
        let items = self
            .load_all()?
            .into_iter()
            .filter(|item| matches_query(item, query))
            .collect::<Vec<_>>();
        debug!(
            "loaded {} items from {}",
            items.len(),
            self.path.display()
        );
        Ok(items)
    }
}

fn matches_query(item: &RegistryItem, query: &ItemQuery) -> bool {
    if let Some(registry_id) = &query.registry_id {
        if item.registry_id.as_deref() != Some(registry_id.as_str()) {
            return false;
        }
    }
    // Exports without an embedded registry row belong to a single owner.
    match (&query.friend_id, item.registry_owner()) {
        (Some(friend), Some(owner)) => friend == owner,
        _ => true,
    }
}
