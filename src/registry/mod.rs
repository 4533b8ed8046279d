pub mod file;
pub mod postgrest;

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Config, SourceKind};
use crate::error::{RecommendError, RecommendResult};
use crate::registry::file::FileSource;
use crate::registry::postgrest::PostgrestSource;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Available,
    Reserved,
    Purchased,
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Purchased => "purchased",
        };
        write!(f, "{label}")
    }
}

/// A wishlist entry as stored upstream. Fields the recommender does not read
/// are kept in `extra` and written back out untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryItem {
    pub id: String,
    #[serde(default)]
    pub registry_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub purchased_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            registry_id: None,
            title: title.into(),
            description: None,
            price: None,
            url: None,
            image_url: None,
            status: ItemStatus::Available,
            purchased_by: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    pub fn with_purchase_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn has_image(&self) -> bool {
        is_present(self.image_url.as_deref())
    }

    pub fn has_purchase_url(&self) -> bool {
        is_present(self.url.as_deref())
    }

    /// Owner of the embedded `registry` row, when the item was fetched with one.
    pub fn registry_owner(&self) -> Option<&str> {
        self.extra
            .get("registry")
            .and_then(|registry| registry.get("user_id"))
            .and_then(Value::as_str)
    }
}

// Empty strings count as missing, same as an unset column.
fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.is_empty()).unwrap_or(false)
}

/// A registry item known to carry a finite, non-negative price.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    price: f64,
    item: RegistryItem,
}

impl PricedItem {
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn item(&self) -> &RegistryItem {
        &self.item
    }

    pub fn into_item(self) -> RegistryItem {
        self.item
    }
}

impl TryFrom<RegistryItem> for PricedItem {
    type Error = RecommendError;

    fn try_from(item: RegistryItem) -> RecommendResult<Self> {
        let Some(price) = item.price else {
            return Err(RecommendError::MissingPrice { id: item.id });
        };
        if !price.is_finite() || price < 0.0 {
            return Err(RecommendError::MalformedItem {
                id: item.id,
                reason: format!("price must be a finite non-negative number, got {price}"),
            });
        }
        Ok(Self { price, item })
    }
}

/// Keeps only items with a price, the same cut the storage query applies.
/// A price that is present but unusable is an upstream contract violation.
pub fn priced_items(items: Vec<RegistryItem>) -> RecommendResult<Vec<PricedItem>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match PricedItem::try_from(item) {
            Ok(priced) => out.push(priced),
            Err(RecommendError::MissingPrice { id }) => {
                debug!("skipping unpriced registry item {id}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub friend_id: Option<String>,
    pub registry_id: Option<String>,
}

#[async_trait]
pub trait ItemSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_items(&self, query: &ItemQuery) -> Result<Vec<RegistryItem>>;
}

pub fn build_source(config: &Config) -> Result<Arc<dyn ItemSource>> {
    let source: Arc<dyn ItemSource> = match config.source.kind {
        SourceKind::File => Arc::new(FileSource::new(config.resolved_items_path())),
        SourceKind::Postgrest => Arc::new(PostgrestSource::from_config(&config.source)?),
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{priced_items, ItemStatus, PricedItem, RegistryItem};
    use crate::error::RecommendError;

    #[test]
    fn parses_storage_row_and_keeps_extra_fields() {
        let row = json!({
            "id": "item-1",
            "registry_id": "reg-1",
            "title": "Espresso grinder",
            "description": null,
            "price": 129.5,
            "url": "https://shop.example/grinder",
            "image_url": "",
            "status": "reserved",
            "purchased_by": null,
            "created_at": "2024-03-01T10:00:00+00:00",
            "registry": { "id": "reg-1", "user_id": "friend-9" }
        });

        let item: RegistryItem = serde_json::from_value(row).expect("row should parse");
        assert_eq!(item.status, ItemStatus::Reserved);
        assert_eq!(item.price, Some(129.5));
        assert!(item.has_purchase_url());
        assert!(!item.has_image());
        assert_eq!(item.registry_owner(), Some("friend-9"));

        let back = serde_json::to_value(&item).expect("item should serialize");
        assert_eq!(back["registry"]["user_id"], "friend-9");
        assert_eq!(back["status"], "reserved");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let row = json!({ "id": "x", "price": 10.0, "status": "gifted" });
        assert!(serde_json::from_value::<RegistryItem>(row).is_err());
    }

    #[test]
    fn missing_status_defaults_to_available() {
        let row = json!({ "id": "x", "price": 10.0 });
        let item: RegistryItem = serde_json::from_value(row).expect("row should parse");
        assert_eq!(item.status, ItemStatus::Available);
    }

    #[test]
    fn priced_items_drops_unpriced_and_rejects_negative() {
        let items = vec![
            RegistryItem::new("a", "A").with_price(10.0),
            RegistryItem::new("b", "B"),
        ];
        let priced = priced_items(items).expect("valid items");
        assert_eq!(priced.len(), 1);
        assert_eq!(priced[0].item().id, "a");

        let err = PricedItem::try_from(RegistryItem::new("c", "C").with_price(-1.0))
            .expect_err("negative price should fail");
        assert!(matches!(err, RecommendError::MalformedItem { .. }));
    }
}
