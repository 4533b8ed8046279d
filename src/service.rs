use anyhow::{Context, Result};
use tracing::info;

use crate::budget::Budget;
use crate::recommend::ranking::build_recommendations;
use crate::recommend::RecommendationReport;
use crate::registry::{priced_items, ItemQuery, ItemSource};

/// Fetches candidate items from `source` and ranks them against `budget`.
pub async fn recommend_from_source(
    source: &dyn ItemSource,
    query: &ItemQuery,
    budget: &Budget,
) -> Result<RecommendationReport> {
    let items = source
        .fetch_items(query)
        .await
        .with_context(|| format!("failed fetching registry items from {}", source.name()))?;
    let fetched = items.len();
    let priced = priced_items(items)?;
    info!(
        "scoring {} of {fetched} items from {} against {budget}",
        priced.len(),
        source.name()
    );
    Ok(build_recommendations(budget, priced))
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::recommend_from_source;
    use crate::budget::Budget;
    use crate::registry::{ItemQuery, ItemSource, RegistryItem};

    struct FixedSource(Vec<RegistryItem>);

    #[async_trait]
    impl ItemSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_items(&self, _query: &ItemQuery) -> Result<Vec<RegistryItem>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ItemSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_items(&self, _query: &ItemQuery) -> Result<Vec<RegistryItem>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn unpriced_items_are_not_counted() {
        let source = FixedSource(vec![
            RegistryItem::new("a", "A").with_price(30.0),
            RegistryItem::new("b", "B"),
        ]);
        let budget = Budget::new(30.0, "USD").expect("valid budget");
        let report = recommend_from_source(&source, &ItemQuery::default(), &budget)
            .await
            .expect("report");
        assert_eq!(report.total_items, 1);
        assert_eq!(report.within_budget_count, 1);
    }

    #[tokio::test]
    async fn source_failure_propagates_with_context() {
        let budget = Budget::new(30.0, "USD").expect("valid budget");
        let err = recommend_from_source(&FailingSource, &ItemQuery::default(), &budget)
            .await
            .expect_err("fetch should fail");
        assert!(err.to_string().contains("failing"));
    }
}
