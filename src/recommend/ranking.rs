use crate::budget::Budget;
use crate::recommend::scorer::score_item;
use crate::recommend::{
    BudgetCategory, RecommendationBuckets, RecommendationReport, RecommendationResult,
    ALTERNATIVES_LIMIT, EMPTY_REGISTRY_MESSAGE, OVER_BUDGET_LIMIT, WITHIN_BUDGET_LIMIT,
};
use crate::registry::PricedItem;

/// Scores every item, ranks by score and splits the ranking into the three
/// buckets. Equal scores keep their input order.
pub fn build_recommendations(budget: &Budget, items: Vec<PricedItem>) -> RecommendationReport {
    let total_items = items.len();
    let mut scored = items
        .into_iter()
        .map(|item| score_item(budget, item))
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut within_budget = Vec::new();
    let mut slightly_over = Vec::new();
    let mut over_budget = Vec::new();
    for result in scored {
        match result.category {
            BudgetCategory::WithinBudget => within_budget.push(result),
            BudgetCategory::SlightlyOver => slightly_over.push(result),
            BudgetCategory::OverBudget => over_budget.push(result),
        }
    }

    let within_budget_count = within_budget.len();
    let recommendations = RecommendationBuckets {
        within_budget: truncated(within_budget, WITHIN_BUDGET_LIMIT),
        alternatives: truncated(slightly_over, ALTERNATIVES_LIMIT),
        over_budget: truncated(over_budget, OVER_BUDGET_LIMIT),
    };

    RecommendationReport {
        alternatives_count: recommendations.alternatives.len(),
        recommendations,
        budget_amount: budget.amount(),
        total_items,
        within_budget_count,
        message: (total_items == 0).then(|| EMPTY_REGISTRY_MESSAGE.to_string()),
    }
}

fn truncated(mut results: Vec<RecommendationResult>, limit: usize) -> Vec<RecommendationResult> {
    results.truncate(limit);
    results
}
