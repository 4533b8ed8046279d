pub mod ranking;
pub mod scorer;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::registry::RegistryItem;

pub const WITHIN_BUDGET_LIMIT: usize = 10;
pub const ALTERNATIVES_LIMIT: usize = 3;
pub const OVER_BUDGET_LIMIT: usize = 5;

pub const EMPTY_REGISTRY_MESSAGE: &str = "No items found in registry";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    WithinBudget,
    SlightlyOver,
    OverBudget,
}

impl Display for BudgetCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::WithinBudget => "within_budget",
            Self::SlightlyOver => "slightly_over",
            Self::OverBudget => "over_budget",
        };
        write!(f, "{label}")
    }
}

/// A registry item with its computed ranking fields laid alongside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    #[serde(flatten)]
    pub item: RegistryItem,
    pub score: f64,
    pub category: BudgetCategory,
    pub budget_proximity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationBuckets {
    pub within_budget: Vec<RecommendationResult>,
    pub alternatives: Vec<RecommendationResult>,
    pub over_budget: Vec<RecommendationResult>,
}

impl RecommendationBuckets {
    pub fn is_empty(&self) -> bool {
        self.within_budget.is_empty() && self.alternatives.is_empty() && self.over_budget.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationReport {
    pub recommendations: RecommendationBuckets,
    pub budget_amount: f64,
    pub total_items: usize,
    pub within_budget_count: usize,
    pub alternatives_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationReport {
    pub fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        format!(
            "{} items scored against a budget of {:.2}: {} within budget, {} alternatives",
            self.total_items, self.budget_amount, self.within_budget_count, self.alternatives_count
        )
    }
}
