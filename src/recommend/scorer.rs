use crate::budget::Budget;
use crate::recommend::{BudgetCategory, RecommendationResult};
use crate::registry::{ItemStatus, PricedItem, RegistryItem};

const SLIGHTLY_OVER_CEILING: f64 = 50.0;
const OVER_BUDGET_CEILING: f64 = 20.0;
const OVER_BUDGET_DECAY: f64 = 50.0;
const IMAGE_BONUS: f64 = 1.1;
const PURCHASE_URL_BONUS: f64 = 1.05;

/// Keys written by [`score_item`]; stale copies in the input are dropped.
const COMPUTED_FIELDS: [&str; 3] = ["score", "category", "budget_proximity"];

pub fn classify(price: f64, budget: &Budget) -> BudgetCategory {
    if price <= budget.amount() {
        BudgetCategory::WithinBudget
    } else if price <= budget.stretch_limit() {
        BudgetCategory::SlightlyOver
    } else {
        BudgetCategory::OverBudget
    }
}

/// Budget-fit score before availability and presentation adjustments.
pub fn base_score(price: f64, budget: &Budget, category: BudgetCategory) -> f64 {
    let amount = budget.amount();
    match category {
        // Spending close to the full budget ranks highest.
        BudgetCategory::WithinBudget => (price / amount) * 100.0,
        BudgetCategory::SlightlyOver => {
            SLIGHTLY_OVER_CEILING - ((price - amount) / amount * 100.0)
        }
        BudgetCategory::OverBudget => {
            (OVER_BUDGET_CEILING - ((price - amount) / amount * OVER_BUDGET_DECAY)).max(0.0)
        }
    }
}

pub fn availability_multiplier(status: ItemStatus) -> f64 {
    match status {
        ItemStatus::Available => 1.0,
        ItemStatus::Reserved => 0.7,
        ItemStatus::Purchased => 0.3,
    }
}

/// Nudges items that are easy to see and buy: image bonus first, then the
/// purchase-link bonus.
pub fn apply_presentation_bonus(mut score: f64, item: &RegistryItem) -> f64 {
    if item.has_image() {
        score *= IMAGE_BONUS;
    }
    if item.has_purchase_url() {
        score *= PURCHASE_URL_BONUS;
    }
    score
}

/// Signed percentage distance of `price` from the budget. Saturates at the
/// `i64` bounds when the price dwarfs the budget.
pub fn budget_proximity(price: f64, budget: &Budget) -> i64 {
    let amount = budget.amount();
    round_half_up(((price - amount) / amount) * 100.0) as i64
}

pub fn round_score(score: f64) -> f64 {
    round_half_up(score * 100.0) / 100.0
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn score_item(budget: &Budget, priced: PricedItem) -> RecommendationResult {
    let price = priced.price();
    let category = classify(price, budget);
    let mut item = priced.into_item();
    for key in COMPUTED_FIELDS {
        item.extra.remove(key);
    }

    let score = base_score(price, budget, category) * availability_multiplier(item.status);
    let score = apply_presentation_bonus(score, &item);

    RecommendationResult {
        score: round_score(score),
        category,
        budget_proximity: budget_proximity(price, budget),
        item,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{apply_presentation_bonus, base_score, budget_proximity, classify, score_item};
    use crate::budget::Budget;
    use crate::recommend::BudgetCategory;
    use crate::registry::{ItemStatus, PricedItem, RegistryItem};

    fn budget(amount: f64) -> Budget {
        Budget::new(amount, "USD").expect("valid budget")
    }

    fn priced(id: &str, price: f64) -> PricedItem {
        PricedItem::try_from(RegistryItem::new(id, id).with_price(price)).expect("priced item")
    }

    #[test]
    fn price_at_budget_scores_full_marks() {
        let result = score_item(&budget(100.0), priced("a", 100.0));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.category, BudgetCategory::WithinBudget);
        assert_eq!(result.budget_proximity, 0);
    }

    #[test]
    fn five_percent_over_is_an_alternative() {
        let result = score_item(&budget(100.0), priced("a", 105.0));
        assert_eq!(result.category, BudgetCategory::SlightlyOver);
        assert_eq!(result.score, 45.0);
        assert_eq!(result.budget_proximity, 5);
    }

    #[test]
    fn far_over_budget_floors_at_zero() {
        let result = score_item(&budget(100.0), priced("a", 150.0));
        assert_eq!(result.category, BudgetCategory::OverBudget);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.budget_proximity, 50);

        for price in [110.5, 125.0, 400.0, 10_000.0] {
            let result = score_item(&budget(100.0), priced("b", price));
            assert!(result.score >= 0.0, "score for {price} went negative");
        }
    }

    #[test]
    fn reserved_item_with_image_is_demoted_then_boosted() {
        let item = RegistryItem::new("a", "Lamp")
            .with_price(80.0)
            .with_status(ItemStatus::Reserved)
            .with_image_url("https://img.example/lamp.jpg");
        let result = score_item(&budget(100.0), PricedItem::try_from(item).expect("priced"));
        assert_eq!(result.score, 61.6);
        assert_eq!(result.category, BudgetCategory::WithinBudget);
        assert_eq!(result.budget_proximity, -20);
    }

    #[test]
    fn purchased_items_keep_thirty_percent() {
        let item = RegistryItem::new("a", "Mug")
            .with_price(50.0)
            .with_status(ItemStatus::Purchased);
        let result = score_item(&budget(100.0), PricedItem::try_from(item).expect("priced"));
        assert_eq!(result.score, 15.0);
    }

    #[test]
    fn stretch_boundary_is_inclusive() {
        let b = budget(100.0);
        assert_eq!(classify(b.stretch_limit(), &b), BudgetCategory::SlightlyOver);
        assert_eq!(classify(b.amount(), &b), BudgetCategory::WithinBudget);
        assert_eq!(classify(b.stretch_limit() + 0.01, &b), BudgetCategory::OverBudget);
    }

    #[test]
    fn within_budget_score_rises_with_price() {
        let b = budget(250.0);
        let mut previous = -1.0;
        for price in [0.0, 10.0, 60.0, 125.0, 200.0, 249.0, 250.0] {
            let score = score_item(&b, priced("p", price)).score;
            assert!(score > previous, "{score} at {price} did not exceed {previous}");
            previous = score;
        }
        assert_eq!(base_score(250.0, &b, BudgetCategory::WithinBudget), 100.0);
    }

    #[test]
    fn presentation_bonuses_stack() {
        let plain = RegistryItem::new("a", "A");
        let full = RegistryItem::new("b", "B")
            .with_image_url("https://img.example/b.png")
            .with_purchase_url("https://shop.example/b");
        let blank = RegistryItem::new("c", "C").with_image_url("").with_purchase_url("");
        assert_eq!(apply_presentation_bonus(100.0, &plain), 100.0);
        assert!((apply_presentation_bonus(100.0, &full) - 115.5).abs() < 1e-9);
        assert_eq!(apply_presentation_bonus(100.0, &blank), 100.0);
    }

    #[test]
    fn proximity_rounds_half_up_below_budget() {
        // -2.5% rounds toward positive infinity.
        assert_eq!(budget_proximity(97.5, &budget(100.0)), -2);
        assert_eq!(budget_proximity(102.5, &budget(100.0)), 3);
    }

    #[test]
    fn proximity_saturates_for_extreme_ratios() {
        assert_eq!(budget_proximity(1e300, &budget(1e-300)), i64::MAX);
    }

    #[test]
    fn computed_fields_replace_incoming_copies() {
        let item: RegistryItem = serde_json::from_value(json!({
            "id": "a",
            "price": 50,
            "score": 999,
            "category": "x",
            "budget_proximity": 7,
            "note": "kept"
        }))
        .expect("item parses");
        let result = score_item(&budget(100.0), PricedItem::try_from(item).expect("priced"));
        let encoded = serde_json::to_string(&result).expect("serializes");
        for key in ["\"score\"", "\"category\"", "\"budget_proximity\""] {
            assert_eq!(encoded.matches(key).count(), 1, "{key} in {encoded}");
        }
        let value: serde_json::Value = serde_json::from_str(&encoded).expect("valid JSON");
        assert_eq!(value["score"], json!(50.0));
        assert_eq!(value["category"], json!("within_budget"));
        assert_eq!(value["budget_proximity"], json!(-50));
        assert_eq!(value["note"], json!("kept"));
    }

    #[test]
    fn scoring_is_repeatable() {
        let b = budget(73.0);
        let first = score_item(&b, priced("x", 77.3));
        let second = score_item(&b, priced("x", 77.3));
        assert_eq!(first, second);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
    }
}
