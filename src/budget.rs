use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::error::{RecommendError, RecommendResult};

pub const DEFAULT_CURRENCY: &str = "USD";

/// A spend target that has passed validation. The scoring arithmetic divides
/// by `amount`, so it is only reachable through [`Budget::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    amount: f64,
    currency: String,
}

impl Budget {
    pub fn new(amount: f64, currency: &str) -> RecommendResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RecommendError::InvalidBudget { amount });
        }
        Ok(Self {
            amount,
            currency: normalize_currency(currency),
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Upper price bound of the `slightly_over` band (10% above budget).
    pub fn stretch_limit(&self) -> f64 {
        self.amount * 1.1
    }
}

impl Display for Budget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

fn normalize_currency(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::Budget;
    use crate::error::RecommendError;

    #[test]
    fn rejects_non_positive_amounts() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = Budget::new(amount, "USD").expect_err("budget should be rejected");
            assert!(matches!(err, RecommendError::InvalidBudget { .. }));
        }
    }

    #[test]
    fn defaults_and_normalizes_currency() {
        let budget = Budget::new(25.0, "").expect("valid budget");
        assert_eq!(budget.currency(), "USD");
        let budget = Budget::new(25.0, " eur ").expect("valid budget");
        assert_eq!(budget.currency(), "EUR");
        assert_eq!(budget.to_string(), "25.00 EUR");
    }
}
