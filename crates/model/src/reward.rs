//! Reward rules owned by a payment method.

use serde::{Deserialize, Serialize};

/// Closed set of reward rule kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Cashback,
    Points,
}

impl RewardKind {
    /// Canonical tag used in files and transport payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RewardKind::Cashback => "cashback",
            RewardKind::Points => "points",
        }
    }
}

impl core::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scoring rule.
///
/// Field meaning depends on `kind`:
/// - `Cashback` with `is_fixed`: `value` is a flat amount.
/// - `Cashback` without `is_fixed`: `value` is a fraction of the transaction
///   (`0.04` = 4%).
/// - `Points`: `earn_rate` (spend per point) and `redemption_rate` (points
///   per currency unit) must both be present and positive; `value` and
///   `is_fixed` are ignored.
///
/// An empty `categories` list is the global wildcard: the rule applies when
/// the owning method has no category-specific rule for the queried category.
/// `min_spend` is an inclusive qualifying threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    pub value: f64,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub min_spend: f64,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redemption_rate: Option<f64>,
}

impl Reward {
    /// Returns `true` when the rule applies to every category (no specific
    /// scope).
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns `true` when the rule is scoped to `category_id`.
    #[must_use]
    pub fn applies_to(&self, category_id: &str) -> bool {
        self.categories.iter().any(|id| id == category_id)
    }
}
