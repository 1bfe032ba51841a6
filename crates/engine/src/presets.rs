//! Starter catalog used when no configuration has been saved yet.

use model::{Category, PaymentMethod, Reward, RewardKind};
use uuid::Uuid;

pub const GROCERIES: &str = "groceries";
pub const DRUGSTORE: &str = "drugstore";
pub const UTILITIES: &str = "utilities";
pub const RETAIL: &str = "retail";

/// The preset category registry.
#[must_use]
pub fn preset_categories() -> Vec<Category> {
    vec![
        Category::new(GROCERIES, "Groceries"),
        Category::new(DRUGSTORE, "Drugstore"),
        Category::new(UTILITIES, "Utilities"),
        Category::new(RETAIL, "Retail"),
    ]
}

/// The preset payment methods with their reward rules.
#[must_use]
pub fn preset_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "BPI_AMORE_CASHBACK".to_string(),
            name: "BPI Amore Cashback".to_string(),
            rewards: vec![
                percentage(0.04, &[GROCERIES]),
                percentage(0.01, &[DRUGSTORE]),
                percentage(0.01, &[UTILITIES]),
                percentage(0.003, &[RETAIL]),
            ],
        },
        PaymentMethod {
            id: "UB_REWARDS_VISA".to_string(),
            name: "UB Rewards Visa".to_string(),
            rewards: vec![Reward {
                id: Uuid::new_v4().to_string(),
                kind: RewardKind::Points,
                value: 0.0,
                is_fixed: false,
                min_spend: 0.0,
                categories: Vec::new(),
                earn_rate: Some(30.0),
                redemption_rate: Some(17.0),
            }],
        },
        PaymentMethod {
            id: "MARIBANK_CARD".to_string(),
            name: "MariBank Card".to_string(),
            rewards: vec![percentage(0.01, &[])],
        },
        PaymentMethod {
            id: "MARIBANK_QR".to_string(),
            name: "MariBank QR".to_string(),
            rewards: vec![Reward {
                id: Uuid::new_v4().to_string(),
                kind: RewardKind::Cashback,
                value: 2.0,
                is_fixed: true,
                min_spend: 100.0,
                categories: Vec::new(),
                earn_rate: None,
                redemption_rate: None,
            }],
        },
    ]
}

fn percentage(value: f64, categories: &[&str]) -> Reward {
    Reward {
        id: Uuid::new_v4().to_string(),
        kind: RewardKind::Cashback,
        value,
        is_fixed: false,
        min_spend: 0.0,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        earn_rate: None,
        redemption_rate: None,
    }
}
