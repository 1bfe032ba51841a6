//! Ranks payment methods by the reward they yield for a purchase.

use model::{PaymentMethod, Reward, RewardKind};

/// The winning reward of a single payment method for one query.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardResult {
    pub method_id: String,
    pub method_name: String,
    /// Monetary value of the reward, in the transaction's currency unit.
    pub value: f64,
    pub reward_id: String,
    pub reward_kind: RewardKind,
    pub reward_label: String,
}

/// Computes the monetary value of `reward` for a transaction of `amount`.
///
/// Returns 0 below the qualifying threshold (`amount < min_spend`) and for
/// points rewards missing either rate. A non-finite `amount` never
/// qualifies.
#[must_use]
pub fn calculate(amount: f64, reward: &Reward) -> f64 {
    if !amount.is_finite() || amount < reward.min_spend {
        return 0.0;
    }

    match reward.kind {
        RewardKind::Cashback => {
            if reward.is_fixed {
                reward.value
            } else {
                amount * reward.value
            }
        }
        RewardKind::Points => {
            let (Some(earn_rate), Some(redemption_rate)) =
                (reward.earn_rate, reward.redemption_rate)
            else {
                return 0.0;
            };
            if earn_rate == 0.0 || redemption_rate == 0.0 {
                return 0.0;
            }
            // Points earned times cash value per point.
            (amount / earn_rate) * (1.0 / redemption_rate)
        }
    }
}

/// Human-readable label for a reward rule.
#[must_use]
pub fn describe(reward: &Reward) -> String {
    match reward.kind {
        RewardKind::Cashback if reward.is_fixed => format!("{:.2} cashback", reward.value),
        RewardKind::Cashback => format!("{:.2}% cashback", reward.value * 100.0),
        RewardKind::Points => {
            format!("1 point per {:.2} spent", reward.earn_rate.unwrap_or(0.0))
        }
    }
}

/// Ranks `methods` by the best reward each yields for a transaction of
/// `amount` in `category_id`, best first.
///
/// Methods without an applicable reward are omitted, not emitted with a zero
/// value. Ties keep the per-method pass order (stable sort).
///
/// ```rust
/// use engine::best;
/// use model::{PaymentMethod, Reward, RewardKind};
///
/// let method = PaymentMethod {
///     id: "card".to_string(),
///     name: "Card".to_string(),
///     rewards: vec![Reward {
///         id: "r1".to_string(),
///         kind: RewardKind::Cashback,
///         value: 0.04,
///         is_fixed: false,
///         min_spend: 0.0,
///         categories: vec!["groceries".to_string()],
///         earn_rate: None,
///         redemption_rate: None,
///     }],
/// };
///
/// let ranked = best(1000.0, "groceries", &[method]);
/// assert_eq!(ranked[0].value, 40.0);
/// ```
#[must_use]
pub fn best(amount: f64, category_id: &str, methods: &[PaymentMethod]) -> Vec<RewardResult> {
    let mut results: Vec<RewardResult> = methods
        .iter()
        .filter_map(|method| best_for_method(amount, category_id, method))
        .collect();

    results.sort_by(|a, b| b.value.total_cmp(&a.value));
    results
}

fn best_for_method(
    amount: f64,
    category_id: &str,
    method: &PaymentMethod,
) -> Option<RewardResult> {
    // Category-specific rules shadow global ones: a method is never scored by
    // both at once.
    let specific: Vec<&Reward> = method
        .rewards
        .iter()
        .filter(|reward| reward.applies_to(category_id))
        .collect();

    let applicable = if specific.is_empty() {
        method
            .rewards
            .iter()
            .filter(|reward| reward.is_global())
            .collect()
    } else {
        specific
    };

    // First-encountered wins: a later reward replaces the current best only
    // on a strictly greater value.
    let mut chosen: Option<(&Reward, f64)> = None;
    for reward in applicable {
        let value = calculate(amount, reward);
        let replace = match chosen {
            None => true,
            Some((_, best_value)) => value > best_value,
        };
        if replace {
            chosen = Some((reward, value));
        }
    }

    chosen.map(|(reward, value)| RewardResult {
        method_id: method.id.clone(),
        method_name: method.name.clone(),
        value,
        reward_id: reward.id.clone(),
        reward_kind: reward.kind,
        reward_label: describe(reward),
    })
}
