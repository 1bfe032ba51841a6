//! Pure catalog operations over categories, methods and rewards.
//!
//! Every function takes the current collections by reference and returns new
//! ones; callers decide what to do with the result. Unknown ids are an
//! error rather than a silent no-op.

use model::{Category, PaymentMethod, Reward, RewardKind};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Category registry operations.
pub mod categories {
    use super::*;

    /// Appends a category with a fresh id and a trimmed, non-empty label.
    pub fn add(categories: &[Category], label: &str) -> ResultEngine<Vec<Category>> {
        let label = non_empty(label, "category label")?;

        let mut out = categories.to_vec();
        out.push(Category {
            id: Uuid::new_v4().to_string(),
            label,
        });
        Ok(out)
    }

    /// Replaces the label of the category with `id`.
    pub fn rename(categories: &[Category], id: &str, label: &str) -> ResultEngine<Vec<Category>> {
        let label = non_empty(label, "category label")?;
        find(categories.iter().map(|c| c.id.as_str()), id)?;

        Ok(categories
            .iter()
            .map(|category| {
                if category.id == id {
                    Category {
                        id: category.id.clone(),
                        label: label.clone(),
                    }
                } else {
                    category.clone()
                }
            })
            .collect())
    }

    /// Removes the category with `id` and scrubs the id from every reward's
    /// category list. The rewards and their methods persist; a reward that
    /// loses its last category becomes global.
    pub fn remove(
        categories: &[Category],
        methods: &[PaymentMethod],
        id: &str,
    ) -> ResultEngine<(Vec<Category>, Vec<PaymentMethod>)> {
        find(categories.iter().map(|c| c.id.as_str()), id)?;

        let remaining = categories
            .iter()
            .filter(|category| category.id != id)
            .cloned()
            .collect();

        let scrubbed = methods
            .iter()
            .map(|method| PaymentMethod {
                id: method.id.clone(),
                name: method.name.clone(),
                rewards: method
                    .rewards
                    .iter()
                    .map(|reward| {
                        let mut reward = reward.clone();
                        reward.categories.retain(|c| c != id);
                        reward
                    })
                    .collect(),
            })
            .collect();

        Ok((remaining, scrubbed))
    }
}

/// Payment method operations.
pub mod methods {
    use super::*;

    /// Appends a method with a fresh id, a trimmed non-empty name and no
    /// rewards.
    pub fn add(methods: &[PaymentMethod], name: &str) -> ResultEngine<Vec<PaymentMethod>> {
        let name = non_empty(name, "method name")?;

        let mut out = methods.to_vec();
        out.push(PaymentMethod {
            id: Uuid::new_v4().to_string(),
            name,
            rewards: Vec::new(),
        });
        Ok(out)
    }

    /// Replaces the name of the method with `id`.
    pub fn rename(
        methods: &[PaymentMethod],
        id: &str,
        name: &str,
    ) -> ResultEngine<Vec<PaymentMethod>> {
        let name = non_empty(name, "method name")?;
        find(methods.iter().map(|m| m.id.as_str()), id)?;

        Ok(methods
            .iter()
            .map(|method| {
                if method.id == id {
                    PaymentMethod {
                        id: method.id.clone(),
                        name: name.clone(),
                        rewards: method.rewards.clone(),
                    }
                } else {
                    method.clone()
                }
            })
            .collect())
    }

    /// Removes the method with `id` together with all rewards it owns.
    pub fn remove(methods: &[PaymentMethod], id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        find(methods.iter().map(|m| m.id.as_str()), id)?;

        Ok(methods
            .iter()
            .filter(|method| method.id != id)
            .cloned()
            .collect())
    }
}

/// Reward rule operations, keyed by the owning method.
pub mod rewards {
    use super::*;

    /// Appends `reward` to the method with `method_id`.
    pub fn add(
        methods: &[PaymentMethod],
        method_id: &str,
        reward: Reward,
    ) -> ResultEngine<Vec<PaymentMethod>> {
        check_reward(&reward)?;
        find(methods.iter().map(|m| m.id.as_str()), method_id)?;

        Ok(methods
            .iter()
            .map(|method| {
                let mut method = method.clone();
                if method.id == method_id {
                    method.rewards.push(reward.clone());
                }
                method
            })
            .collect())
    }

    /// Replaces the reward with `reward.id` inside the method with
    /// `method_id`.
    pub fn update(
        methods: &[PaymentMethod],
        method_id: &str,
        reward: Reward,
    ) -> ResultEngine<Vec<PaymentMethod>> {
        check_reward(&reward)?;
        let method = methods
            .iter()
            .find(|m| m.id == method_id)
            .ok_or_else(|| EngineError::KeyNotFound(method_id.to_string()))?;
        find(method.rewards.iter().map(|r| r.id.as_str()), &reward.id)?;

        Ok(methods
            .iter()
            .map(|method| {
                let mut method = method.clone();
                if method.id == method_id {
                    for slot in &mut method.rewards {
                        if slot.id == reward.id {
                            *slot = reward.clone();
                        }
                    }
                }
                method
            })
            .collect())
    }

    /// Removes the reward with `reward_id` from the method with `method_id`.
    pub fn remove(
        methods: &[PaymentMethod],
        method_id: &str,
        reward_id: &str,
    ) -> ResultEngine<Vec<PaymentMethod>> {
        let method = methods
            .iter()
            .find(|m| m.id == method_id)
            .ok_or_else(|| EngineError::KeyNotFound(method_id.to_string()))?;
        find(method.rewards.iter().map(|r| r.id.as_str()), reward_id)?;

        Ok(methods
            .iter()
            .map(|method| {
                let mut method = method.clone();
                if method.id == method_id {
                    method.rewards.retain(|r| r.id != reward_id);
                }
                method
            })
            .collect())
    }

    /// Invariants a reward must satisfy before it enters the catalog.
    fn check_reward(reward: &Reward) -> ResultEngine<()> {
        if reward.id.is_empty() {
            return Err(EngineError::InvalidReward("empty reward id".to_string()));
        }
        if reward.value < 0.0 || !reward.value.is_finite() {
            return Err(EngineError::InvalidReward(
                "value must be a non-negative number".to_string(),
            ));
        }
        if reward.min_spend < 0.0 || !reward.min_spend.is_finite() {
            return Err(EngineError::InvalidReward(
                "minSpend must be a non-negative number".to_string(),
            ));
        }
        if reward.kind == RewardKind::Points {
            let both_positive = matches!(
                (reward.earn_rate, reward.redemption_rate),
                (Some(earn), Some(redeem)) if earn > 0.0 && redeem > 0.0
            );
            if !both_positive {
                return Err(EngineError::InvalidReward(
                    "points rewards require positive earnRate and redemptionRate".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn non_empty(raw: &str, what: &str) -> ResultEngine<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!("empty {what}")));
    }
    Ok(trimmed.to_string())
}

fn find<'a>(mut ids: impl Iterator<Item = &'a str>, id: &str) -> ResultEngine<()> {
    if ids.any(|candidate| candidate == id) {
        Ok(())
    } else {
        Err(EngineError::KeyNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> (Vec<Category>, Vec<PaymentMethod>) {
        let categories = vec![
            Category::new("groceries", "Groceries"),
            Category::new("drugstore", "Drugstore"),
        ];
        let methods = vec![PaymentMethod {
            id: "card".to_string(),
            name: "Card".to_string(),
            rewards: vec![Reward {
                id: "r1".to_string(),
                kind: RewardKind::Cashback,
                value: 0.01,
                is_fixed: false,
                min_spend: 0.0,
                categories: vec!["drugstore".to_string(), "groceries".to_string()],
                earn_rate: None,
                redemption_rate: None,
            }],
        }];
        (categories, methods)
    }

    #[test]
    fn add_trims_and_rejects_blank_labels() {
        let (categories, _) = catalog();

        let out = categories::add(&categories, "  Utilities  ").unwrap();
        assert_eq!(out.last().map(|c| c.label.as_str()), Some("Utilities"));
        assert!(!out.last().map(|c| c.id.is_empty()).unwrap_or(true));

        assert_eq!(
            categories::add(&categories, "   "),
            Err(EngineError::InvalidName("empty category label".to_string()))
        );
    }

    #[test]
    fn remove_cascades_into_reward_scopes() {
        let (categories, methods) = catalog();

        let (remaining, scrubbed) =
            categories::remove(&categories, &methods, "drugstore").unwrap();

        assert!(remaining.iter().all(|c| c.id != "drugstore"));
        // The reward and its method persist; only the reference is gone.
        assert_eq!(scrubbed[0].rewards.len(), 1);
        assert_eq!(scrubbed[0].rewards[0].categories, vec!["groceries"]);
        // Inputs are untouched.
        assert_eq!(methods[0].rewards[0].categories.len(), 2);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let (categories, methods) = catalog();

        assert_eq!(
            categories::rename(&categories, "nope", "X"),
            Err(EngineError::KeyNotFound("nope".to_string()))
        );
        assert_eq!(
            methods::remove(&methods, "nope"),
            Err(EngineError::KeyNotFound("nope".to_string()))
        );
    }

    #[test]
    fn reward_add_checks_points_invariant() {
        let (_, methods) = catalog();

        let broken = Reward {
            id: "r2".to_string(),
            kind: RewardKind::Points,
            value: 0.0,
            is_fixed: false,
            min_spend: 0.0,
            categories: Vec::new(),
            earn_rate: Some(30.0),
            redemption_rate: None,
        };
        assert!(matches!(
            rewards::add(&methods, "card", broken),
            Err(EngineError::InvalidReward(_))
        ));

        let fine = Reward {
            id: "r2".to_string(),
            kind: RewardKind::Points,
            value: 0.0,
            is_fixed: false,
            min_spend: 0.0,
            categories: Vec::new(),
            earn_rate: Some(30.0),
            redemption_rate: Some(17.0),
        };
        let out = rewards::add(&methods, "card", fine).unwrap();
        assert_eq!(out[0].rewards.len(), 2);
    }

    #[test]
    fn reward_update_replaces_in_place() {
        let (_, methods) = catalog();

        let mut changed = methods[0].rewards[0].clone();
        changed.value = 0.05;

        let out = rewards::update(&methods, "card", changed).unwrap();
        assert_eq!(out[0].rewards[0].value, 0.05);
        assert_eq!(methods[0].rewards[0].value, 0.01);
    }

    #[test]
    fn reward_remove_keeps_the_method() {
        let (_, methods) = catalog();

        let out = rewards::remove(&methods, "card", "r1").unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].rewards.is_empty());
    }
}
