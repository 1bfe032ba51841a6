//! Structural validation of untrusted configuration data.
//!
//! Imported files, decoded transport payloads and persisted storage content
//! all pass through [`import_settings`] before the rest of the system sees
//! them. Validation walks the raw JSON tree, checks the common fields first
//! and then dispatches on the reward `type` tag for the kind-specific rules,
//! collecting a flat list of every violated constraint instead of stopping
//! at the first one.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::{Category, PaymentMethod, Reward, RewardKind, SETTINGS_VERSION, Settings};

/// A single violated constraint, addressed by its field path
/// (e.g. `methods[0].rewards[2].earnRate`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The full list of problems found in a rejected settings value.
///
/// Never empty: a settings value either imports cleanly or is rejected with
/// at least one violation.
#[derive(Debug, Error)]
#[error("settings rejected with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

/// Validates an arbitrary structured value against the settings invariants
/// and returns a fully typed snapshot, or every violated constraint.
///
/// Accepts only [`SETTINGS_VERSION`]; unknown object keys are ignored.
pub fn import_settings(value: &Value) -> Result<Settings, ValidationError> {
    let mut ctx = Context::default();

    let Some(root) = value.as_object() else {
        ctx.report("$", "expected a settings object");
        return Err(ctx.into_error());
    };

    match root.get("version").and_then(Value::as_u64) {
        Some(version) if version == u64::from(SETTINGS_VERSION) => {}
        Some(version) => ctx.report("version", format!("unsupported settings version {version}")),
        None => ctx.report("version", "missing or non-integer version"),
    }

    let categories = parse_categories(root.get("categories"), &mut ctx);
    let methods = parse_methods(root.get("methods"), &mut ctx);

    if ctx.violations.is_empty() {
        Ok(Settings {
            version: SETTINGS_VERSION,
            categories,
            methods,
        })
    } else {
        Err(ctx.into_error())
    }
}

#[derive(Default)]
struct Context {
    violations: Vec<Violation>,
}

impl Context {
    fn report(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }
}

fn parse_categories(value: Option<&Value>, ctx: &mut Context) -> Vec<Category> {
    let Some(items) = value.and_then(Value::as_array) else {
        ctx.report("categories", "expected an array");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("categories[{index}]");
        let Some(obj) = item.as_object() else {
            ctx.report(path, "expected a category object");
            continue;
        };

        let id = required_string(obj.get("id"), &format!("{path}.id"), ctx);
        let label = required_string(obj.get("label"), &format!("{path}.label"), ctx);

        if let (Some(id), Some(label)) = (id, label) {
            if !seen.insert(id.clone()) {
                ctx.report(format!("{path}.id"), format!("duplicate category id '{id}'"));
                continue;
            }
            out.push(Category { id, label });
        }
    }
    out
}

fn parse_methods(value: Option<&Value>, ctx: &mut Context) -> Vec<PaymentMethod> {
    let Some(items) = value.and_then(Value::as_array) else {
        ctx.report("methods", "expected an array");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("methods[{index}]");
        let Some(obj) = item.as_object() else {
            ctx.report(path, "expected a payment method object");
            continue;
        };

        let id = required_string(obj.get("id"), &format!("{path}.id"), ctx);
        let name = required_string(obj.get("name"), &format!("{path}.name"), ctx);
        let rewards = parse_rewards(obj.get("rewards"), &path, ctx);

        if let (Some(id), Some(name)) = (id, name) {
            if !seen.insert(id.clone()) {
                ctx.report(format!("{path}.id"), format!("duplicate method id '{id}'"));
                continue;
            }
            out.push(PaymentMethod { id, name, rewards });
        }
    }
    out
}

fn parse_rewards(value: Option<&Value>, method_path: &str, ctx: &mut Context) -> Vec<Reward> {
    let Some(items) = value.and_then(Value::as_array) else {
        ctx.report(format!("{method_path}.rewards"), "expected an array");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("{method_path}.rewards[{index}]");
        if let Some(reward) = parse_reward(item, &path, ctx) {
            if !seen.insert(reward.id.clone()) {
                ctx.report(
                    format!("{path}.id"),
                    format!("duplicate reward id '{}'", reward.id),
                );
                continue;
            }
            out.push(reward);
        }
    }
    out
}

fn parse_reward(value: &Value, path: &str, ctx: &mut Context) -> Option<Reward> {
    let Some(obj) = value.as_object() else {
        ctx.report(path, "expected a reward object");
        return None;
    };

    let before = ctx.violations.len();

    let id = required_string(obj.get("id"), &format!("{path}.id"), ctx);

    let kind = match obj.get("type").and_then(Value::as_str) {
        Some("cashback") => Some(RewardKind::Cashback),
        Some("points") => Some(RewardKind::Points),
        Some(other) => {
            ctx.report(format!("{path}.type"), format!("unknown reward type '{other}'"));
            None
        }
        None => {
            ctx.report(format!("{path}.type"), "missing reward type");
            None
        }
    };

    let value_field = non_negative_number(obj.get("value"), &format!("{path}.value"), ctx);
    let is_fixed = optional_bool(obj.get("isFixed"), &format!("{path}.isFixed"), ctx);
    let min_spend = match obj.get("minSpend") {
        None => Some(0.0),
        some => non_negative_number(some, &format!("{path}.minSpend"), ctx),
    };
    let categories = reward_categories(obj.get("categories"), path, ctx);

    let earn_rate = optional_positive(obj.get("earnRate"), &format!("{path}.earnRate"), ctx);
    let redemption_rate =
        optional_positive(obj.get("redemptionRate"), &format!("{path}.redemptionRate"), ctx);

    // Kind-specific rules: a points reward without both rates is invalid.
    // A present-but-invalid rate was already reported above.
    if kind == Some(RewardKind::Points) {
        if obj.get("earnRate").is_none() {
            ctx.report(
                format!("{path}.earnRate"),
                "earnRate is required for points rewards",
            );
        }
        if obj.get("redemptionRate").is_none() {
            ctx.report(
                format!("{path}.redemptionRate"),
                "redemptionRate is required for points rewards",
            );
        }
    }

    if ctx.violations.len() > before {
        return None;
    }

    Some(Reward {
        id: id?,
        kind: kind?,
        value: value_field?,
        is_fixed: is_fixed?,
        min_spend: min_spend?,
        categories: categories?,
        earn_rate: earn_rate?,
        redemption_rate: redemption_rate?,
    })
}

fn required_string(value: Option<&Value>, path: &str, ctx: &mut Context) -> Option<String> {
    match value.and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        Some(_) => {
            ctx.report(path, "must not be empty");
            None
        }
        None => {
            ctx.report(path, "missing or not a string");
            None
        }
    }
}

fn non_negative_number(value: Option<&Value>, path: &str, ctx: &mut Context) -> Option<f64> {
    match value.and_then(Value::as_f64) {
        Some(number) if number >= 0.0 => Some(number),
        Some(_) => {
            ctx.report(path, "must not be negative");
            None
        }
        None => {
            ctx.report(path, "missing or not a number");
            None
        }
    }
}

/// Absent is fine (`false`); present-but-not-a-bool is a violation.
fn optional_bool(value: Option<&Value>, path: &str, ctx: &mut Context) -> Option<bool> {
    match value {
        None => Some(false),
        Some(raw) => match raw.as_bool() {
            Some(flag) => Some(flag),
            None => {
                ctx.report(path, "must be a boolean");
                None
            }
        },
    }
}

/// Absent is fine (`None`); present must be a positive number.
///
/// The outer `Option` is the parse outcome, the inner one the field itself.
fn optional_positive(value: Option<&Value>, path: &str, ctx: &mut Context) -> Option<Option<f64>> {
    match value {
        None => Some(None),
        Some(raw) => match raw.as_f64() {
            Some(number) if number > 0.0 => Some(Some(number)),
            Some(_) => {
                ctx.report(path, "must be positive");
                None
            }
            None => {
                ctx.report(path, "must be a number");
                None
            }
        },
    }
}

fn reward_categories(value: Option<&Value>, path: &str, ctx: &mut Context) -> Option<Vec<String>> {
    let Some(items) = value.and_then(Value::as_array) else {
        ctx.report(format!("{path}.categories"), "expected an array");
        return None;
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(id) if !id.is_empty() => out.push(id.to_string()),
            _ => {
                ctx.report(
                    format!("{path}.categories[{index}]"),
                    "must be a non-empty category id",
                );
                return None;
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::export_settings;

    fn valid_settings() -> Value {
        json!({
            "version": 1,
            "categories": [
                { "id": "groceries", "label": "Groceries" },
                { "id": "drugstore", "label": "Drugstore" },
            ],
            "methods": [
                {
                    "id": "card-a",
                    "name": "Card A",
                    "rewards": [
                        {
                            "id": "r1",
                            "type": "cashback",
                            "value": 0.04,
                            "isFixed": false,
                            "minSpend": 0.0,
                            "categories": ["groceries"],
                        },
                        {
                            "id": "r2",
                            "type": "points",
                            "value": 0.0,
                            "categories": [],
                            "earnRate": 30.0,
                            "redemptionRate": 17.0,
                        },
                    ],
                },
            ],
        })
    }

    #[test]
    fn accepts_a_valid_snapshot() {
        let settings = import_settings(&valid_settings()).unwrap();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.categories.len(), 2);
        assert_eq!(settings.methods[0].rewards.len(), 2);
        assert_eq!(settings.methods[0].rewards[1].earn_rate, Some(30.0));
    }

    #[test]
    fn defaults_is_fixed_and_min_spend() {
        let mut value = valid_settings();
        let reward = &mut value["methods"][0]["rewards"][0];
        reward.as_object_mut().unwrap().remove("isFixed");
        reward.as_object_mut().unwrap().remove("minSpend");

        let settings = import_settings(&value).unwrap();
        let reward = &settings.methods[0].rewards[0];
        assert!(!reward.is_fixed);
        assert_eq!(reward.min_spend, 0.0);
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut value = valid_settings();
        value["version"] = json!(2);

        let err = import_settings(&value).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "version");
        assert!(err.violations[0].message.contains("unsupported"));
    }

    #[test]
    fn rejects_points_reward_without_rates() {
        let mut value = valid_settings();
        let reward = &mut value["methods"][0]["rewards"][1];
        reward.as_object_mut().unwrap().remove("earnRate");
        reward.as_object_mut().unwrap().remove("redemptionRate");

        let err = import_settings(&value).unwrap_err();
        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"methods[0].rewards[1].earnRate"));
        assert!(paths.contains(&"methods[0].rewards[1].redemptionRate"));
    }

    #[test]
    fn collects_every_violation_instead_of_failing_fast() {
        let value = json!({
            "version": 3,
            "categories": [{ "id": "", "label": "Broken" }],
            "methods": [{ "id": "m", "name": "", "rewards": [
                { "id": "r", "type": "spacebux", "value": -1.0, "categories": [] },
            ]}],
        });

        let err = import_settings(&value).unwrap_err();
        assert!(err.violations.len() >= 4);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut value = valid_settings();
        value["categories"][1]["id"] = json!("groceries");

        let err = import_settings(&value).unwrap_err();
        assert_eq!(err.violations[0].path, "categories[1].id");
    }

    #[test]
    fn round_trips_an_exported_snapshot() {
        let exported = import_settings(&valid_settings()).unwrap();
        let again = export_settings(exported.categories.clone(), exported.methods.clone());
        let raw = serde_json::to_value(&again).unwrap();

        assert_eq!(import_settings(&raw).unwrap(), exported);
    }
}
