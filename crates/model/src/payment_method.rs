//! Payment instruments and the reward rules they own.

use serde::{Deserialize, Serialize};

use crate::Reward;

/// A named payment option (card, wallet, QR account) with its reward rules.
///
/// The method owns its rewards exclusively; a reward never outlives its
/// method. The order of `rewards` is significant: when two rules score the
/// same, the earlier one wins (see `engine`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub rewards: Vec<Reward>,
}

impl PaymentMethod {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rewards: Vec::new(),
        }
    }
}
