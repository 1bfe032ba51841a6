//! Spending categories a reward rule can be scoped to.

use serde::{Deserialize, Serialize};

/// A user-defined spending category.
///
/// Identity is `id`; `label` is the only field that may change over the
/// category's lifetime. Removing a category cascades into the reward rules
/// that reference it (see `engine`), never into the rewards themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
