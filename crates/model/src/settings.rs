//! The transportable configuration snapshot.

use serde::{Deserialize, Serialize};

use crate::{Category, PaymentMethod};

/// The only settings schema version this build reads or writes.
///
/// A decoder must reject every version it does not recognize; there is no
/// silent coercion of newer snapshots.
pub const SETTINGS_VERSION: u32 = 1;

/// Everything needed to move a configuration between devices: the category
/// registry plus every payment method with its reward rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: u32,
    pub categories: Vec<Category>,
    pub methods: Vec<PaymentMethod>,
}

/// Builds a [`Settings`] snapshot from the current state, stamped with
/// [`SETTINGS_VERSION`].
#[must_use]
pub fn export_settings(categories: Vec<Category>, methods: Vec<PaymentMethod>) -> Settings {
    Settings {
        version: SETTINGS_VERSION,
        categories,
        methods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_stamps_current_version() {
        let settings = export_settings(vec![Category::new("groceries", "Groceries")], Vec::new());
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.categories.len(), 1);
        assert!(settings.methods.is_empty());
    }
}
