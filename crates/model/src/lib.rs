//! Shared data model for the PayWith configuration.
//!
//! The model is the only coupling point between the reward evaluation engine
//! and the settings codec: both take these value types as input and neither
//! depends on the other. Every type here is a plain immutable snapshot;
//! state changes are expressed as "compute a new collection from the old
//! one" and belong to the caller.

pub use category::Category;
pub use payment_method::PaymentMethod;
pub use reward::{Reward, RewardKind};
pub use settings::{SETTINGS_VERSION, Settings, export_settings};
pub use validate::{ValidationError, Violation, import_settings};

mod category;
mod payment_method;
mod reward;
mod settings;
mod validate;
