//! Reward evaluation and catalog maintenance.
//!
//! Everything in this crate is a pure function over the shared data model:
//! inputs are taken by reference, outputs are new values, and nothing is
//! mutated in place. The surrounding application owns the configuration and
//! decides when to persist or re-render.

pub use error::EngineError;
pub use evaluation::{RewardResult, best, calculate, describe};

mod error;
mod evaluation;
pub mod presets;
pub mod store;

type ResultEngine<T> = Result<T, EngineError>;
