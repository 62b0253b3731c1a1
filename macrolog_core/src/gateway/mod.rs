//! Gateway capability traits for food acquisition and meal advice.
//!
//! The ledger never talks to the network itself: food candidates arrive
//! through [`FoodSource`] and meal suggestions through [`AdviceSource`],
//! and either can be replaced with a deterministic fake in tests. Gateway
//! failures are recovered behind these traits and surfaced as sentinels
//! (empty result set, not-found, unavailable), never as faults.

use crate::{FoodItem, UserProfile};
use async_trait::async_trait;

pub mod openrouter;

pub use openrouter::OpenRouterGateway;

/// Result of an advice request. The text is opaque prose, displayed
/// verbatim and never parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MealAdvice {
    Suggestions(String),
    Unavailable,
}

/// Supplies food candidates from text search or barcode lookup.
#[async_trait]
pub trait FoodSource: Send + Sync {
    /// Search foods matching a free-text query. Zero results is a valid,
    /// non-error outcome; so is a recovered gateway failure.
    async fn search(&self, query: &str) -> Vec<FoodItem>;

    /// Identify the product behind a barcode. `None` means an explicit
    /// not-found, never an empty-macro item.
    async fn identify_barcode(&self, code: &str) -> Option<FoodItem>;
}

/// Supplies free-text meal suggestions shaped by the user's goals.
#[async_trait]
pub trait AdviceSource: Send + Sync {
    async fn meal_advice(&self, profile: &UserProfile) -> MealAdvice;
}
