//! Core domain types for the macrolog nutrition tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Macro bundles (calories, protein, carbs, fat, water)
//! - Food items and their provenance
//! - Log entries and daily summaries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Macro Types
// ============================================================================

/// A bundle of macronutrient quantities.
///
/// All fields are non-negative; zero is valid and there is no upper bound.
/// A bundle is immutable once attached to a [`FoodItem`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroBundle {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub water_ml: f64,
}

impl MacroBundle {
    /// A bundle with every dimension at zero.
    pub const ZERO: MacroBundle = MacroBundle {
        calories: 0.0,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 0.0,
        water_ml: 0.0,
    };

    /// Component-wise sum of two bundles.
    pub fn add(&self, other: &MacroBundle) -> MacroBundle {
        MacroBundle {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
            water_ml: self.water_ml + other.water_ml,
        }
    }

    /// Remaining allowance against a goal bundle, floored at zero in every
    /// dimension. Exceeding a goal reports zero remaining, never a negative.
    pub fn remaining_from(&self, goal: &MacroBundle) -> MacroBundle {
        MacroBundle {
            calories: (goal.calories - self.calories).max(0.0),
            protein_g: (goal.protein_g - self.protein_g).max(0.0),
            carbs_g: (goal.carbs_g - self.carbs_g).max(0.0),
            fat_g: (goal.fat_g - self.fat_g).max(0.0),
            water_ml: (goal.water_ml - self.water_ml).max(0.0),
        }
    }
}

/// Per-day macro targets. Replaced wholesale when the user edits settings,
/// never partially mutated by the ledger.
pub type DailyGoals = MacroBundle;

// ============================================================================
// Food Types
// ============================================================================

/// A food definition with its per-serving macros.
///
/// Produced by the acquisition gateway (search or barcode lookup) or by the
/// local [`FoodItem::custom`] constructor. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub serving_size: String,
    pub macros: MacroBundle,
    #[serde(default)]
    pub is_custom: bool,
}

impl FoodItem {
    /// Build a user-authored food. Deterministic and local; requires no
    /// external call. Absent macro values default to zero via
    /// [`MacroBundle::default`] on the caller's side.
    pub fn custom(name: impl Into<String>, serving_size: impl Into<String>, macros: MacroBundle) -> Self {
        FoodItem {
            id: Uuid::new_v4(),
            name: name.into(),
            brand: None,
            serving_size: serving_size.into(),
            macros,
            is_custom: true,
        }
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// A single logged serving of food.
///
/// The entry owns a snapshot of the food's macros at logging time; later
/// edits to a food definition never retroactively change past entries.
/// Created only by [`crate::DailyLedger::add_entry`] and destroyed only by
/// [`crate::DailyLedger::remove_entry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub food: FoodItem,
    pub logged_at: DateTime<Utc>,
    /// Calendar date of `logged_at`, fixed at creation time.
    pub date: NaiveDate,
}

/// Derived view of one day: consumed totals plus the entries behind them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub consumed: MacroBundle,
    pub entries: Vec<LogEntry>,
    pub water_ml: f64,
}
