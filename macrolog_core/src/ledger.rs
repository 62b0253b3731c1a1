//! The daily nutrition ledger.
//!
//! Owns the set of log entries plus a per-date water counter and answers
//! every derived-state question the dashboard asks: per-date totals,
//! remaining-vs-goal, and the day's entries in insertion order.
//!
//! Totals are always recomputed by folding over the current entry set;
//! there is no cached accumulator that can drift from the underlying list.
//! All operations are synchronous and infallible: the ledger does no I/O.
//! Lifecycle is one ledger per user session, constructed explicitly and
//! handed to the presentation layer.

use crate::{DailyGoals, DailySummary, FoodItem, LogEntry, MacroBundle};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory ledger of logged food entries and water intake.
#[derive(Clone, Debug, Default)]
pub struct DailyLedger {
    entries: Vec<LogEntry>,
    water_ml: HashMap<NaiveDate, f64>,
}

impl DailyLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a food item at the given instant.
    ///
    /// The entry gets a fresh id, the instant's calendar date (computed
    /// once, never recomputed), and an owned snapshot of the food's macros.
    /// Macro values are accepted as-is; there is no validation step. The
    /// entry is visible to all queries immediately.
    pub fn add_entry(&mut self, food: FoodItem, now: DateTime<Utc>) -> LogEntry {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            food,
            logged_at: now,
            date: now.date_naive(),
        };
        tracing::debug!("Logged {} on {}", entry.food.name, entry.date);
        self.entries.push(entry.clone());
        entry
    }

    /// Remove the entry with the given id if present.
    ///
    /// Idempotent: removing an absent id is a no-op, not an error.
    pub fn remove_entry(&mut self, id: Uuid) {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() < before {
            tracing::debug!("Removed entry {}", id);
        }
    }

    /// Sum the macros of every entry logged on the given date.
    ///
    /// Pure query over the current entry set; returns a zero bundle when
    /// no entries match. Water logged via [`log_water`](Self::log_water)
    /// is tracked separately and not included here.
    pub fn totals_for(&self, date: NaiveDate) -> MacroBundle {
        self.entries
            .iter()
            .filter(|e| e.date == date)
            .fold(MacroBundle::ZERO, |acc, e| acc.add(&e.food.macros))
    }

    /// Entries for the given date in insertion order (oldest logged first).
    pub fn entries_for(&self, date: NaiveDate) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.date == date)
    }

    /// Remaining allowance against the goals for the given date, floored
    /// at zero in every macro dimension. Water remaining is measured
    /// against the water counter, not the entry fold.
    pub fn remaining(&self, goals: &DailyGoals, date: NaiveDate) -> MacroBundle {
        let mut consumed = self.totals_for(date);
        consumed.water_ml = self.water_for(date);
        consumed.remaining_from(goals)
    }

    /// Record water intake at the given instant, keyed by its calendar
    /// date. Each day starts from zero.
    pub fn log_water(&mut self, now: DateTime<Utc>, ml: f64) {
        *self.water_ml.entry(now.date_naive()).or_insert(0.0) += ml;
    }

    /// Water consumed on the given date, in milliliters.
    pub fn water_for(&self, date: NaiveDate) -> f64 {
        self.water_ml.get(&date).copied().unwrap_or(0.0)
    }

    /// Snapshot view of one day: totals, entries, and water.
    pub fn summary_for(&self, date: NaiveDate) -> DailySummary {
        DailySummary {
            date,
            consumed: self.totals_for(date),
            entries: self.entries_for(date).cloned().collect(),
            water_ml: self.water_for(date),
        }
    }
}
