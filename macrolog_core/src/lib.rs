#![forbid(unsafe_code)]

//! Core domain model and business logic for the macrolog nutrition tracker.
//!
//! This crate provides:
//! - Domain types (macro bundles, food items, log entries, goals)
//! - The daily ledger (per-date totals, remaining-vs-goal, water counter)
//! - User profile and energy estimation
//! - Gateway traits and the OpenRouter chat-completion gateway
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod profile;
pub mod ledger;
pub mod gateway;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use profile::{ActivityLevel, GoalType, Sex, UserProfile};
pub use ledger::DailyLedger;
pub use gateway::{AdviceSource, FoodSource, MealAdvice, OpenRouterGateway};
pub use config::Config;
