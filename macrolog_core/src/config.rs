//! Configuration file support for macrolog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/macrolog/config.toml`.

use crate::profile::{ActivityLevel, GoalType, Sex};
use crate::{DailyGoals, Error, Result, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub water: WaterConfig,

    #[serde(default)]
    pub goals: GoalsConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Chat-completion gateway configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Water tracking configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaterConfig {
    /// Milliliters added per logging action
    #[serde(default = "default_water_quantum")]
    pub quantum_ml: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            quantum_ml: default_water_quantum(),
        }
    }
}

/// Default daily macro targets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_calories")]
    pub calories: f64,

    #[serde(default = "default_protein")]
    pub protein_g: f64,

    #[serde(default = "default_carbs")]
    pub carbs_g: f64,

    #[serde(default = "default_fat")]
    pub fat_g: f64,

    #[serde(default = "default_water_goal")]
    pub water_ml: f64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            calories: default_calories(),
            protein_g: default_protein(),
            carbs_g: default_carbs(),
            fat_g: default_fat(),
            water_ml: default_water_goal(),
        }
    }
}

impl GoalsConfig {
    /// Convert the configured targets to a goal bundle
    pub fn to_goals(&self) -> DailyGoals {
        DailyGoals {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            water_ml: self.water_ml,
        }
    }
}

/// User profile configuration (body stats and training goal)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_user_name")]
    pub name: String,

    #[serde(default = "default_weight_kg")]
    pub weight_kg: f64,

    #[serde(default = "default_height_cm")]
    pub height_cm: f64,

    #[serde(default = "default_age")]
    pub age: u32,

    #[serde(default = "default_sex")]
    pub sex: Sex,

    #[serde(default = "default_goal_type")]
    pub goal_type: GoalType,

    #[serde(default = "default_activity_level")]
    pub activity_level: ActivityLevel,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
            weight_kg: default_weight_kg(),
            height_cm: default_height_cm(),
            age: default_age(),
            sex: default_sex(),
            goal_type: default_goal_type(),
            activity_level: default_activity_level(),
        }
    }
}

impl ProfileConfig {
    /// Build the session profile from the configured stats and goals.
    /// BMR and TDEE are recomputed from the body stats.
    pub fn to_profile(&self, macro_goals: DailyGoals) -> UserProfile {
        let mut profile = UserProfile {
            name: self.name.clone(),
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            sex: self.sex.clone(),
            goal_type: self.goal_type.clone(),
            activity_level: self.activity_level.clone(),
            bmr: 0.0,
            tdee: 0.0,
            macro_goals,
        };
        profile.recalculate_energy();
        profile
    }
}

// Default value functions
fn default_user_name() -> String {
    "New User".into()
}

fn default_weight_kg() -> f64 {
    75.0
}

fn default_height_cm() -> f64 {
    175.0
}

fn default_age() -> u32 {
    25
}

fn default_sex() -> Sex {
    Sex::Male
}

fn default_goal_type() -> GoalType {
    GoalType::Maintain
}

fn default_activity_level() -> ActivityLevel {
    ActivityLevel::ModeratelyActive
}

fn default_model() -> String {
    "qwen/qwen3-32b".into()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_water_quantum() -> f64 {
    250.0
}

fn default_calories() -> f64 {
    2500.0
}

fn default_protein() -> f64 {
    180.0
}

fn default_carbs() -> f64 {
    250.0
}

fn default_fat() -> f64 {
    80.0
}

fn default_water_goal() -> f64 {
    3000.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("macrolog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
