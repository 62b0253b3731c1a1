//! User profile, goals, and energy estimation.
//!
//! The profile owns the daily macro goals the dashboard measures against.
//! BMR uses the Mifflin-St Jeor equation; TDEE applies the standard
//! activity multipliers on top.

use crate::DailyGoals;
use serde::{Deserialize, Serialize};

/// What the user is training toward
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    LoseWeight,
    Maintain,
    GainMuscle,
}

/// Habitual activity level, used for the TDEE multiplier
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
}

impl ActivityLevel {
    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
        }
    }
}

/// Biological sex, as used by the Mifflin-St Jeor equation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// A user's profile and daily macro goals
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub goal_type: GoalType,
    pub activity_level: ActivityLevel,
    pub bmr: f64,
    pub tdee: f64,
    pub macro_goals: DailyGoals,
}

impl UserProfile {
    /// Recompute BMR and TDEE from the current body stats.
    ///
    /// Mifflin-St Jeor: `10*kg + 6.25*cm - 5*age + s` where s is +5 for
    /// males and -161 for females. TDEE = BMR * activity multiplier.
    pub fn recalculate_energy(&mut self) {
        let sex_term = match self.sex {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        };
        self.bmr =
            10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * f64::from(self.age) + sex_term;
        self.tdee = self.bmr * self.activity_level.multiplier();
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        let mut profile = UserProfile {
            name: "New User".into(),
            weight_kg: 75.0,
            height_cm: 175.0,
            age: 25,
            sex: Sex::Male,
            goal_type: GoalType::Maintain,
            activity_level: ActivityLevel::ModeratelyActive,
            bmr: 0.0,
            tdee: 0.0,
            macro_goals: DailyGoals {
                calories: 2500.0,
                protein_g: 180.0,
                carbs_g: 250.0,
                fat_g: 80.0,
                water_ml: 3000.0,
            },
        };
        profile.recalculate_energy();
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_goals() {
        let profile = UserProfile::default();
        assert_eq!(profile.macro_goals.calories, 2500.0);
        assert_eq!(profile.macro_goals.protein_g, 180.0);
        assert_eq!(profile.macro_goals.water_ml, 3000.0);
    }

    #[test]
    fn test_mifflin_st_jeor_male() {
        let mut profile = UserProfile::default();
        profile.recalculate_energy();

        // 10*75 + 6.25*175 - 5*25 + 5
        assert_eq!(profile.bmr, 1723.75);
        assert!((profile.tdee - 1723.75 * 1.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mifflin_st_jeor_female() {
        let mut profile = UserProfile {
            sex: Sex::Female,
            weight_kg: 60.0,
            height_cm: 165.0,
            age: 30,
            ..UserProfile::default()
        };
        profile.recalculate_energy();

        // 10*60 + 6.25*165 - 5*30 - 161
        assert_eq!(profile.bmr, 1320.25);
    }

    #[test]
    fn test_activity_multipliers_ordered() {
        assert!(ActivityLevel::Sedentary.multiplier() < ActivityLevel::LightlyActive.multiplier());
        assert!(
            ActivityLevel::ModeratelyActive.multiplier() < ActivityLevel::VeryActive.multiplier()
        );
    }
}
