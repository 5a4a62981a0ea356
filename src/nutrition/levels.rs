//! Activity levels, goals, and their constant tables
//!
//! Provides the fixed activity-multiplier and macro-ratio tables used by the
//! calculator. The tables are immutable module constants.

use serde::{Deserialize, Serialize};

/// Multiplier applied when the activity level string is unrecognized
/// (the "moderate" multiplier)
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.55;

/// The five recognized activity levels, in ascending order of expenditure
pub const ACTIVITY_LEVELS: [ActivityLevel; 5] = [
    ActivityLevel::Sedentary,
    ActivityLevel::Light,
    ActivityLevel::Moderate,
    ActivityLevel::Active,
    ActivityLevel::VeryActive,
];

/// Activity level for TDEE scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    #[default]
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Hard exercise or physical job
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Strict parse; returns None for unrecognized strings. Level names are
    /// exact (lowercase) — only gender is matched case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    /// TDEE multiplier for this activity level
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Look up the TDEE multiplier for an activity level string
///
/// Unrecognized strings fall back to the moderate multiplier (1.55). This is
/// the calculator's lenient lookup; strict validation happens at the tool
/// boundary where required.
pub fn activity_multiplier(activity_level: &str) -> f64 {
    match ActivityLevel::from_str(activity_level) {
        Some(level) => level.multiplier(),
        None => {
            tracing::warn!(
                "Unknown activity level '{}'. Falling back to moderate multiplier.",
                activity_level
            );
            DEFAULT_ACTIVITY_MULTIPLIER
        }
    }
}

/// Calorie goal, determining surplus/deficit and macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Caloric surplus for muscle gain
    Bulk,
    /// Caloric deficit for weight loss
    Cut,
    /// Caloric balance
    #[default]
    Maintain,
}

/// Macronutrient ratios as fractions of total calories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Bulk => "bulk",
            Goal::Cut => "cut",
            Goal::Maintain => "maintain",
        }
    }

    /// Lenient parse; unrecognized strings map to Maintain. Goal names are
    /// exact (lowercase), so "BULK" behaves as maintain.
    pub fn from_str(s: &str) -> Self {
        match s {
            "bulk" => Goal::Bulk,
            "cut" => Goal::Cut,
            _ => Goal::Maintain,
        }
    }

    /// Macro split for this goal (protein/carbs/fats fractions of calories)
    pub fn macro_ratios(&self) -> MacroRatios {
        match self {
            Goal::Bulk => MacroRatios {
                protein: 0.30,
                carbs: 0.40,
                fats: 0.30,
            },
            Goal::Cut => MacroRatios {
                protein: 0.35,
                carbs: 0.30,
                fats: 0.35,
            },
            Goal::Maintain => MacroRatios {
                protein: 0.25,
                carbs: 0.45,
                fats: 0.30,
            },
        }
    }
}
