//! Nutrition calculation module
//!
//! Derives energy and macronutrient targets from body metrics.

pub mod calculator;
pub mod levels;

pub use calculator::{
    calculate_bmr, calculate_macros, calculate_target_calories, calculate_tdee, round1,
    update_profile, MacroSplit,
};
pub use levels::{
    activity_multiplier, ActivityLevel, Goal, MacroRatios, ACTIVITY_LEVELS,
    DEFAULT_ACTIVITY_MULTIPLIER,
};
