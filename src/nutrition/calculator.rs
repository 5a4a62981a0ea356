//! Nutrition target calculator
//!
//! A stateless pipeline of pure functions deriving energy and macronutrient
//! targets from body metrics: BMR (Mifflin-St Jeor), TDEE (activity
//! multiplier), target calories (goal surplus/deficit), and macro grams
//! (4/4/9 kcal per gram). No I/O, no shared state; persistence is the
//! caller's responsibility.

use serde::{Deserialize, Serialize};

use super::levels::{activity_multiplier, Goal};
use crate::models::Profile;

/// Energy density of protein in kcal per gram
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// Energy density of carbohydrates in kcal per gram
pub const CARBS_KCAL_PER_G: f64 = 4.0;
/// Energy density of fat in kcal per gram
pub const FATS_KCAL_PER_G: f64 = 9.0;

/// Minimum daily surplus/deficit in kcal for bulk/cut goals
pub const MIN_CALORIE_ADJUSTMENT: f64 = 300.0;
/// Maximum daily surplus/deficit in kcal for bulk/cut goals
pub const MAX_CALORIE_ADJUSTMENT: f64 = 500.0;

/// Macronutrient targets in grams, each rounded to 1 decimal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

/// Round to 1 decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// Men: 10 x weight(kg) + 6.25 x height(cm) - 5 x age + 5
/// Women: 10 x weight(kg) + 6.25 x height(cm) - 5 x age - 161
///
/// The gender comparison is case-insensitive, and any value other than
/// "male" takes the female branch. This is a deliberate two-way split;
/// gender validation happens at the tool boundary, not here.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: u32, gender: &str) -> f64 {
    let base_bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);

    if gender.eq_ignore_ascii_case("male") {
        base_bmr + 5.0
    } else {
        base_bmr - 161.0
    }
}

/// Calculate Total Daily Energy Expenditure
///
/// BMR scaled by the activity multiplier; unrecognized activity levels
/// fall back to the moderate multiplier.
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> f64 {
    bmr * activity_multiplier(activity_level)
}

/// Calculate target calories from TDEE and goal
///
/// Bulk adds and cut subtracts a surplus/deficit of 5 kcal per kg of current
/// weight, clamped to [300, 500]. Maintain (and any unrecognized goal)
/// returns the TDEE unchanged.
///
/// `target_weight_kg` is accepted for interface compatibility but does not
/// affect the result.
pub fn calculate_target_calories(
    tdee: f64,
    goal: &str,
    current_weight_kg: f64,
    _target_weight_kg: f64,
) -> f64 {
    let adjustment =
        (current_weight_kg * 5.0).clamp(MIN_CALORIE_ADJUSTMENT, MAX_CALORIE_ADJUSTMENT);

    match Goal::from_str(goal) {
        Goal::Bulk => tdee + adjustment,
        Goal::Cut => tdee - adjustment,
        Goal::Maintain => tdee,
    }
}

/// Calculate macronutrient targets in grams for the goal's ratio split
///
/// Grams are derived with the standard 4/4/9 kcal-per-gram constants and
/// rounded to 1 decimal.
pub fn calculate_macros(target_calories: f64, goal: &str) -> MacroSplit {
    let ratios = Goal::from_str(goal).macro_ratios();

    MacroSplit {
        protein_g: round1(target_calories * ratios.protein / PROTEIN_KCAL_PER_G),
        carbs_g: round1(target_calories * ratios.carbs / CARBS_KCAL_PER_G),
        fats_g: round1(target_calories * ratios.fats / FATS_KCAL_PER_G),
    }
}

/// Derive and fill a profile's nutrition targets in place
///
/// Runs bmr -> tdee -> target_calories -> macros and stores the results
/// (rounded to 1 decimal) on the profile. If any of weight, height, age, or
/// gender is missing or non-positive, the profile is returned untouched.
/// This short-circuit is deliberate: partial inputs are a no-op here, while
/// the recalculate tool reports them as a client error before calling in.
pub fn update_profile(profile: &mut Profile) {
    let weight_kg = match profile.weight_kg.filter(|w| *w > 0.0) {
        Some(w) => w,
        None => return,
    };
    let height_cm = match profile.height_cm.filter(|h| *h > 0.0) {
        Some(h) => h,
        None => return,
    };
    let age = match profile
        .age
        .filter(|a| *a > 0)
        .and_then(|a| u32::try_from(a).ok())
    {
        Some(a) => a,
        None => return,
    };
    let gender = match profile
        .gender
        .clone()
        .filter(|g| !g.trim().is_empty())
    {
        Some(g) => g,
        None => return,
    };

    let bmr = calculate_bmr(weight_kg, height_cm, age, &gender);
    let tdee = calculate_tdee(bmr, &profile.activity_level);
    let target_weight_kg = profile.target_weight_kg.unwrap_or(weight_kg);
    let target_calories =
        calculate_target_calories(tdee, &profile.goal, weight_kg, target_weight_kg);
    let macros = calculate_macros(target_calories, &profile.goal);

    profile.bmr = Some(round1(bmr));
    profile.tdee = Some(round1(tdee));
    profile.target_calories = Some(round1(target_calories));
    profile.target_protein_g = Some(macros.protein_g);
    profile.target_carbs_g = Some(macros.carbs_g);
    profile.target_fats_g = Some(macros.fats_g);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_profile() -> Profile {
        let mut profile = Profile::empty("Test");
        profile.weight_kg = Some(70.0);
        profile.height_cm = Some(175.0);
        profile.age = Some(25);
        profile.gender = Some("male".to_string());
        profile
    }

    #[test]
    fn test_bmr_male_female_offset() {
        // The male and female branches differ by exactly 166 kcal (+5 vs -161)
        let male = calculate_bmr(70.0, 175.0, 25, "male");
        let female = calculate_bmr(70.0, 175.0, 25, "female");
        assert_eq!(male - female, 166.0);

        let male = calculate_bmr(93.5, 162.0, 48, "male");
        let female = calculate_bmr(93.5, 162.0, 48, "female");
        assert_eq!(male - female, 166.0);
    }

    #[test]
    fn test_bmr_gender_case_insensitive() {
        assert_eq!(
            calculate_bmr(70.0, 175.0, 25, "MALE"),
            calculate_bmr(70.0, 175.0, 25, "male")
        );
        // Anything other than "male" takes the female branch
        assert_eq!(
            calculate_bmr(70.0, 175.0, 25, "other"),
            calculate_bmr(70.0, 175.0, 25, "female")
        );
    }

    #[test]
    fn test_tdee_sedentary_spot_value() {
        assert!((calculate_tdee(100.0, "sedentary") - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_tdee_linear_in_bmr() {
        let base = calculate_tdee(1000.0, "active");
        assert!((calculate_tdee(2000.0, "active") - 2.0 * base).abs() < 0.001);
        assert!((calculate_tdee(3000.0, "active") - 3.0 * base).abs() < 0.001);
    }

    #[test]
    fn test_tdee_unknown_level_is_moderate() {
        assert_eq!(
            calculate_tdee(1673.75, "extreme"),
            calculate_tdee(1673.75, "moderate")
        );
    }

    #[test]
    fn test_target_calories_clamp_floor() {
        // 50 kg x 5 = 250, clamped up to 300
        let result = calculate_target_calories(2000.0, "bulk", 50.0, 60.0);
        assert!((result - 2300.0).abs() < 0.001);
        let result = calculate_target_calories(2000.0, "cut", 50.0, 45.0);
        assert!((result - 1700.0).abs() < 0.001);
    }

    #[test]
    fn test_target_calories_clamp_ceiling() {
        // 200 kg x 5 = 1000, clamped down to 500
        let result = calculate_target_calories(3000.0, "bulk", 200.0, 180.0);
        assert!((result - 3500.0).abs() < 0.001);
        let result = calculate_target_calories(3000.0, "cut", 200.0, 180.0);
        assert!((result - 2500.0).abs() < 0.001);
    }

    #[test]
    fn test_target_calories_maintain_passthrough() {
        assert_eq!(calculate_target_calories(2594.3125, "maintain", 70.0, 70.0), 2594.3125);
        // Unrecognized goals behave like maintain
        assert_eq!(calculate_target_calories(2594.3125, "recomp", 70.0, 70.0), 2594.3125);
    }

    #[test]
    fn test_target_weight_has_no_effect() {
        let a = calculate_target_calories(2500.0, "bulk", 80.0, 70.0);
        let b = calculate_target_calories(2500.0, "bulk", 80.0, 95.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_macros_worked_example() {
        // maintain split of 2594.3125 kcal: 25% protein, 45% carbs, 30% fats
        let macros = calculate_macros(2594.3125, "maintain");
        assert!((macros.protein_g - 162.1).abs() < 0.001);
        assert!((macros.carbs_g - 291.9).abs() < 0.001);
        assert!((macros.fats_g - 86.5).abs() < 0.001);
    }

    #[test]
    fn test_update_profile_end_to_end() {
        // 70 kg / 175 cm / 25 y male, moderate activity, maintain goal
        let mut profile = metrics_profile();
        update_profile(&mut profile);

        assert_eq!(profile.bmr, Some(1673.8));
        assert_eq!(profile.tdee, Some(2594.3));
        assert_eq!(profile.target_calories, Some(2594.3));
        assert_eq!(profile.target_protein_g, Some(162.1));
        assert_eq!(profile.target_carbs_g, Some(291.9));
        assert_eq!(profile.target_fats_g, Some(86.5));
    }

    #[test]
    fn test_update_profile_missing_input_is_noop() {
        for missing in ["weight", "height", "age", "gender"] {
            let mut profile = metrics_profile();
            match missing {
                "weight" => profile.weight_kg = None,
                "height" => profile.height_cm = None,
                "age" => profile.age = None,
                _ => profile.gender = None,
            }
            let before = profile.clone();
            update_profile(&mut profile);
            assert_eq!(profile, before, "missing {} should be a no-op", missing);
        }
    }

    #[test]
    fn test_update_profile_zero_input_is_noop() {
        let mut profile = metrics_profile();
        profile.weight_kg = Some(0.0);
        let before = profile.clone();
        update_profile(&mut profile);
        assert_eq!(profile, before);
    }

    #[test]
    fn test_update_profile_out_of_range_age_is_noop() {
        // An age beyond u32 range must take the guard, not wrap around
        let mut profile = metrics_profile();
        profile.age = Some(i64::from(u32::MAX) + 1);
        let before = profile.clone();
        update_profile(&mut profile);
        assert_eq!(profile, before);
    }

    #[test]
    fn test_update_profile_unknown_activity_level() {
        let mut extreme = metrics_profile();
        extreme.activity_level = "extreme".to_string();
        let mut moderate = metrics_profile();
        moderate.activity_level = "moderate".to_string();

        update_profile(&mut extreme);
        update_profile(&mut moderate);

        assert_eq!(extreme.tdee, moderate.tdee);
        assert_eq!(extreme.target_calories, moderate.target_calories);
    }
}
