//! Profile MCP Tools
//!
//! Tools for managing nutrition profiles and their derived targets.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, ProfileCreate, ProfileUpdate};
use crate::nutrition::{
    self, activity_multiplier, calculate_bmr, calculate_macros, calculate_target_calories,
    calculate_tdee, round1, ActivityLevel, MacroSplit, ACTIVITY_LEVELS,
};

/// Stored macro targets; None until the profile has been calculated
#[derive(Debug, Serialize)]
pub struct MacroTargets {
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fats_g: Option<f64>,
}

/// Physical stats section of a profile detail
#[derive(Debug, Serialize)]
pub struct PhysicalStats {
    pub weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

/// Full profile detail: settings, stored targets, and physical stats
#[derive(Debug, Serialize)]
pub struct ProfileDetail {
    pub profile_id: i64,
    pub name: String,
    pub goal: String,
    pub activity_level: String,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub target_calories: Option<f64>,
    pub target_macros: MacroTargets,
    pub physical_stats: PhysicalStats,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Profile> for ProfileDetail {
    fn from(profile: Profile) -> Self {
        Self {
            profile_id: profile.id,
            name: profile.name,
            goal: profile.goal,
            activity_level: profile.activity_level,
            bmr: profile.bmr,
            tdee: profile.tdee,
            target_calories: profile.target_calories,
            target_macros: MacroTargets {
                protein_g: profile.target_protein_g,
                carbs_g: profile.target_carbs_g,
                fats_g: profile.target_fats_g,
            },
            physical_stats: PhysicalStats {
                weight_kg: profile.weight_kg,
                target_weight_kg: profile.target_weight_kg,
                height_cm: profile.height_cm,
                age: profile.age,
                gender: profile.gender,
            },
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Profile summary for listing
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub id: i64,
    pub name: String,
    pub goal: String,
    pub activity_level: String,
    pub target_calories: Option<f64>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            goal: profile.goal.clone(),
            activity_level: profile.activity_level.clone(),
            target_calories: profile.target_calories,
        }
    }
}

/// Response for list_profiles
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileSummary>,
    pub total: usize,
}

/// Response for delete_profile
#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    pub success: bool,
    pub message: String,
}

/// Response for a successful recalculation
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub message: String,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub target_calories: Option<f64>,
    pub target_macros: MacroTargets,
}

/// Outcome of recalculate_profile, mapped to a client error by the caller
/// where appropriate
#[derive(Debug)]
pub enum RecalculateOutcome {
    Updated(RecalculateResponse),
    NotFound,
    MissingInputs(Vec<&'static str>),
}

/// Input echo section of calculate_targets
#[derive(Debug, Serialize)]
pub struct CalculateInputs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
}

/// Computed values section of calculate_targets
#[derive(Debug, Serialize)]
pub struct CalculateResults {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub target_macros: MacroSplit,
}

/// Formula echo section of calculate_targets
#[derive(Debug, Serialize)]
pub struct FormulasUsed {
    pub bmr: String,
    pub tdee: String,
    pub macros: String,
}

/// Response for calculate_targets
#[derive(Debug, Serialize)]
pub struct CalculateTargetsResponse {
    pub inputs: CalculateInputs,
    pub results: CalculateResults,
    pub formulas_used: FormulasUsed,
}

/// Create a profile; derives targets immediately when the required metrics
/// are supplied up front
pub fn create_profile(db: &Database, data: ProfileCreate) -> Result<ProfileDetail, String> {
    let profile = db
        .with_conn(|conn| {
            let mut profile = Profile::create(conn, &data)?;
            if profile.has_required_inputs() {
                nutrition::update_profile(&mut profile);
                profile.persist_targets(conn)?;
            }
            Ok(profile)
        })
        .map_err(|e| e.to_string())?;

    Ok(ProfileDetail::from(profile))
}

/// Get a profile's stored targets and physical stats (no computation)
pub fn get_profile(db: &Database, id: i64) -> Result<Option<ProfileDetail>, String> {
    let profile = db
        .with_conn(|conn| Profile::get_by_id(conn, id))
        .map_err(|e| e.to_string())?;
    Ok(profile.map(ProfileDetail::from))
}

/// List profiles with pagination
pub fn list_profiles(db: &Database, limit: i64, offset: i64) -> Result<ListProfilesResponse, String> {
    let profiles = db
        .with_conn(|conn| Profile::list(conn, limit, offset))
        .map_err(|e| e.to_string())?;

    Ok(ListProfilesResponse {
        total: profiles.len(),
        profiles: profiles.iter().map(ProfileSummary::from).collect(),
    })
}

/// Update a profile's metrics and settings
///
/// If the update touches any of weight, height, age, or gender, the derived
/// targets are recomputed in the same operation. When required inputs are
/// still incomplete the recomputation is skipped silently and previously
/// stored targets are left as they were.
pub fn update_body_metrics(
    db: &Database,
    id: i64,
    data: ProfileUpdate,
) -> Result<Option<ProfileDetail>, String> {
    let recalculate = data.touches_required_inputs();

    let updated = db
        .with_conn(|conn| {
            let updated = Profile::update(conn, id, &data)?;
            match updated {
                Some(mut profile) if recalculate => {
                    nutrition::update_profile(&mut profile);
                    profile.persist_targets(conn)?;
                    Profile::get_by_id(conn, profile.id)
                }
                other => Ok(other),
            }
        })
        .map_err(|e| e.to_string())?;

    Ok(updated.map(ProfileDetail::from))
}

/// Recalculate a profile's targets from its stored metrics
///
/// Unlike the calculator's silent short-circuit, missing required inputs are
/// reported here so the caller can surface a client error.
pub fn recalculate_profile(db: &Database, id: i64) -> Result<RecalculateOutcome, String> {
    db.with_conn(|conn| {
        let mut profile = match Profile::get_by_id(conn, id)? {
            Some(profile) => profile,
            None => return Ok(RecalculateOutcome::NotFound),
        };

        let missing = profile.missing_inputs();
        if !missing.is_empty() {
            return Ok(RecalculateOutcome::MissingInputs(missing));
        }

        nutrition::update_profile(&mut profile);
        profile.persist_targets(conn)?;

        Ok(RecalculateOutcome::Updated(RecalculateResponse {
            message: "Nutrition profile updated successfully".to_string(),
            bmr: profile.bmr,
            tdee: profile.tdee,
            target_calories: profile.target_calories,
            target_macros: MacroTargets {
                protein_g: profile.target_protein_g,
                carbs_g: profile.target_carbs_g,
                fats_g: profile.target_fats_g,
            },
        }))
    })
    .map_err(|e| e.to_string())
}

/// Delete a profile
pub fn delete_profile(db: &Database, id: i64) -> Result<DeleteProfileResponse, String> {
    let deleted = db
        .with_conn(|conn| Profile::delete(conn, id))
        .map_err(|e| e.to_string())?;

    Ok(DeleteProfileResponse {
        success: deleted,
        message: if deleted {
            format!("Profile {} deleted", id)
        } else {
            format!("Profile {} not found", id)
        },
    })
}

/// Compute targets for ad-hoc metrics without persisting anything
///
/// This stateless path validates gender and activity level strictly, in
/// contrast to the lenient defaults applied when recalculating a stored
/// profile. Err carries a client-facing validation message.
pub fn calculate_targets(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> Result<CalculateTargetsResponse, String> {
    let gender_lower = gender.to_lowercase();
    if gender_lower != "male" && gender_lower != "female" {
        return Err("Gender must be 'male' or 'female'".to_string());
    }

    if ActivityLevel::from_str(activity_level).is_none() {
        let levels: Vec<&str> = ACTIVITY_LEVELS.iter().map(|l| l.as_str()).collect();
        return Err(format!("Activity level must be one of: {}", levels.join(", ")));
    }

    let bmr = calculate_bmr(weight_kg, height_cm, age, gender);
    let tdee = calculate_tdee(bmr, activity_level);
    let target_calories = calculate_target_calories(tdee, goal, weight_kg, weight_kg);
    let target_macros = calculate_macros(target_calories, goal);

    Ok(CalculateTargetsResponse {
        inputs: CalculateInputs {
            weight_kg,
            height_cm,
            age,
            gender: gender.to_string(),
            activity_level: activity_level.to_string(),
            goal: goal.to_string(),
        },
        results: CalculateResults {
            bmr: round1(bmr),
            tdee: round1(tdee),
            target_calories: round1(target_calories),
            target_macros,
        },
        formulas_used: FormulasUsed {
            bmr: "Mifflin-St Jeor Equation".to_string(),
            tdee: format!(
                "BMR x {} (activity multiplier)",
                activity_multiplier(activity_level)
            ),
            macros: format!("Based on {} goal ratios", goal),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("macroplan_test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        (dir, db)
    }

    fn complete_metrics(name: &str) -> ProfileCreate {
        ProfileCreate {
            name: name.to_string(),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age: Some(25),
            gender: Some("male".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_profile_with_complete_metrics_derives_targets() {
        let (_dir, db) = test_db();
        let detail = create_profile(&db, complete_metrics("Ada")).unwrap();

        assert_eq!(detail.bmr, Some(1673.8));
        assert_eq!(detail.tdee, Some(2594.3));
        assert_eq!(detail.target_calories, Some(2594.3));
        assert_eq!(detail.target_macros.protein_g, Some(162.1));

        // Targets were persisted, not just returned
        let stored = get_profile(&db, detail.profile_id).unwrap().unwrap();
        assert_eq!(stored.target_calories, Some(2594.3));
    }

    #[test]
    fn test_create_profile_incomplete_leaves_targets_unset() {
        let (_dir, db) = test_db();
        let mut data = complete_metrics("Ada");
        data.gender = None;
        let detail = create_profile(&db, data).unwrap();

        assert_eq!(detail.bmr, None);
        assert_eq!(detail.target_calories, None);
    }

    #[test]
    fn test_update_body_metrics_recomputes_on_required_input_change() {
        let (_dir, db) = test_db();
        let mut data = complete_metrics("Ada");
        data.gender = None;
        let created = create_profile(&db, data).unwrap();
        assert_eq!(created.target_calories, None);

        // Supplying the fourth required metric triggers derivation
        let updated = update_body_metrics(
            &db,
            created.profile_id,
            ProfileUpdate {
                gender: Some("male".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.bmr, Some(1673.8));
        assert_eq!(updated.target_calories, Some(2594.3));
        assert_eq!(updated.target_macros.protein_g, Some(162.1));
    }

    #[test]
    fn test_update_settings_only_does_not_recompute() {
        let (_dir, db) = test_db();
        let created = create_profile(&db, complete_metrics("Ada")).unwrap();
        assert_eq!(created.target_calories, Some(2594.3));

        // Changing only the goal leaves stored targets untouched
        let updated = update_body_metrics(
            &db,
            created.profile_id,
            ProfileUpdate {
                goal: Some("bulk".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.goal, "bulk");
        assert_eq!(updated.target_calories, Some(2594.3));

        // An explicit recalculation picks up the new goal: 70 kg bulk adds
        // clamp(350, 300, 500) = 350 kcal
        let outcome = recalculate_profile(&db, created.profile_id).unwrap();
        match outcome {
            RecalculateOutcome::Updated(response) => {
                assert_eq!(response.target_calories, Some(2944.3));
            }
            other => panic!("expected Updated, got {:?}", other),
        }
    }

    #[test]
    fn test_recalculate_profile_reports_missing_inputs() {
        let (_dir, db) = test_db();
        let mut data = complete_metrics("Ada");
        data.age = None;
        let created = create_profile(&db, data).unwrap();

        let outcome = recalculate_profile(&db, created.profile_id).unwrap();
        match outcome {
            RecalculateOutcome::MissingInputs(missing) => assert_eq!(missing, vec!["age"]),
            other => panic!("expected MissingInputs, got {:?}", other),
        }
    }

    #[test]
    fn test_calculate_targets_rejects_unknown_gender() {
        let result = calculate_targets(70.0, 175.0, 25, "unknown", "moderate", "maintain");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Gender"));
    }

    #[test]
    fn test_calculate_targets_rejects_unknown_activity_level() {
        // The stored-profile path defaults unknown levels to moderate; this
        // stateless path rejects them instead
        let result = calculate_targets(70.0, 175.0, 25, "male", "extreme", "maintain");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Activity level"));
        // Level names are exact, so mixed case is rejected too
        let result = calculate_targets(70.0, 175.0, 25, "male", "Sedentary", "maintain");
        assert!(result.is_err());
    }

    #[test]
    fn test_calculate_targets_gender_case_insensitive() {
        let result = calculate_targets(70.0, 175.0, 25, "FEMALE", "moderate", "maintain");
        assert!(result.is_ok());
    }

    #[test]
    fn test_calculate_targets_worked_example() {
        let response = calculate_targets(70.0, 175.0, 25, "male", "moderate", "maintain").unwrap();
        assert_eq!(response.results.bmr, 1673.8);
        assert_eq!(response.results.tdee, 2594.3);
        assert_eq!(response.results.target_calories, 2594.3);
        assert_eq!(response.results.target_macros.protein_g, 162.1);
        assert_eq!(response.results.target_macros.carbs_g, 291.9);
        assert_eq!(response.results.target_macros.fats_g, 86.5);
    }

    #[test]
    fn test_calculate_targets_does_not_validate_goal() {
        // Unrecognized goals fall through to maintain, matching the lenient
        // goal handling everywhere else
        let response = calculate_targets(70.0, 175.0, 25, "male", "moderate", "recomp").unwrap();
        assert_eq!(response.results.target_calories, 2594.3);
    }
}
