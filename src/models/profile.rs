//! Profile model
//!
//! Body metrics, activity/goal settings, and the derived nutrition targets
//! for one tracked person.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A nutrition profile with body metrics and derived targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub activity_level: String,
    pub goal: String,
    pub target_weight_kg: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub target_calories: Option<f64>,
    pub target_protein_g: Option<f64>,
    pub target_carbs_g: Option<f64>,
    pub target_fats_g: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub name: String,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    pub target_weight_kg: Option<f64>,
}

/// Data for updating a profile's metrics and settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub target_weight_kg: Option<f64>,
}

impl ProfileUpdate {
    /// Whether this update touches any of the four inputs the derived
    /// targets depend on (weight, height, age, gender)
    pub fn touches_required_inputs(&self) -> bool {
        self.weight_kg.is_some()
            || self.height_cm.is_some()
            || self.age.is_some()
            || self.gender.is_some()
    }
}

impl Profile {
    /// An unsaved profile with default settings and no metrics
    pub fn empty(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            weight_kg: None,
            height_cm: None,
            age: None,
            gender: None,
            activity_level: "moderate".to_string(),
            goal: "maintain".to_string(),
            target_weight_kg: None,
            bmr: None,
            tdee: None,
            target_calories: None,
            target_protein_g: None,
            target_carbs_g: None,
            target_fats_g: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Whether weight, height, age, and gender are all present and positive
    pub fn has_required_inputs(&self) -> bool {
        self.missing_inputs().is_empty()
    }

    /// Names of the required inputs that are missing or non-positive
    pub fn missing_inputs(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.weight_kg.filter(|w| *w > 0.0).is_none() {
            missing.push("weight_kg");
        }
        if self.height_cm.filter(|h| *h > 0.0).is_none() {
            missing.push("height_cm");
        }
        if self
            .age
            .filter(|a| *a > 0 && u32::try_from(*a).is_ok())
            .is_none()
        {
            missing.push("age");
        }
        if self.gender.as_deref().map(str::trim).filter(|g| !g.is_empty()).is_none() {
            missing.push("gender");
        }
        missing
    }

    /// Create a Profile from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            age: row.get("age")?,
            gender: row.get("gender")?,
            activity_level: row.get("activity_level")?,
            goal: row.get("goal")?,
            target_weight_kg: row.get("target_weight_kg")?,
            bmr: row.get("bmr")?,
            tdee: row.get("tdee")?,
            target_calories: row.get("target_calories")?,
            target_protein_g: row.get("target_protein_g")?,
            target_carbs_g: row.get("target_carbs_g")?,
            target_fats_g: row.get("target_fats_g")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new profile into the database
    pub fn create(conn: &Connection, data: &ProfileCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profiles (
                name, weight_kg, height_cm, age, gender,
                activity_level, goal, target_weight_kg
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.name,
                data.weight_kg,
                data.height_cm,
                data.age,
                data.gender,
                data.activity_level.as_deref().unwrap_or("moderate"),
                data.goal.as_deref().unwrap_or("maintain"),
                data.target_weight_kg,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a profile by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a profile by exact name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE name = ?1 LIMIT 1")?;

        let result = stmt.query_row([name], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List profiles ordered by name
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM profiles ORDER BY name ASC LIMIT ?1 OFFSET ?2"
        )?;

        let profiles = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Update a profile's metrics and settings
    pub fn update(conn: &Connection, id: i64, data: &ProfileUpdate) -> DbResult<Option<Self>> {
        // Build dynamic UPDATE query
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(weight_kg, "weight_kg");
        add_update!(height_cm, "height_cm");
        add_update!(age, "age");
        add_update!(gender, "gender");
        add_update!(activity_level, "activity_level");
        add_update!(goal, "goal");
        add_update!(target_weight_kg, "target_weight_kg");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());
        params_vec.push(Box::new(id));

        let sql = format!(
            "UPDATE profiles SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len()
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Persist this profile's derived targets
    pub fn persist_targets(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            r#"
            UPDATE profiles SET
                bmr = ?1,
                tdee = ?2,
                target_calories = ?3,
                target_protein_g = ?4,
                target_carbs_g = ?5,
                target_fats_g = ?6,
                updated_at = datetime('now')
            WHERE id = ?7
            "#,
            params![
                self.bmr,
                self.tdee,
                self.target_calories,
                self.target_protein_g,
                self.target_carbs_g,
                self.target_fats_g,
                self.id,
            ],
        )?;

        Ok(())
    }

    /// Delete a profile; returns whether a row was removed
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let affected = conn.execute("DELETE FROM profiles WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_applies_defaults() {
        let conn = test_conn();
        let profile = Profile::create(
            &conn,
            &ProfileCreate {
                name: "Ada".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.activity_level, "moderate");
        assert_eq!(profile.goal, "maintain");
        assert!(profile.bmr.is_none());
        assert!(!profile.has_required_inputs());
    }

    #[test]
    fn test_update_and_reload() {
        let conn = test_conn();
        let profile = Profile::create(
            &conn,
            &ProfileCreate {
                name: "Ada".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = Profile::update(
            &conn,
            profile.id,
            &ProfileUpdate {
                weight_kg: Some(70.0),
                height_cm: Some(175.0),
                age: Some(25),
                gender: Some("male".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.weight_kg, Some(70.0));
        assert!(updated.has_required_inputs());
        assert!(updated.missing_inputs().is_empty());
    }

    #[test]
    fn test_missing_inputs_names() {
        let conn = test_conn();
        let profile = Profile::create(
            &conn,
            &ProfileCreate {
                name: "Ada".to_string(),
                weight_kg: Some(70.0),
                age: Some(0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.missing_inputs(), vec!["height_cm", "age", "gender"]);
    }

    #[test]
    fn test_missing_inputs_rejects_out_of_range_age() {
        let conn = test_conn();
        let profile = Profile::create(
            &conn,
            &ProfileCreate {
                name: "Ada".to_string(),
                weight_kg: Some(70.0),
                height_cm: Some(175.0),
                age: Some(i64::from(u32::MAX) + 1),
                gender: Some("male".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.missing_inputs(), vec!["age"]);
    }

    #[test]
    fn test_persist_targets_roundtrip() {
        let conn = test_conn();
        let mut profile = Profile::create(
            &conn,
            &ProfileCreate {
                name: "Ada".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        profile.bmr = Some(1673.8);
        profile.tdee = Some(2594.3);
        profile.target_calories = Some(2594.3);
        profile.target_protein_g = Some(162.1);
        profile.target_carbs_g = Some(291.9);
        profile.target_fats_g = Some(86.5);
        profile.persist_targets(&conn).unwrap();

        let reloaded = Profile::get_by_id(&conn, profile.id).unwrap().unwrap();
        assert_eq!(reloaded.bmr, Some(1673.8));
        assert_eq!(reloaded.target_fats_g, Some(86.5));
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        let profile = Profile::create(
            &conn,
            &ProfileCreate {
                name: "Ada".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(Profile::delete(&conn, profile.id).unwrap());
        assert!(Profile::get_by_id(&conn, profile.id).unwrap().is_none());
        assert!(!Profile::delete(&conn, profile.id).unwrap());
    }
}
