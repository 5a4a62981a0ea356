//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- Body metrics, activity/goal settings, and the
        -- derived nutrition targets attached to them
        -- ============================================
        CREATE TABLE profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,

            -- Body metrics (nullable until supplied)
            weight_kg REAL,                      -- must be > 0 to be usable
            height_cm REAL,                      -- must be > 0 to be usable
            age INTEGER,                         -- years, must be > 0 to be usable
            gender TEXT,                         -- "male" / "female"

            -- Activity and goal settings
            activity_level TEXT NOT NULL DEFAULT 'moderate',
            goal TEXT NOT NULL DEFAULT 'maintain',
            target_weight_kg REAL,               -- optional, defaults to current weight

            -- Derived targets (filled by recalculation, rounded to 1 decimal)
            bmr REAL,
            tdee REAL,
            target_calories REAL,
            target_protein_g REAL,
            target_carbs_g REAL,
            target_fats_g REAL,

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_profiles_name ON profiles(name);
        "#,
    )?;

    Ok(())
}
