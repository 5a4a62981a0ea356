//! Utility to recalculate targets for every profile with complete metrics
//! Usage: cargo run --bin recalculate_profiles

use std::path::PathBuf;

use macroplan::models::Profile;
use macroplan::nutrition;

fn get_database_path() -> PathBuf {
    std::env::var("MACROPLAN_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("macroplan.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = macroplan::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        macroplan::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let (recalculated, skipped) = database.with_conn(|conn| {
        let profiles = Profile::list(conn, i64::MAX, 0)?;
        let mut recalculated = 0;
        let mut skipped = 0;

        for mut profile in profiles {
            if profile.has_required_inputs() {
                nutrition::update_profile(&mut profile);
                profile.persist_targets(conn)?;
                println!(
                    "  {} (id {}): {} kcal",
                    profile.name,
                    profile.id,
                    profile
                        .target_calories
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                recalculated += 1;
            } else {
                println!(
                    "  {} (id {}): skipped, missing {}",
                    profile.name,
                    profile.id,
                    profile.missing_inputs().join(", ")
                );
                skipped += 1;
            }
        }

        Ok((recalculated, skipped))
    })?;

    println!("Recalculated {} profile(s), skipped {}", recalculated, skipped);

    Ok(())
}
