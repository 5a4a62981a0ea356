//! Utility to create or update a profile's body metrics from the command line
//! Usage: cargo run --bin set_body_metrics -- <name> <weight_kg> <height_cm> <age> <gender> [activity_level] [goal]

use std::path::PathBuf;

use macroplan::models::{Profile, ProfileCreate, ProfileUpdate};
use macroplan::nutrition;

fn get_database_path() -> PathBuf {
    std::env::var("MACROPLAN_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("macroplan.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 6 {
        eprintln!(
            "Usage: {} <name> <weight_kg> <height_cm> <age> <gender> [activity_level] [goal]",
            args[0]
        );
        std::process::exit(1);
    }

    let name = &args[1];
    let weight_kg: f64 = args[2].parse()?;
    let height_cm: f64 = args[3].parse()?;
    let age: i64 = args[4].parse()?;
    let gender = &args[5];
    let activity_level = args.get(6).cloned();
    let goal = args.get(7).cloned();

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = macroplan::db::Database::new(&db_path)?;

    // Run migrations
    database.with_conn(|conn| {
        macroplan::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    database.with_conn(|conn| {
        // Create or update by name
        let mut profile = match Profile::get_by_name(conn, name)? {
            Some(existing) => {
                let update = ProfileUpdate {
                    weight_kg: Some(weight_kg),
                    height_cm: Some(height_cm),
                    age: Some(age),
                    gender: Some(gender.clone()),
                    activity_level: activity_level.clone(),
                    goal: goal.clone(),
                    ..Default::default()
                };
                Profile::update(conn, existing.id, &update)?.unwrap_or(existing)
            }
            None => Profile::create(
                conn,
                &ProfileCreate {
                    name: name.clone(),
                    weight_kg: Some(weight_kg),
                    height_cm: Some(height_cm),
                    age: Some(age),
                    gender: Some(gender.clone()),
                    activity_level,
                    goal,
                    target_weight_kg: None,
                },
            )?,
        };

        nutrition::update_profile(&mut profile);
        profile.persist_targets(conn)?;

        println!("Profile '{}' (id {}) saved:", profile.name, profile.id);
        println!("  BMR: {:?}", profile.bmr);
        println!("  TDEE: {:?}", profile.tdee);
        println!("  Target calories: {:?}", profile.target_calories);
        println!(
            "  Macros: {:?}g protein / {:?}g carbs / {:?}g fats",
            profile.target_protein_g, profile.target_carbs_g, profile.target_fats_g
        );
        Ok(())
    })?;

    Ok(())
}
