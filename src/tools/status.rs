//! MacroPlan Status Tool
//!
//! Provides runtime status information about the MacroPlan service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Profile workflow instructions for AI assistants
pub const PROFILE_INSTRUCTIONS: &str = r#"
# MacroPlan Profile Instructions

This guide explains how to manage nutrition profiles and targets with the
MacroPlan tools.

## Overview

A profile holds a person's body metrics and settings, plus the targets
derived from them:

1. **Body metrics** (required for calculation) - weight_kg, height_cm, age, gender
2. **Settings** - activity_level (default "moderate"), goal (default "maintain"),
   optional target_weight_kg
3. **Derived targets** - bmr, tdee, target_calories, and macro grams
   (protein/carbs/fats), all rounded to 1 decimal

## Typical workflow

1. `create_profile` with a name and whatever metrics are known. If all four
   required metrics are supplied, targets are calculated immediately.
2. `update_body_metrics` as metrics change. Changing weight, height, age, or
   gender recalculates targets automatically.
3. `get_profile` to read stored targets; this never recomputes.
4. `recalculate_profile` to force a recomputation. This fails with a client
   error if any required metric is missing - fill the metrics in first.

## Accepted values

- gender: "male" or "female" (case-insensitive)
- activity_level: sedentary, light, moderate, active, very_active
- goal: bulk (surplus), cut (deficit), maintain (neutral)

Activity level and goal names are exact lowercase; only gender is matched
case-insensitively.

On stored profiles an unrecognized activity_level is treated as moderate and
an unrecognized goal as maintain. The stateless `calculate_targets` tool
instead rejects invalid gender or activity_level outright.

## One-off calculations

Use `calculate_targets` to compute values for arbitrary metrics without
creating or touching any profile. Nothing is persisted.

## Formulas

- BMR: Mifflin-St Jeor (10xW + 6.25xH - 5xA, +5 male / -161 female)
- TDEE: BMR x activity multiplier (1.2 / 1.375 / 1.55 / 1.725 / 1.9)
- Target calories: TDEE +/- clamp(weight x 5, 300, 500) for bulk/cut
- Macros: goal ratio split converted at 4/4/9 kcal per gram
"#;

/// MacroPlan service status
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub server_time: String,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service start time and reports runtime status
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            server_time: chrono::Utc::now().to_rfc3339(),
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
