//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `planner_core` linkage without any UI runtime.
//! - Optionally report stored collection sizes for a planner database.
//! - Start file logging when `PLANNER_LOG_DIR` is set.

use planner_core::db::open_db;
use planner_core::logging::LOG_DIR_ENV;
use planner_core::{init_logging_with, LoggingConfig, PlanningRepository, SqlitePlanningRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    if std::env::var_os(LOG_DIR_ENV).is_some() {
        if let Err(err) = LoggingConfig::from_env().and_then(|config| init_logging_with(&config)) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("planner_core ping={}", planner_core::ping());
    println!("planner_core version={}", planner_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    match SqlitePlanningRepository::new(&conn).collection_counts() {
        Ok(counts) => {
            for (key, count) in counts {
                println!("{}={count}", key.as_str());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to read collections: {err}");
            ExitCode::FAILURE
        }
    }
}
