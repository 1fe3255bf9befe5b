//! Seating Server - seating assignment engine for event planning
//!
//! # Architecture
//!
//! - **Constraint model** (`seating::snapshot`): per-event, per-track
//!   input snapshot for the packer
//! - **Packing algorithm** (`seating::packing`): pure, deterministic
//!   placement of guest groups into tables
//! - **Assignment store** (`seating::storage`): embedded redb seat ledger
//!   with a derived occupant cache
//! - **Recalculation coordinator** (`seating::manager`): per-event
//!   serialization, RSVP policies, change broadcasts
//! - **Directory** (`directory`): guest/table/relation CRUD
//! - **HTTP API** (`api`): RESTful routes
//!
//! # Module layout
//!
//! ```text
//! seating-server/src/
//! ├── core/        # Config, state, server
//! ├── api/         # HTTP routes and handlers
//! ├── seating/     # The engine
//! ├── directory/   # Guest and table CRUD
//! └── utils/       # Errors, logging
//! ```

pub mod api;
pub mod core;
pub mod directory;
pub mod seating;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use seating::{SeatingManager, SeatingStorage};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, read the configuration, and initialize logging
pub fn setup_environment() -> Config {
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    let log_dir = config.log_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    config
}

pub fn print_banner() {
    println!(
        r#"
  ___  ___  __ _| |_(_)_ __   __ _
 / __|/ _ \/ _` | __| | '_ \ / _` |
 \__ \  __/ (_| | |_| | | | | (_| |
 |___/\___|\__,_|\__|_|_| |_|\__, |
                             |___/  v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
