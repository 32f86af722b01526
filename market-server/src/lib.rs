//! Market Server - marketplace transaction core
//!
//! The one subsystem of the marketplace with real invariants: the order
//! lifecycle, its milestone sub-workflow, the bidirectional reputation
//! ledger, and the token economy that gates bid placement. Everything else
//! (UI, uploads, settlement, sessions) lives with external collaborators.
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, state, server
//! ├── auth/          # JWT validation, current-user context
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── notify/        # Notification outbox worker
//! ├── services/      # External collaborator stubs (payment link)
//! └── utils/         # Errors, validation, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up process environment: dotenv and logging.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; ignore a missing file
    let _ = dotenv::dotenv();
    init_logger();
    Ok(())
}
