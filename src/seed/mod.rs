//! Seed command handlers.

mod logging;
mod run;

pub use logging::mask_connection_password;
pub use run::{run_check, run_estimate, run_seed};
