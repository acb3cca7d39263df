//! Mode routing
//!
//! - Server mode (HTTP server, the default)
//! - CLI mode (`config-gen`, `reset-password`)

pub mod cli;
pub mod server;

pub use cli::{run_config_gen, run_reset_password};
pub use server::run_server;
