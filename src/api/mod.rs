pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
pub mod state;

pub use services::configure_routes;
pub use state::AppState;
