pub mod auth_admin;
pub mod config;
pub mod email;
pub mod extract;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod referral;
pub mod routes;
pub mod state;
pub mod store;
pub mod tokens;
pub mod utils;

pub use config::Config;
pub use routes::create_routes;
pub use state::AppState;
