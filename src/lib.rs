pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use server::Server;
