pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod projects;
pub mod providers;
pub mod runs;
pub mod session;
pub mod store;

pub use logging::init_tracing;
