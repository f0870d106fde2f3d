//! Goal Tracker demo backend
//!
//! An in-memory implementation of every API port, so the application can run
//! without a server. Records are owned by a single [`DemoStore`]; callers only
//! ever receive copies.

pub mod config;
pub mod seed;
mod state;
pub mod store;
pub mod token;

pub use config::DemoConfig;
pub use store::DemoStore;
