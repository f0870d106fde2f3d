//! Goal Tracker REST client
//!
//! Implements every API port against the real backend. One request per
//! call; failures are turned into [`goaltrack_core::GoalTrackError`] with the
//! server's human-readable message when it sent one.

mod client;
pub mod response;

pub use client::HttpClient;
