//! Platform abstraction layer
//!
//! Browser-only collaborators:
//! - HTTP leaderboard reporter (`fetch`)
//!
//! Everything here compiles to nothing on native targets; the simulation
//! never depends on it.

#[cfg(target_arch = "wasm32")]
pub mod http;

#[cfg(target_arch = "wasm32")]
pub use http::FetchReporter;
