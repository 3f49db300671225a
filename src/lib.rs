//! Kaspa Flap - a gravity-driven ghost arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, game state)
//! - `identifier`: Wallet identifier validation
//! - `leaderboard`: Score submission wire types and paginated leaderboard view
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser-only glue (HTTP score reporter)
//! - `settings`: Player preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod identifier;
pub mod leaderboard;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use identifier::{Identifier, IdentifierError};
pub use leaderboard::{
    LeaderboardEntry, LeaderboardView, ReportError, ScoreReporter, ScoreSubmission,
};
pub use settings::Settings;

/// Game configuration constants
///
/// Spatial values are in pixels at `REFERENCE_HEIGHT` and are scaled by
/// `sim::Layout` to the real surface size.
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Surface height the reference constants below were tuned for
    pub const REFERENCE_HEIGHT: f32 = 800.0;

    /// Character (square) side length
    pub const CHARACTER_SIZE: f32 = 50.0;
    /// Character horizontal position as a fraction of surface width
    pub const CHARACTER_X_FRACTION: f32 = 0.1;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.08;
    /// Velocity set by a flap (negative = upward)
    pub const LIFT: f32 = -4.0;

    /// Obstacle column width
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    /// Height of the passable gap
    pub const GAP_HEIGHT: f32 = 150.0;
    /// Horizontal obstacle speed per tick
    pub const SCROLL_SPEED: f32 = 2.0;
    /// A new obstacle spawns once the newest one is this far from the right edge
    pub const SPAWN_DISTANCE: f32 = 300.0;

    /// Gaps never start above this fraction of the surface height
    pub const MIN_GAP_FRACTION: f32 = 0.1;
    /// Gaps never end below this fraction of the surface height
    pub const MAX_GAP_FRACTION: f32 = 0.9;
}
