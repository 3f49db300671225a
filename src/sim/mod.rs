//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Collision, Rect, check, detect};
pub use layout::Layout;
pub use obstacles::{Obstacle, ObstacleField};
pub use physics::Character;
pub use state::{GameEvent, GamePhase, GameState, SessionError};
pub use tick::{TickInput, tick};
