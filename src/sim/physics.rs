//! Character physics
//!
//! Vertical-only motion: the character never moves horizontally, the
//! obstacles scroll past it instead.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::layout::Layout;

/// The player-controlled character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Left edge, fixed for the session
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Vertical velocity in pixels per tick (positive = falling)
    pub velocity: f32,
    /// Side length of the square bounding box
    pub size: f32,
}

impl Character {
    /// Place a character at the layout's start position, at rest
    pub fn new(layout: &Layout) -> Self {
        Self {
            x: layout.character_x,
            y: layout.start_y(),
            velocity: 0.0,
            size: layout.character_size,
        }
    }

    /// Advance one tick: velocity first, then position
    #[inline]
    pub fn integrate(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.y += self.velocity;
    }

    /// Flap. Overwrites whatever velocity the character had.
    #[inline]
    pub fn apply_impulse(&mut self, lift: f32) {
        self.velocity = lift;
    }

    /// Back to the start position, at rest
    pub fn reset(&mut self, layout: &Layout) {
        *self = Self::new(layout);
    }

    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> Layout {
        Layout::for_surface(800.0, 600.0)
    }

    #[test]
    fn test_new_character_at_rest_in_centre() {
        let layout = layout();
        let c = Character::new(&layout);
        assert_eq!(c.y, 300.0);
        assert_eq!(c.velocity, 0.0);
        assert_eq!(c.x, layout.character_x);
    }

    #[test]
    fn test_velocity_updates_before_position() {
        let mut c = Character::new(&layout());
        c.velocity = 1.0;
        c.y = 100.0;
        c.integrate(0.5);
        assert_eq!(c.velocity, 1.5);
        assert_eq!(c.y, 101.5);
    }

    #[test]
    fn test_impulse_last_write_wins() {
        let mut c = Character::new(&layout());
        c.apply_impulse(-3.0);
        c.apply_impulse(-3.0);
        assert_eq!(c.velocity, -3.0);
    }

    #[test]
    fn test_position_is_not_clamped() {
        let mut c = Character::new(&layout());
        c.y = 1.0;
        c.apply_impulse(-4.0);
        c.integrate(0.0);
        assert_eq!(c.y, -3.0);
    }

    proptest! {
        #[test]
        fn prop_integrate_matches_euler(
            y in -1000.0f32..1000.0,
            v in -20.0f32..20.0,
            g in 0.0f32..2.0,
        ) {
            let mut c = Character::new(&layout());
            c.y = y;
            c.velocity = v;
            c.integrate(g);
            let expected_v = v + g;
            prop_assert_eq!(c.velocity, expected_v);
            prop_assert_eq!(c.y, y + expected_v);
        }

        #[test]
        fn prop_impulse_ignores_prior_velocity(v in -100.0f32..100.0, lift in -10.0f32..0.0) {
            let mut c = Character::new(&layout());
            c.velocity = v;
            c.apply_impulse(lift);
            prop_assert_eq!(c.velocity, lift);
        }
    }
}
