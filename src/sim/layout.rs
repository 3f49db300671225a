//! Resolution-independent spatial constants
//!
//! Everything that has a size or a speed is derived from the surface
//! dimensions so gameplay feels the same on a phone and a 4K monitor.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Spatial and kinematic constants for one surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// Multiplier applied to every reference constant (height / REFERENCE_HEIGHT)
    pub scale: f32,
    pub character_x: f32,
    pub character_size: f32,
    pub obstacle_width: f32,
    pub gap_height: f32,
    pub scroll_speed: f32,
    pub spawn_distance: f32,
    pub gravity: f32,
    pub lift: f32,
}

impl Layout {
    /// Derive the layout for a surface of the given pixel size
    pub fn for_surface(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let scale = height / REFERENCE_HEIGHT;

        Self {
            width,
            height,
            scale,
            character_x: width * CHARACTER_X_FRACTION,
            character_size: CHARACTER_SIZE * scale,
            obstacle_width: OBSTACLE_WIDTH * scale,
            gap_height: GAP_HEIGHT * scale,
            scroll_speed: SCROLL_SPEED * scale,
            spawn_distance: SPAWN_DISTANCE * scale,
            gravity: GRAVITY * scale,
            lift: LIFT * scale,
        }
    }

    /// Smallest allowed gap start
    pub fn min_gap_start(&self) -> f32 {
        self.height * MIN_GAP_FRACTION
    }

    /// Largest allowed gap start (gap end stays inside the band)
    pub fn max_gap_start(&self) -> f32 {
        (self.height * MAX_GAP_FRACTION - self.gap_height).max(self.min_gap_start())
    }

    /// Vertical position the character starts from
    pub fn start_y(&self) -> f32 {
        self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_height_is_identity() {
        let layout = Layout::for_surface(1200.0, REFERENCE_HEIGHT);
        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.gravity, GRAVITY);
        assert_eq!(layout.lift, LIFT);
        assert_eq!(layout.obstacle_width, OBSTACLE_WIDTH);
        assert_eq!(layout.character_x, 120.0);
    }

    #[test]
    fn test_constants_scale_with_height() {
        let small = Layout::for_surface(400.0, 400.0);
        let large = Layout::for_surface(400.0, 1600.0);
        assert!((large.gap_height / small.gap_height - 4.0).abs() < 1e-5);
        assert!((large.character_size / small.character_size - 4.0).abs() < 1e-5);
        assert!((large.scroll_speed / small.scroll_speed - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_gap_band_fits_gap() {
        let layout = Layout::for_surface(800.0, 600.0);
        assert!(layout.min_gap_start() <= layout.max_gap_start());
        assert!(layout.max_gap_start() + layout.gap_height <= 600.0 * MAX_GAP_FRACTION + 1e-3);
    }

    #[test]
    fn test_degenerate_surface_is_clamped() {
        let layout = Layout::for_surface(0.0, -5.0);
        assert_eq!(layout.width, 1.0);
        assert_eq!(layout.height, 1.0);
        assert!(layout.scale > 0.0);
    }
}
