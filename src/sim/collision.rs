//! Collision detection
//!
//! Everything is an axis-aligned rectangle in surface pixels, y pointing
//! down. Touching edges do not count as overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::obstacles::Obstacle;
use super::physics::Character;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from top-left corner and size
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict horizontal overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.max.y > other.min.y && self.min.y < other.max.y
    }
}

/// What the character hit, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Top edge above the surface
    Ceiling,
    /// Bottom edge below the surface
    Floor,
    /// Outside the gap of the obstacle at this index
    Obstacle(usize),
}

/// Find the first collision, checking bounds then every obstacle
pub fn detect(
    character: &Character,
    obstacles: &[Obstacle],
    layout: &Layout,
) -> Option<Collision> {
    let bounds = character.bounds();

    if bounds.min.y < 0.0 {
        return Some(Collision::Ceiling);
    }
    if bounds.max.y > layout.height {
        return Some(Collision::Floor);
    }

    obstacles
        .iter()
        .position(|obstacle| hits_obstacle(&bounds, obstacle, layout))
        .map(Collision::Obstacle)
}

/// True when the character collides with the bounds or any obstacle
pub fn check(character: &Character, obstacles: &[Obstacle], layout: &Layout) -> bool {
    detect(character, obstacles, layout).is_some()
}

/// Overlap with the solid part above or below the gap
///
/// Assumes `bounds` already lies within the surface vertically.
fn hits_obstacle(bounds: &Rect, obstacle: &Obstacle, layout: &Layout) -> bool {
    let upper = obstacle.upper_rect(layout.obstacle_width);
    let lower = obstacle.lower_rect(layout.obstacle_width, layout.height);
    bounds.intersects(&upper) || bounds.intersects(&lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 800x600 surface, 50px character at x=100
    fn setup() -> (Layout, Character) {
        let mut layout = Layout::for_surface(800.0, 600.0);
        layout.obstacle_width = 60.0;
        let character = Character {
            x: 100.0,
            y: 200.0,
            velocity: 0.0,
            size: 50.0,
        };
        (layout, character)
    }

    #[test]
    fn test_above_surface_collides() {
        let (layout, mut c) = setup();
        c.y = -1.0;
        assert!(check(&c, &[], &layout));
        assert_eq!(detect(&c, &[], &layout), Some(Collision::Ceiling));
    }

    #[test]
    fn test_below_surface_collides() {
        let (layout, mut c) = setup();
        c.y = 551.0;
        assert_eq!(detect(&c, &[], &layout), Some(Collision::Floor));

        // Bottom edge exactly on the floor is still inside
        c.y = 550.0;
        assert!(!check(&c, &[], &layout));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let (layout, c) = setup();
        let obstacles = [Obstacle::new(90.0, 150.0, 150.0)];
        assert!(!check(&c, &obstacles, &layout));
    }

    #[test]
    fn test_straddling_upper_column_collides() {
        let (layout, c) = setup();
        // Gap starts at 220, character spans 200..250
        let obstacles = [Obstacle::new(90.0, 220.0, 150.0)];
        assert_eq!(detect(&c, &obstacles, &layout), Some(Collision::Obstacle(0)));
    }

    #[test]
    fn test_straddling_lower_column_collides() {
        let (layout, c) = setup();
        // Gap spans 100..240, character spans 200..250
        let obstacles = [Obstacle::new(120.0, 100.0, 140.0)];
        assert!(check(&c, &obstacles, &layout));
    }

    #[test]
    fn test_gap_exactly_fitting_character_is_safe() {
        let (layout, c) = setup();
        // Character spans 200..250, gap spans the same
        let obstacles = [Obstacle::new(90.0, 200.0, 50.0)];
        assert!(!check(&c, &obstacles, &layout));

        let tight = [Obstacle::new(90.0, 200.5, 50.0)];
        assert!(check(&c, &tight, &layout));
    }

    #[test]
    fn test_no_horizontal_overlap_is_safe() {
        let (layout, c) = setup();
        // Column right edge touches the character's left edge
        let behind = Obstacle::new(40.0, 0.0, 10.0);
        // Column left edge touches the character's right edge
        let ahead = Obstacle::new(150.0, 0.0, 10.0);
        assert!(!check(&c, &[behind, ahead], &layout));
    }

    #[test]
    fn test_every_obstacle_is_checked() {
        let (layout, c) = setup();
        let obstacles = [
            Obstacle::new(-200.0, 0.0, 10.0),
            Obstacle::new(300.0, 0.0, 10.0),
            Obstacle::new(110.0, 0.0, 10.0),
        ];
        assert_eq!(detect(&c, &obstacles, &layout), Some(Collision::Obstacle(2)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 10.0);
    }
}
