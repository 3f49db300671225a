//! Obstacle stream: spawning, scrolling, scoring and pruning
//!
//! Obstacles always spawn at the right edge and scroll left at the same
//! speed, so insertion order is also ascending-x order. The list is never
//! sorted; the last element is always the newest.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::layout::Layout;

/// One gated barrier with a passable vertical gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_start: f32,
    pub gap_height: f32,
    /// Score for this obstacle has been awarded
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_start: f32, gap_height: f32) -> Self {
        Self {
            x,
            gap_start,
            gap_height,
            passed: false,
        }
    }

    /// Bottom of the gap
    #[inline]
    pub fn gap_end(&self) -> f32 {
        self.gap_start + self.gap_height
    }

    /// Right edge
    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }

    /// Solid part above the gap
    pub fn upper_rect(&self, width: f32) -> Rect {
        Rect::new(self.x, 0.0, width, self.gap_start)
    }

    /// Solid part below the gap, down to the surface bottom
    pub fn lower_rect(&self, width: f32, surface_height: f32) -> Rect {
        let top = self.gap_end();
        Rect::new(self.x, top, width, (surface_height - top).max(0.0))
    }
}

/// Owns the obstacle list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
        }
    }

    /// Obstacles in spawn (and ascending-x) order
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Most recently spawned obstacle
    pub fn newest(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    /// Scroll every obstacle left by `speed`
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Distance-based spawn trigger
    ///
    /// Spawns at the right edge when the field is empty or the newest
    /// obstacle has scrolled `spawn_distance` in from the right edge.
    /// Returns the spawned obstacle.
    pub fn spawn_if_needed<R: Rng>(&mut self, layout: &Layout, rng: &mut R) -> Option<Obstacle> {
        let due = match self.newest() {
            None => true,
            Some(newest) => newest.x < layout.width - layout.spawn_distance,
        };
        if !due {
            return None;
        }

        let gap_start = rng.random_range(layout.min_gap_start()..=layout.max_gap_start());
        let obstacle = Obstacle::new(layout.width, gap_start, layout.gap_height);
        self.obstacles.push(obstacle);
        Some(obstacle)
    }

    /// Award passes, then drop obstacles whose right edge left the surface
    ///
    /// An obstacle is passed once its right edge is behind the character's
    /// left edge. Each obstacle is worth exactly one point over its
    /// lifetime; anything removed without having been passed is awarded
    /// at removal. Returns the number of points awarded.
    pub fn prune(&mut self, character_x: f32, width: f32) -> u32 {
        let mut awarded = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.passed && obstacle.right(width) < character_x {
                obstacle.passed = true;
                awarded += 1;
            }
        }

        self.obstacles.retain(|o| {
            let keep = o.right(width) >= 0.0;
            if !keep && !o.passed {
                awarded += 1;
            }
            keep
        });

        awarded
    }

    /// Rescale positions after a surface resize
    pub fn rescale(&mut self, sx: f32, sy: f32, gap_height: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x *= sx;
            obstacle.gap_start *= sy;
            obstacle.gap_height = gap_height;
        }
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}
