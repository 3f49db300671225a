//! Shape generation for 2D primitives
//!
//! All shapes are produced in surface pixels (y down); the pipeline maps
//! them to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, GameState, Rect};

/// Two triangles covering a rectangle, one color per edge (top, bottom)
pub fn gradient_rect(rect: &Rect, top: [f32; 4], bottom: [f32; 4]) -> [Vertex; 6] {
    let (min, max) = (rect.min, rect.max);
    [
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Solid rectangle
pub fn rect(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    gradient_rect(rect, color, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// One obstacle column: solid parts with a lip at each gap edge
pub fn obstacle(upper: &Rect, lower: &Rect, lip: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(36);

    for part in [upper, lower] {
        if part.height() <= 0.0 {
            continue;
        }
        vertices.extend(rect(part, colors::OBSTACLE));
        // Highlight stripe along the left third
        let stripe = Rect::new(
            part.min.x + part.width() * 0.15,
            part.min.y,
            part.width() * 0.15,
            part.height(),
        );
        vertices.extend(rect(&stripe, colors::OBSTACLE_HIGHLIGHT));
    }

    // Lips overhang the column slightly, at the gap edges
    let overhang = lip * 0.5;
    let width = upper.width() + overhang * 2.0;
    let upper_lip = Rect::new(upper.min.x - overhang, upper.max.y - lip, width, lip);
    let lower_lip = Rect::new(lower.min.x - overhang, lower.min.y, width, lip);
    vertices.extend(rect(&upper_lip, colors::OBSTACLE_CAP));
    vertices.extend(rect(&lower_lip, colors::OBSTACLE_CAP));

    vertices
}

/// The ghost: round head, square skirt with a wavy hem, two eyes
///
/// Tilts its eyes with vertical velocity so flaps read visually.
pub fn ghost(bounds: &Rect, velocity: f32, time_ticks: u64) -> Vec<Vertex> {
    let size = bounds.width();
    let r = size * 0.5;
    let head = Vec2::new(bounds.min.x + r, bounds.min.y + r);
    let mut vertices = circle(head, r, colors::GHOST, 24);

    let skirt = Rect::new(bounds.min.x, head.y, size, r * 0.7);
    vertices.extend(rect(&skirt, colors::GHOST));

    // Wavy hem: three bobbing scallops
    let bob = (time_ticks as f32 * 0.2).sin() * size * 0.04;
    let scallop_r = size / 6.0;
    for i in 0..3 {
        let cx = bounds.min.x + scallop_r * (1.0 + 2.0 * i as f32);
        let phase = if i % 2 == 0 { bob } else { -bob };
        let center = Vec2::new(cx, skirt.max.y + phase);
        vertices.extend(circle(center, scallop_r, colors::GHOST, 10));
    }

    // Eyes look up when rising, down when falling
    let look = (velocity / 4.0).clamp(-1.0, 1.0) * size * 0.06;
    let eye_r = size * 0.08;
    for dx in [0.35, 0.65] {
        let center = Vec2::new(bounds.min.x + size * dx + size * 0.05, head.y - size * 0.05 + look);
        vertices.extend(circle(center, eye_r, colors::GHOST_EYE, 10));
    }

    vertices
}

/// Build every vertex for one frame of the game
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let layout = &state.layout;
    let surface = Rect::new(0.0, 0.0, layout.width, layout.height);

    let mut vertices = Vec::with_capacity(64 + state.obstacles.len() * 36 + 400);
    vertices.extend(gradient_rect(&surface, colors::SKY_TOP, colors::SKY_BOTTOM));

    if state.phase == GamePhase::Idle {
        return vertices;
    }

    let lip = layout.obstacle_width * 0.25;
    for o in state.obstacles.iter() {
        let upper = o.upper_rect(layout.obstacle_width);
        let lower = o.lower_rect(layout.obstacle_width, layout.height);
        vertices.extend(obstacle(&upper, &lower, lip));
    }

    let c = &state.character;
    vertices.extend(ghost(&c.bounds(), c.velocity, state.time_ticks));

    if state.phase == GamePhase::Ended {
        vertices.extend(rect(&surface, colors::ENDED_OVERLAY));
    }

    vertices
}
