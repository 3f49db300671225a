//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.27, 0.70, 0.78, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.75, 0.91, 0.96, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.29, 0.67, 0.16, 1.0];
    pub const OBSTACLE_HIGHLIGHT: [f32; 4] = [0.57, 0.84, 0.24, 1.0];
    pub const OBSTACLE_CAP: [f32; 4] = [0.24, 0.39, 0.08, 1.0];
    pub const GHOST: [f32; 4] = [0.95, 0.97, 1.0, 0.95];
    pub const GHOST_EYE: [f32; 4] = [0.08, 0.08, 0.12, 1.0];
    /// Dimmed overlay once the run has ended
    pub const ENDED_OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
    pub const BACKGROUND: [f32; 4] = [0.27, 0.70, 0.78, 1.0];
}
