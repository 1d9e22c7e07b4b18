//! Orthographic camera over map pixel space.

use glam::Mat4;

use crate::pipeline::CameraUniform;

/// Projects map pixels onto a `width x height` target.
///
/// Pixel (0, 0) is the top-left corner of the target and y grows downward, so
/// rendered rows come back top row first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCamera {
    pub width: f32,
    pub height: f32,
}

impl MapCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Y-down orthographic projection; depth is unused.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection_matrix().to_cols_array_2d(),
        }
    }
}
