//! Camera component
//!
//! Projection parameters live on the component; the view matrix comes from
//! the owning entity's world matrix, so the camera moves with its transform.

use nalgebra::{Orthographic3, Perspective3};

use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4};

/// Smallest aspect ratio, view height or clip depth used when building a
/// projection
pub const MIN_EXTENT: f32 = 1e-3;

/// Keep `value` at least [`MIN_EXTENT`] away from zero, preserving its sign
fn non_degenerate(value: f32) -> f32 {
    if value.abs() >= MIN_EXTENT {
        value
    } else if value.is_sign_negative() {
        -MIN_EXTENT
    } else {
        MIN_EXTENT
    }
}

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// Perspective projection driven by `fov`
    Perspective,
    /// Orthographic projection driven by `orthographic_size`
    Orthographic,
}

/// Camera attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct CameraComponent {
    projection_type: ProjectionType,
    fov: f32,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,
    orthographic_size: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self::new(45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl CameraComponent {
    /// Perspective camera; `fov` is the vertical field of view in degrees
    pub fn new(fov: f32, aspect_ratio: f32, near_plane: f32, far_plane: f32) -> Self {
        Self {
            projection_type: ProjectionType::Perspective,
            fov,
            aspect_ratio,
            near_plane,
            far_plane,
            orthographic_size: 10.0,
        }
    }

    /// Projection model
    pub const fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Switch projection model
    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        self.projection_type = projection_type;
    }

    /// Vertical field of view in degrees
    pub const fn fov(&self) -> f32 {
        self.fov
    }

    /// Set the vertical field of view in degrees
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    /// Width over height
    pub const fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Set width over height
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Near clip distance
    pub const fn near_plane(&self) -> f32 {
        self.near_plane
    }

    /// Set the near clip distance
    pub fn set_near_plane(&mut self, near_plane: f32) {
        self.near_plane = near_plane;
    }

    /// Far clip distance
    pub const fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Set the far clip distance
    pub fn set_far_plane(&mut self, far_plane: f32) {
        self.far_plane = far_plane;
    }

    /// Full height of the orthographic view volume
    pub const fn orthographic_size(&self) -> f32 {
        self.orthographic_size
    }

    /// Set the orthographic view height
    pub fn set_orthographic_size(&mut self, size: f32) {
        self.orthographic_size = size;
    }

    /// Projection matrix (OpenGL clip conventions).
    ///
    /// Degenerate parameters (zero aspect, zero orthographic size, or near
    /// and far planes that coincide) are widened to [`MIN_EXTENT`] so a
    /// zero-sized window never yields a singular projection.
    pub fn projection_matrix(&self) -> Mat4 {
        let aspect_ratio = non_degenerate(self.aspect_ratio);
        let (near_plane, far_plane) = self.clip_planes();

        match self.projection_type {
            ProjectionType::Perspective => Perspective3::new(
                aspect_ratio,
                utils::deg_to_rad(self.fov),
                near_plane,
                far_plane,
            )
            .to_homogeneous(),
            ProjectionType::Orthographic => {
                let half_height = non_degenerate(self.orthographic_size) * 0.5;
                let half_width = half_height * aspect_ratio;
                Orthographic3::new(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    near_plane,
                    far_plane,
                )
                .to_homogeneous()
            }
        }
    }

    fn clip_planes(&self) -> (f32, f32) {
        let min_depth = MIN_EXTENT * self.near_plane.abs().max(1.0);
        if (self.far_plane - self.near_plane).abs() < min_depth {
            log::debug!(
                "Camera clip planes coincide (near={}, far={}); widening",
                self.near_plane,
                self.far_plane
            );
            (self.near_plane, self.near_plane + min_depth)
        } else {
            (self.near_plane, self.far_plane)
        }
    }

    /// View matrix for a camera whose entity has `world_matrix`
    pub fn view_matrix(world_matrix: &Mat4) -> Mat4 {
        world_matrix.try_inverse().unwrap_or_else(Mat4::identity)
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self, world_matrix: &Mat4) -> Mat4 {
        self.projection_matrix() * Self::view_matrix(world_matrix)
    }
}

impl Component for CameraComponent {}
