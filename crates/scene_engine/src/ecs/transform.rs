//! Transform with lazily recomputed local and world matrices
//!
//! Each transform caches two matrices behind independent dirty flags. Any
//! mutation marks only *this* transform dirty; children are not invalidated,
//! so a child keeps returning its cached world matrix after its parent moves
//! until the child is touched or [`EntityRegistry::invalidate_hierarchy`] is
//! called.
//!
//! [`EntityRegistry::invalidate_hierarchy`]: crate::ecs::EntityRegistry::invalidate_hierarchy

use std::cell::Cell;

use super::EntityId;
use crate::foundation::math::{utils, Mat4, Quat, Vec3};

/// Position, Euler rotation (degrees) and scale of an entity
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    parent: Option<EntityId>,

    dirty_local: Cell<bool>,
    dirty_world: Cell<bool>,
    local_matrix: Cell<Mat4>,
    world_matrix: Cell<Mat4>,

    local_recomputes: Cell<u32>,
    world_recomputes: Cell<u32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }
}

impl Transform {
    /// Create from position, Euler rotation in degrees and scale
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            parent: None,
            dirty_local: Cell::new(true),
            dirty_world: Cell::new(true),
            local_matrix: Cell::new(Mat4::identity()),
            world_matrix: Cell::new(Mat4::identity()),
            local_recomputes: Cell::new(0),
            world_recomputes: Cell::new(0),
        }
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Position relative to the parent
    pub const fn position(&self) -> &Vec3 {
        &self.position
    }

    /// Euler rotation in degrees
    pub const fn rotation(&self) -> &Vec3 {
        &self.rotation
    }

    /// Scale factors
    pub const fn scale(&self) -> &Vec3 {
        &self.scale
    }

    /// Parent entity, if any
    pub const fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Set the position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.mark_dirty();
    }

    /// Set the position from components
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.set_position(Vec3::new(x, y, z));
    }

    /// Set the Euler rotation in degrees
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.mark_dirty();
    }

    /// Set the Euler rotation in degrees from components
    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.set_rotation(Vec3::new(x, y, z));
    }

    /// Rotation as a quaternion
    pub fn rotation_quaternion(&self) -> Quat {
        utils::quat_from_euler_degrees(&self.rotation)
    }

    /// Set the rotation from a quaternion (stored back as Euler degrees)
    pub fn set_rotation_quaternion(&mut self, rotation: &Quat) {
        self.set_rotation(utils::euler_degrees_from_quat(rotation));
    }

    /// Set non-uniform scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Set the same scale on all axes
    pub fn set_scale_uniform(&mut self, scale: f32) {
        self.set_scale(Vec3::new(scale, scale, scale));
    }

    /// Move by `translation`
    pub fn translate(&mut self, translation: &Vec3) {
        self.position += translation;
        self.mark_dirty();
    }

    /// Add `rotation` (degrees) to the current Euler angles
    pub fn rotate(&mut self, rotation: &Vec3) {
        self.rotation += rotation;
        self.mark_dirty();
    }

    /// Multiply the current scale component-wise
    pub fn scale_by(&mut self, scaling: &Vec3) {
        self.scale = self.scale.component_mul(scaling);
        self.mark_dirty();
    }

    /// Multiply the current scale uniformly
    pub fn scale_uniform(&mut self, scaling: f32) {
        self.scale_by(&Vec3::new(scaling, scaling, scaling));
    }

    /// Re-parent. Returns `false` (and changes nothing) when `parent` is
    /// already the current parent.
    ///
    /// Cycle checks need the whole hierarchy, see
    /// [`EntityRegistry::set_parent`](crate::ecs::EntityRegistry::set_parent).
    pub fn set_parent(&mut self, parent: Option<EntityId>) -> bool {
        if self.parent == parent {
            return false;
        }
        self.parent = parent;
        self.dirty_world.set(true);
        true
    }

    /// Back to identity with no parent
    pub fn reset(&mut self) {
        self.position = Vec3::zeros();
        self.rotation = Vec3::zeros();
        self.scale = Vec3::new(1.0, 1.0, 1.0);
        self.parent = None;
        self.mark_dirty();
    }

    /// Local +Z axis
    pub fn forward(&self) -> Vec3 {
        self.rotation_quaternion() * Vec3::z()
    }

    /// Local +X axis
    pub fn right(&self) -> Vec3 {
        self.rotation_quaternion() * Vec3::x()
    }

    /// Local +Y axis
    pub fn up(&self) -> Vec3 {
        self.rotation_quaternion() * Vec3::y()
    }

    /// Interpolate towards `other`; `t` is clamped to `[0, 1]`.
    ///
    /// The result has no parent.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = utils::clamp(t, 0.0, 1.0);
        let position = self.position.lerp(&other.position, t);
        let rotation = self
            .rotation_quaternion()
            .slerp(&other.rotation_quaternion(), t);
        let scale = self.scale.lerp(&other.scale, t);

        Self::new(position, utils::euler_degrees_from_quat(&rotation), scale)
    }

    /// Local matrix `T * R * S`, recomputed only when dirty
    pub fn local_matrix(&self) -> Mat4 {
        if self.dirty_local.get() {
            let matrix = Mat4::new_translation(&self.position)
                * utils::rotation_from_euler_degrees(&self.rotation)
                * Mat4::new_nonuniform_scaling(&self.scale);
            self.local_matrix.set(matrix);
            self.dirty_local.set(false);
            self.local_recomputes.set(self.local_recomputes.get() + 1);
        }
        self.local_matrix.get()
    }

    /// World matrix, recomputed only when dirty.
    ///
    /// `resolve_parent` is consulted only on recomputation and only when a
    /// parent is set; returning `None` treats the transform as a root.
    pub fn world_matrix_with<F>(&self, resolve_parent: F) -> Mat4
    where
        F: FnOnce(EntityId) -> Option<Mat4>,
    {
        if self.dirty_world.get() {
            let local = self.local_matrix();
            let world = match self.parent.and_then(resolve_parent) {
                Some(parent_world) => parent_world * local,
                None => local,
            };
            self.world_matrix.set(world);
            self.dirty_world.set(false);
            self.world_recomputes.set(self.world_recomputes.get() + 1);
        }
        self.world_matrix.get()
    }

    /// Whether the local matrix is stale
    pub fn is_local_dirty(&self) -> bool {
        self.dirty_local.get()
    }

    /// Whether the world matrix is stale
    pub fn is_world_dirty(&self) -> bool {
        self.dirty_world.get()
    }

    /// Force the world matrix to be recomputed on next read
    pub fn invalidate_world(&self) {
        self.dirty_world.set(true);
    }

    /// How many times the local matrix has been rebuilt
    pub fn local_recomputes(&self) -> u32 {
        self.local_recomputes.get()
    }

    /// How many times the world matrix has been rebuilt
    pub fn world_recomputes(&self) -> u32 {
        self.world_recomputes.get()
    }

    fn mark_dirty(&self) {
        self.dirty_local.set(true);
        self.dirty_world.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn root_world(transform: &Transform) -> Mat4 {
        transform.world_matrix_with(|_| None)
    }

    #[test]
    fn test_position_roundtrip() {
        let mut transform = Transform::default();
        transform.set_position_xyz(1.0, -2.0, 3.5);

        assert_eq!(transform.position(), &Vec3::new(1.0, -2.0, 3.5));
        assert_eq!(transform.local_matrix().translation_part(), Vec3::new(1.0, -2.0, 3.5));
    }

    #[test]
    fn test_local_matrix_is_trs() {
        let mut transform = Transform::default();
        transform.set_position(Vec3::new(1.0, 2.0, 3.0));
        transform.set_rotation(Vec3::new(0.0, 90.0, 0.0));
        transform.set_scale(Vec3::new(2.0, 2.0, 2.0));

        // +X scaled by 2, turned 90 degrees about Y to -Z, then translated
        let point = transform
            .local_matrix()
            .transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.coords, Vec3::new(1.0, 2.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_world_matrix_is_memoized() {
        let mut transform = Transform::default();
        transform.set_position_xyz(4.0, 0.0, 0.0);

        let first = root_world(&transform);
        let second = root_world(&transform);

        assert_eq!(first, second);
        assert_eq!(transform.world_recomputes(), 1);
        assert_eq!(transform.local_recomputes(), 1);

        transform.translate(&Vec3::new(1.0, 0.0, 0.0));
        assert!(transform.is_local_dirty());
        assert!(transform.is_world_dirty());
        root_world(&transform);
        assert_eq!(transform.world_recomputes(), 2);
        assert_eq!(transform.local_recomputes(), 2);
    }

    #[test]
    fn test_parent_resolver_only_called_when_dirty() {
        let mut transform = Transform::default();
        transform.set_parent(Some(EntityId::new(0, 1)));

        let mut calls = 0;
        transform.world_matrix_with(|_| {
            calls += 1;
            Some(Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0)))
        });
        let cached = transform.world_matrix_with(|_| {
            calls += 1;
            None
        });

        assert_eq!(calls, 1);
        assert_eq!(cached.translation_part(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_set_parent_same_value_is_noop() {
        let parent = EntityId::new(3, 1);
        let mut transform = Transform::default();
        assert!(transform.set_parent(Some(parent)));
        root_world(&transform);

        assert!(!transform.set_parent(Some(parent)));
        assert!(!transform.is_world_dirty());

        assert!(transform.set_parent(None));
        assert!(transform.is_world_dirty());
        assert!(!transform.is_local_dirty());
    }

    #[test]
    fn test_scale_accumulates() {
        let mut transform = Transform::default();
        transform.scale_by(&Vec3::new(2.0, 3.0, 4.0));
        transform.scale_uniform(0.5);
        assert_relative_eq!(*transform.scale(), Vec3::new(1.0, 1.5, 2.0));
    }

    #[test]
    fn test_direction_vectors() {
        let mut transform = Transform::default();
        assert_relative_eq!(transform.forward(), Vec3::z(), epsilon = EPSILON);

        transform.set_rotation_xyz(0.0, 90.0, 0.0);
        assert_relative_eq!(transform.forward(), Vec3::x(), epsilon = EPSILON);
        assert_relative_eq!(transform.right(), -Vec3::z(), epsilon = EPSILON);
        assert_relative_eq!(transform.up(), Vec3::y(), epsilon = EPSILON);
    }

    #[test]
    fn test_lerp_clamps_t() {
        let a = Transform::from_position(Vec3::zeros());
        let mut b = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        b.set_rotation_xyz(0.0, 90.0, 0.0);
        b.set_scale_uniform(3.0);

        let half = a.lerp(&b, 0.5);
        assert_relative_eq!(*half.position(), Vec3::new(5.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(half.rotation().y, 45.0, epsilon = 1e-3);
        assert_relative_eq!(*half.scale(), Vec3::new(2.0, 2.0, 2.0), epsilon = EPSILON);

        let past_end = a.lerp(&b, 4.0);
        assert_relative_eq!(*past_end.position(), *b.position(), epsilon = EPSILON);
    }

    #[test]
    fn test_quaternion_roundtrip() {
        let mut transform = Transform::default();
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2);
        transform.set_rotation_quaternion(&rotation);
        assert_relative_eq!(transform.rotation().z, 90.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut transform = Transform::from_position(Vec3::new(1.0, 1.0, 1.0));
        transform.set_parent(Some(EntityId::new(1, 1)));
        transform.reset();

        assert_eq!(transform.parent(), None);
        assert_eq!(root_world(&transform), Mat4::identity());
    }
}
