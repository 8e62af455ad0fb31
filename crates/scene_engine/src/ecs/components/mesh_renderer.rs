//! Mesh renderer component
//!
//! Attaches renderer-owned resources to an entity. The handles are opaque to
//! the core; a render system resolves them and draws with the entity's world
//! matrix.

use crate::ecs::Component;
use crate::foundation::collections::{Material, Mesh, ResourceHandle, Texture};

/// Component for entities that can be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRendererComponent {
    /// Mesh to draw
    pub mesh: ResourceHandle<Mesh>,

    /// Material to draw it with
    pub material: ResourceHandle<Material>,

    /// Optional texture override
    pub texture: Option<ResourceHandle<Texture>>,

    /// Whether this object is visible
    pub visible: bool,

    /// Rendering layer for sorting (higher values render later)
    pub render_layer: u8,
}

impl MeshRendererComponent {
    /// Create a visible renderer on layer 0
    pub fn new(mesh: ResourceHandle<Mesh>, material: ResourceHandle<Material>) -> Self {
        Self {
            mesh,
            material,
            texture: None,
            visible: true,
            render_layer: 0,
        }
    }

    /// Builder: set a texture override
    #[must_use]
    pub fn with_texture(mut self, texture: ResourceHandle<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Check if this component should be rendered
    pub fn should_render(&self) -> bool {
        self.visible
    }
}

impl Component for MeshRendererComponent {}
