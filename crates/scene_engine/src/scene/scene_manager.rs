//! Scene Manager - owns scenes and routes frames to the active one

use std::collections::HashMap;

use crate::foundation::collections::{new_key_type, SlotMap};

use super::{Scene, SceneError};

new_key_type! {
    /// Key of a scene owned by a [`SceneManager`]
    pub struct SceneId;
}

/// Owns every scene by name and tracks which one is active.
///
/// Only the active scene receives `update`/`render`. With no active scene
/// both are no-ops.
#[derive(Debug, Default)]
pub struct SceneManager {
    scenes: SlotMap<SceneId, Scene>,
    names: HashMap<String, SceneId>,
    active: Option<SceneId>,
}

impl SceneManager {
    /// Create a manager with no scenes
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle hook called by the engine before the first frame
    pub fn initialize(&mut self) -> Result<(), SceneError> {
        log::info!("Initializing scene manager...");
        Ok(())
    }

    /// Update the active scene, if any
    pub fn update(&mut self, delta_time: f32) {
        if let Some(scene) = self.active_scene_mut() {
            scene.update(delta_time);
        }
    }

    /// Render the active scene, if any
    pub fn render(&mut self) {
        if let Some(scene) = self.active_scene_mut() {
            scene.render();
        }
    }

    /// Clear the active scene and shut every scene down
    pub fn shutdown(&mut self) {
        log::info!("Shutting down scene manager...");
        self.active = None;
        for (_, scene) in &mut self.scenes {
            scene.shutdown();
        }
        self.scenes.clear();
        self.names.clear();
    }

    /// Create a scene, or return the existing one if `name` is taken
    pub fn create_scene(&mut self, name: &str) -> SceneId {
        if let Some(&id) = self.names.get(name) {
            log::warn!("Scene already exists: {name}");
            return id;
        }

        let id = self.scenes.insert(Scene::new(name));
        self.names.insert(name.to_string(), id);
        log::info!("Scene created: {name}");
        id
    }

    /// Id of the scene called `name`
    pub fn scene_id(&self, name: &str) -> Option<SceneId> {
        self.names.get(name).copied()
    }

    /// Scene called `name`
    pub fn get_scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(self.scene_id(name)?)
    }

    /// Scene called `name`, mutably
    pub fn get_scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        let id = self.scene_id(name)?;
        self.scenes.get_mut(id)
    }

    /// Scene by id
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Scene by id, mutably
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    /// Destroy the scene called `name`; `false` if there is none.
    ///
    /// Clears the active scene when it is the one being destroyed.
    pub fn destroy_scene(&mut self, name: &str) -> bool {
        let Some(id) = self.names.remove(name) else {
            return false;
        };

        if self.active == Some(id) {
            self.active = None;
        }
        if let Some(mut scene) = self.scenes.remove(id) {
            scene.shutdown();
        }
        log::info!("Scene destroyed: {name}");
        true
    }

    /// Make `id` the active scene.
    ///
    /// Rejected, with no state change, if this manager does not own `id`.
    pub fn set_active_scene(&mut self, id: SceneId) -> Result<(), SceneError> {
        let Some(scene) = self.scenes.get(id) else {
            log::error!("Cannot set active scene: Scene not found");
            return Err(SceneError::UnknownScene(id));
        };

        log::info!("Active scene set to: {}", scene.name());
        self.active = Some(id);
        Ok(())
    }

    /// Make the scene called `name` active
    pub fn set_active_scene_by_name(&mut self, name: &str) -> Result<(), SceneError> {
        let id = self.scene_id(name).ok_or_else(|| {
            log::error!("Cannot set active scene: no scene named {name}");
            SceneError::SceneNotFound(name.to_string())
        })?;
        self.set_active_scene(id)
    }

    /// Id of the active scene
    pub const fn active_scene_id(&self) -> Option<SceneId> {
        self.active
    }

    /// The active scene
    pub fn active_scene(&self) -> Option<&Scene> {
        self.scenes.get(self.active?)
    }

    /// The active scene, mutably
    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.get_mut(self.active?)
    }

    /// Names of all scenes, sorted
    pub fn scene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_scene_is_idempotent_by_name() {
        let mut manager = SceneManager::new();
        let first = manager.create_scene("a");
        let second = manager.create_scene("a");

        assert_eq!(first, second);
        assert_eq!(manager.scene_count(), 1);
        assert_eq!(manager.get_scene("a").map(Scene::name), Some("a"));
    }

    #[test]
    fn test_destroying_active_scene_clears_it() {
        let mut manager = SceneManager::new();
        let id = manager.create_scene("a");
        manager.set_active_scene(id).unwrap();
        assert_eq!(manager.active_scene().map(Scene::name), Some("a"));

        assert!(manager.destroy_scene("a"));
        assert!(manager.active_scene().is_none());
        assert!(!manager.destroy_scene("a"));

        // No active scene: frame calls are no-ops
        manager.update(0.016);
        manager.render();
    }

    #[test]
    fn test_destroying_inactive_scene_keeps_active() {
        let mut manager = SceneManager::new();
        let a = manager.create_scene("a");
        manager.create_scene("b");
        manager.set_active_scene(a).unwrap();

        assert!(manager.destroy_scene("b"));
        assert_eq!(manager.active_scene_id(), Some(a));
    }

    #[test]
    fn test_foreign_scene_is_rejected() {
        let mut manager = SceneManager::new();
        let a = manager.create_scene("a");
        manager.set_active_scene(a).unwrap();

        let mut other = SceneManager::new();
        other.create_scene("x");
        let foreign = other.create_scene("y");

        assert_eq!(manager.set_active_scene(foreign), Err(SceneError::UnknownScene(foreign)));
        assert_eq!(manager.active_scene_id(), Some(a));

        manager.destroy_scene("a");
        assert_eq!(manager.set_active_scene(a), Err(SceneError::UnknownScene(a)));
    }

    #[test]
    fn test_set_active_by_name() {
        let mut manager = SceneManager::new();
        manager.create_scene("menu");
        manager.set_active_scene_by_name("menu").unwrap();
        assert_eq!(manager.active_scene().map(Scene::name), Some("menu"));
        assert_eq!(
            manager.set_active_scene_by_name("missing"),
            Err(SceneError::SceneNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_shutdown_drops_everything() {
        let mut manager = SceneManager::new();
        let id = manager.create_scene("a");
        manager.create_scene("b");
        manager.set_active_scene(id).unwrap();

        manager.shutdown();
        assert_eq!(manager.scene_count(), 0);
        assert!(manager.active_scene().is_none());
        assert!(manager.scene_names().is_empty());
    }
}
