//! Core engine host
//!
//! The engine owns the scene manager plus a list of collaborating
//! subsystems (renderer, input, audio, ...) and drives them through a
//! fixed frame order.

use crate::{
    config::{ConfigError, EngineConfig},
    foundation::{logging, time::FrameTimer},
    scene::{SceneError, SceneManager},
};
use thiserror::Error;

/// A collaborator driven by the engine every frame
pub trait Subsystem {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Called once, in registration order, before the first frame
    fn initialize(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Called every frame before scenes are updated
    fn update(&mut self, _delta_time: f32) {}

    /// Called every frame after scenes are rendered
    fn render(&mut self) {}

    /// Called once, in reverse registration order
    fn shutdown(&mut self) {}
}

/// Main engine struct
///
/// Frame order: subsystems update, active scene update, active scene
/// render, subsystems render.
pub struct Engine {
    config: EngineConfig,
    scenes: SceneManager,
    subsystems: Vec<Box<dyn Subsystem>>,
    timer: FrameTimer,
    initialized: bool,
}

impl Engine {
    /// Create an engine; nothing is initialized yet
    pub fn new(config: EngineConfig) -> Self {
        let timer = FrameTimer::new(config.max_delta_time);
        Self {
            config,
            scenes: SceneManager::new(),
            subsystems: Vec::new(),
            timer,
            initialized: false,
        }
    }

    /// Register a subsystem. Must happen before [`Engine::initialize`].
    pub fn add_subsystem(&mut self, subsystem: impl Subsystem + 'static) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }
        log::debug!("Subsystem registered: {}", subsystem.name());
        self.subsystems.push(Box::new(subsystem));
        Ok(())
    }

    /// Install logging, initialize subsystems then the scene manager.
    ///
    /// A failing subsystem aborts initialization; subsystems that were
    /// already initialized are shut down again in reverse order.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }

        // A host may have installed its own logger already
        logging::init(self.config.level_filter());
        log::info!("Initializing engine...");

        for index in 0..self.subsystems.len() {
            let subsystem = &mut self.subsystems[index];
            if let Err(e) = subsystem.initialize() {
                log::error!("Subsystem {} failed to initialize: {e}", subsystem.name());
                for earlier in self.subsystems[..index].iter_mut().rev() {
                    earlier.shutdown();
                }
                return Err(EngineError::InitializationFailed(format!(
                    "{}: {e}",
                    self.subsystems[index].name()
                )));
            }
        }

        self.scenes.initialize()?;

        if let Some(name) = self.config.initial_scene.clone() {
            let id = self.scenes.create_scene(&name);
            self.scenes.set_active_scene(id)?;
        }

        self.timer.reset();
        self.initialized = true;
        log::info!("Engine initialized");
        Ok(())
    }

    /// Run one frame with an explicit delta time (clamped to
    /// `max_delta_time`). Returns the delta actually used.
    pub fn frame(&mut self, delta_time: f32) -> f32 {
        let delta_time = self.timer.advance(delta_time);
        self.run_frame(delta_time);
        delta_time
    }

    /// Run one frame timed by the wall clock
    pub fn tick(&mut self) -> f32 {
        let delta_time = self.timer.tick();
        self.run_frame(delta_time);
        delta_time
    }

    fn run_frame(&mut self, delta_time: f32) {
        for subsystem in &mut self.subsystems {
            subsystem.update(delta_time);
        }
        self.scenes.update(delta_time);
        self.scenes.render();
        for subsystem in &mut self.subsystems {
            subsystem.render();
        }
    }

    /// Run `count` frames of `delta_time` each
    pub fn run_frames(&mut self, count: usize, delta_time: f32) {
        log::debug!("Running {count} frames at dt={delta_time}");
        for _ in 0..count {
            self.frame(delta_time);
        }
    }

    /// Shut the scene manager down, then subsystems in reverse order.
    /// Calling this more than once is harmless.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        log::info!("Shutting down engine...");

        self.scenes.shutdown();
        for subsystem in self.subsystems.iter_mut().rev() {
            log::debug!("Shutting down subsystem: {}", subsystem.name());
            subsystem.shutdown();
        }

        self.initialized = false;
        log::info!("Engine shutdown complete");
    }

    /// Whether [`Engine::initialize`] succeeded and shutdown has not run
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scene manager
    pub const fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Mutable access to the scene manager
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Frame timer
    pub const fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Names of registered subsystems, in registration order
    pub fn subsystem_names(&self) -> Vec<&str> {
        self.subsystems.iter().map(|s| s.name()).collect()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A subsystem or the engine itself failed to start
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// `initialize` ran twice, or a subsystem was added too late
    #[error("Engine already initialized")]
    AlreadyInitialized,

    /// Scene error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
