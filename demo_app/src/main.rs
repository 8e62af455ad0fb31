//! Player demo application
//!
//! Headless run of the scene runtime: a "Main" scene with a player that a
//! movement system pushes along +Z, plus a camera that follows it.

use scene_engine::ecs::components::CameraComponent;
use scene_engine::foundation::math::{Mat4Ext, Vec3};
use scene_engine::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: usize = 120;

#[derive(Debug)]
struct PlayerComponent {
    move_speed: f32,
}

impl Component for PlayerComponent {}

struct PlayerMovementSystem {
    base: SystemBase,
}

impl PlayerMovementSystem {
    fn new() -> Self {
        Self { base: SystemBase::new("PlayerMovementSystem").require::<PlayerComponent>() }
    }
}

impl System for PlayerMovementSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn initialize(&mut self) -> Result<(), String> {
        log::info!("PlayerMovementSystem ready");
        Ok(())
    }

    fn process_entity(&mut self, entity: &mut Entity, delta_time: f32) {
        let Ok(player) = entity.component::<PlayerComponent>() else {
            return;
        };
        let step = Vec3::new(0.0, 0.0, player.move_speed * delta_time);
        entity.transform_mut().translate(&step);
    }

    fn render(&mut self, entities: &EntityRegistry) {
        for &id in self.entities() {
            if let Some(world) = entities.world_matrix(id) {
                log::trace!("Player {id} at {:?}", world.translation_part());
            }
        }
    }
}

/// Stand-in for a renderer: counts the frames it was asked to draw
#[derive(Default)]
struct FrameCounter {
    frames: u64,
}

impl Subsystem for FrameCounter {
    fn name(&self) -> &str {
        "FrameCounter"
    }

    fn render(&mut self) {
        self.frames += 1;
    }

    fn shutdown(&mut self) {
        log::info!("Rendered {} frames", self.frames);
    }
}

fn populate(scene: &mut Scene) -> Result<(), SceneError> {
    let player = scene.create_entity_named("Player");
    player.add_component(PlayerComponent { move_speed: 5.0 })?;
    let player = player.handle();

    let camera = scene.create_entity_named("Camera");
    camera.transform_mut().set_position_xyz(0.0, 2.0, -6.0);
    camera.add_component(CameraComponent::new(60.0, 16.0 / 9.0, 0.1, 500.0))?;
    let camera = camera.handle();

    scene.entities_mut().set_parent(camera, Some(player))?;

    scene.add_system(PlayerMovementSystem::new())?;
    scene.enroll::<PlayerMovementSystem>(player)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting player demo");

    let config = EngineConfig { initial_scene: Some("Main".to_string()), ..EngineConfig::default() };
    let mut engine = Engine::new(config);
    engine.add_subsystem(FrameCounter::default())?;
    engine.initialize()?;

    let scene = engine
        .scenes_mut()
        .active_scene_mut()
        .ok_or("no active scene after initialization")?;
    populate(scene)?;

    engine.run_frames(FRAMES, FRAME_TIME);

    if let Some(scene) = engine.scenes().active_scene() {
        if let Some(player) = scene.entity_by_name("Player") {
            log::info!("Player finished at {:?}", player.transform().position());
        }
        if let Some(camera) = scene.entity_by_name("Camera") {
            camera.transform().invalidate_world();
            if let Some(world) = scene.entities().world_matrix(camera.handle()) {
                log::info!("Camera follows at {:?}", world.translation_part());
            }
        }
    }

    engine.shutdown();
    Ok(())
}
