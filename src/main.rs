//! SDF render core demo
//!
//! Builds a small arena, sweeps the camera around it and runs every frame
//! through culling and queue submission without opening a window. Run with
//! `RUST_LOG=debug` to see per-frame stats, `trace` for individual culls.
//!
//! Usage: `sdf-render-core [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::{Vec2, Vec3};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use sdf_render_core::renderer::{FrameContext, FrameStats, RenderQueue};
    use sdf_render_core::scene::{Category, CullObject, Renderable, Scene, Shape, Transform};
    use sdf_render_core::view::Camera;
    use sdf_render_core::{RenderError, RenderSettings};

    const SEED: u64 = 0x5eed;
    const SPHERE_COUNT: usize = 10;
    const SWEEP_FRAMES: u32 = 16;
    const FRAME_DT: f32 = 1.0 / 60.0;

    fn build_scene(rng: &mut Pcg32) -> Scene {
        let mut scene = Scene::new();

        // Player's gun, held just in front of the camera
        scene.spawn_renderable(
            Transform::from_position(Vec3::new(0.3, 0.4, -0.5)),
            Renderable::new(Category::Player, Shape::Gun, Vec3::splat(0.2)),
            None,
        );

        // Ground
        scene.spawn_renderable(
            Transform::from_position(Vec3::new(0.0, -0.1, 0.0)),
            Renderable::new(
                Category::Ground,
                Shape::Box {
                    half_extents: Vec3::new(50.0, 0.1, 50.0),
                },
                Vec3::splat(0.4),
            )
            .with_rgb8(90, 110, 80),
            None,
        );

        // Laser beam from the muzzle
        scene.spawn_renderable(
            Transform::from_position(Vec3::new(0.3, 0.45, -0.85)),
            Renderable::new(
                Category::Object,
                Shape::CapsuleSegment {
                    from: Vec3::ZERO,
                    to: Vec3::new(0.0, 0.0, -10.0),
                    radius: 0.01,
                },
                Vec3::new(1.0, 0.0, 0.0),
            ),
            None,
        );

        for _ in 0..SPHERE_COUNT {
            let position = Vec3::new(
                rng.random_range(1.0..5.0),
                rng.random_range(1.0..5.0),
                rng.random_range(1.0..5.0),
            );
            let color = Vec3::new(rng.random(), rng.random(), rng.random());
            scene.spawn_renderable(
                Transform::from_position(position),
                Renderable::new(Category::Object, Shape::Sphere { radius: 0.5 }, color),
                Some(CullObject::new(0.5)),
            );
        }

        // Enemies around the arena; bounds follow shape and scale
        for (i, angle) in [0.0f32, 90.0, 180.0, 270.0].into_iter().enumerate() {
            let (sin, cos) = angle.to_radians().sin_cos();
            let transform = Transform::from_position(Vec3::new(cos * 12.0, 1.0, sin * 12.0))
                .with_scale(Vec3::splat(1.0 + i as f32 * 0.25));
            let shape = Shape::Box {
                half_extents: Vec3::new(0.5, 1.0, 0.5),
            };
            let cull = CullObject::enclosing(&shape, &transform);
            scene.spawn_renderable(
                transform,
                Renderable::new(Category::Enemy, shape, Vec3::new(0.8, 0.2, 0.1)),
                cull,
            );
        }

        scene
    }

    pub fn run() -> Result<(), RenderError> {
        let settings = match std::env::args().nth(1) {
            Some(path) => match RenderSettings::load(&path) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Failed to load settings from {}: {}", path, e);
                    log::info!("Using default settings");
                    RenderSettings::default()
                }
            },
            None => RenderSettings::default(),
        };
        log::info!("Settings: {:?}", settings);

        let mut rng = Pcg32::seed_from_u64(SEED);
        let scene = build_scene(&mut rng);
        log::info!("Scene: {} entities", scene.len());

        let mut camera = Camera::new(
            Vec3::new(0.0, 0.6, 0.0),
            settings.projection(settings.aspect()),
        );
        camera.sensitivity = settings.mouse_sensitivity;
        let resolution = Vec2::new(settings.width as f32, settings.height as f32);

        let mut queue = RenderQueue::with_capacity(settings.queue_capacity);
        let mut totals = FrameStats::default();

        for frame in 0..SWEEP_FRAMES {
            // Full turn over the sweep, as if the mouse moved right
            let turn = 360.0 / SWEEP_FRAMES as f32 / camera.sensitivity;
            camera.move_direction(Vec2::new(turn, 0.0));

            let context = FrameContext::new(&camera, resolution, frame as f32 * FRAME_DT)
                .with_culling(settings.culling);
            let output = context.submit(&scene, &mut queue)?;

            log::info!(
                "Frame {:2}: yaw {:6.1}, {:2} queued, {:2}/{:2} culled",
                frame,
                camera.yaw(),
                output.stats.queue_count,
                output.stats.culled,
                output.stats.tested
            );
            totals.tested += output.stats.tested;
            totals.culled += output.stats.culled;
            totals.queue_count += output.stats.queue_count;

            queue.release()?;
        }

        log::info!(
            "Sweep done: {} records queued, {} of {} bound tests culled",
            totals.queue_count,
            totals.culled,
            totals.tested
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("SDF render core (native) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host drives `SdfRenderer` directly
}
