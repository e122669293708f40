//! Per-frame submission pipeline
//!
//! Entity store -> frustum test -> render queue + frame uniforms.
//! All frame state lives in a `FrameContext` built by the caller, so a frame
//! can be run against any `RenderSource` without a GPU.

use glam::Vec2;

use super::gpu_types::FrameUniforms;
use super::queue::RenderQueue;
use crate::error::RenderError;
use crate::scene::RenderSource;
use crate::view::Camera;

/// Counters for one submitted frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities without a cull bound (submitted unconditionally)
    pub always_visible: u32,
    /// Entities run through the frustum test
    pub tested: u32,
    /// Tested entities that were rejected
    pub culled: u32,
    /// Records published this frame
    pub queue_count: u32,
}

/// Result of a successful frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub uniforms: FrameUniforms,
    pub stats: FrameStats,
}

/// Inputs for one frame's submission pass
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub camera: Camera,
    /// Framebuffer size in pixels
    pub resolution: Vec2,
    /// Elapsed seconds
    pub time: f32,
    /// When false every entity is submitted (debugging aid)
    pub culling: bool,
}

impl FrameContext {
    pub fn new(camera: &Camera, resolution: Vec2, time: f32) -> Self {
        Self {
            camera: *camera,
            resolution,
            time,
            culling: true,
        }
    }

    pub fn with_culling(mut self, culling: bool) -> Self {
        self.culling = culling;
        self
    }

    /// Fill `queue` with everything visible this frame and build the uniforms.
    ///
    /// Entities without a `CullObject` go first, then bounded entities that
    /// pass the frustum test. Any error aborts the whole frame: the queue is
    /// left Idle and nothing is published.
    pub fn submit<S>(&self, source: &S, queue: &mut RenderQueue) -> Result<FrameOutput, RenderError>
    where
        S: RenderSource + ?Sized,
    {
        let frustum = self.camera.frustum();
        let mut stats = FrameStats::default();
        let mut writer = queue.writer();

        source.for_each_renderable(&mut |item| {
            if item.cull.is_some() {
                return Ok(());
            }
            writer.submit(item.transform, item.renderable)?;
            stats.always_visible += 1;
            Ok(())
        })?;

        source.for_each_renderable(&mut |item| {
            let Some(cull) = item.cull else {
                return Ok(());
            };
            stats.tested += 1;
            if self.culling {
                let position = item.transform.position;
                if let Some(side) = frustum.rejecting_plane(position, cull.radius()) {
                    log::trace!("Culled {:?} at {:?} by {:?} plane", item.entity, position, side);
                    stats.culled += 1;
                    return Ok(());
                }
            }
            writer.submit(item.transform, item.renderable)
        })?;

        stats.queue_count = writer.finish()?;
        log::debug!(
            "Frame submitted: {} always visible, {}/{} culled, {} queued",
            stats.always_visible,
            stats.culled,
            stats.tested,
            stats.queue_count
        );

        let uniforms = FrameUniforms::new(
            self.resolution,
            self.time,
            self.camera.position,
            self.camera.direction(),
            stats.queue_count,
        );
        Ok(FrameOutput { uniforms, stats })
    }
}
