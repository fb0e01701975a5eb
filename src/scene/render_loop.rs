// Frame loop
//
// Each tick advances the scene rotation by a fixed step and rasterises the
// pool's current materials into a reused sprite buffer.

use super::camera::{Projected, ViewportController};
use super::pool::EntityPool;
use super::{Rgb, Vec3};

/// Rotation added per tick, in radians
///
/// Applied per frame rather than per elapsed second, so angular speed
/// follows the frame rate.
pub const ROTATION_STEP: f64 = 0.001;

/// Flat ambient light factor applied to surface colors
pub const AMBIENT_LIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Cancelled,
}

/// One projected proxy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
    pub color: Rgb,
}

/// Output of one tick
#[derive(Debug, Default)]
pub struct RenderedFrame {
    /// Far-to-near, so later sprites overdraw earlier ones
    pub sprites: Vec<Sprite>,
    pub rotation_y: f64,
    pub width: u32,
    pub height: u32,
    pub number: u64,
}

/// Free-running draw cycle
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    rotation_y: f64,
    frame: RenderedFrame,
}

impl RenderLoop {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: LoopState::Running,
            rotation_y: 0.0,
            frame: RenderedFrame {
                sprites: Vec::with_capacity(capacity),
                ..RenderedFrame::default()
            },
        }
    }

    /// Advance the rotation and submit one frame
    ///
    /// Returns `None` once cancelled.
    pub fn tick(
        &mut self,
        pool: &EntityPool,
        viewport: &ViewportController,
    ) -> Option<&RenderedFrame> {
        if self.state == LoopState::Cancelled {
            return None;
        }

        self.rotation_y += ROTATION_STEP;

        let frame = &mut self.frame;
        frame.sprites.clear();
        frame.rotation_y = self.rotation_y;
        frame.number += 1;

        if let Some(surface) = viewport.surface() {
            frame.width = surface.width;
            frame.height = surface.height;

            let camera = viewport.camera();
            for mesh in pool.scene().live() {
                if let Some(p) = camera.project(mesh.position.rotate_y(self.rotation_y)) {
                    frame.sprites.push(Sprite {
                        x: p.x,
                        y: p.y,
                        depth: p.depth,
                        color: mesh.material.shade(AMBIENT_LIGHT),
                    });
                }
            }
            frame.sprites.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        }

        Some(&self.frame)
    }

    /// Project an arbitrary scene point with the current rotation
    pub fn project(&self, viewport: &ViewportController, point: Vec3) -> Option<Projected> {
        viewport.camera().project(point.rotate_y(self.rotation_y))
    }

    /// Stop the loop at teardown
    pub fn cancel(&mut self) {
        if self.state == LoopState::Running {
            tracing::debug!(frames = self.frame.number, "Render loop cancelled");
        }
        self.state = LoopState::Cancelled;
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    /// Most recently submitted frame
    pub fn frame(&self) -> &RenderedFrame {
        &self.frame
    }
}
