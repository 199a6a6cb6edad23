use glam::{Mat4, Vec3};
use mazewalk_common::{Config, FrameInput};

use crate::clock::Clock;
use crate::controller::{PlayerController, PoseSummary};
use crate::world::BlockWorld;

/// Emit a pose summary every this many ticks.
const SUMMARY_INTERVAL: u64 = 60;

/// What the renderer needs from one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub view: Mat4,
    pub eye: Vec3,
}

/// One play session: a controller walking through a fixed world.
///
/// `frame` runs the per-frame flow in order: look, jump, move, physics,
/// head bob, view matrix. The session owns no input or window state; the
/// caller hands it a `FrameInput` each frame.
pub struct Session<C: Clock> {
    controller: PlayerController,
    world: BlockWorld,
    clock: C,
    tick: u64,
}

impl<C: Clock> Session<C> {
    pub fn new(config: &Config, world: BlockWorld, clock: C) -> Self {
        Self {
            controller: PlayerController::new(config),
            world,
            clock,
            tick: 0,
        }
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlayerController {
        &mut self.controller
    }

    pub fn world(&self) -> &BlockWorld {
        &self.world
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Frames processed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn summary(&self) -> PoseSummary {
        self.controller.summary()
    }

    /// Advance one frame of `dt` seconds.
    pub fn frame(&mut self, input: &FrameInput, dt: f32) -> FrameOutput {
        let _span = tracing::trace_span!("frame", tick = self.tick).entered();

        let (dx, dy) = input.look;
        if dx != 0.0 || dy != 0.0 {
            self.controller.apply_mouse_delta(dx, dy);
        }
        if input.jump {
            self.controller.jump(self.clock.now());
        }
        self.controller
            .tick(&input.intents, input.is_moving, dt, &self.world);

        self.tick += 1;
        if self.tick % SUMMARY_INTERVAL == 0 {
            let s = self.controller.summary();
            tracing::debug!(
                tick = self.tick,
                x = s.position.x,
                y = s.position.y,
                z = s.position.z,
                yaw = s.yaw,
                pitch = s.pitch,
                vy = s.velocity_y,
                grounded = s.grounded,
                "pose"
            );
        }

        FrameOutput {
            view: self.controller.view_matrix(),
            eye: self.controller.eye_position(),
        }
    }
}
