// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Render views and their orbit cameras.

use anyhow::{anyhow, Context as _};
use prism_core::math::TAU;
use prism_core::renderer::{
    CameraMode, CameraOrbit, CameraPose, EngineHandle, RenderEngineError, ViewQuality,
};
use prism_core::{Message, MessageType, MessageValue};
use prism_ecs::{EcsContext, MessageBus, System, SystemType};
use std::time::Duration;
use thiserror::Error;

/// Yaw speed of auto-orbiting cameras, in radians per second.
pub const DEFAULT_AUTO_ORBIT_SPEED: f32 = 0.5;

/// Errors of the view operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewTargetError {
    /// No view exists at this index. There is no implicit default view.
    #[error("no view target at index {index} ({count} views)")]
    UnknownView {
        /// The requested index.
        index: usize,
        /// How many views exist.
        count: usize,
    },
    /// The engine rejected the change.
    #[error(transparent)]
    Engine(#[from] RenderEngineError),
}

/// One render view and the camera driving it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTarget {
    /// The engine view.
    pub handle: EngineHandle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Position inside the host surface.
    pub offset: (i32, i32),
    /// Current quality preset.
    pub quality: ViewQuality,
    /// How the camera moves.
    pub mode: CameraMode,
    /// Current orbit parameters.
    pub orbit: CameraOrbit,
    // Set when the orbit changed since the last push to the engine.
    camera_dirty: bool,
}

/// Owns the render views, addressed by their creation index.
pub struct ViewTargetSystem {
    bus: MessageBus<Self>,
    views: Vec<ViewTarget>,
    auto_orbit_speed: f32,
}

impl Default for ViewTargetSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTargetSystem {
    /// Creates a system without any view.
    pub fn new() -> Self {
        Self {
            bus: MessageBus::new(),
            views: Vec::new(),
            auto_orbit_speed: DEFAULT_AUTO_ORBIT_SPEED,
        }
    }

    /// Sets the yaw speed of auto-orbiting cameras, in radians per second.
    pub fn with_auto_orbit_speed(mut self, radians_per_sec: f32) -> Self {
        self.auto_orbit_speed = radians_per_sec;
        self
    }

    /// Creates a view with the default quality and camera. Returns its index.
    pub fn add_view_target(
        &mut self,
        ctx: &EcsContext,
        width: u32,
        height: u32,
    ) -> Result<usize, ViewTargetError> {
        let quality = ViewQuality::default();
        let orbit = CameraOrbit::default();

        let mut engine = ctx.lock_engine();
        let handle = engine.create_view(width, height);
        engine.configure_view(handle, &quality.settings())?;
        engine.set_camera(handle, &orbit.pose())?;
        drop(engine);

        self.views.push(ViewTarget {
            handle,
            width,
            height,
            offset: (0, 0),
            quality,
            mode: CameraMode::default(),
            orbit,
            camera_dirty: false,
        });
        let index = self.views.len() - 1;
        log::info!("ViewTargetSystem: view {} created ({}x{})", index, width, height);
        Ok(index)
    }

    /// Number of views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// The view at `index`.
    pub fn view(&self, index: usize) -> Result<&ViewTarget, ViewTargetError> {
        self.views.get(index).ok_or(ViewTargetError::UnknownView {
            index,
            count: self.views.len(),
        })
    }

    fn view_mut(&mut self, index: usize) -> Result<&mut ViewTarget, ViewTargetError> {
        let count = self.views.len();
        self.views
            .get_mut(index)
            .ok_or(ViewTargetError::UnknownView { index, count })
    }

    /// The camera pose of the view at `index`.
    pub fn camera(&self, index: usize) -> Result<CameraPose, ViewTargetError> {
        Ok(self.view(index)?.orbit.pose())
    }

    /// Resizes the view at `index`.
    pub fn resize(
        &mut self,
        ctx: &EcsContext,
        index: usize,
        width: u32,
        height: u32,
    ) -> Result<(), ViewTargetError> {
        let view = self.view_mut(index)?;
        ctx.lock_engine().resize_view(view.handle, width, height)?;
        view.width = width;
        view.height = height;
        Ok(())
    }

    /// Moves the view at `index` inside the host surface.
    pub fn set_offset(
        &mut self,
        ctx: &EcsContext,
        index: usize,
        x: i32,
        y: i32,
    ) -> Result<(), ViewTargetError> {
        let view = self.view_mut(index)?;
        ctx.lock_engine().set_view_offset(view.handle, x, y)?;
        view.offset = (x, y);
        Ok(())
    }

    /// Switches the view at `index` to another quality preset.
    pub fn change_quality(
        &mut self,
        ctx: &EcsContext,
        index: usize,
        quality: ViewQuality,
    ) -> Result<(), ViewTargetError> {
        let view = self.view_mut(index)?;
        ctx.lock_engine().configure_view(view.handle, &quality.settings())?;
        view.quality = quality;
        Ok(())
    }

    /// Changes how the camera of the view at `index` moves.
    pub fn change_camera_mode(
        &mut self,
        index: usize,
        mode: CameraMode,
    ) -> Result<(), ViewTargetError> {
        self.view_mut(index)?.mode = mode;
        Ok(())
    }

    /// Replaces the orbit of the view at `index`. Pushed on the next tick.
    ///
    /// Fixed cameras ignore the request.
    pub fn set_camera_orbit(
        &mut self,
        index: usize,
        orbit: CameraOrbit,
    ) -> Result<(), ViewTargetError> {
        let view = self.view_mut(index)?;
        if view.mode == CameraMode::Fixed {
            log::debug!("ViewTargetSystem: view {} has a fixed camera", index);
            return Ok(());
        }
        view.orbit = orbit.clamped();
        view.camera_dirty = true;
        Ok(())
    }

    /// Advances auto-orbit cameras and pushes every changed camera.
    pub fn update_cameras(&mut self, ctx: &EcsContext, elapsed: Duration) {
        let step = self.auto_orbit_speed * elapsed.as_secs_f32();
        for (index, view) in self.views.iter_mut().enumerate() {
            if view.mode == CameraMode::AutoOrbit && step != 0.0 {
                view.orbit.yaw = (view.orbit.yaw + step).rem_euclid(TAU);
                view.camera_dirty = true;
            }
            if !view.camera_dirty {
                continue;
            }
            view.camera_dirty = false;
            if let Err(e) = ctx.lock_engine().set_camera(view.handle, &view.orbit.pose()) {
                log::warn!("ViewTargetSystem: camera of view {}: {}", index, e);
            }
        }
    }

    fn register_handlers(&self) {
        self.bus
            .register_handler(MessageType::ResizeViewTarget, |system: &mut Self, msg, ctx| {
                let index = target_view(msg)?;
                let Some(MessageValue::Size { width, height }) =
                    msg.value(MessageType::ResizeViewTarget)
                else {
                    return Err(anyhow!("ResizeViewTarget expects a size"));
                };
                system.resize(ctx, index, *width, *height)?;
                Ok(())
            });

        self.bus
            .register_handler(MessageType::ChangeViewOffset, |system: &mut Self, msg, ctx| {
                let index = target_view(msg)?;
                let Some(MessageValue::Offset { x, y }) = msg.value(MessageType::ChangeViewOffset)
                else {
                    return Err(anyhow!("ChangeViewOffset expects an offset"));
                };
                system.set_offset(ctx, index, *x, *y)?;
                Ok(())
            });

        self.bus
            .register_handler(MessageType::ChangeViewQuality, |system: &mut Self, msg, ctx| {
                let index = target_view(msg)?;
                let quality: ViewQuality = msg
                    .get(MessageType::ChangeViewQuality)
                    .context("ChangeViewQuality expects a quality preset")?;
                system.change_quality(ctx, index, quality)?;
                Ok(())
            });

        self.bus
            .register_handler(MessageType::ChangeCameraMode, |system: &mut Self, msg, _| {
                let index = target_view(msg)?;
                let mode: CameraMode = msg
                    .get(MessageType::ChangeCameraMode)
                    .context("ChangeCameraMode expects a camera mode")?;
                system.change_camera_mode(index, mode)?;
                Ok(())
            });

        self.bus
            .register_handler(MessageType::ChangeCameraOrbit, |system: &mut Self, msg, _| {
                let index = target_view(msg)?;
                let orbit: CameraOrbit = msg
                    .get(MessageType::ChangeCameraOrbit)
                    .context("ChangeCameraOrbit expects orbit parameters")?;
                system.set_camera_orbit(index, orbit)?;
                Ok(())
            });
    }
}

fn target_view(message: &Message) -> anyhow::Result<usize> {
    message
        .view_index()
        .context("view message has no view index")
}

impl System for ViewTargetSystem {
    fn system_type(&self) -> SystemType {
        SystemType::ViewTarget
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        self.register_handlers();
        Ok(())
    }

    fn update(&mut self, ctx: &EcsContext, elapsed: Duration) {
        self.update_cameras(ctx, elapsed);
    }

    fn shutdown(&mut self, ctx: &EcsContext) {
        let mut engine = ctx.lock_engine();
        for view in self.views.drain(..) {
            engine.destroy(view.handle);
        }
    }
}
