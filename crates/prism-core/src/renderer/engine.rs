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

use super::{
    CameraPose, EngineHandle, LightDescriptor, RenderEngineError, ShapeDescriptor, ViewSettings,
};
use crate::asset::{CollisionShape, PrimitiveDesc};
use crate::math::Transform;
use std::sync::{Arc, Mutex};

/// The render engine as seen by the runtime.
///
/// Every call is made from the strand, so implementations do not need to be
/// re-entrant. They are still `Send` because the strand may live on its own
/// worker thread.
///
/// Objects are created detached from the scene. They become visible once
/// passed to [`add_to_scene`](RenderEngine::add_to_scene) and stay alive
/// until [`destroy`](RenderEngine::destroy) is called, even when removed from
/// the scene.
pub trait RenderEngine: Send {
    /// Builds a light from its descriptor.
    fn create_light(&mut self, desc: &LightDescriptor) -> EngineHandle;

    /// Builds a primitive shape from its descriptor.
    fn create_shape(&mut self, desc: &ShapeDescriptor) -> Result<EngineHandle, RenderEngineError>;

    /// Registers a decoded asset and returns its engine-side handle.
    ///
    /// # Arguments
    ///
    /// * `source`: A human readable identifier of the asset, usually its path
    ///   or URL.
    fn create_asset(&mut self, source: &str) -> EngineHandle;

    /// Creates a new instance of a previously created asset.
    ///
    /// Destroying the asset destroys all of its instances.
    fn create_asset_instance(
        &mut self,
        asset: EngineHandle,
    ) -> Result<EngineHandle, RenderEngineError>;

    /// Creates the renderable for one primitive of an instance.
    ///
    /// Destroying the instance destroys its renderables.
    fn create_renderable(
        &mut self,
        instance: EngineHandle,
        primitive: &PrimitiveDesc,
    ) -> Result<EngineHandle, RenderEngineError>;

    /// Adds objects to the scene. Objects already in the scene are ignored.
    fn add_to_scene(&mut self, handles: &[EngineHandle]);

    /// Removes objects from the scene without destroying them.
    fn remove_from_scene(&mut self, handles: &[EngineHandle]);

    /// Destroys an object, removing it from the scene first.
    ///
    /// Unknown handles are ignored.
    fn destroy(&mut self, handle: EngineHandle);

    /// Sets the world transform of an object.
    fn set_transform(
        &mut self,
        handle: EngineHandle,
        transform: &Transform,
    ) -> Result<(), RenderEngineError>;

    /// Poses an instance at `time_secs` into its animation clip `clip`.
    fn apply_animation(
        &mut self,
        instance: EngineHandle,
        clip: usize,
        time_secs: f32,
    ) -> Result<(), RenderEngineError>;

    /// Attaches a collision volume to an instance.
    fn attach_collision(
        &mut self,
        instance: EngineHandle,
        shape: &CollisionShape,
    ) -> Result<(), RenderEngineError>;

    /// Creates a view rendering into a target of the given size.
    fn create_view(&mut self, width: u32, height: u32) -> EngineHandle;

    /// Resizes a view's render target.
    fn resize_view(
        &mut self,
        view: EngineHandle,
        width: u32,
        height: u32,
    ) -> Result<(), RenderEngineError>;

    /// Moves a view's viewport inside its surface.
    fn set_view_offset(
        &mut self,
        view: EngineHandle,
        x: i32,
        y: i32,
    ) -> Result<(), RenderEngineError>;

    /// Applies rendering options to a view.
    fn configure_view(
        &mut self,
        view: EngineHandle,
        settings: &ViewSettings,
    ) -> Result<(), RenderEngineError>;

    /// Places the camera of a view.
    fn set_camera(
        &mut self,
        view: EngineHandle,
        pose: &CameraPose,
    ) -> Result<(), RenderEngineError>;
}

/// A render engine shared between the systems.
///
/// Only the strand locks it.
pub type SharedEngine = Arc<Mutex<dyn RenderEngine>>;
