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

//! A render engine that renders nothing and remembers everything.

use super::{
    CameraPose, EngineHandle, LightDescriptor, RenderEngine, RenderEngineError, SharedEngine,
    ShapeDescriptor, ViewSettings,
};
use crate::asset::{CollisionShape, PrimitiveDesc};
use crate::math::Transform;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// An object tracked by the [`HeadlessEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessObject {
    /// A light and the descriptor it was built from.
    Light(LightDescriptor),
    /// A primitive shape.
    Shape(ShapeDescriptor),
    /// A registered asset.
    Asset {
        /// Identifier given at creation.
        source: String,
    },
    /// An instance of an asset.
    Instance {
        /// The instantiated asset.
        asset: EngineHandle,
    },
    /// A renderable belonging to an instance.
    Renderable {
        /// The owning instance.
        instance: EngineHandle,
        /// The primitive it draws.
        primitive: PrimitiveDesc,
    },
    /// A view.
    View(HeadlessView),
}

impl HeadlessObject {
    fn kind_name(&self) -> &'static str {
        match self {
            HeadlessObject::Light(_) => "light",
            HeadlessObject::Shape(_) => "shape",
            HeadlessObject::Asset { .. } => "asset",
            HeadlessObject::Instance { .. } => "instance",
            HeadlessObject::Renderable { .. } => "renderable",
            HeadlessObject::View(_) => "view",
        }
    }
}

/// The recorded state of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    /// Render target width.
    pub width: u32,
    /// Render target height.
    pub height: u32,
    /// Viewport offset.
    pub offset: (i32, i32),
    /// Last applied settings, if any.
    pub settings: Option<ViewSettings>,
    /// Last camera pose, if any.
    pub camera: Option<CameraPose>,
    /// How many times the camera was set.
    pub camera_updates: usize,
}

/// A [`RenderEngine`] that keeps every object in memory for inspection.
///
/// Handles are issued sequentially starting at 1 and never reused.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    next_handle: u64,
    objects: HashMap<EngineHandle, HeadlessObject>,
    scene: BTreeSet<EngineHandle>,
    transforms: HashMap<EngineHandle, Transform>,
    poses: HashMap<EngineHandle, (usize, f32)>,
    collisions: Vec<(EngineHandle, CollisionShape)>,
    destroyed: usize,
}

impl HeadlessEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine and returns it both typed, for inspection, and as a
    /// [`SharedEngine`] for the runtime.
    pub fn shared() -> (Arc<Mutex<HeadlessEngine>>, SharedEngine) {
        let engine = Arc::new(Mutex::new(HeadlessEngine::new()));
        let shared: SharedEngine = engine.clone();
        (engine, shared)
    }

    /// Returns the object behind `handle`, if it is alive.
    pub fn object(&self, handle: EngineHandle) -> Option<&HeadlessObject> {
        self.objects.get(&handle)
    }

    /// Returns `true` if `handle` refers to a live object.
    pub fn is_alive(&self, handle: EngineHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    /// Returns `true` if `handle` is currently part of the scene.
    pub fn in_scene(&self, handle: EngineHandle) -> bool {
        self.scene.contains(&handle)
    }

    /// Number of objects in the scene.
    pub fn scene_len(&self) -> usize {
        self.scene.len()
    }

    /// Number of live objects, in the scene or not.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of objects destroyed so far, cascades included.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Descriptors of the lights currently in the scene.
    pub fn lights_in_scene(&self) -> Vec<LightDescriptor> {
        self.scene
            .iter()
            .filter_map(|h| match self.objects.get(h) {
                Some(HeadlessObject::Light(desc)) => Some(*desc),
                _ => None,
            })
            .collect()
    }

    /// Number of renderables of any instance currently in the scene.
    pub fn renderables_in_scene(&self) -> usize {
        self.scene
            .iter()
            .filter(|h| matches!(self.objects.get(h), Some(HeadlessObject::Renderable { .. })))
            .count()
    }

    /// Number of shapes currently in the scene.
    pub fn shapes_in_scene(&self) -> usize {
        self.scene
            .iter()
            .filter(|h| matches!(self.objects.get(h), Some(HeadlessObject::Shape(_))))
            .count()
    }

    /// Number of live instances of any asset.
    pub fn instance_count(&self) -> usize {
        self.objects
            .values()
            .filter(|o| matches!(o, HeadlessObject::Instance { .. }))
            .count()
    }

    /// The last transform set on `handle`.
    pub fn transform(&self, handle: EngineHandle) -> Option<Transform> {
        self.transforms.get(&handle).copied()
    }

    /// The last `(clip, time)` pose applied to `instance`.
    pub fn animation_pose(&self, instance: EngineHandle) -> Option<(usize, f32)> {
        self.poses.get(&instance).copied()
    }

    /// Every collision attachment made so far, in call order.
    pub fn collisions(&self) -> &[(EngineHandle, CollisionShape)] {
        &self.collisions
    }

    /// The recorded state of a view.
    pub fn view(&self, view: EngineHandle) -> Option<&HeadlessView> {
        match self.objects.get(&view) {
            Some(HeadlessObject::View(v)) => Some(v),
            _ => None,
        }
    }

    fn issue(&mut self, object: HeadlessObject) -> EngineHandle {
        self.next_handle += 1;
        let handle = EngineHandle::new(self.next_handle);
        log::trace!("Headless engine created {} {}", object.kind_name(), handle);
        self.objects.insert(handle, object);
        handle
    }

    fn expect_kind(
        &self,
        handle: EngineHandle,
        expected: &'static str,
    ) -> Result<&HeadlessObject, RenderEngineError> {
        let object = self
            .objects
            .get(&handle)
            .ok_or(RenderEngineError::UnknownHandle(handle))?;
        if object.kind_name() == expected {
            Ok(object)
        } else {
            Err(RenderEngineError::WrongKind { handle, expected })
        }
    }

    fn view_mut(&mut self, view: EngineHandle) -> Result<&mut HeadlessView, RenderEngineError> {
        match self.objects.get_mut(&view) {
            Some(HeadlessObject::View(v)) => Ok(v),
            Some(_) => Err(RenderEngineError::WrongKind {
                handle: view,
                expected: "view",
            }),
            None => Err(RenderEngineError::UnknownHandle(view)),
        }
    }

    fn children_of(&self, parent: EngineHandle) -> Vec<EngineHandle> {
        self.objects
            .iter()
            .filter_map(|(h, o)| match o {
                HeadlessObject::Instance { asset } if *asset == parent => Some(*h),
                HeadlessObject::Renderable { instance, .. } if *instance == parent => Some(*h),
                _ => None,
            })
            .collect()
    }
}

impl RenderEngine for HeadlessEngine {
    fn create_light(&mut self, desc: &LightDescriptor) -> EngineHandle {
        self.issue(HeadlessObject::Light(*desc))
    }

    fn create_shape(&mut self, desc: &ShapeDescriptor) -> Result<EngineHandle, RenderEngineError> {
        let handle = self.issue(HeadlessObject::Shape(*desc));
        self.transforms.insert(handle, desc.transform);
        Ok(handle)
    }

    fn create_asset(&mut self, source: &str) -> EngineHandle {
        self.issue(HeadlessObject::Asset {
            source: source.to_owned(),
        })
    }

    fn create_asset_instance(
        &mut self,
        asset: EngineHandle,
    ) -> Result<EngineHandle, RenderEngineError> {
        self.expect_kind(asset, "asset")?;
        Ok(self.issue(HeadlessObject::Instance { asset }))
    }

    fn create_renderable(
        &mut self,
        instance: EngineHandle,
        primitive: &PrimitiveDesc,
    ) -> Result<EngineHandle, RenderEngineError> {
        self.expect_kind(instance, "instance")?;
        Ok(self.issue(HeadlessObject::Renderable {
            instance,
            primitive: primitive.clone(),
        }))
    }

    fn add_to_scene(&mut self, handles: &[EngineHandle]) {
        for handle in handles {
            if self.objects.contains_key(handle) {
                self.scene.insert(*handle);
            } else {
                log::warn!("Headless engine: cannot add unknown object {} to the scene", handle);
            }
        }
    }

    fn remove_from_scene(&mut self, handles: &[EngineHandle]) {
        for handle in handles {
            self.scene.remove(handle);
        }
    }

    fn destroy(&mut self, handle: EngineHandle) {
        if self.objects.remove(&handle).is_none() {
            return;
        }
        self.scene.remove(&handle);
        self.transforms.remove(&handle);
        self.poses.remove(&handle);
        self.destroyed += 1;
        for child in self.children_of(handle) {
            self.destroy(child);
        }
    }

    fn set_transform(
        &mut self,
        handle: EngineHandle,
        transform: &Transform,
    ) -> Result<(), RenderEngineError> {
        if !self.objects.contains_key(&handle) {
            return Err(RenderEngineError::UnknownHandle(handle));
        }
        self.transforms.insert(handle, *transform);
        Ok(())
    }

    fn apply_animation(
        &mut self,
        instance: EngineHandle,
        clip: usize,
        time_secs: f32,
    ) -> Result<(), RenderEngineError> {
        self.expect_kind(instance, "instance")?;
        self.poses.insert(instance, (clip, time_secs));
        Ok(())
    }

    fn attach_collision(
        &mut self,
        instance: EngineHandle,
        shape: &CollisionShape,
    ) -> Result<(), RenderEngineError> {
        self.expect_kind(instance, "instance")?;
        self.collisions.push((instance, *shape));
        Ok(())
    }

    fn create_view(&mut self, width: u32, height: u32) -> EngineHandle {
        self.issue(HeadlessObject::View(HeadlessView {
            width,
            height,
            offset: (0, 0),
            settings: None,
            camera: None,
            camera_updates: 0,
        }))
    }

    fn resize_view(
        &mut self,
        view: EngineHandle,
        width: u32,
        height: u32,
    ) -> Result<(), RenderEngineError> {
        let view = self.view_mut(view)?;
        view.width = width;
        view.height = height;
        Ok(())
    }

    fn set_view_offset(
        &mut self,
        view: EngineHandle,
        x: i32,
        y: i32,
    ) -> Result<(), RenderEngineError> {
        self.view_mut(view)?.offset = (x, y);
        Ok(())
    }

    fn configure_view(
        &mut self,
        view: EngineHandle,
        settings: &ViewSettings,
    ) -> Result<(), RenderEngineError> {
        self.view_mut(view)?.settings = Some(*settings);
        Ok(())
    }

    fn set_camera(
        &mut self,
        view: EngineHandle,
        pose: &CameraPose,
    ) -> Result<(), RenderEngineError> {
        let view = self.view_mut(view)?;
        view.camera = Some(*pose);
        view.camera_updates += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(index: usize) -> PrimitiveDesc {
        PrimitiveDesc {
            mesh_index: 0,
            primitive_index: index,
            name: None,
        }
    }

    #[test]
    fn handles_are_never_reused() {
        let mut engine = HeadlessEngine::new();
        let first = engine.create_light(&LightDescriptor::default());
        engine.destroy(first);
        let second = engine.create_light(&LightDescriptor::default());
        assert_ne!(first, second);
        assert!(!engine.is_alive(first));
    }

    #[test]
    fn destroying_an_asset_cascades_to_renderables() {
        let mut engine = HeadlessEngine::new();
        let asset = engine.create_asset("box.glb");
        let instance = engine.create_asset_instance(asset).unwrap();
        let renderables: Vec<_> = (0..3)
            .map(|i| engine.create_renderable(instance, &primitive(i)).unwrap())
            .collect();
        engine.add_to_scene(&renderables);
        assert_eq!(engine.renderables_in_scene(), 3);

        engine.destroy(asset);

        assert_eq!(engine.object_count(), 0);
        assert_eq!(engine.scene_len(), 0);
        assert_eq!(engine.destroyed_count(), 5);
    }

    #[test]
    fn removing_from_scene_keeps_object_alive() {
        let mut engine = HeadlessEngine::new();
        let light = engine.create_light(&LightDescriptor::default());
        engine.add_to_scene(&[light]);
        engine.remove_from_scene(&[light]);
        assert!(engine.is_alive(light));
        assert!(!engine.in_scene(light));
    }

    #[test]
    fn wrong_kind_is_reported() {
        let mut engine = HeadlessEngine::new();
        let light = engine.create_light(&LightDescriptor::default());
        let err = engine.create_asset_instance(light).unwrap_err();
        assert_eq!(
            err,
            RenderEngineError::WrongKind {
                handle: light,
                expected: "asset"
            }
        );
        assert!(engine.resize_view(light, 1, 1).is_err());
    }

    #[test]
    fn view_state_is_recorded() {
        let mut engine = HeadlessEngine::new();
        let view = engine.create_view(640, 480);
        engine.resize_view(view, 800, 600).unwrap();
        engine.set_view_offset(view, 10, -5).unwrap();
        engine.set_camera(view, &CameraPose::default()).unwrap();

        let recorded = engine.view(view).unwrap();
        assert_eq!((recorded.width, recorded.height), (800, 600));
        assert_eq!(recorded.offset, (10, -5));
        assert_eq!(recorded.camera_updates, 1);
    }
}
