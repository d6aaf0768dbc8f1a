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

//! Procedural shapes and entity transforms.

use crate::index::EntityIndex;
use anyhow::Context as _;
use prism_core::math::Transform;
use prism_core::MessageType;
use prism_ecs::{EcsContext, Entity, MessageBus, Shape, System, SystemType};

/// Builds one engine shape per entity carrying a [`Shape`] component.
///
/// A shape is in the scene when both the global toggle and its own
/// visibility flag are on.
pub struct ShapeSystem {
    bus: MessageBus<Self>,
    shapes: EntityIndex,
    shapes_in_scene: bool,
}

impl Default for ShapeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSystem {
    /// Creates a system with no shape and the global toggle on.
    pub fn new() -> Self {
        Self {
            bus: MessageBus::new(),
            shapes: EntityIndex::new(SystemType::Shape),
            shapes_in_scene: true,
        }
    }

    /// The entities whose shapes this system manages.
    pub fn shapes(&self) -> &EntityIndex {
        &self.shapes
    }

    /// State of the global toggle.
    pub fn shapes_in_scene(&self) -> bool {
        self.shapes_in_scene
    }

    /// Adds every visible shape to the scene, or removes all of them.
    pub fn toggle_shapes_in_scene(&mut self, ctx: &EcsContext, in_scene: bool) {
        if self.shapes_in_scene == in_scene {
            return;
        }
        self.shapes_in_scene = in_scene;
        for entity in self.shapes.iter() {
            entity.with_component(|shape: &Shape| self.sync_scene(ctx, shape));
        }
        log::debug!(
            "ShapeSystem: {} shapes {}",
            self.shapes.len(),
            if in_scene { "shown" } else { "hidden" }
        );
    }

    /// Shows or hides the shape of `entity`.
    ///
    /// Returns `false` when the entity has no [`Shape`].
    pub fn set_visibility(&mut self, ctx: &EcsContext, entity: &Entity, visible: bool) -> bool {
        entity
            .with_component_mut(|shape: &mut Shape| {
                shape.visible = visible;
                self.sync_scene(ctx, shape);
            })
            .is_some()
    }

    /// Replaces the transform of `entity` and moves its shape.
    ///
    /// A [`Transform`] component is attached if the entity had none.
    pub fn set_transform(&mut self, ctx: &EcsContext, entity: &Entity, transform: Transform) {
        if entity
            .with_component_mut(|current: &mut Transform| *current = transform)
            .is_none()
        {
            entity.attach_component(transform);
        }
        entity.with_component_mut(|shape: &mut Shape| {
            shape.desc.transform = transform;
            if let Some(handle) = shape.handle {
                if let Err(e) = ctx.lock_engine().set_transform(handle, &transform) {
                    log::warn!("ShapeSystem: '{}': {}", entity.name(), e);
                }
            }
        });
    }

    fn sync_scene(&self, ctx: &EcsContext, shape: &Shape) {
        let Some(handle) = shape.handle else {
            return;
        };
        let mut engine = ctx.lock_engine();
        if self.shapes_in_scene && shape.visible {
            engine.add_to_scene(&[handle]);
        } else {
            engine.remove_from_scene(&[handle]);
        }
    }

    fn build(&self, ctx: &EcsContext, entity: &Entity) {
        let transform = entity.with_component(|t: &Transform| *t);
        entity.with_component_mut(|shape: &mut Shape| {
            if shape.handle.is_some() {
                return;
            }
            if let Some(transform) = transform {
                shape.desc.transform = transform;
            }
            let created = ctx.lock_engine().create_shape(&shape.desc);
            match created {
                Ok(handle) => {
                    shape.handle = Some(handle);
                    self.sync_scene(ctx, shape);
                }
                Err(e) => log::error!("ShapeSystem: cannot build '{}': {}", entity.name(), e),
            }
        });
    }

    fn teardown(ctx: &EcsContext, entity: &Entity) {
        entity.with_component_mut(|shape: &mut Shape| {
            if let Some(handle) = shape.handle.take() {
                let mut engine = ctx.lock_engine();
                engine.remove_from_scene(&[handle]);
                engine.destroy(handle);
            }
        });
    }

    fn register_handlers(&self) {
        self.bus
            .register_handler(MessageType::ToggleShapesInScene, |system: &mut Self, msg, ctx| {
                let in_scene = msg
                    .get::<bool>(MessageType::ToggleShapesInScene)
                    .unwrap_or(!system.shapes_in_scene);
                system.toggle_shapes_in_scene(ctx, in_scene);
                Ok(())
            });

        self.bus
            .register_handler(MessageType::SetShapeVisibility, |system: &mut Self, msg, ctx| {
                let visible: bool = msg
                    .get(MessageType::SetShapeVisibility)
                    .context("SetShapeVisibility expects a boolean")?;
                if let Some(entity) = system.shapes.resolve(msg)? {
                    system.set_visibility(ctx, &entity, visible);
                }
                Ok(())
            });

        // Every system owning transformable entities handles this one.
        self.bus
            .register_handler(MessageType::ChangeTransform, |system: &mut Self, msg, ctx| {
                let transform: Transform = msg
                    .get(MessageType::ChangeTransform)
                    .context("ChangeTransform expects a transform")?;
                if let Some(entity) = system.shapes.resolve_shared(msg) {
                    system.set_transform(ctx, &entity, transform);
                }
                Ok(())
            });
    }
}

impl System for ShapeSystem {
    fn system_type(&self) -> SystemType {
        SystemType::Shape
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        self.register_handlers();
        Ok(())
    }

    fn add_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        if self.shapes.insert(entity) {
            self.build(ctx, entity);
        }
    }

    fn remove_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        if self.shapes.remove(entity.guid()).is_some() {
            Self::teardown(ctx, entity);
        }
    }

    fn shutdown(&mut self, ctx: &EcsContext) {
        for entity in self.shapes.drain() {
            Self::teardown(ctx, &entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::math::Vec3;
    use prism_core::renderer::{HeadlessEngine, ShapeKind};

    fn cube(ctx: &EcsContext, system: &mut ShapeSystem) -> Entity {
        let entity = Entity::new("Cube");
        entity.attach_component(Shape::new(ShapeKind::Cube));
        system.add_entity(ctx, &entity);
        entity
    }

    #[test]
    fn shapes_follow_both_toggles() {
        let (engine, shared) = HeadlessEngine::shared();
        let ctx = EcsContext::manual(shared);
        let mut system = ShapeSystem::new();
        let a = cube(&ctx, &mut system);
        let _b = cube(&ctx, &mut system);
        assert_eq!(engine.lock().unwrap().shapes_in_scene(), 2);

        system.set_visibility(&ctx, &a, false);
        assert_eq!(engine.lock().unwrap().shapes_in_scene(), 1);

        system.toggle_shapes_in_scene(&ctx, false);
        assert_eq!(engine.lock().unwrap().shapes_in_scene(), 0);

        system.toggle_shapes_in_scene(&ctx, true);
        assert_eq!(engine.lock().unwrap().shapes_in_scene(), 1);
    }

    #[test]
    fn transform_reaches_the_engine() {
        let (engine, shared) = HeadlessEngine::shared();
        let ctx = EcsContext::manual(shared);
        let mut system = ShapeSystem::new();
        let entity = cube(&ctx, &mut system);
        let handle = entity.with_component(|s: &Shape| s.handle).flatten().unwrap();

        let moved = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        system.set_transform(&ctx, &entity, moved);

        assert_eq!(engine.lock().unwrap().transform(handle), Some(moved));
        assert_eq!(entity.with_component(|t: &Transform| *t), Some(moved));
    }
}
