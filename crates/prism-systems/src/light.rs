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

//! Engine lights and the default directional light.

use crate::index::EntityIndex;
use anyhow::{anyhow, Context as _};
use prism_core::math::{LinearRgba, Vec3};
use prism_core::renderer::LightDescriptor;
use prism_core::{Message, MessageType};
use prism_ecs::{EcsContext, Entity, Light, MessageBus, System, SystemType};

/// Name of the entity created by [`LightSystem::create_default_light`].
pub const DEFAULT_LIGHT_NAME: &str = "DefaultLight";

/// Builds one engine light per entity carrying a [`Light`] component.
///
/// Light parameters are immutable on the engine side: every change destroys
/// the engine light and builds a new one from the updated descriptor.
///
/// Messages without an [`EntityGuid`](MessageType::EntityGuid) key target the
/// default light.
pub struct LightSystem {
    bus: MessageBus<Self>,
    lights: EntityIndex,
    default_light: Option<Entity>,
}

impl Default for LightSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LightSystem {
    /// Creates a system with no light.
    pub fn new() -> Self {
        Self {
            bus: MessageBus::new(),
            lights: EntityIndex::new(SystemType::Light),
            default_light: None,
        }
    }

    /// The entities whose lights this system manages.
    pub fn lights(&self) -> &EntityIndex {
        &self.lights
    }

    /// The default light, once created.
    pub fn default_light(&self) -> Option<&Entity> {
        self.default_light.as_ref()
    }

    /// Creates the default directional light and adds it to the scene.
    ///
    /// The entity is registered with the locator through the strand. Calling
    /// this again returns the existing light.
    pub fn create_default_light(&mut self, ctx: &EcsContext) -> Entity {
        if let Some(existing) = &self.default_light {
            return existing.clone();
        }

        let entity = Entity::new(DEFAULT_LIGHT_NAME);
        entity.attach_component(Light::directional());
        self.track(ctx, &entity);
        entity.register(ctx);

        log::info!("LightSystem: default light created ({})", entity.guid());
        self.default_light = Some(entity.clone());
        entity
    }

    /// Applies `change` to the light of `entity` and rebuilds its engine
    /// light.
    ///
    /// Returns `false` when the entity has no [`Light`].
    pub fn change_light(
        &mut self,
        ctx: &EcsContext,
        entity: &Entity,
        change: impl FnOnce(&mut LightDescriptor),
    ) -> bool {
        entity
            .with_component_mut(|light: &mut Light| {
                change(&mut light.params);
                Self::rebuild(ctx, light);
            })
            .is_some()
    }

    /// Adds the light of `entity` to the scene or removes it.
    ///
    /// The engine light survives while disabled. Returns `false` when the
    /// entity has no [`Light`].
    pub fn set_enabled(&mut self, ctx: &EcsContext, entity: &Entity, enabled: bool) -> bool {
        entity
            .with_component_mut(|light: &mut Light| {
                if light.enabled == enabled {
                    return;
                }
                light.enabled = enabled;
                let Some(handle) = light.handle else {
                    return;
                };
                let mut engine = ctx.lock_engine();
                if enabled {
                    engine.add_to_scene(&[handle]);
                } else {
                    engine.remove_from_scene(&[handle]);
                }
            })
            .is_some()
    }

    fn track(&mut self, ctx: &EcsContext, entity: &Entity) {
        if !self.lights.insert(entity) {
            return;
        }
        entity.with_component_mut(|light: &mut Light| {
            if light.handle.is_none() {
                Self::build(ctx, light);
            }
        });
    }

    fn build(ctx: &EcsContext, light: &mut Light) {
        let mut engine = ctx.lock_engine();
        let handle = engine.create_light(&light.params);
        if light.enabled {
            engine.add_to_scene(&[handle]);
        }
        light.handle = Some(handle);
    }

    fn teardown(ctx: &EcsContext, light: &mut Light) {
        if let Some(handle) = light.handle.take() {
            let mut engine = ctx.lock_engine();
            engine.remove_from_scene(&[handle]);
            engine.destroy(handle);
        }
    }

    fn rebuild(ctx: &EcsContext, light: &mut Light) {
        Self::teardown(ctx, light);
        Self::build(ctx, light);
    }

    fn target(&self, message: &Message) -> anyhow::Result<Option<Entity>> {
        if message.contains(MessageType::EntityGuid) {
            return self.lights.resolve(message);
        }
        self.default_light
            .clone()
            .map(Some)
            .ok_or_else(|| anyhow!("no target GUID and no default light"))
    }

    fn on_change(
        &mut self,
        ctx: &EcsContext,
        message: &Message,
        change: impl FnOnce(&mut LightDescriptor),
    ) -> anyhow::Result<()> {
        if let Some(entity) = self.target(message)? {
            self.change_light(ctx, &entity, change);
        }
        Ok(())
    }

    fn register_handlers(&self) {
        self.bus
            .register_handler(MessageType::CreateDefaultLight, |system: &mut Self, _, ctx| {
                system.create_default_light(ctx);
                Ok(())
            });

        self.bus
            .register_handler(MessageType::ChangeLightColor, |system: &mut Self, msg, ctx| {
                let color = light_color(msg)?;
                system.on_change(ctx, msg, |params| params.color = color)
            });

        self.bus
            .register_handler(MessageType::ChangeLightIntensity, |system: &mut Self, msg, ctx| {
                let intensity: f32 = msg
                    .get(MessageType::ChangeLightIntensity)
                    .context("ChangeLightIntensity expects a number")?;
                system.on_change(ctx, msg, |params| params.intensity = intensity.max(0.0))
            });

        self.bus
            .register_handler(MessageType::ChangeLightDirection, |system: &mut Self, msg, ctx| {
                let direction: Vec3 = msg
                    .get(MessageType::ChangeLightDirection)
                    .context("ChangeLightDirection expects a vector")?;
                system.on_change(ctx, msg, |params| params.direction = direction.normalize())
            });

        self.bus
            .register_handler(MessageType::ChangeLightPosition, |system: &mut Self, msg, ctx| {
                let position: Vec3 = msg
                    .get(MessageType::ChangeLightPosition)
                    .context("ChangeLightPosition expects a vector")?;
                system.on_change(ctx, msg, |params| params.position = position)
            });

        self.bus
            .register_handler(MessageType::ChangeLightFalloff, |system: &mut Self, msg, ctx| {
                let radius: f32 = msg
                    .get(MessageType::ChangeLightFalloff)
                    .context("ChangeLightFalloff expects a number")?;
                system.on_change(ctx, msg, |params| params.falloff_radius = radius.max(0.0))
            });

        self.bus
            .register_handler(MessageType::ToggleLight, |system: &mut Self, msg, ctx| {
                let Some(entity) = system.target(msg)? else {
                    return Ok(());
                };
                // A bare toggle flips the current state.
                let enabled = match msg.get::<bool>(MessageType::ToggleLight) {
                    Some(enabled) => enabled,
                    None => !entity
                        .with_component(|light: &Light| light.enabled)
                        .context("target has no light")?,
                };
                system.set_enabled(ctx, &entity, enabled);
                Ok(())
            });
    }
}

fn light_color(message: &Message) -> anyhow::Result<LinearRgba> {
    if let Some(color) = message.get::<LinearRgba>(MessageType::ChangeLightColor) {
        return Ok(color);
    }
    let hex: String = message
        .get(MessageType::ChangeLightColor)
        .context("ChangeLightColor expects a color or a hex string")?;
    LinearRgba::from_hex(&hex).with_context(|| format!("'{hex}' is not a hex color"))
}

impl System for LightSystem {
    fn system_type(&self) -> SystemType {
        SystemType::Light
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        self.register_handlers();
        Ok(())
    }

    fn add_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        self.track(ctx, entity);
    }

    fn remove_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        if self.lights.remove(entity.guid()).is_none() {
            return;
        }
        entity.with_component_mut(|light: &mut Light| Self::teardown(ctx, light));
        if self
            .default_light
            .as_ref()
            .is_some_and(|default| default.ptr_eq(entity))
        {
            self.default_light = None;
        }
    }

    fn shutdown(&mut self, ctx: &EcsContext) {
        for entity in self.lights.drain() {
            entity.with_component_mut(|light: &mut Light| Self::teardown(ctx, light));
        }
        if let Some(default) = self.default_light.take() {
            default.unregister(ctx);
        }
        log::debug!("LightSystem: all lights torn down");
    }
}
