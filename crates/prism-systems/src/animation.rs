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

//! Clip queues and playback of animated models.

use crate::index::EntityIndex;
use anyhow::{bail, Context as _};
use prism_core::message::FromMessageValue;
use prism_core::{Message, MessageType, MessageValue};
use prism_ecs::{Animation, EcsContext, Entity, MessageBus, System, SystemType};
use std::time::Duration;

/// Drives the [`Animation`] component of every animated entity.
///
/// Requests are accepted as soon as the component exists. Playback only
/// advances once the model loader published the engine instance.
pub struct AnimationSystem {
    bus: MessageBus<Self>,
    animations: EntityIndex,
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSystem {
    /// Creates a system with no animated entity.
    pub fn new() -> Self {
        Self {
            bus: MessageBus::new(),
            animations: EntityIndex::new(SystemType::Animation),
        }
    }

    /// The animated entities.
    pub fn animations(&self) -> &EntityIndex {
        &self.animations
    }

    /// Advances every animation by `elapsed` and pushes the resulting poses.
    ///
    /// Returns how many poses were applied.
    pub fn advance_all(&mut self, ctx: &EcsContext, elapsed: Duration) -> usize {
        let elapsed_secs = elapsed.as_secs_f32();
        let mut applied = 0;
        for entity in self.animations.iter() {
            let pose = entity
                .with_component_mut(|animation: &mut Animation| {
                    let instance = animation.instance?;
                    animation.advance(elapsed_secs).map(|pose| (instance, pose))
                })
                .flatten();
            let Some((instance, (clip, time))) = pose else {
                continue;
            };
            match ctx.lock_engine().apply_animation(instance, clip, time) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("AnimationSystem: '{}': {}", entity.name(), e),
            }
        }
        applied
    }

    fn with_target(
        &self,
        message: &Message,
        f: impl FnOnce(&mut Animation) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let Some(entity) = self.animations.resolve(message)? else {
            return Ok(());
        };
        entity
            .with_component_mut(f)
            .with_context(|| format!("'{}' has no animation", entity.name()))?
    }

    fn register_handlers(&self) {
        self.bus
            .register_handler(MessageType::AnimationEnqueue, |system: &mut Self, msg, _| {
                system.with_target(msg, |animation| {
                    let clip = requested_clip(animation, msg, MessageType::AnimationEnqueue)?;
                    animation.enqueue(clip);
                    Ok(())
                })
            });

        self.bus
            .register_handler(MessageType::AnimationClearQueue, |system: &mut Self, msg, _| {
                system.with_target(msg, |animation| {
                    animation.queue.clear();
                    Ok(())
                })
            });

        self.bus
            .register_handler(MessageType::AnimationPlay, |system: &mut Self, msg, _| {
                system.with_target(msg, |animation| {
                    let clip = requested_clip(animation, msg, MessageType::AnimationPlay)?;
                    animation.play(clip);
                    Ok(())
                })
            });

        self.bus
            .register_handler(MessageType::AnimationPause, |system: &mut Self, msg, _| {
                system.with_target(msg, |animation| {
                    animation.paused = true;
                    Ok(())
                })
            });

        self.bus
            .register_handler(MessageType::AnimationResume, |system: &mut Self, msg, _| {
                system.with_target(msg, |animation| {
                    animation.paused = false;
                    Ok(())
                })
            });

        self.bus
            .register_handler(MessageType::AnimationChangeSpeed, |system: &mut Self, msg, _| {
                let speed: f32 = msg
                    .get(MessageType::AnimationChangeSpeed)
                    .context("AnimationChangeSpeed expects a number")?;
                system.with_target(msg, |animation| {
                    animation.set_speed(speed);
                    Ok(())
                })
            });

        self.bus
            .register_handler(MessageType::AnimationSetLooping, |system: &mut Self, msg, _| {
                let looping: bool = msg
                    .get(MessageType::AnimationSetLooping)
                    .context("AnimationSetLooping expects a boolean")?;
                system.with_target(msg, |animation| {
                    animation.set_looping(looping);
                    Ok(())
                })
            });
    }
}

/// Reads a clip given either by index or by name.
fn requested_clip(
    animation: &Animation,
    message: &Message,
    message_type: MessageType,
) -> anyhow::Result<usize> {
    let clip = match message.value(message_type) {
        Some(MessageValue::Text(name)) => animation
            .clip_index(name)
            .with_context(|| format!("no clip named '{name}'"))?,
        Some(value) => usize::from_message_value(value)
            .with_context(|| format!("{message_type:?} expects a clip index or name"))?,
        None => bail!("{message_type:?} has no payload"),
    };
    if !animation.accepts_clip(clip) {
        bail!(
            "clip {} out of range ({} clips)",
            clip,
            animation.clips.len()
        );
    }
    Ok(clip)
}

impl System for AnimationSystem {
    fn system_type(&self) -> SystemType {
        SystemType::Animation
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        self.register_handlers();
        Ok(())
    }

    fn update(&mut self, ctx: &EcsContext, elapsed: Duration) {
        let applied = self.advance_all(ctx, elapsed);
        if applied > 0 {
            log::trace!("AnimationSystem: {} poses applied", applied);
        }
    }

    fn add_entity(&mut self, _ctx: &EcsContext, entity: &Entity) {
        if self.animations.insert(entity) {
            log::debug!("AnimationSystem: tracking '{}'", entity.name());
        }
    }

    fn remove_entity(&mut self, _ctx: &EcsContext, entity: &Entity) {
        self.animations.remove(entity.guid());
    }

    fn shutdown(&mut self, _ctx: &EcsContext) {
        self.animations.drain();
    }
}
