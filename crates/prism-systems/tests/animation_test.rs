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

mod common;

use anyhow::Result;
use approx::assert_relative_eq;
use common::{manual_context, model_gltf, MemoryFetcher};
use prism_core::renderer::{EngineHandle, HeadlessEngine};
use prism_core::{Message, MessageType};
use prism_ecs::{Animation, EcsContext, Entity};
use prism_io::GltfDecoder;
use prism_systems::{AnimationSystem, ModelSystem, ModelSystemConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Test Setup: an animated model with one 1.5 s clip named "slide" ---
struct Scene {
    engine: Arc<Mutex<HeadlessEngine>>,
    ctx: EcsContext,
    model: Entity,
    instance: EngineHandle,
}

fn animated_scene() -> Result<Scene> {
    let (engine, ctx) = manual_context();
    ctx.add_system(AnimationSystem::new());
    ctx.add_system(ModelSystem::with_sources(
        ModelSystemConfig::default(),
        MemoryFetcher::new()
            .with("walker.gltf", model_gltf(1))
            .shared(),
        Arc::new(GltfDecoder),
    ));
    ctx.init_systems();

    let model = Entity::new("Walker");
    model.add_component(&ctx, Animation::default());
    let _ = ctx
        .system::<ModelSystem>()
        .unwrap()
        .lock()
        .load_from_path(&ctx, &model, "walker.gltf");
    ctx.run_pending()?;

    let instance = model
        .with_component(|a: &Animation| a.instance)
        .flatten()
        .expect("the loader publishes the instance");
    Ok(Scene {
        engine,
        ctx,
        model,
        instance,
    })
}

fn command(scene: &Scene, message_type: MessageType, value: impl Into<prism_core::MessageValue>) {
    scene.ctx.route_message(
        Message::new(message_type, value).with(MessageType::EntityGuid, scene.model.guid().clone()),
    );
}

fn tick(scene: &Scene, millis: u64) -> Option<(usize, f32)> {
    scene.ctx.tick(Duration::from_millis(millis));
    scene.engine.lock().unwrap().animation_pose(scene.instance)
}
// ---

#[test]
fn loader_publishes_clips() -> Result<()> {
    let scene = animated_scene()?;

    let clips = scene
        .model
        .with_component(|a: &Animation| a.clips.clone())
        .unwrap();

    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].name, "slide");
    assert_relative_eq!(clips[0].duration_secs, 1.5);
    Ok(())
}

#[test]
fn play_by_name_advances_with_speed() -> Result<()> {
    // ARRANGE
    let scene = animated_scene()?;
    command(&scene, MessageType::AnimationChangeSpeed, 2.0f32);
    command(&scene, MessageType::AnimationPlay, "slide");

    // ACT
    let first = tick(&scene, 100).unwrap();

    // ASSERT
    assert_eq!(first.0, 0);
    assert_relative_eq!(first.1, 0.2, epsilon = 1e-4);
    Ok(())
}

#[test]
fn idle_animation_starts_the_queue_and_stops_at_the_end() -> Result<()> {
    // ARRANGE
    let scene = animated_scene()?;
    command(&scene, MessageType::AnimationEnqueue, 0usize);

    // ACT / ASSERT
    assert_eq!(tick(&scene, 16), Some((0, 0.0)));
    let (_, time) = tick(&scene, 1_000).unwrap();
    assert_relative_eq!(time, 1.0, epsilon = 1e-4);

    let (_, end) = tick(&scene, 1_000).unwrap();
    assert_relative_eq!(end, 1.5);
    let playing = scene
        .model
        .with_component(|a: &Animation| a.is_playing())
        .unwrap();
    assert!(!playing);
    Ok(())
}

#[test]
fn looping_clip_wraps_and_pause_freezes() -> Result<()> {
    // ARRANGE
    let scene = animated_scene()?;
    command(&scene, MessageType::AnimationSetLooping, true);
    command(&scene, MessageType::AnimationPlay, 0usize);
    tick(&scene, 1_000);

    // ACT
    let (_, wrapped) = tick(&scene, 1_000).unwrap();
    command(&scene, MessageType::AnimationPause, prism_core::MessageValue::Unit);
    let frozen = tick(&scene, 1_000).unwrap();

    // ASSERT
    assert_relative_eq!(wrapped, 0.5, epsilon = 1e-4);
    assert_relative_eq!(frozen.1, wrapped);
    Ok(())
}

#[test]
fn out_of_range_clip_is_rejected() -> Result<()> {
    let scene = animated_scene()?;

    command(&scene, MessageType::AnimationEnqueue, 5usize);
    command(&scene, MessageType::AnimationPlay, "missing");
    let pose = tick(&scene, 16);

    assert_eq!(pose, None);
    let queued = scene
        .model
        .with_component(|a: &Animation| a.queue.len())
        .unwrap();
    assert_eq!(queued, 0);
    Ok(())
}
