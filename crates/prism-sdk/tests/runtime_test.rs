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

use anyhow::Result;
use prism_control::SchedulerState;
use prism_core::asset::AssetLocation;
use prism_core::renderer::{HeadlessEngine, ShapeKind, ViewQuality};
use prism_core::{Message, MessageType, MessageValue};
use prism_ecs::{EntityObjectLocatorSystem, Model, ModelState};
use prism_io::LoadStatus;
use prism_sdk::{RuntimeConfig, SceneRuntime};
use prism_systems::{ModelSystemConfig, ViewTargetSystem};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

const FRAME: Duration = Duration::from_millis(16);

// --- Test Setup: a one-triangle glTF written to a temporary asset root ---
const TRIANGLE_GLTF: &str = r#"{
  "asset": {"version": "2.0"},
  "buffers": [{"byteLength": 36, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"}],
  "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
  "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0]}],
  "meshes": [{"name": "triangle", "primitives": [{"attributes": {"POSITION": 0}}]}],
  "nodes": [{"mesh": 0}]
}"#;

fn config_for(asset_root: &Path) -> RuntimeConfig {
    RuntimeConfig {
        models: ModelSystemConfig {
            asset_root: asset_root.to_path_buf(),
            ..ModelSystemConfig::default()
        },
        ..RuntimeConfig::default()
    }
}

fn manual_runtime(config: RuntimeConfig) -> Result<(Arc<Mutex<HeadlessEngine>>, SceneRuntime)> {
    let (engine, shared) = HeadlessEngine::shared();
    Ok((engine, SceneRuntime::manual(shared, config)?))
}
// ---

#[test]
fn default_light_is_created_and_registered() -> Result<()> {
    // ARRANGE
    let (engine, runtime) = manual_runtime(RuntimeConfig::default())?;

    // ACT
    runtime.update(FRAME)?;

    // ASSERT
    let light = runtime.default_light().cloned().unwrap();
    let found = runtime.with_system::<EntityObjectLocatorSystem, _>(move |locator, _| {
        locator.find_by_guid(light.guid()).is_some()
    })?;
    assert!(found);
    assert_eq!(engine.lock().unwrap().lights_in_scene().len(), 1);
    assert_eq!(runtime.context().system_count(), 6);
    Ok(())
}

#[test]
fn default_light_can_be_disabled() -> Result<()> {
    let config = RuntimeConfig {
        create_default_light: false,
        ..RuntimeConfig::default()
    };
    let (engine, runtime) = manual_runtime(config)?;

    runtime.update(FRAME)?;

    assert!(runtime.default_light().is_none());
    assert!(engine.lock().unwrap().lights_in_scene().is_empty());
    Ok(())
}

#[test]
fn view_messages_wait_for_the_first_view() -> Result<()> {
    // ARRANGE
    let (engine, runtime) = manual_runtime(RuntimeConfig::default())?;
    runtime.route_message(Message::new(
        MessageType::ResizeViewTarget,
        MessageValue::Size {
            width: 1024,
            height: 768,
        },
    ));
    runtime.route_message(
        Message::new(MessageType::ChangeViewQuality, ViewQuality::High)
            .with(MessageType::ViewIndex, 0usize),
    );
    // Not a view message: delivered right away.
    runtime.route_message(Message::new(MessageType::ToggleLight, false));
    runtime.update(FRAME)?;
    assert_eq!(runtime.deferred_view_messages(), 2);
    assert!(engine.lock().unwrap().lights_in_scene().is_empty());

    // ACT
    let index = runtime.add_view_target(800, 600)?;
    runtime.update(FRAME)?;

    // ASSERT
    assert_eq!(index, 0);
    assert_eq!(runtime.deferred_view_messages(), 0);
    let (size, quality) = runtime.with_system::<ViewTargetSystem, _>(move |views, _| {
        let view = views.view(index)?;
        Ok::<_, prism_systems::ViewTargetError>(((view.width, view.height), view.quality))
    })??;
    assert_eq!(size, (1024, 768));
    assert_eq!(quality, ViewQuality::High);
    Ok(())
}

#[test]
fn view_messages_after_the_first_view_are_not_deferred() -> Result<()> {
    let (_engine, runtime) = manual_runtime(RuntimeConfig::default())?;
    let index = runtime.add_view_target(320, 240)?;

    runtime.route_message(
        Message::new(MessageType::ChangeViewOffset, MessageValue::Offset { x: 4, y: 2 })
            .with(MessageType::ViewIndex, index),
    );
    runtime.update(FRAME)?;

    assert_eq!(runtime.deferred_view_messages(), 0);
    let offset = runtime.with_system::<ViewTargetSystem, _>(move |views, _| {
        views.view(index).map(|view| view.offset)
    })??;
    assert_eq!(offset, (4, 2));
    Ok(())
}

#[test]
fn spawned_model_loads_from_the_asset_root() -> Result<()> {
    // ARRANGE
    let dir = tempdir()?;
    std::fs::write(dir.path().join("triangle.gltf"), TRIANGLE_GLTF)?;
    let (engine, runtime) = manual_runtime(config_for(dir.path()))?;

    // ACT
    let (model, mut future) =
        runtime.spawn_model("Triangle", AssetLocation::Path("triangle.gltf".into()), false)?;
    assert_eq!(future.try_result(), None);
    runtime.update(FRAME)?;

    // ASSERT
    assert!(matches!(future.try_result(), Some(Ok(LoadStatus::Loaded(_)))));
    assert_eq!(
        model.with_component(|m: &Model| m.state.clone()),
        Some(ModelState::Loaded)
    );
    assert_eq!(engine.lock().unwrap().renderables_in_scene(), 1);
    Ok(())
}

#[test]
fn missing_model_resolves_an_error() -> Result<()> {
    let dir = tempdir()?;
    let (engine, runtime) = manual_runtime(config_for(dir.path()))?;

    let (model, future) =
        runtime.spawn_model("Missing", AssetLocation::Path("nope.glb".into()), true)?;
    runtime.update(FRAME)?;

    assert!(future.wait().is_err());
    assert!(matches!(
        model.with_component(|m: &Model| m.state.clone()),
        Some(ModelState::Failed(_))
    ));
    assert_eq!(engine.lock().unwrap().renderables_in_scene(), 0);
    Ok(())
}

#[test]
fn stop_releases_the_scene() -> Result<()> {
    // ARRANGE
    let dir = tempdir()?;
    std::fs::write(dir.path().join("triangle.gltf"), TRIANGLE_GLTF)?;
    let (engine, mut runtime) = manual_runtime(config_for(dir.path()))?;
    let _ = runtime.spawn_model("Triangle", AssetLocation::Path("triangle.gltf".into()), true)?;
    runtime.spawn_shape("Cube", ShapeKind::Cube);
    runtime.update(FRAME)?;
    assert!(engine.lock().unwrap().scene_len() > 0);

    // ACT
    runtime.stop()?;

    // ASSERT
    assert_eq!(runtime.state(), SchedulerState::Shutdown);
    assert_eq!(engine.lock().unwrap().lights_in_scene().len(), 0);
    assert_eq!(engine.lock().unwrap().renderables_in_scene(), 0);
    assert_eq!(engine.lock().unwrap().scene_len(), 0);
    assert!(runtime.update(FRAME).is_err());
    Ok(())
}

#[test]
fn threaded_runtime_runs_the_frame_loop() -> Result<()> {
    // ARRANGE
    let dir = tempdir()?;
    std::fs::write(dir.path().join("triangle.gltf"), TRIANGLE_GLTF)?;
    let (engine, shared) = HeadlessEngine::shared();
    let mut config = config_for(dir.path());
    config.scheduler.frame_interval_ms = 5;
    let mut runtime = SceneRuntime::threaded(shared, config)?;

    // ACT
    runtime.start()?;
    let (_model, future) =
        runtime.spawn_model("Triangle", AssetLocation::Path("triangle.gltf".into()), false)?;
    let status = future.wait()?;

    let deadline = Instant::now() + Duration::from_secs(5);
    while engine.lock().unwrap().renderables_in_scene() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    runtime.stop()?;

    // ASSERT
    assert!(status.message().contains("triangle.gltf"), "{}", status.message());
    assert!(runtime.frame_stats().ticks_run() > 0);
    assert_eq!(runtime.state(), SchedulerState::Shutdown);
    assert_eq!(engine.lock().unwrap().scene_len(), 0);
    Ok(())
}

#[test]
fn config_survives_a_trip_through_a_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("runtime.json");
    let mut config = RuntimeConfig::default();
    config.scheduler.frame_interval_ms = 8;
    config.log_filter = "debug".into();

    config.to_file(&path)?;

    assert_eq!(RuntimeConfig::from_file(&path)?, config);
    Ok(())
}
