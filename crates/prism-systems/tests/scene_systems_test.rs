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
use common::{manual_context, FRAME};
use prism_core::math::{LinearRgba, Vec3};
use prism_core::renderer::{
    CameraMode, CameraOrbit, ShapeKind, ViewQuality, DEFAULT_LIGHT_INTENSITY,
};
use prism_core::{Guid, Message, MessageType, MessageValue};
use prism_ecs::{ComponentType, EntityObjectLocatorSystem, Entity, Light, Shape};
use prism_systems::{LightSystem, ShapeSystem, ViewTargetSystem, DEFAULT_LIGHT_NAME};

#[test]
fn default_light_is_registered_everywhere() -> Result<()> {
    // ARRANGE
    let (engine, ctx) = manual_context();
    ctx.add_system(EntityObjectLocatorSystem::new());
    ctx.add_system(LightSystem::new());
    ctx.init_systems();
    let lights = ctx.system::<LightSystem>().unwrap();

    // ACT
    let light = lights.lock().create_default_light(&ctx);
    ctx.run_pending()?;

    // ASSERT
    let locator = ctx.system::<EntityObjectLocatorSystem>().unwrap();
    assert_eq!(locator.lock().len(), 1);
    let found = locator.lock().find_by_guid(light.guid()).unwrap();
    assert_eq!(found.name(), DEFAULT_LIGHT_NAME);
    assert_eq!(found.component_types(), vec![ComponentType::Light]);
    let params = found.with_component(|l: &Light| l.params).unwrap();
    assert_relative_eq!(params.intensity, DEFAULT_LIGHT_INTENSITY);
    assert_eq!(params.direction, Vec3::NEG_Y);
    assert_eq!(params.color, LinearRgba::WHITE);
    assert!(params.cast_shadows);
    assert!(lights.lock().lights().contains(light.guid()));
    assert_eq!(engine.lock().unwrap().lights_in_scene().len(), 1);
    Ok(())
}

#[test]
fn light_changes_rebuild_the_engine_light() -> Result<()> {
    // ARRANGE
    let (engine, ctx) = manual_context();
    ctx.add_system(EntityObjectLocatorSystem::new());
    ctx.add_system(LightSystem::new());
    ctx.init_systems();
    ctx.route_message(Message::command(MessageType::CreateDefaultLight));
    ctx.tick(FRAME);
    ctx.run_pending()?;
    let light = ctx
        .system::<LightSystem>()
        .unwrap()
        .lock()
        .default_light()
        .cloned()
        .unwrap();
    let old_handle = light.with_component(|l: &Light| l.handle).flatten().unwrap();

    // ACT
    ctx.route_message(
        Message::new(MessageType::ChangeLightIntensity, 5_000.0f32)
            .with(MessageType::EntityGuid, light.guid().clone()),
    );
    ctx.route_message(Message::new(MessageType::ChangeLightColor, "#ff0000"));
    ctx.tick(FRAME);

    // ASSERT
    let new_handle = light.with_component(|l: &Light| l.handle).flatten().unwrap();
    assert_ne!(old_handle, new_handle);
    let engine = engine.lock().unwrap();
    assert!(!engine.is_alive(old_handle));
    let in_scene = engine.lights_in_scene();
    assert_eq!(in_scene.len(), 1);
    assert_relative_eq!(in_scene[0].intensity, 5_000.0);
    assert_eq!(in_scene[0].color, LinearRgba::rgb(1.0, 0.0, 0.0));
    Ok(())
}

#[test]
fn toggle_light_removes_it_from_the_scene() -> Result<()> {
    let (engine, ctx) = manual_context();
    ctx.add_system(LightSystem::new());
    ctx.init_systems();
    ctx.system::<LightSystem>()
        .unwrap()
        .lock()
        .create_default_light(&ctx);

    ctx.route_message(Message::new(MessageType::ToggleLight, false));
    ctx.tick(FRAME);
    assert!(engine.lock().unwrap().lights_in_scene().is_empty());

    // A bare toggle flips the state back.
    ctx.route_message(Message::command(MessageType::ToggleLight));
    ctx.tick(FRAME);
    assert_eq!(engine.lock().unwrap().lights_in_scene().len(), 1);
    Ok(())
}

#[test]
fn light_message_for_unknown_guid_changes_nothing() -> Result<()> {
    let (engine, ctx) = manual_context();
    ctx.add_system(LightSystem::new());
    ctx.init_systems();
    ctx.system::<LightSystem>()
        .unwrap()
        .lock()
        .create_default_light(&ctx);

    ctx.route_message(
        Message::new(MessageType::ChangeLightIntensity, 1.0f32)
            .with(MessageType::EntityGuid, Guid::from("nobody")),
    );
    ctx.tick(FRAME);

    let in_scene = engine.lock().unwrap().lights_in_scene();
    assert_relative_eq!(in_scene[0].intensity, DEFAULT_LIGHT_INTENSITY);
    Ok(())
}

#[test]
fn shapes_respond_to_messages() -> Result<()> {
    // ARRANGE
    let (engine, ctx) = manual_context();
    ctx.add_system(ShapeSystem::new());
    ctx.init_systems();
    let cube = Entity::new("Cube");
    cube.add_component(&ctx, Shape::new(ShapeKind::Cube));
    let sphere = Entity::new("Sphere");
    sphere.add_component(
        &ctx,
        Shape::new(ShapeKind::Sphere {
            stacks: 8,
            slices: 16,
        }),
    );
    ctx.run_pending()?;
    assert_eq!(engine.lock().unwrap().shapes_in_scene(), 2);

    // ACT
    ctx.route_message(
        Message::new(MessageType::SetShapeVisibility, false)
            .with(MessageType::EntityGuid, cube.guid().clone()),
    );
    ctx.tick(FRAME);
    let after_hide = engine.lock().unwrap().shapes_in_scene();

    ctx.route_message(Message::new(MessageType::ToggleShapesInScene, false));
    ctx.tick(FRAME);
    let after_toggle = engine.lock().unwrap().shapes_in_scene();

    // ASSERT
    assert_eq!(after_hide, 1);
    assert_eq!(after_toggle, 0);
    assert_eq!(cube.with_component(|s: &Shape| s.visible), Some(false));
    Ok(())
}

#[test]
fn view_messages_are_keyed_by_view_index() -> Result<()> {
    // ARRANGE
    let (engine, ctx) = manual_context();
    ctx.add_system(ViewTargetSystem::new());
    ctx.init_systems();
    let views = ctx.system::<ViewTargetSystem>().unwrap();
    let index = views.lock().add_view_target(&ctx, 800, 600)?;

    // ACT
    ctx.route_message(
        Message::new(
            MessageType::ResizeViewTarget,
            MessageValue::Size {
                width: 1024,
                height: 768,
            },
        )
        .with(MessageType::ViewIndex, index),
    );
    ctx.route_message(
        Message::new(MessageType::ChangeViewQuality, ViewQuality::High)
            .with(MessageType::ViewIndex, index),
    );
    ctx.route_message(
        Message::new(MessageType::ChangeViewOffset, MessageValue::Offset { x: 10, y: 20 })
            .with(MessageType::ViewIndex, index),
    );
    let orbit = CameraOrbit {
        yaw: 0.5,
        ..CameraOrbit::default()
    };
    ctx.route_message(
        Message::new(MessageType::ChangeCameraOrbit, orbit).with(MessageType::ViewIndex, index),
    );
    // No view 7: logged, nothing else happens.
    ctx.route_message(
        Message::new(MessageType::ChangeCameraMode, CameraMode::AutoOrbit)
            .with(MessageType::ViewIndex, 7usize),
    );
    ctx.tick(FRAME);

    // ASSERT
    let views = views.lock();
    let view = views.view(index)?;
    assert_eq!((view.width, view.height), (1024, 768));
    assert_eq!(view.offset, (10, 20));
    assert_eq!(view.quality, ViewQuality::High);
    assert_eq!(view.mode, CameraMode::Orbit);
    assert_eq!(views.view_count(), 1);

    let engine = engine.lock().unwrap();
    let recorded = engine.view(view.handle).unwrap();
    assert_eq!((recorded.width, recorded.height), (1024, 768));
    assert_eq!(recorded.settings, Some(ViewQuality::High.settings()));
    assert_eq!(recorded.camera, Some(orbit.pose()));
    Ok(())
}
