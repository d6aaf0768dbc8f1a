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

use anyhow::{bail, Result};
use prism_core::renderer::HeadlessEngine;
use prism_core::{Guid, Message, MessageType};
use prism_ecs::{process_messages, EcsContext, MessageBus, System, SystemType};
use std::time::Duration;

// --- Test Setup: a system that records what its handlers saw ---
#[derive(Default)]
struct RecordingSystem {
    bus: MessageBus<Self>,
    seen: Vec<String>,
}

impl System for RecordingSystem {
    fn system_type(&self) -> SystemType {
        SystemType::Light
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }
}

fn context() -> EcsContext {
    let (_, engine) = HeadlessEngine::shared();
    EcsContext::manual(engine)
}
// ---

#[test]
fn each_handler_runs_once_per_message_in_registration_order() {
    // ARRANGE
    let ctx = context();
    let mut system = RecordingSystem::default();
    system
        .bus
        .register_handler(MessageType::ToggleLight, |s: &mut RecordingSystem, m, _| {
            s.seen.push(format!("a:{}", m.get::<bool>(MessageType::ToggleLight).unwrap()));
            Ok(())
        });
    system
        .bus
        .register_handler(MessageType::ToggleLight, |s: &mut RecordingSystem, _, _| {
            s.seen.push("b".into());
            Ok(())
        });

    // ACT
    for flag in [true, false, true] {
        system
            .bus
            .send_message(Message::new(MessageType::ToggleLight, flag));
    }
    let processed = process_messages(&mut system, &ctx);

    // ASSERT
    assert_eq!(processed, 3);
    assert_eq!(
        system.seen,
        vec!["a:true", "b", "a:false", "b", "a:true", "b"]
    );
    assert_eq!(system.bus.pending(), 0);
}

#[test]
fn multi_key_messages_dispatch_by_ascending_type() {
    let ctx = context();
    let mut system = RecordingSystem::default();
    system
        .bus
        .register_handler(MessageType::ChangeLightIntensity, |s: &mut RecordingSystem, _, _| {
            s.seen.push("intensity".into());
            Ok(())
        });
    system
        .bus
        .register_handler(MessageType::EntityGuid, |s: &mut RecordingSystem, _, _| {
            s.seen.push("guid".into());
            Ok(())
        });

    system.bus.send_message(
        Message::new(MessageType::ChangeLightIntensity, 10.0f32)
            .with(MessageType::EntityGuid, Guid::from("lamp")),
    );
    process_messages(&mut system, &ctx);

    assert_eq!(system.seen, vec!["guid", "intensity"]);
}

#[test]
fn failing_and_panicking_handlers_do_not_stop_dispatch() {
    let ctx = context();
    let mut system = RecordingSystem::default();
    system
        .bus
        .register_handler(MessageType::ToggleLight, |_: &mut RecordingSystem, _, _| {
            bail!("malformed payload")
        });
    system
        .bus
        .register_handler(MessageType::ToggleLight, |_: &mut RecordingSystem, _, _| {
            panic!("handler bug")
        });
    system
        .bus
        .register_handler(MessageType::ToggleLight, |s: &mut RecordingSystem, _, _| {
            s.seen.push("survivor".into());
            Ok(())
        });

    system.bus.send_message(Message::command(MessageType::ToggleLight));
    system.bus.send_message(Message::command(MessageType::ToggleLight));
    process_messages(&mut system, &ctx);

    assert_eq!(system.seen, vec!["survivor", "survivor"]);
}

#[test]
fn messages_without_handlers_are_dropped() {
    let ctx = context();
    let mut system = RecordingSystem::default();
    system.bus.send_message(Message::command(MessageType::CreateDefaultLight));

    assert_eq!(process_messages(&mut system, &ctx), 1);
    assert_eq!(process_messages(&mut system, &ctx), 0);
    assert!(system.seen.is_empty());
}

#[test]
fn unregistered_handlers_no_longer_run() {
    let ctx = context();
    let mut system = RecordingSystem::default();
    system
        .bus
        .register_handler(MessageType::ToggleLight, |s: &mut RecordingSystem, _, _| {
            s.seen.push("toggle".into());
            Ok(())
        });
    assert_eq!(system.bus.handler_count(MessageType::ToggleLight), 1);

    system.bus.unregister_handler(MessageType::ToggleLight);
    system.bus.send_message(Message::command(MessageType::ToggleLight));
    process_messages(&mut system, &ctx);

    assert!(system.seen.is_empty());
    assert_eq!(system.bus.handler_count(MessageType::ToggleLight), 0);
}

#[test]
fn routed_messages_reach_registered_systems_on_tick() -> Result<()> {
    let ctx = context();
    let mut system = RecordingSystem::default();
    system
        .bus
        .register_handler(MessageType::ToggleLight, |s: &mut RecordingSystem, _, _| {
            s.seen.push("routed".into());
            Ok(())
        });
    assert!(ctx.add_system(system));

    let sender = ctx.clone();
    std::thread::spawn(move || sender.route_message(Message::command(MessageType::ToggleLight)))
        .join()
        .expect("sender thread");
    ctx.tick(Duration::from_millis(16));

    let handle = ctx.system::<RecordingSystem>().expect("registered");
    assert_eq!(handle.lock().seen, vec!["routed"]);
    Ok(())
}
