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

use prism_core::renderer::HeadlessEngine;
use prism_core::Guid;
use prism_ecs::{
    Component, EcsContext, Entity, EntityObjectLocatorSystem, Light, MessageBus, System,
    SystemType,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Journal = Arc<Mutex<Vec<String>>>;

// --- Test Setup: systems that log their lifecycle into a shared journal ---
struct JournalSystem {
    bus: MessageBus<Self>,
    kind: SystemType,
    journal: Journal,
    entities: Vec<Guid>,
}

impl JournalSystem {
    fn new(kind: SystemType, journal: &Journal) -> Self {
        Self {
            bus: MessageBus::new(),
            kind,
            journal: journal.clone(),
            entities: Vec::new(),
        }
    }

    fn log(&self, event: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", event, self.kind));
    }
}

impl System for JournalSystem {
    fn system_type(&self) -> SystemType {
        self.kind
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        self.log("init");
        Ok(())
    }

    fn update(&mut self, _ctx: &EcsContext, _elapsed: Duration) {
        self.log("update");
    }

    fn shutdown(&mut self, _ctx: &EcsContext) {
        self.log("shutdown");
    }

    fn add_entity(&mut self, _ctx: &EcsContext, entity: &Entity) {
        self.entities.push(entity.guid().clone());
    }
}

fn context() -> EcsContext {
    let (_, engine) = HeadlessEngine::shared();
    EcsContext::manual(engine)
}
// ---

#[test]
fn lifecycle_follows_registration_order_and_shutdown_reverses_it() {
    // ARRANGE
    let ctx = context();
    let journal = Journal::default();
    for kind in [SystemType::Light, SystemType::Shape, SystemType::Model] {
        assert!(ctx.add_system(JournalSystem::new(kind, &journal)));
    }

    // ACT
    ctx.init_systems();
    ctx.tick(Duration::from_millis(16));
    ctx.shutdown_systems();

    // ASSERT
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "init:Light",
            "init:Shape",
            "init:Model",
            "update:Light",
            "update:Shape",
            "update:Model",
            "shutdown:Model",
            "shutdown:Shape",
            "shutdown:Light",
        ]
    );
}

#[test]
fn duplicate_system_type_is_rejected() {
    let ctx = context();
    let journal = Journal::default();
    assert!(ctx.add_system(JournalSystem::new(SystemType::Light, &journal)));
    assert!(!ctx.add_system(JournalSystem::new(SystemType::Light, &journal)));
    assert_eq!(ctx.system_count(), 1);
    assert!(ctx.system::<EntityObjectLocatorSystem>().is_none());
}

#[test]
fn add_component_registers_with_home_system_through_the_strand() {
    let ctx = context();
    let journal = Journal::default();
    ctx.add_system(JournalSystem::new(SystemType::Light, &journal));
    let lamp = Entity::new("Lamp");

    lamp.add_component(&ctx, Light::default());
    let light_system = ctx.system::<JournalSystem>().unwrap();
    assert!(light_system.lock().entities.is_empty());

    ctx.run_pending().unwrap();
    assert_eq!(light_system.lock().entities, vec![lamp.guid().clone()]);
}

#[test]
fn attach_component_does_not_register() {
    let ctx = context();
    let journal = Journal::default();
    ctx.add_system(JournalSystem::new(SystemType::Light, &journal));
    let lamp = Entity::new("Lamp");

    lamp.attach_component(Component::new(Light::default()));
    ctx.run_pending().unwrap();

    assert!(ctx.system::<JournalSystem>().unwrap().lock().entities.is_empty());
}

#[test]
fn entity_registration_is_idempotent() {
    let ctx = context();
    ctx.add_system(EntityObjectLocatorSystem::new());
    let robot = Entity::new("Robot");

    robot.register(&ctx);
    robot.register(&ctx);
    ctx.run_pending().unwrap();

    let locator = ctx.system::<EntityObjectLocatorSystem>().unwrap();
    assert_eq!(locator.lock().len(), 1);
    assert!(robot.is_registered());

    robot.unregister(&ctx);
    robot.unregister(&ctx);
    ctx.run_pending().unwrap();
    assert!(locator.lock().find_by_guid(robot.guid()).is_none());
    assert!(!robot.is_registered());
}

#[test]
fn rejected_duplicate_is_not_marked_registered() {
    let ctx = context();
    ctx.add_system(EntityObjectLocatorSystem::new());
    let first = Entity::with_guid(Guid::from("same"), "first");
    let second = Entity::with_guid(Guid::from("same"), "second");

    first.register(&ctx);
    second.register(&ctx);
    ctx.run_pending().unwrap();

    assert!(first.is_registered());
    assert!(!second.is_registered());
    let found = ctx
        .system::<EntityObjectLocatorSystem>()
        .unwrap()
        .lock()
        .find_by_guid(&Guid::from("same"))
        .unwrap();
    assert_eq!(found, first);
}

#[test]
fn unregistering_a_rejected_duplicate_keeps_the_first_entity() {
    // ARRANGE
    let ctx = context();
    ctx.add_system(EntityObjectLocatorSystem::new());
    let first = Entity::with_guid(Guid::from("same"), "first");
    let second = Entity::with_guid(Guid::from("same"), "second");

    // ACT: the duplicate unregisters before its rejection ran.
    first.register(&ctx);
    second.register(&ctx);
    second.unregister(&ctx);
    ctx.run_pending().unwrap();

    // ASSERT
    let locator = ctx.system::<EntityObjectLocatorSystem>().unwrap();
    let found = locator.lock().find_by_guid(&Guid::from("same"));
    assert_eq!(found, Some(first.clone()));
    assert!(first.is_registered());
    assert!(!second.is_registered());
    assert_eq!(locator.lock().len(), 1);
}

#[test]
fn threaded_context_runs_posted_work_on_the_strand() {
    let (_, engine) = HeadlessEngine::shared();
    let ctx = EcsContext::new(engine).unwrap();
    assert!(!ctx.is_on_strand());
    assert!(ctx.run_blocking(|ctx| ctx.is_on_strand()).unwrap());
}

#[test]
fn off_strand_lookups_are_reported_once_per_call_site() {
    // ARRANGE
    let (_, engine) = HeadlessEngine::shared();
    let ctx = EcsContext::new(engine).unwrap();
    ctx.add_system(EntityObjectLocatorSystem::new());

    // ACT: one site twice, a second site once, then a lookup on the strand.
    for _ in 0..2 {
        assert!(ctx.system::<EntityObjectLocatorSystem>().is_some());
    }
    let after_first_site = ctx.off_strand_lookup_sites();
    assert!(ctx.system::<EntityObjectLocatorSystem>().is_some());
    let found_on_strand = ctx
        .run_blocking(|ctx| ctx.system::<EntityObjectLocatorSystem>().is_some())
        .unwrap();

    // ASSERT
    assert_eq!(after_first_site, 1);
    assert!(found_on_strand);
    assert_eq!(ctx.off_strand_lookup_sites(), 2);
}
