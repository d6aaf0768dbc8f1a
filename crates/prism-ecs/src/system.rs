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

//! The system contract.

use crate::context::EcsContext;
use crate::entity::Entity;
use crate::message_bus::{process_messages, MessageBus};
use std::fmt;
use std::time::Duration;

/// Identifies a system. At most one system of each type is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemType {
    /// [`EntityObjectLocatorSystem`](crate::EntityObjectLocatorSystem).
    EntityLocator,
    /// Lights.
    Light,
    /// Animation playback.
    Animation,
    /// Primitive shapes.
    Shape,
    /// Model loading and instancing.
    Model,
    /// Views and cameras.
    ViewTarget,
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A unit of engine-side logic driven by the scheduler.
///
/// Every hook runs on the strand. Each tick the scheduler drains the
/// system's [`MessageBus`] and then calls [`update`](System::update).
///
/// A system is stored behind a mutex while it runs, so its handlers must not
/// look the system itself up through the context.
pub trait System: Send + 'static {
    /// The type key of this system.
    fn system_type(&self) -> SystemType;

    /// The system's inbox and handler registry.
    fn bus(&self) -> &MessageBus<Self>
    where
        Self: Sized;

    /// Registers handlers and creates owned resources.
    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Per-tick work, after the inbox has been processed.
    fn update(&mut self, _ctx: &EcsContext, _elapsed: Duration) {}

    /// Releases owned entities and engine objects.
    fn shutdown(&mut self, _ctx: &EcsContext) {}

    /// Called when an entity carrying this system's component is registered.
    fn add_entity(&mut self, _ctx: &EcsContext, _entity: &Entity) {}

    /// Called when an entity must be forgotten by this system.
    fn remove_entity(&mut self, _ctx: &EcsContext, _entity: &Entity) {}
}

/// The object-safe face of [`System`] used by the registry.
pub(crate) trait ErasedSystem: Send {
    fn kind(&self) -> SystemType;
    fn run_init(&mut self, ctx: &EcsContext);
    fn run_tick(&mut self, ctx: &EcsContext, elapsed: Duration) -> usize;
    fn run_shutdown(&mut self, ctx: &EcsContext);
    fn attach_entity(&mut self, ctx: &EcsContext, entity: &Entity);
    fn detach_entity(&mut self, ctx: &EcsContext, entity: &Entity);
}

impl<S: System> ErasedSystem for S {
    fn kind(&self) -> SystemType {
        self.system_type()
    }

    fn run_init(&mut self, ctx: &EcsContext) {
        log::debug!("Initializing {} system", self.system_type());
        if let Err(e) = self.init(ctx) {
            log::error!("{} system failed to initialize: {:#}", self.system_type(), e);
        }
    }

    fn run_tick(&mut self, ctx: &EcsContext, elapsed: Duration) -> usize {
        let processed = process_messages(self, ctx);
        self.update(ctx, elapsed);
        processed
    }

    fn run_shutdown(&mut self, ctx: &EcsContext) {
        log::debug!("Shutting down {} system", self.system_type());
        self.shutdown(ctx);
        self.bus().clear_handlers();
    }

    fn attach_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        self.add_entity(ctx, entity);
    }

    fn detach_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        self.remove_entity(ctx, entity);
    }
}
