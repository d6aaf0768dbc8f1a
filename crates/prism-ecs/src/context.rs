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

//! The explicit runtime context shared by every system.

use crate::entity::Entity;
use crate::registry::{ErasedHandle, SystemHandle, SystemRegistry};
use crate::strand::{Strand, StrandError};
use crate::system::{System, SystemType};
use prism_core::renderer::{RenderEngine, SharedEngine};
use prism_core::Message;
use std::collections::HashSet;
use std::panic::Location;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};
use std::time::Duration;

struct EcsShared {
    registry: RwLock<SystemRegistry>,
    strand: Strand,
    engine: SharedEngine,
    off_strand_sites: Mutex<HashSet<(&'static str, u32, u32)>>,
}

/// Cloneable handle on the systems, the strand and the render engine.
///
/// Everything that mutates engine state or system-owned maps runs on the
/// strand. The context can be used from any thread to route messages and
/// post work.
#[derive(Clone)]
pub struct EcsContext {
    shared: Arc<EcsShared>,
}

impl EcsContext {
    fn with_strand(engine: SharedEngine, strand: Strand) -> Self {
        Self {
            shared: Arc::new(EcsShared {
                registry: RwLock::new(SystemRegistry::default()),
                strand,
                engine,
                off_strand_sites: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Creates a context whose strand runs on a dedicated worker thread.
    pub fn new(engine: SharedEngine) -> Result<Self, StrandError> {
        Ok(Self::with_strand(engine, Strand::spawn("prism-strand")?))
    }

    /// Creates a context whose strand is drained by the calling thread with
    /// [`run_pending`](Self::run_pending).
    pub fn manual(engine: SharedEngine) -> Self {
        Self::with_strand(engine, Strand::manual())
    }

    fn registry(&self) -> RwLockReadGuard<'_, SystemRegistry> {
        self.shared
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, SystemRegistry> {
        self.shared
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The shared render engine.
    pub fn engine(&self) -> &SharedEngine {
        &self.shared.engine
    }

    /// Locks the render engine. Only the strand should call this.
    pub fn lock_engine(&self) -> MutexGuard<'_, dyn RenderEngine + 'static> {
        self.shared
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The strand of this context.
    pub fn strand(&self) -> &Strand {
        &self.shared.strand
    }

    /// Returns `true` when called from the strand.
    pub fn is_on_strand(&self) -> bool {
        self.shared.strand.is_current()
    }

    /// Registers a system. Registration order is init and update order.
    ///
    /// Returns `false`, leaving the registry untouched, when a system of the
    /// same type is already registered.
    pub fn add_system<S: System>(&self, system: S) -> bool {
        self.registry_mut().register(system)
    }

    /// Looks up a system by its concrete type.
    ///
    /// Calling this off the strand is tolerated but logged once per call
    /// site.
    #[track_caller]
    pub fn system<S: System>(&self) -> Option<SystemHandle<S>> {
        if !self.is_on_strand() {
            let caller = Location::caller();
            let first_time = self
                .shared
                .off_strand_sites
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert((caller.file(), caller.line(), caller.column()));
            if first_time {
                log::warn!(
                    "System lookup off the strand at {}:{}; system state may change concurrently",
                    caller.file(),
                    caller.line()
                );
            }
        }
        self.registry().get::<S>()
    }

    /// Number of distinct call sites that looked a system up off the strand,
    /// each reported once.
    pub fn off_strand_lookup_sites(&self) -> usize {
        self.shared
            .off_strand_sites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if a system of this type is registered.
    pub fn has_system(&self, system_type: SystemType) -> bool {
        self.registry().contains(system_type)
    }

    /// Registered system types, in registration order.
    pub fn system_types(&self) -> Vec<SystemType> {
        self.registry().system_types()
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.registry().len()
    }

    /// Queues a copy of `message` in every system's inbox.
    pub fn route_message(&self, message: Message) {
        let registry = self.registry();
        for inbox in registry.inboxes() {
            inbox.push(message.clone());
        }
    }

    /// Queues `message` in one system's inbox.
    ///
    /// Returns `false` when no system of that type is registered.
    pub fn send_message(&self, system_type: SystemType, message: Message) -> bool {
        match self.registry().inbox(system_type) {
            Some(inbox) => {
                inbox.push(message);
                true
            }
            None => {
                log::warn!("No {} system to receive the message", system_type);
                false
            }
        }
    }

    /// Posts work to the strand.
    ///
    /// The task does not keep the context alive; it is skipped if the
    /// context is gone by the time it runs.
    pub fn post(&self, f: impl FnOnce(&EcsContext) + Send + 'static) -> Result<(), StrandError> {
        let weak: Weak<EcsShared> = Arc::downgrade(&self.shared);
        self.shared.strand.post(move || {
            if let Some(shared) = weak.upgrade() {
                f(&EcsContext { shared });
            }
        })
    }

    /// Runs `f` on the strand and waits for its result.
    pub fn run_blocking<R, F>(&self, f: F) -> Result<R, StrandError>
    where
        R: Send + 'static,
        F: FnOnce(&EcsContext) -> R + Send + 'static,
    {
        let ctx = self.clone();
        self.shared.strand.run_blocking(move || f(&ctx))
    }

    /// Drains a manual strand on the calling thread.
    pub fn run_pending(&self) -> Result<usize, StrandError> {
        self.shared.strand.run_pending()
    }

    fn erased(&self, system_type: SystemType) -> Option<ErasedHandle> {
        self.registry().erased(system_type)
    }

    /// Hands `entity` to a system's `add_entity` hook. Must run on the strand.
    pub fn add_entity_to_system(&self, system_type: SystemType, entity: &Entity) {
        match self.erased(system_type) {
            Some(system) => lock(&system).attach_entity(self, entity),
            None => log::warn!(
                "Entity '{}' targets the {} system, which is not registered",
                entity.name(),
                system_type
            ),
        }
    }

    /// Hands `entity` to a system's `remove_entity` hook. Must run on the
    /// strand.
    pub fn remove_entity_from_system(&self, system_type: SystemType, entity: &Entity) {
        if let Some(system) = self.erased(system_type) {
            lock(&system).detach_entity(self, entity);
        }
    }

    /// Runs `init` on every system in registration order. Must run on the
    /// strand.
    pub fn init_systems(&self) {
        let systems = self.registry().snapshot();
        for (_, system) in systems {
            lock(&system).run_init(self);
        }
    }

    /// Runs one tick: every system processes its inbox and then updates, in
    /// registration order. Must run on the strand.
    ///
    /// Returns the number of messages processed.
    pub fn tick(&self, elapsed: Duration) -> usize {
        let systems = self.registry().snapshot();
        systems
            .into_iter()
            .map(|(_, system)| lock(&system).run_tick(self, elapsed))
            .sum()
    }

    /// Runs `shutdown` on every system in reverse registration order. Must
    /// run on the strand.
    pub fn shutdown_systems(&self) {
        let systems = self.registry().snapshot();
        for (_, system) in systems.into_iter().rev() {
            lock(&system).run_shutdown(self);
        }
    }
}

fn lock(system: &ErasedHandle) -> MutexGuard<'_, dyn crate::system::ErasedSystem + 'static> {
    system.lock().unwrap_or_else(PoisonError::into_inner)
}
