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

//! Ordered storage of the registered systems.

use crate::message_bus::Inbox;
use crate::system::{ErasedSystem, System, SystemType};
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Typed shared access to a registered system.
pub struct SystemHandle<S>(Arc<Mutex<S>>);

impl<S> SystemHandle<S> {
    /// Locks the system. A poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with the system locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<S> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

pub(crate) type ErasedHandle = Arc<Mutex<dyn ErasedSystem>>;

struct SystemEntry {
    system_type: SystemType,
    inbox: Arc<Inbox>,
    erased: ErasedHandle,
    typed: Arc<dyn Any + Send + Sync>,
}

/// Systems in registration order, one per [`SystemType`].
#[derive(Default)]
pub(crate) struct SystemRegistry {
    entries: Vec<SystemEntry>,
}

impl SystemRegistry {
    /// Registers `system`. A second system of the same type is rejected.
    pub(crate) fn register<S: System>(&mut self, system: S) -> bool {
        let system_type = system.system_type();
        if self.contains(system_type) {
            log::warn!(
                "SystemRegistry: {} system already registered, ignoring the new one",
                system_type
            );
            return false;
        }

        let inbox = system.bus().inbox();
        let typed = Arc::new(Mutex::new(system));
        let erased: ErasedHandle = typed.clone();
        self.entries.push(SystemEntry {
            system_type,
            inbox,
            erased,
            typed,
        });
        log::info!(
            "SystemRegistry: registered {} system (#{})",
            system_type,
            self.entries.len()
        );
        true
    }

    pub(crate) fn contains(&self, system_type: SystemType) -> bool {
        self.entries.iter().any(|e| e.system_type == system_type)
    }

    pub(crate) fn get<S: System>(&self) -> Option<SystemHandle<S>> {
        self.entries
            .iter()
            .find_map(|e| e.typed.clone().downcast::<Mutex<S>>().ok())
            .map(SystemHandle)
    }

    pub(crate) fn erased(&self, system_type: SystemType) -> Option<ErasedHandle> {
        self.entries
            .iter()
            .find(|e| e.system_type == system_type)
            .map(|e| e.erased.clone())
    }

    pub(crate) fn inbox(&self, system_type: SystemType) -> Option<Arc<Inbox>> {
        self.entries
            .iter()
            .find(|e| e.system_type == system_type)
            .map(|e| e.inbox.clone())
    }

    pub(crate) fn inboxes(&self) -> impl Iterator<Item = &Arc<Inbox>> {
        self.entries.iter().map(|e| &e.inbox)
    }

    /// Systems in registration order.
    pub(crate) fn snapshot(&self) -> Vec<(SystemType, ErasedHandle)> {
        self.entries
            .iter()
            .map(|e| (e.system_type, e.erased.clone()))
            .collect()
    }

    pub(crate) fn system_types(&self) -> Vec<SystemType> {
        self.entries.iter().map(|e| e.system_type).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
