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

//! GUID index of the registered entities.

use crate::context::EcsContext;
use crate::entity::Entity;
use crate::message_bus::MessageBus;
use crate::system::{System, SystemType};
use prism_core::Guid;
use std::collections::HashMap;

/// Resolves entity GUIDs carried by messages.
///
/// A GUID maps to at most one entity. Registering a second entity under a
/// GUID already in use is rejected and the first registration is kept.
#[derive(Default)]
pub struct EntityObjectLocatorSystem {
    bus: MessageBus<Self>,
    entities: HashMap<Guid, Entity>,
}

impl EntityObjectLocatorSystem {
    /// Creates an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes `entity` by its GUID.
    ///
    /// Registering the same entity again is a no-op that returns `true`.
    /// Returns `false` when another entity already uses the GUID.
    pub fn register_entity(&mut self, entity: &Entity) -> bool {
        if let Some(existing) = self.entities.get(entity.guid()) {
            if existing.ptr_eq(entity) {
                return true;
            }
            log::warn!(
                "Locator: GUID {} is already used by '{}', rejecting '{}'",
                entity.guid(),
                existing.name(),
                entity.name()
            );
            return false;
        }
        log::debug!("Locator: registered '{}' ({})", entity.name(), entity.guid());
        self.entities.insert(entity.guid().clone(), entity.clone());
        entity.set_registered(true);
        true
    }

    /// Removes `entity` from the index.
    ///
    /// Returns `false` if its GUID is unknown or registered to another
    /// entity, which then stays registered.
    pub fn unregister_entity(&mut self, entity: &Entity) -> bool {
        match self.entities.get(entity.guid()) {
            Some(existing) if existing.ptr_eq(entity) => {}
            Some(existing) => {
                log::debug!(
                    "Locator: '{}' does not own GUID {} (held by '{}'), keeping it",
                    entity.name(),
                    entity.guid(),
                    existing.name()
                );
                return false;
            }
            None => return false,
        }
        self.entities.remove(entity.guid());
        entity.set_registered(false);
        log::debug!("Locator: unregistered '{}' ({})", entity.name(), entity.guid());
        true
    }

    /// Returns the entity registered under `guid`.
    pub fn find_by_guid(&self, guid: &Guid) -> Option<Entity> {
        self.entities.get(guid).cloned()
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` when no entity is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl System for EntityObjectLocatorSystem {
    fn system_type(&self) -> SystemType {
        SystemType::EntityLocator
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn shutdown(&mut self, _ctx: &EcsContext) {
        for (_, entity) in self.entities.drain() {
            entity.set_registered(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_unregister() {
        let mut locator = EntityObjectLocatorSystem::new();
        let entity = Entity::new("Robot");
        let guid = entity.guid().clone();

        assert!(locator.register_entity(&entity));
        assert!(entity.is_registered());
        assert_eq!(locator.find_by_guid(&guid), Some(entity.clone()));

        assert!(locator.unregister_entity(&entity));
        assert!(locator.find_by_guid(&guid).is_none());
        assert!(!entity.is_registered());
        assert!(locator.is_empty());
    }

    #[test]
    fn duplicate_guid_keeps_first_entity() {
        let mut locator = EntityObjectLocatorSystem::new();
        let first = Entity::with_guid(Guid::from("shared"), "first");
        let second = Entity::with_guid(Guid::from("shared"), "second");

        assert!(locator.register_entity(&first));
        assert!(!locator.register_entity(&second));

        let found = locator.find_by_guid(&Guid::from("shared")).unwrap();
        assert_eq!(found.name(), "first");
        assert_eq!(locator.len(), 1);
    }

    #[test]
    fn rejected_duplicate_cannot_unregister_the_first_entity() {
        let mut locator = EntityObjectLocatorSystem::new();
        let first = Entity::with_guid(Guid::from("shared"), "first");
        let second = Entity::with_guid(Guid::from("shared"), "second");
        locator.register_entity(&first);
        locator.register_entity(&second);

        assert!(!locator.unregister_entity(&second));

        let found = locator.find_by_guid(&Guid::from("shared")).unwrap();
        assert!(found.ptr_eq(&first));
        assert!(first.is_registered());
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let mut locator = EntityObjectLocatorSystem::new();
        let entity = Entity::new("Lamp");
        assert!(locator.register_entity(&entity));
        assert!(locator.register_entity(&entity));
        assert_eq!(locator.len(), 1);
    }
}
