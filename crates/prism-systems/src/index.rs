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

//! GUID index kept by each system for the entities it manages.

use anyhow::anyhow;
use prism_core::{Guid, Message};
use prism_ecs::{Entity, SystemType};
use std::collections::HashMap;

/// The entities a system manages, keyed by GUID.
#[derive(Debug)]
pub struct EntityIndex {
    owner: SystemType,
    entities: HashMap<Guid, Entity>,
}

impl EntityIndex {
    /// Creates an empty index whose log lines are tagged with `owner`.
    pub fn new(owner: SystemType) -> Self {
        Self {
            owner,
            entities: HashMap::new(),
        }
    }

    /// The system this index belongs to.
    pub fn owner(&self) -> SystemType {
        self.owner
    }

    /// Indexes `entity`. Returns `false` if its GUID was already present.
    pub fn insert(&mut self, entity: &Entity) -> bool {
        if self.entities.contains_key(entity.guid()) {
            return false;
        }
        self.entities.insert(entity.guid().clone(), entity.clone());
        true
    }

    /// Removes and returns the entity indexed under `guid`.
    pub fn remove(&mut self, guid: &Guid) -> Option<Entity> {
        self.entities.remove(guid)
    }

    /// Returns the entity indexed under `guid`.
    pub fn get(&self, guid: &Guid) -> Option<&Entity> {
        self.entities.get(guid)
    }

    /// Returns `true` if an entity is indexed under `guid`.
    pub fn contains(&self, guid: &Guid) -> bool {
        self.entities.contains_key(guid)
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over the indexed entities, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Copies the indexed entities out, so the index can be mutated while
    /// they are visited.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.values().cloned().collect()
    }

    /// Empties the index and returns what it held.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.entities.drain().map(|(_, entity)| entity).collect()
    }

    /// Resolves the entity a message targets.
    ///
    /// A message without an [`EntityGuid`](prism_core::MessageType::EntityGuid)
    /// key is malformed and yields an error. A GUID this index does not know
    /// is logged and yields `Ok(None)`.
    pub fn resolve(&self, message: &Message) -> anyhow::Result<Option<Entity>> {
        let guid = message
            .target_guid()
            .ok_or_else(|| anyhow!("message has no entity GUID"))?;
        let entity = self.entities.get(&guid).cloned();
        if entity.is_none() {
            log::warn!("{}: no entity with GUID {}", self.owner, guid);
        }
        Ok(entity)
    }

    /// Like [`resolve`](Self::resolve), for messages every system receives.
    /// Unknown GUIDs are expected and only traced.
    pub fn resolve_shared(&self, message: &Message) -> Option<Entity> {
        let guid = message.target_guid()?;
        let entity = self.entities.get(&guid).cloned();
        if entity.is_none() {
            log::trace!("{}: GUID {} is not mine", self.owner, guid);
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::MessageType;

    #[test]
    fn resolve_requires_a_guid() {
        let index = EntityIndex::new(SystemType::Light);
        let msg = Message::new(MessageType::ChangeLightIntensity, 1.0f32);
        assert!(index.resolve(&msg).is_err());
    }

    #[test]
    fn resolve_unknown_guid_is_none() {
        let index = EntityIndex::new(SystemType::Light);
        let msg = Message::command(MessageType::ToggleLight)
            .with(MessageType::EntityGuid, Guid::from("nobody"));
        assert!(index.resolve(&msg).unwrap().is_none());
    }

    #[test]
    fn insert_is_keyed_by_guid() {
        let mut index = EntityIndex::new(SystemType::Shape);
        let entity = Entity::with_guid(Guid::from("cube"), "Cube");

        assert!(index.insert(&entity));
        assert!(!index.insert(&entity));

        let msg = Message::new(MessageType::SetShapeVisibility, false)
            .with(MessageType::EntityGuid, Guid::from("cube"));
        assert_eq!(index.resolve(&msg).unwrap(), Some(entity.clone()));
        assert_eq!(index.remove(entity.guid()), Some(entity));
        assert!(index.is_empty());
    }

    #[test]
    fn index_reports_its_owner() {
        let index = EntityIndex::new(SystemType::Animation);
        assert_eq!(index.owner(), SystemType::Animation);
    }
}
