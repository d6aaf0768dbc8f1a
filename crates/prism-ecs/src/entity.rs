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

//! Composition entities.

use crate::component::{Component, ComponentData, ComponentType};
use crate::context::EcsContext;
use crate::locator::EntityObjectLocatorSystem;
use prism_core::Guid;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

struct EntityData {
    guid: Guid,
    name: String,
    components: RwLock<Vec<Component>>,
    registered: AtomicBool,
}

/// A shared handle to an entity.
///
/// Entities hold at most one component per [`ComponentType`], kept in
/// attachment order. Clones of the handle refer to the same entity; the entity
/// is dropped with its last handle.
#[derive(Clone)]
pub struct Entity(Arc<EntityData>);

/// A non-owning reference to an entity, held by its components.
#[derive(Clone)]
pub struct WeakEntity(Weak<EntityData>);

impl WeakEntity {
    /// Returns the entity if it is still alive.
    pub fn upgrade(&self) -> Option<Entity> {
        self.0.upgrade().map(Entity)
    }
}

impl fmt::Debug for WeakEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(entity) => write!(f, "WeakEntity({})", entity.guid()),
            None => f.write_str("WeakEntity(<dropped>)"),
        }
    }
}

impl Entity {
    /// Creates an entity with a fresh GUID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_guid(Guid::new(), name)
    }

    /// Creates an entity with a caller-supplied GUID.
    pub fn with_guid(guid: Guid, name: impl Into<String>) -> Self {
        Self(Arc::new(EntityData {
            guid,
            name: name.into(),
            components: RwLock::new(Vec::new()),
            registered: AtomicBool::new(false),
        }))
    }

    /// The entity's GUID.
    pub fn guid(&self) -> &Guid {
        &self.0.guid
    }

    /// The entity's display name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// A weak reference to this entity.
    pub fn downgrade(&self) -> WeakEntity {
        WeakEntity(Arc::downgrade(&self.0))
    }

    /// Returns `true` if both handles refer to the same entity.
    pub fn ptr_eq(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Component>> {
        self.0
            .components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Component>> {
        self.0
            .components
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Attaches a component and registers the entity with the component's
    /// home system.
    ///
    /// The registration is posted to the strand, so it takes effect once the
    /// strand runs, never inside this call.
    pub fn add_component(&self, ctx: &EcsContext, component: impl Into<Component>) {
        let component = component.into();
        let component_type = component.component_type();
        self.attach_component(component);

        let Some(home) = component_type.home_system() else {
            return;
        };
        let entity = self.clone();
        if let Err(e) = ctx.post(move |ctx| ctx.add_entity_to_system(home, &entity)) {
            log::warn!(
                "Entity '{}': could not register {} with {:?}: {}",
                self.name(),
                component_type,
                home,
                e
            );
        }
    }

    /// Attaches a component without registering the entity anywhere.
    ///
    /// A component of the same type is replaced and returned, detached.
    pub fn attach_component(&self, component: impl Into<Component>) -> Option<Component> {
        let mut component = component.into();
        component.set_owner(Some(self.downgrade()));
        let component_type = component.component_type();

        let mut components = self.write();
        match components
            .iter_mut()
            .find(|c| c.component_type() == component_type)
        {
            Some(slot) => {
                let mut previous = std::mem::replace(slot, component);
                previous.set_owner(None);
                Some(previous)
            }
            None => {
                components.push(component);
                None
            }
        }
    }

    /// Detaches and returns the component of the given type.
    pub fn remove_component(&self, component_type: ComponentType) -> Option<Component> {
        let mut components = self.write();
        let index = components
            .iter()
            .position(|c| c.component_type() == component_type)?;
        let mut removed = components.remove(index);
        removed.set_owner(None);
        Some(removed)
    }

    /// Returns `true` if a component of the given type is attached.
    pub fn has_component(&self, component_type: ComponentType) -> bool {
        self.read()
            .iter()
            .any(|c| c.component_type() == component_type)
    }

    /// The types of the attached components, in attachment order.
    pub fn component_types(&self) -> Vec<ComponentType> {
        self.read().iter().map(Component::component_type).collect()
    }

    /// Runs `f` on the component of type `T`, if attached.
    pub fn with_component<T: ComponentData, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let components = self.read();
        components.iter().find_map(|c| c.get::<T>()).map(f)
    }

    /// Runs `f` on the component of type `T` mutably, if attached.
    pub fn with_component_mut<T: ComponentData, R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let mut components = self.write();
        components.iter_mut().find_map(|c| c.get_mut::<T>()).map(f)
    }

    pub(crate) fn with_components<R>(&self, f: impl FnOnce(&[Component]) -> R) -> R {
        f(&self.read())
    }

    /// Clones the component of the given type onto `other`, without
    /// registering `other` with any system.
    ///
    /// Returns `false` when this entity has no such component.
    pub fn shallow_copy_component_to(&self, component_type: ComponentType, other: &Entity) -> bool {
        let copy = self
            .read()
            .iter()
            .find(|c| c.component_type() == component_type)
            .cloned();
        match copy {
            Some(copy) => {
                other.attach_component(copy);
                true
            }
            None => false,
        }
    }

    /// Returns `true` while the entity is registered with the locator.
    pub fn is_registered(&self) -> bool {
        self.0.registered.load(Ordering::Acquire)
    }

    pub(crate) fn set_registered(&self, registered: bool) {
        self.0.registered.store(registered, Ordering::Release);
    }

    /// Registers the entity with the locator. Does nothing if it already is.
    pub fn register(&self, ctx: &EcsContext) {
        if self.0.registered.swap(true, Ordering::AcqRel) {
            return;
        }
        let entity = self.clone();
        let posted = ctx.post(move |ctx| {
            let Some(locator) = ctx.system::<EntityObjectLocatorSystem>() else {
                log::warn!("No locator system: '{}' stays unregistered", entity.name());
                entity.set_registered(false);
                return;
            };
            if !locator.lock().register_entity(&entity) {
                entity.set_registered(false);
            }
        });
        if let Err(e) = posted {
            log::warn!("Entity '{}': registration not posted: {}", self.name(), e);
            self.set_registered(false);
        }
    }

    /// Unregisters the entity from the locator. Does nothing if it is not
    /// registered.
    pub fn unregister(&self, ctx: &EcsContext) {
        if !self.0.registered.swap(false, Ordering::AcqRel) {
            return;
        }
        let entity = self.clone();
        let posted = ctx.post(move |ctx| {
            if let Some(locator) = ctx.system::<EntityObjectLocatorSystem>() {
                locator.lock().unregister_entity(&entity);
            }
        });
        if let Err(e) = posted {
            log::warn!("Entity '{}': unregistration not posted: {}", self.name(), e);
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Entity {}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("guid", &self.0.guid)
            .field("name", &self.0.name)
            .field("components", &self.component_types())
            .finish()
    }
}
