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

//! Components and the closed set of component types.
//!
//! A [`Component`] wraps one [`ComponentKind`] value and a weak reference to
//! the entity it is attached to. Concrete payloads implement
//! [`ComponentData`], which gives typed access through
//! [`Entity::with_component`](crate::Entity::with_component).
//!
//! Cloning a component never copies engine-side state: the clone has no owner
//! and every engine handle it carries is reset.

mod animation;
mod collidable;
mod light;
mod model;
mod shape;

pub use self::animation::{Animation, Playback, QueuedClip};
pub use self::collidable::Collidable;
pub use self::light::Light;
pub use self::model::{Model, ModelState};
pub use self::shape::Shape;

use crate::entity::{Entity, WeakEntity};
use crate::system::SystemType;
use prism_core::math::Transform;
use std::fmt;

/// The stable type key of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    /// World transform.
    Transform,
    /// Light source.
    Light,
    /// Animation playback state.
    Animation,
    /// Primitive shape.
    Shape,
    /// Loaded model.
    Model,
    /// Collision volume request.
    Collidable,
}

impl ComponentType {
    /// The system that indexes entities carrying this component, if any.
    pub fn home_system(self) -> Option<SystemType> {
        match self {
            ComponentType::Light => Some(SystemType::Light),
            ComponentType::Animation => Some(SystemType::Animation),
            ComponentType::Shape => Some(SystemType::Shape),
            ComponentType::Model => Some(SystemType::Model),
            ComponentType::Transform | ComponentType::Collidable => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The payload of a component.
#[derive(Debug, Clone)]
pub enum ComponentKind {
    /// See [`ComponentType::Transform`].
    Transform(Transform),
    /// See [`ComponentType::Light`].
    Light(Light),
    /// See [`ComponentType::Animation`].
    Animation(Animation),
    /// See [`ComponentType::Shape`].
    Shape(Shape),
    /// See [`ComponentType::Model`].
    Model(Model),
    /// See [`ComponentType::Collidable`].
    Collidable(Collidable),
}

impl ComponentKind {
    /// The type key of this payload.
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::Transform(_) => ComponentType::Transform,
            ComponentKind::Light(_) => ComponentType::Light,
            ComponentKind::Animation(_) => ComponentType::Animation,
            ComponentKind::Shape(_) => ComponentType::Shape,
            ComponentKind::Model(_) => ComponentType::Model,
            ComponentKind::Collidable(_) => ComponentType::Collidable,
        }
    }
}

/// Typed access to one variant of [`ComponentKind`].
pub trait ComponentData: Into<ComponentKind> + Send + Sync + 'static {
    /// The type key of `Self`.
    const TYPE: ComponentType;

    /// Borrows `Self` out of a payload of the matching variant.
    fn from_kind(kind: &ComponentKind) -> Option<&Self>;

    /// Mutably borrows `Self` out of a payload of the matching variant.
    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self>;
}

macro_rules! component_data {
    ($ty:ty, $variant:ident) => {
        impl ComponentData for $ty {
            const TYPE: ComponentType = ComponentType::$variant;

            fn from_kind(kind: &ComponentKind) -> Option<&Self> {
                match kind {
                    ComponentKind::$variant(data) => Some(data),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self> {
                match kind {
                    ComponentKind::$variant(data) => Some(data),
                    _ => None,
                }
            }
        }

        impl From<$ty> for ComponentKind {
            fn from(data: $ty) -> Self {
                ComponentKind::$variant(data)
            }
        }

        impl From<$ty> for Component {
            fn from(data: $ty) -> Self {
                Component::new(data)
            }
        }
    };
}

component_data!(Transform, Transform);
component_data!(Light, Light);
component_data!(Animation, Animation);
component_data!(Shape, Shape);
component_data!(Model, Model);
component_data!(Collidable, Collidable);

/// A component attached, or about to be attached, to an entity.
#[derive(Debug)]
pub struct Component {
    owner: Option<WeakEntity>,
    kind: ComponentKind,
}

impl Component {
    /// Wraps a payload into a detached component.
    pub fn new(kind: impl Into<ComponentKind>) -> Self {
        Self {
            owner: None,
            kind: kind.into(),
        }
    }

    /// The type key of the payload.
    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// The owning entity, if attached and still alive.
    pub fn owner(&self) -> Option<Entity> {
        self.owner.as_ref().and_then(WeakEntity::upgrade)
    }

    pub(crate) fn set_owner(&mut self, owner: Option<WeakEntity>) {
        self.owner = owner;
    }

    /// The payload.
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The payload, mutably.
    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// Borrows the payload as `T` if the types match.
    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    /// Mutably borrows the payload as `T` if the types match.
    pub fn get_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    /// Unwraps the payload.
    pub fn into_kind(self) -> ComponentKind {
        self.kind
    }
}

impl Clone for Component {
    fn clone(&self) -> Self {
        Self {
            owner: None,
            kind: self.kind.clone(),
        }
    }
}

impl From<ComponentKind> for Component {
    fn from(kind: ComponentKind) -> Self {
        Component::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::renderer::EngineHandle;

    #[test]
    fn home_systems() {
        assert_eq!(ComponentType::Light.home_system(), Some(SystemType::Light));
        assert_eq!(ComponentType::Model.home_system(), Some(SystemType::Model));
        assert_eq!(ComponentType::Transform.home_system(), None);
        assert_eq!(ComponentType::Collidable.home_system(), None);
    }

    #[test]
    fn typed_access_matches_variant_only() {
        let mut component = Component::new(Light::default());
        assert!(component.get::<Light>().is_some());
        assert!(component.get::<Shape>().is_none());
        component.get_mut::<Light>().unwrap().enabled = false;
        assert!(!component.get::<Light>().unwrap().enabled);
    }

    #[test]
    fn clone_drops_owner_and_engine_handles() {
        let entity = Entity::new("Lamp");
        let mut light = Light::default();
        light.handle = Some(EngineHandle::new(7));
        entity.attach_component(light);

        let copy = entity.with_components(|components| components[0].clone());

        assert!(copy.owner().is_none());
        assert_eq!(copy.get::<Light>().unwrap().handle, None);
        assert_eq!(
            entity.with_component(|l: &Light| l.handle),
            Some(Some(EngineHandle::new(7)))
        );
    }
}
