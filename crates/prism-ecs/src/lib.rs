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

//! The entity/component runtime of Prism.
//!
//! This crate provides the pieces every system is built from:
//!
//! - [`Entity`] and [`Component`]: composition entities holding one component
//!   per [`ComponentType`], each component pointing back at its owner.
//! - [`System`] and [`MessageBus`]: the per-system inbox and handler registry
//!   drained once per tick.
//! - [`Strand`]: the single serialized execution context allowed to touch the
//!   render engine and system state.
//! - [`EcsContext`]: the explicit context object tying the registry, the strand
//!   and the shared engine together.
//! - [`EntityObjectLocatorSystem`]: the GUID index used to resolve message
//!   targets.

pub mod component;
mod context;
mod entity;
mod locator;
mod message_bus;
mod registry;
mod strand;
mod system;

pub use component::{
    Animation, Collidable, Component, ComponentData, ComponentKind, ComponentType, Light, Model,
    ModelState, Shape,
};
pub use context::EcsContext;
pub use entity::{Entity, WeakEntity};
pub use locator::EntityObjectLocatorSystem;
pub use message_bus::{process_messages, Handler, MessageBus};
pub use registry::SystemHandle;
pub use strand::{Strand, StrandError};
pub use system::{System, SystemType};
