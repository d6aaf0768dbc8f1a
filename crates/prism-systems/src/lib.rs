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

//! The concrete systems of a Prism scene.
//!
//! Every system owns a [`MessageBus`](prism_ecs::MessageBus), registers its
//! handlers in `init` and keeps a GUID index of the entities carrying its
//! component type:
//!
//! - [`LightSystem`]: engine lights, including the default directional light.
//! - [`AnimationSystem`]: clip queues and playback of loaded models.
//! - [`ShapeSystem`]: procedural shapes and entity transforms.
//! - [`ViewTargetSystem`]: render views and their orbit cameras.
//! - [`ModelSystem`]: asynchronous model loading and renderable streaming.

mod animation;
mod index;
mod light;
pub mod model;
mod shape;
mod view_target;

pub use animation::AnimationSystem;
pub use index::EntityIndex;
pub use light::{LightSystem, DEFAULT_LIGHT_NAME};
pub use model::{AssetRecord, ModelSystem, ModelSystemConfig};
pub use shape::ShapeSystem;
pub use view_target::{ViewTarget, ViewTargetError, ViewTargetSystem, DEFAULT_AUTO_ORBIT_SPEED};
