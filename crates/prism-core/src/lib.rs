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

//! Foundational types shared by every Prism crate.
//!
//! `prism-core` holds the "common language" of the runtime and nothing that
//! owns behaviour: the message taxonomy exchanged between the UI-binding layer
//! and the systems, the math primitives carried by those messages, the
//! descriptors handed to the external render engine, and the
//! [`RenderEngine`](renderer::RenderEngine) contract itself.
//!
//! Higher-level crates (`prism-ecs`, `prism-systems`, ...) depend on these
//! definitions without depending on each other.

#![warn(missing_docs)]

pub mod asset;
pub mod guid;
pub mod math;
pub mod message;
pub mod renderer;

pub use guid::Guid;
pub use message::{Message, MessageType, MessageValue};
pub use renderer::{EngineHandle, RenderEngine, SharedEngine};
