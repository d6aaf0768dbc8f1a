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

//! The public-facing entry point for hosts embedding a Prism scene.
//!
//! A [`SceneRuntime`] wires the standard systems into a scheduler over a
//! caller-provided render engine, exposes model loading and message routing,
//! and holds view requests made before the host created its first view.

mod config;
mod logging;
mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use logging::init_logging;
pub use runtime::SceneRuntime;

pub mod prelude {
    pub use prism_control::{FrameStats, SchedulerConfig, SchedulerState};
    pub use prism_core::asset::AssetLocation;
    pub use prism_core::{Message, MessageType, MessageValue};
    pub use prism_ecs::{Entity, Model, ModelState};
    pub use prism_io::{AssetLoadError, LoadFuture, LoadStatus};
    pub use prism_systems::ModelSystemConfig;
}
