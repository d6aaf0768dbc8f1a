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

//! The scheduler that drives the Prism systems.
//!
//! A [`Scheduler`] owns an [`EcsContext`](prism_ecs::EcsContext) and walks it
//! through its lifecycle: systems are registered, initialized on the strand,
//! ticked by a fixed-rate frame timer, and finally shut down in reverse
//! order. The timer never queues ticks: a firing that finds the previous tick
//! still running is dropped and counted in [`FrameStats`].

mod config;
mod scheduler;
mod state;
mod stats;

pub use config::SchedulerConfig;
pub use scheduler::Scheduler;
pub use state::{SchedulerError, SchedulerState};
pub use stats::FrameStats;
