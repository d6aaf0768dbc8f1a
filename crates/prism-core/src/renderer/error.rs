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

use super::EngineHandle;
use thiserror::Error;

/// Errors reported by a [`RenderEngine`](super::RenderEngine).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderEngineError {
    /// The handle does not refer to a live engine object.
    #[error("unknown engine handle {0}")]
    UnknownHandle(EngineHandle),

    /// The handle is alive but refers to an object of the wrong kind.
    #[error("engine handle {handle} is not a {expected}")]
    WrongKind {
        /// The offending handle.
        handle: EngineHandle,
        /// The kind of object the call expected.
        expected: &'static str,
    },

    /// The engine cannot fulfil the request.
    #[error("unsupported engine request: {0}")]
    Unsupported(String),
}
