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

use prism_core::renderer::{EngineHandle, ShapeDescriptor, ShapeKind};

/// A primitive shape attached to an entity.
#[derive(Debug)]
pub struct Shape {
    /// What to build.
    pub desc: ShapeDescriptor,
    /// Per-entity visibility, combined with the global shape toggle.
    pub visible: bool,
    /// The engine shape, once built.
    pub handle: Option<EngineHandle>,
}

impl Shape {
    /// A visible shape of the given kind.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            desc: ShapeDescriptor::new(kind),
            visible: true,
            handle: None,
        }
    }
}

impl Clone for Shape {
    fn clone(&self) -> Self {
        Self {
            desc: self.desc,
            visible: self.visible,
            handle: None,
        }
    }
}
