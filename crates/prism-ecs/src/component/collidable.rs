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

use prism_core::asset::CollisionShape;

/// Requests a collision volume on the entity's model once it is fully loaded.
#[derive(Debug)]
pub struct Collidable {
    /// The volume to attach.
    pub shape: CollisionShape,
    /// Set once the volume has been attached to the engine instance.
    pub attached: bool,
}

impl Collidable {
    /// A pending request for `shape`.
    pub fn new(shape: CollisionShape) -> Self {
        Self {
            shape,
            attached: false,
        }
    }
}

impl Default for Collidable {
    fn default() -> Self {
        Self::new(CollisionShape::default())
    }
}

impl Clone for Collidable {
    fn clone(&self) -> Self {
        Self::new(self.shape)
    }
}
