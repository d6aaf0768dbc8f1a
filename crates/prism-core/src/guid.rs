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

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A globally unique identifier assigned to an entity.
///
/// GUIDs are plain strings so that the UI-binding layer can address entities
/// with identifiers it generated itself. [`Guid::new`] produces a random
/// (version 4) UUID for entities created by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Guid(String);

impl Guid {
    /// Creates a new, random (version 4) `Guid`.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Guid {
    /// Creates a new, random (version 4) `Guid`.
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Guid {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Guid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_guids_are_unique() {
        let a = Guid::new();
        let b = Guid::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn caller_supplied_guid_is_kept_verbatim() {
        let guid = Guid::from("sun-light");
        assert_eq!(guid.as_str(), "sun-light");
        assert_eq!(guid.to_string(), "sun-light");
    }

    #[test]
    fn guid_serializes_as_plain_string() {
        let guid = Guid::from("abc");
        let json = serde_json::to_string(&guid).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
