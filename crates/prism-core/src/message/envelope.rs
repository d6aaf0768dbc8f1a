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

use super::{FromMessageValue, MessageType, MessageValue};
use crate::guid::Guid;
use std::collections::BTreeMap;

/// A command or notification routed to the systems.
///
/// Built once with [`Message::new`] / [`Message::with`] and then treated as
/// immutable: routing clones it into every system inbox.
///
/// # Examples
///
/// ```
/// use prism_core::{Guid, Message, MessageType};
///
/// let msg = Message::new(MessageType::ChangeLightIntensity, 50_000.0_f32)
///     .with(MessageType::EntityGuid, Guid::from("sun"));
///
/// assert_eq!(msg.get::<f32>(MessageType::ChangeLightIntensity), Some(50_000.0));
/// assert_eq!(msg.target_guid(), Some(Guid::from("sun")));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    entries: BTreeMap<MessageType, MessageValue>,
}

impl Message {
    /// Creates a message holding a single key.
    pub fn new(message_type: MessageType, value: impl Into<MessageValue>) -> Self {
        Self::default().with(message_type, value)
    }

    /// Creates a message holding a single payload-less command key.
    pub fn command(message_type: MessageType) -> Self {
        Self::new(message_type, MessageValue::Unit)
    }

    /// Adds (or replaces) a key and returns the message, builder style.
    pub fn with(mut self, message_type: MessageType, value: impl Into<MessageValue>) -> Self {
        self.entries.insert(message_type, value.into());
        self
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, message_type: MessageType) -> bool {
        self.entries.contains_key(&message_type)
    }

    /// Returns the raw payload of a key.
    pub fn value(&self, message_type: MessageType) -> Option<&MessageValue> {
        self.entries.get(&message_type)
    }

    /// Returns the typed payload of a key.
    ///
    /// `None` if the key is absent or holds another payload type.
    pub fn get<T: FromMessageValue>(&self, message_type: MessageType) -> Option<T> {
        self.value(message_type).and_then(T::from_message_value)
    }

    /// Shorthand for the [`MessageType::EntityGuid`] payload.
    pub fn target_guid(&self) -> Option<Guid> {
        self.get(MessageType::EntityGuid)
    }

    /// Shorthand for the [`MessageType::ViewIndex`] payload.
    pub fn view_index(&self) -> Option<usize> {
        self.get(MessageType::ViewIndex)
    }

    /// Iterates over the keys present, in ascending [`MessageType`] order.
    pub fn types(&self) -> impl Iterator<Item = MessageType> + '_ {
        self.entries.keys().copied()
    }

    /// Number of keys in the message.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the message carries no key.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
