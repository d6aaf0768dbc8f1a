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

//! The message taxonomy shared by the UI-binding layer and the systems.
//!
//! A [`Message`] is a small ordered map from [`MessageType`] to one strongly
//! typed [`MessageValue`]. Several keys can be present at once: a command key
//! (e.g. [`MessageType::ChangeLightIntensity`]) is typically accompanied by an
//! addressing key such as [`MessageType::EntityGuid`] or
//! [`MessageType::ViewIndex`].
//!
//! The runtime makes no assumption about how messages are produced. It only
//! requires that a message is fully populated before it is routed; reading an
//! absent key yields `None` and is the handler's problem.

mod envelope;
mod types;
mod value;

pub use self::envelope::Message;
pub use self::types::MessageType;
pub use self::value::{FromMessageValue, MessageValue};
