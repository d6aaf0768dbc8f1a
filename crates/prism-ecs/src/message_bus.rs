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

//! Per-system inbox and handler registry.

use crate::context::EcsContext;
use crate::strand::panic_message;
use crate::system::System;
use prism_core::{Message, MessageType};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A message handler of system `S`.
pub type Handler<S> = Arc<dyn Fn(&mut S, &Message, &EcsContext) -> anyhow::Result<()> + Send + Sync>;

/// The thread-safe inbox of a system.
///
/// Shared with the registry so messages can be routed without locking the
/// system itself.
#[derive(Default)]
pub(crate) struct Inbox {
    messages: Mutex<Vec<Message>>,
}

impl Inbox {
    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, message: Message) {
        self.lock().push(message);
    }

    fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.lock())
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Inbox plus handler registry of one system.
///
/// Messages may be sent from any thread. Handlers are usually registered in
/// [`System::init`] and cleared on shutdown. The inbox and the registry are
/// guarded separately, so sending never waits on dispatch.
pub struct MessageBus<S> {
    inbox: Arc<Inbox>,
    handlers: Mutex<HashMap<MessageType, Vec<Handler<S>>>>,
}

impl<S> MessageBus<S> {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            inbox: Arc::new(Inbox::default()),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    fn handlers(&self) -> MutexGuard<'_, HashMap<MessageType, Vec<Handler<S>>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn inbox(&self) -> Arc<Inbox> {
        self.inbox.clone()
    }

    /// Queues a message for the next tick.
    pub fn send_message(&self, message: Message) {
        log::trace!("Queued message {:?}", message.types().collect::<Vec<_>>());
        self.inbox.push(message);
    }

    /// Number of messages waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    /// Adds a handler for `message_type`. Handlers of one type run in
    /// registration order.
    pub fn register_handler<F>(&self, message_type: MessageType, handler: F)
    where
        F: Fn(&mut S, &Message, &EcsContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handlers()
            .entry(message_type)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Removes every handler of `message_type`.
    pub fn unregister_handler(&self, message_type: MessageType) {
        self.handlers().remove(&message_type);
    }

    /// Removes every handler.
    pub fn clear_handlers(&self) {
        self.handlers().clear();
    }

    /// Number of handlers registered for `message_type`.
    pub fn handler_count(&self, message_type: MessageType) -> usize {
        self.handlers().get(&message_type).map_or(0, Vec::len)
    }

    fn take_messages(&self) -> Vec<Message> {
        self.inbox.take()
    }

    fn handlers_for(&self, message: &Message) -> Vec<(MessageType, Handler<S>)> {
        let handlers = self.handlers();
        message
            .types()
            .filter_map(|ty| handlers.get(&ty).map(|list| (ty, list)))
            .flat_map(|(ty, list)| list.iter().map(move |h| (ty, h.clone())))
            .collect()
    }
}

impl<S> Default for MessageBus<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains the inbox of `system` and dispatches every message.
///
/// Messages are dispatched in arrival order. Within a message, handlers run
/// by ascending [`MessageType`] and then in registration order. A handler
/// error or panic is logged and does not stop the remaining handlers.
///
/// Returns the number of messages drained.
pub fn process_messages<S: System>(system: &mut S, ctx: &EcsContext) -> usize {
    let messages = system.bus().take_messages();
    let count = messages.len();

    for message in &messages {
        for (message_type, handler) in system.bus().handlers_for(message) {
            match catch_unwind(AssertUnwindSafe(|| handler(system, message, ctx))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::error!(
                    "{} system: {:?} handler failed: {:#}",
                    system.system_type(),
                    message_type,
                    e
                ),
                Err(payload) => log::error!(
                    "{} system: {:?} handler panicked: {}",
                    system.system_type(),
                    message_type,
                    panic_message(payload.as_ref())
                ),
            }
        }
    }

    if count > 0 {
        log::trace!("{} system processed {} message(s)", system.system_type(), count);
    }
    count
}
