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

use prism_ecs::Entity;
use std::collections::HashMap;

/// Models waiting on a shared load already in flight, keyed by asset
/// location.
///
/// An entry exists for exactly as long as the decode of its asset runs. The
/// model that started the load is not part of its own queue.
#[derive(Debug, Default)]
pub struct PendingLoadQueue {
    loads: HashMap<String, Vec<Entity>>,
}

impl PendingLoadQueue {
    /// Returns `true` while a load of `key` is in flight.
    pub fn is_loading(&self, key: &str) -> bool {
        self.loads.contains_key(key)
    }

    /// Marks a load of `key` as in flight. Returns `false` if it already was.
    pub fn begin(&mut self, key: &str) -> bool {
        if self.loads.contains_key(key) {
            return false;
        }
        self.loads.insert(key.to_owned(), Vec::new());
        true
    }

    /// Queues `model` behind the load of `key`.
    ///
    /// Returns `false`, queuing nothing, when no such load is in flight.
    pub fn enqueue(&mut self, key: &str, model: &Entity) -> bool {
        match self.loads.get_mut(key) {
            Some(queue) => {
                queue.push(model.clone());
                true
            }
            None => false,
        }
    }

    /// Ends the load of `key` and returns the models queued behind it, in
    /// request order.
    pub fn take(&mut self, key: &str) -> Vec<Entity> {
        self.loads.remove(key).unwrap_or_default()
    }

    /// Number of models queued behind the load of `key`.
    pub fn queued(&self, key: &str) -> usize {
        self.loads.get(key).map_or(0, Vec::len)
    }

    /// Removes `model` from every queue.
    pub fn forget(&mut self, model: &Entity) {
        for queue in self.loads.values_mut() {
            queue.retain(|queued| !queued.ptr_eq(model));
        }
    }

    /// Number of loads in flight.
    pub fn len(&self) -> usize {
        self.loads.len()
    }

    /// Returns `true` when no load is in flight.
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Ends every load and returns all queued models.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.loads.drain().flat_map(|(_, queue)| queue).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_needs_a_load_in_flight() {
        let mut pending = PendingLoadQueue::default();
        let model = Entity::new("B");

        assert!(!pending.enqueue("foo.glb", &model));
        assert!(pending.begin("foo.glb"));
        assert!(!pending.begin("foo.glb"));
        assert!(pending.enqueue("foo.glb", &model));
        assert_eq!(pending.queued("foo.glb"), 1);
    }

    #[test]
    fn take_ends_the_load_in_request_order() {
        let mut pending = PendingLoadQueue::default();
        let (b, c) = (Entity::new("B"), Entity::new("C"));
        pending.begin("foo.glb");
        pending.enqueue("foo.glb", &b);
        pending.enqueue("foo.glb", &c);

        let queued = pending.take("foo.glb");

        assert_eq!(queued, vec![b, c]);
        assert!(!pending.is_loading("foo.glb"));
    }

    #[test]
    fn forgotten_model_leaves_every_queue() {
        let mut pending = PendingLoadQueue::default();
        let model = Entity::new("B");
        pending.begin("a.glb");
        pending.begin("b.glb");
        pending.enqueue("a.glb", &model);
        pending.enqueue("b.glb", &model);

        pending.forget(&model);

        assert_eq!(pending.queued("a.glb"), 0);
        assert_eq!(pending.queued("b.glb"), 0);
        assert_eq!(pending.len(), 2);
    }
}
