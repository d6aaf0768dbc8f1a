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

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of the frame timer.
#[derive(Debug, Default)]
pub struct FrameStats {
    ticks_posted: AtomicU64,
    ticks_run: AtomicU64,
    ticks_skipped: AtomicU64,
}

impl FrameStats {
    /// Ticks handed to the strand by the frame timer.
    pub fn ticks_posted(&self) -> u64 {
        self.ticks_posted.load(Ordering::Relaxed)
    }

    /// Ticks that ran to completion, manual updates included.
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run.load(Ordering::Relaxed)
    }

    /// Timer firings dropped because a tick was still in progress.
    pub fn ticks_skipped(&self) -> u64 {
        self.ticks_skipped.load(Ordering::Relaxed)
    }

    pub(crate) fn record_posted(&self) {
        self.ticks_posted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_run(&self) {
        self.ticks_run.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.ticks_skipped.fetch_add(1, Ordering::Relaxed);
    }
}
