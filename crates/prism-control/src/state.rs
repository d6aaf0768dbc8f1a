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

use prism_ecs::StrandError;
use thiserror::Error;

/// Lifecycle state of the [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulerState {
    /// Systems may be registered.
    #[default]
    NotInitialized,
    /// Every system ran `init`.
    Initialized,
    /// The frame timer is ticking.
    Running,
    /// Systems are being shut down.
    ShutdownStarted,
    /// Every system ran `shutdown`.
    Shutdown,
}

impl SchedulerState {
    /// Returns `true` if the scheduler may move from `self` to `next`.
    ///
    /// The lifecycle only moves forward. A scheduler that never started its
    /// frame loop may still shut down.
    pub fn can_transition_to(self, next: SchedulerState) -> bool {
        use SchedulerState::*;
        matches!(
            (self, next),
            (NotInitialized, Initialized)
                | (Initialized, Running)
                | (Initialized, ShutdownStarted)
                | (Running, ShutdownStarted)
                | (ShutdownStarted, Shutdown)
        )
    }

    /// Returns `true` while ticks may run.
    pub fn accepts_ticks(self) -> bool {
        matches!(self, SchedulerState::Initialized | SchedulerState::Running)
    }
}

/// Errors returned by the [`Scheduler`](crate::Scheduler).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The requested lifecycle step is not allowed from the current state.
    #[error("invalid scheduler transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// The current state, left unchanged.
        from: SchedulerState,
        /// The requested state.
        to: SchedulerState,
    },

    /// Ticks were requested outside of `Initialized` or `Running`.
    #[error("cannot tick while {0:?}")]
    NotTicking(SchedulerState),

    /// The frame timer thread could not be spawned.
    #[error("failed to spawn the frame timer: {0}")]
    TimerSpawn(String),

    /// The strand rejected the work.
    #[error(transparent)]
    Strand(#[from] StrandError),
}

#[cfg(test)]
mod tests {
    use super::SchedulerState::*;

    #[test]
    fn lifecycle_only_moves_forward() {
        assert!(NotInitialized.can_transition_to(Initialized));
        assert!(Initialized.can_transition_to(Running));
        assert!(Running.can_transition_to(ShutdownStarted));
        assert!(ShutdownStarted.can_transition_to(Shutdown));

        assert!(!NotInitialized.can_transition_to(Running));
        assert!(!Running.can_transition_to(Initialized));
        assert!(!Shutdown.can_transition_to(NotInitialized));
        assert!(!Running.can_transition_to(Running));
    }
}
