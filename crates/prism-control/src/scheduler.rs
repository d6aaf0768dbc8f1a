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

//! The scheduler (lifecycle owner of the systems).

use crate::{FrameStats, SchedulerConfig, SchedulerError, SchedulerState};
use crossbeam_channel::{RecvTimeoutError, Sender};
use prism_core::renderer::SharedEngine;
use prism_core::Message;
use prism_ecs::{EcsContext, System, SystemHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Clears the re-entrancy flag when the tick ends, even by unwinding.
struct TickGuard(Arc<AtomicBool>);

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct FrameTimer {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the systems' lifecycle and the frame timer.
///
/// Lifecycle: `NotInitialized -> Initialized -> Running -> ShutdownStarted ->
/// Shutdown`. Dropping a scheduler that was initialized stops it.
pub struct Scheduler {
    ctx: EcsContext,
    config: SchedulerConfig,
    state: Mutex<SchedulerState>,
    stats: Arc<FrameStats>,
    tick_in_progress: Arc<AtomicBool>,
    timer: Option<FrameTimer>,
}

impl Scheduler {
    /// Creates a scheduler over an existing context.
    pub fn new(ctx: EcsContext, config: SchedulerConfig) -> Self {
        Self {
            ctx,
            config,
            state: Mutex::new(SchedulerState::NotInitialized),
            stats: Arc::new(FrameStats::default()),
            tick_in_progress: Arc::new(AtomicBool::new(false)),
            timer: None,
        }
    }

    /// Creates a scheduler whose strand runs on its own worker thread.
    pub fn threaded(engine: SharedEngine, config: SchedulerConfig) -> Result<Self, SchedulerError> {
        Ok(Self::new(EcsContext::new(engine)?, config))
    }

    /// Creates a scheduler whose strand is drained by the calling thread.
    pub fn manual(engine: SharedEngine, config: SchedulerConfig) -> Self {
        Self::new(EcsContext::manual(engine), config)
    }

    /// The context shared with the systems.
    pub fn context(&self) -> &EcsContext {
        &self.ctx
    }

    /// The configuration this scheduler was created with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Frame timer counters.
    pub fn frame_stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Returns `true` while a timer tick is posted or running.
    pub fn is_tick_in_progress(&self) -> bool {
        self.tick_in_progress.load(Ordering::Acquire)
    }

    fn transition(&self, to: SchedulerState) -> Result<(), SchedulerError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(to) {
            return Err(SchedulerError::InvalidTransition { from: *state, to });
        }
        log::debug!("Scheduler: {:?} -> {:?}", *state, to);
        *state = to;
        Ok(())
    }

    /// Registers a system. Registration order is init and update order.
    ///
    /// Returns `false` if a system of the same type is already registered or
    /// if the systems were already initialized.
    pub fn add_system<S: System>(&self, system: S) -> bool {
        let state = self.state();
        if state != SchedulerState::NotInitialized {
            log::warn!(
                "Scheduler: {} system registered while {:?}, ignoring it",
                system.system_type(),
                state
            );
            return false;
        }
        self.ctx.add_system(system)
    }

    /// Looks up a system by its concrete type.
    ///
    /// Never fails on the calling thread; a lookup off the strand is logged
    /// once per call site.
    #[track_caller]
    pub fn get_system_by_type<S: System>(&self) -> Option<SystemHandle<S>> {
        self.ctx.system::<S>()
    }

    /// Queues a copy of `message` in every system's inbox. Callable from any
    /// thread.
    pub fn route_message(&self, message: Message) {
        self.ctx.route_message(message);
    }

    /// Runs `init` on every system, in registration order, on the strand.
    pub fn init_systems(&self) -> Result<(), SchedulerError> {
        self.transition(SchedulerState::Initialized)?;
        self.ctx.run_blocking(|ctx| ctx.init_systems())?;
        log::info!("Scheduler: {} system(s) initialized", self.ctx.system_count());
        Ok(())
    }

    /// Runs one tick on the strand and waits for it.
    ///
    /// Returns the number of messages processed.
    pub fn update(&self, elapsed: Duration) -> Result<usize, SchedulerError> {
        let state = self.state();
        if !state.accepts_ticks() {
            return Err(SchedulerError::NotTicking(state));
        }
        let stats = self.stats.clone();
        let processed = self.ctx.run_blocking(move |ctx| {
            let processed = ctx.tick(elapsed);
            stats.record_run();
            processed
        })?;
        Ok(processed)
    }

    /// Starts the fixed-rate frame timer.
    pub fn start_frame_loop(&mut self) -> Result<(), SchedulerError> {
        self.transition(SchedulerState::Running)?;

        let (stop, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let interval = self.config.frame_interval();
        let ctx = self.ctx.clone();
        let stats = self.stats.clone();
        let in_progress = self.tick_in_progress.clone();

        let spawned = thread::Builder::new()
            .name("prism-frame-timer".into())
            .spawn(move || {
                log::info!("Frame timer started ({:?} period)", interval);
                let mut last_tick = Instant::now();
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if in_progress.swap(true, Ordering::AcqRel) {
                        stats.record_skipped();
                        log::trace!("Frame timer: previous tick still running, skipping");
                        continue;
                    }

                    let now = Instant::now();
                    let elapsed = now - last_tick;
                    last_tick = now;

                    let guard = TickGuard(in_progress.clone());
                    let tick_stats = stats.clone();
                    let posted = ctx.post(move |ctx| {
                        let _guard = guard;
                        ctx.tick(elapsed);
                        tick_stats.record_run();
                    });
                    match posted {
                        Ok(()) => stats.record_posted(),
                        Err(e) => {
                            log::warn!("Frame timer: strand rejected the tick ({e}), stopping");
                            break;
                        }
                    }
                }
                log::info!("Frame timer stopped");
            });

        match spawned {
            Ok(handle) => {
                self.timer = Some(FrameTimer { stop, handle });
                Ok(())
            }
            Err(e) => {
                *self.state.lock().unwrap_or_else(PoisonError::into_inner) =
                    SchedulerState::Initialized;
                Err(SchedulerError::TimerSpawn(e.to_string()))
            }
        }
    }

    fn stop_frame_loop(&mut self) {
        if let Some(timer) = self.timer.take() {
            let _ = timer.stop.send(());
            if timer.handle.join().is_err() {
                log::error!("Frame timer thread panicked");
            }
        }
    }

    /// Runs `shutdown` on every system, in reverse registration order, on
    /// the strand.
    pub fn shutdown_systems(&self) -> Result<(), SchedulerError> {
        self.transition(SchedulerState::ShutdownStarted)?;
        let result = self.ctx.run_blocking(|ctx| ctx.shutdown_systems());
        self.transition(SchedulerState::Shutdown)?;
        result?;
        log::info!("Scheduler: systems shut down");
        Ok(())
    }

    /// Stops the frame timer, waits for the tick in flight and shuts the
    /// systems down.
    pub fn stop(&mut self) -> Result<(), SchedulerError> {
        self.stop_frame_loop();
        self.shutdown_systems()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if matches!(
            self.state(),
            SchedulerState::Initialized | SchedulerState::Running
        ) {
            if let Err(e) = self.stop() {
                log::error!("Scheduler: stop on drop failed: {e}");
            }
        }
        self.stop_frame_loop();
    }
}
