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

//! The serialized executor every engine mutation runs on.
//!
//! A strand is a FIFO task queue drained by exactly one thread: either a
//! dedicated worker it spawns, or, in manual mode, the thread that created
//! it, through [`Strand::run_pending`]. Tasks never overlap.
//!
//! A panic escaping a task is caught by the strand's default handler, logged
//! at `error` level, and the strand keeps running.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use thiserror::Error;

type Task = Box<dyn FnOnce() + Send + 'static>;

enum StrandMsg {
    Run(Task),
    Stop,
}

/// Errors returned by the [`Strand`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrandError {
    /// The strand was stopped and no longer accepts tasks.
    #[error("the strand is stopped")]
    Stopped,
    /// A manual strand was driven from a thread other than its owner.
    #[error("the strand can only be driven by the thread that created it")]
    WrongThread,
    /// `run_pending` was called on a strand that owns a worker thread.
    #[error("the strand runs on its own worker thread")]
    NotManual,
    /// The task panicked before producing its result.
    #[error("the task panicked on the strand")]
    TaskPanicked,
    /// The worker thread could not be spawned.
    #[error("failed to spawn the strand worker: {0}")]
    Spawn(String),
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}

fn run_guarded(task: Task, executed: &AtomicU64) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
        log::error!(
            "Unhandled panic on the strand: {}",
            panic_message(payload.as_ref())
        );
    }
    executed.fetch_add(1, Ordering::Relaxed);
}

/// A single-threaded serialized task executor.
pub struct Strand {
    sender: flume::Sender<StrandMsg>,
    receiver: flume::Receiver<StrandMsg>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_id: ThreadId,
    manual: bool,
    stopped: AtomicBool,
    executed: Arc<AtomicU64>,
}

impl Strand {
    /// Spawns a strand with its own worker thread.
    pub fn spawn(name: &str) -> Result<Self, StrandError> {
        let (sender, receiver) = flume::unbounded::<StrandMsg>();
        let executed = Arc::new(AtomicU64::new(0));

        let worker_rx = receiver.clone();
        let worker_executed = executed.clone();
        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                log::debug!("Strand worker started");
                while let Ok(msg) = worker_rx.recv() {
                    match msg {
                        StrandMsg::Run(task) => run_guarded(task, &worker_executed),
                        StrandMsg::Stop => break,
                    }
                }
                log::debug!("Strand worker stopped");
            })
            .map_err(|e| StrandError::Spawn(e.to_string()))?;

        Ok(Self {
            sender,
            receiver,
            thread_id: worker.thread().id(),
            worker: Mutex::new(Some(worker)),
            manual: false,
            stopped: AtomicBool::new(false),
            executed,
        })
    }

    /// Creates a strand drained by the calling thread through
    /// [`run_pending`](Self::run_pending).
    pub fn manual() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            sender,
            receiver,
            worker: Mutex::new(None),
            thread_id: thread::current().id(),
            manual: true,
            stopped: AtomicBool::new(false),
            executed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns `true` on the thread that drains this strand.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Returns `true` for a strand drained by its creating thread.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Returns `true` once [`stop`](Self::stop) was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Number of tasks run so far, panicked ones included.
    pub fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Queues a task. It runs after every task posted before it.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> Result<(), StrandError> {
        if self.is_stopped() {
            return Err(StrandError::Stopped);
        }
        self.sender
            .send(StrandMsg::Run(Box::new(task)))
            .map_err(|_| StrandError::Stopped)
    }

    /// Runs `f` on the strand and waits for its result.
    ///
    /// Runs inline when called from the strand itself. A manual strand only
    /// accepts this from its owning thread.
    pub fn run_blocking<R, F>(&self, f: F) -> Result<R, StrandError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_current() {
            return catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
                log::error!(
                    "Unhandled panic on the strand: {}",
                    panic_message(payload.as_ref())
                );
                StrandError::TaskPanicked
            });
        }
        if self.manual {
            return Err(StrandError::WrongThread);
        }
        let (tx, rx) = flume::bounded(1);
        self.post(move || {
            let _ = tx.send(f());
        })?;
        rx.recv().map_err(|_| StrandError::TaskPanicked)
    }

    /// Runs every queued task on the calling thread, including tasks posted
    /// while draining.
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> Result<usize, StrandError> {
        if !self.manual {
            return Err(StrandError::NotManual);
        }
        if !self.is_current() {
            return Err(StrandError::WrongThread);
        }
        let mut count = 0;
        while let Ok(msg) = self.receiver.try_recv() {
            if let StrandMsg::Run(task) = msg {
                run_guarded(task, &self.executed);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Stops accepting tasks and joins the worker after it finishes the tasks
    /// already queued.
    ///
    /// Does not join when called from the worker itself.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.sender.send(StrandMsg::Stop);
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if self.is_current() {
                return;
            }
            if worker.join().is_err() {
                log::error!("Strand worker terminated abnormally");
            }
        }
    }
}

impl Drop for Strand {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn tasks_run_in_post_order() {
        let strand = Strand::spawn("test-strand").unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let order = order.clone();
            strand.post(move || order.lock().unwrap().push(i)).unwrap();
        }
        strand.run_blocking(|| ()).unwrap();
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn panic_does_not_kill_the_worker() {
        let strand = Strand::spawn("test-strand").unwrap();
        strand.post(|| panic!("boom")).unwrap();
        let value = strand.run_blocking(|| 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn run_blocking_reports_panics() {
        let strand = Strand::spawn("test-strand").unwrap();
        let result: Result<(), _> = strand.run_blocking(|| panic!("boom"));
        assert_eq!(result, Err(StrandError::TaskPanicked));
    }

    #[test]
    fn work_runs_on_the_worker_thread() {
        let strand = Arc::new(Strand::spawn("test-strand").unwrap());
        assert!(!strand.is_current());
        let inner = strand.clone();
        assert!(strand.run_blocking(move || inner.is_current()).unwrap());
    }

    #[test]
    fn manual_strand_runs_nested_posts() {
        let strand = Arc::new(Strand::manual());
        let counter = Arc::new(AtomicUsize::new(0));

        let (s, c) = (strand.clone(), counter.clone());
        strand
            .post(move || {
                c.fetch_add(1, Ordering::SeqCst);
                let c = c.clone();
                s.post(move || {
                    c.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            })
            .unwrap();

        assert_eq!(strand.run_pending(), Ok(2));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn manual_strand_rejects_other_threads() {
        let strand = Arc::new(Strand::manual());
        let remote = strand.clone();
        let result = thread::spawn(move || remote.run_pending()).join().unwrap();
        assert_eq!(result, Err(StrandError::WrongThread));
        assert_eq!(
            Strand::spawn("test-strand").unwrap().run_pending(),
            Err(StrandError::NotManual)
        );
    }

    #[test]
    fn stop_drains_queued_tasks_then_rejects_new_ones() {
        let strand = Strand::spawn("test-strand").unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let counter = counter.clone();
            strand
                .post(move || {
                    thread::sleep(Duration::from_millis(1));
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        strand.stop();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert_eq!(strand.post(|| ()), Err(StrandError::Stopped));
    }
}
