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

//! One-shot completion of asset loads.

use crate::AssetLoadError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// How a load request completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The model was attached to an engine instance.
    Loaded(String),
    /// The model joined a load already in flight for the same asset and
    /// will be attached when it completes.
    Queued,
}

impl LoadStatus {
    /// A human readable description of the outcome.
    pub fn message(&self) -> &str {
        match self {
            LoadStatus::Loaded(message) => message,
            LoadStatus::Queued => "Queued behind an in-flight load of the same asset",
        }
    }
}

/// The value a [`LoadFuture`] resolves to.
pub type LoadResult = Result<LoadStatus, AssetLoadError>;

/// The producer side of a [`LoadFuture`].
#[derive(Debug)]
pub struct LoadPromise {
    sender: oneshot::Sender<LoadResult>,
}

impl LoadPromise {
    /// Completes the paired future. Does nothing if it was dropped.
    pub fn resolve(self, result: LoadResult) {
        if self.sender.send(result).is_err() {
            log::trace!("Load future dropped before completion, result discarded");
        }
    }
}

/// The pending outcome of a load request.
///
/// Await it, poll it with [`try_result`](Self::try_result), or block on it with
/// [`wait`](Self::wait). Dropping it discards the result without cancelling the
/// load.
#[derive(Debug)]
pub struct LoadFuture {
    receiver: oneshot::Receiver<LoadResult>,
    resolved: Option<LoadResult>,
}

impl LoadFuture {
    /// Creates an unresolved future and its promise.
    pub fn pending() -> (LoadPromise, LoadFuture) {
        let (sender, receiver) = oneshot::channel();
        (
            LoadPromise { sender },
            LoadFuture {
                receiver,
                resolved: None,
            },
        )
    }

    /// Creates an already resolved future.
    pub fn ready(result: LoadResult) -> Self {
        let (promise, future) = Self::pending();
        promise.resolve(result);
        future
    }

    /// Returns the result if it is available, without blocking.
    pub fn try_result(&mut self) -> Option<LoadResult> {
        if self.resolved.is_none() {
            self.resolved = match self.receiver.try_recv() {
                Ok(result) => Some(result),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(Err(AssetLoadError::Abandoned)),
            };
        }
        self.resolved.clone()
    }

    /// Blocks the calling thread until the result is available.
    ///
    /// Must not be called from the thread that runs the load, or it never
    /// returns.
    pub fn wait(mut self) -> LoadResult {
        if let Some(result) = self.resolved.take() {
            return result;
        }
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(AssetLoadError::Abandoned))
    }
}

impl Future for LoadFuture {
    type Output = LoadResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(result) = self.resolved.take() {
            return Poll::Ready(result);
        }
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(AssetLoadError::Abandoned)))
    }
}
