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

//! The scene runtime: standard systems over one scheduler.

use crate::RuntimeConfig;
use anyhow::{anyhow, Result};
use prism_control::{FrameStats, Scheduler, SchedulerState};
use prism_core::asset::AssetLocation;
use prism_core::renderer::{SharedEngine, ShapeKind};
use prism_core::{Message, MessageType};
use prism_ecs::{EcsContext, Entity, EntityObjectLocatorSystem, Model, Shape, System};
use prism_io::LoadFuture;
use prism_systems::{AnimationSystem, LightSystem, ModelSystem, ShapeSystem, ViewTargetSystem};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

const VIEW_MESSAGES: [MessageType; 5] = [
    MessageType::ResizeViewTarget,
    MessageType::ChangeViewOffset,
    MessageType::ChangeViewQuality,
    MessageType::ChangeCameraMode,
    MessageType::ChangeCameraOrbit,
];

fn is_view_message(message: &Message) -> bool {
    message.contains(MessageType::ViewIndex) || VIEW_MESSAGES.iter().any(|t| message.contains(*t))
}

/// A scene driven by a [`Scheduler`] with every standard system registered.
///
/// Systems are registered in this order, which is also their update order:
/// locator, light, animation, shape, model, view target. View messages routed
/// before the first view exists are held back and replayed against it.
pub struct SceneRuntime {
    scheduler: Scheduler,
    config: RuntimeConfig,
    default_light: Option<Entity>,
    // `Some` until the first view is created.
    deferred_views: Mutex<Option<Vec<Message>>>,
}

impl SceneRuntime {
    /// A runtime whose strand runs on its own worker thread.
    pub fn threaded(engine: SharedEngine, config: RuntimeConfig) -> Result<Self> {
        let scheduler = Scheduler::threaded(engine, config.scheduler.clone())?;
        Self::with_scheduler(scheduler, config)
    }

    /// A runtime whose strand is drained by [`SceneRuntime::update`] on the
    /// calling thread.
    pub fn manual(engine: SharedEngine, config: RuntimeConfig) -> Result<Self> {
        let scheduler = Scheduler::manual(engine, config.scheduler.clone());
        Self::with_scheduler(scheduler, config)
    }

    /// Registers the standard systems on `scheduler` and initializes them.
    pub fn with_scheduler(scheduler: Scheduler, config: RuntimeConfig) -> Result<Self> {
        let models = ModelSystem::new(config.models.clone())?;
        Self::with_models(scheduler, config, models)
    }

    /// Same as [`SceneRuntime::with_scheduler`] with a caller-built
    /// [`ModelSystem`], e.g. one reading from custom asset sources.
    pub fn with_models(
        scheduler: Scheduler,
        config: RuntimeConfig,
        models: ModelSystem,
    ) -> Result<Self> {
        scheduler.add_system(EntityObjectLocatorSystem::new());
        scheduler.add_system(LightSystem::new());
        scheduler.add_system(AnimationSystem::new());
        scheduler.add_system(ShapeSystem::new());
        scheduler.add_system(models);
        scheduler.add_system(ViewTargetSystem::new());
        scheduler.init_systems()?;

        let mut runtime = Self {
            scheduler,
            config,
            default_light: None,
            deferred_views: Mutex::new(Some(Vec::new())),
        };
        if runtime.config.create_default_light {
            let light = runtime
                .with_system::<LightSystem, _>(|lights, ctx| lights.create_default_light(ctx))?;
            runtime.default_light = Some(light);
        }
        log::info!(
            "SceneRuntime ready ({} strand, {} systems)",
            if runtime.is_manual() { "manual" } else { "threaded" },
            runtime.context().system_count()
        );
        Ok(runtime)
    }

    /// The ECS context shared by every system.
    pub fn context(&self) -> &EcsContext {
        self.scheduler.context()
    }

    /// The scheduler driving the frame loop.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The configuration this runtime was built with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Current lifecycle state of the scheduler.
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Tick counters of the frame loop.
    pub fn frame_stats(&self) -> &FrameStats {
        self.scheduler.frame_stats()
    }

    /// The light created at startup, if the config asked for one.
    pub fn default_light(&self) -> Option<&Entity> {
        self.default_light.as_ref()
    }

    /// Returns `true` when [`SceneRuntime::update`] drains the strand on the
    /// calling thread.
    pub fn is_manual(&self) -> bool {
        self.context().strand().is_manual()
    }

    /// Runs `f` against the system of type `S` on the strand and returns its
    /// result.
    pub fn with_system<S, R>(
        &self,
        f: impl FnOnce(&mut S, &EcsContext) -> R + Send + 'static,
    ) -> Result<R>
    where
        S: System,
        R: Send + 'static,
    {
        let result = self.context().run_blocking(move |ctx| {
            ctx.system::<S>().map(|system| {
                let mut system = system.lock();
                f(&mut system, ctx)
            })
        })?;
        result.ok_or_else(|| anyhow!("no {} registered", std::any::type_name::<S>()))
    }

    /// Starts the fixed-rate frame loop.
    pub fn start(&mut self) -> Result<()> {
        self.scheduler.start_frame_loop()?;
        Ok(())
    }

    /// Runs one tick and waits for it. A manual strand first runs the tasks
    /// posted since the previous call (loads, registrations).
    ///
    /// Returns the number of messages processed.
    pub fn update(&self, elapsed: Duration) -> Result<usize> {
        if self.is_manual() {
            self.context().run_pending()?;
        }
        Ok(self.scheduler.update(elapsed)?)
    }

    /// Stops the frame loop and shuts the systems down.
    pub fn stop(&mut self) -> Result<()> {
        self.scheduler.stop()?;
        if let Some(deferred) = self.take_deferred() {
            if !deferred.is_empty() {
                log::warn!(
                    "SceneRuntime: {} view message(s) dropped, no view was ever created",
                    deferred.len()
                );
            }
        }
        Ok(())
    }

    /// Queues `message` for every system.
    ///
    /// View messages are held back until [`SceneRuntime::add_view_target`]
    /// creates the first view.
    pub fn route_message(&self, message: Message) {
        if is_view_message(&message) {
            let mut deferred = self
                .deferred_views
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(pending) = deferred.as_mut() {
                log::debug!("SceneRuntime: no view yet, deferring {:?}", message);
                pending.push(message);
                return;
            }
        }
        self.context().route_message(message);
    }

    /// Number of view messages waiting for the first view.
    pub fn deferred_view_messages(&self) -> usize {
        self.deferred_views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(0, Vec::len)
    }

    fn take_deferred(&self) -> Option<Vec<Message>> {
        self.deferred_views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Creates a view and returns its index. The first view receives the
    /// deferred view messages; those without a view index are addressed to it.
    pub fn add_view_target(&self, width: u32, height: u32) -> Result<usize> {
        let index = self.with_system::<ViewTargetSystem, _>(move |views, ctx| {
            views.add_view_target(ctx, width, height)
        })??;

        if let Some(deferred) = self.take_deferred() {
            if !deferred.is_empty() {
                log::info!(
                    "SceneRuntime: replaying {} deferred view message(s) on view {}",
                    deferred.len(),
                    index
                );
            }
            for message in deferred {
                let message = if message.contains(MessageType::ViewIndex) {
                    message
                } else {
                    message.with(MessageType::ViewIndex, index)
                };
                self.context().route_message(message);
            }
        }
        Ok(index)
    }

    /// Loads `location` into `entity`. See [`ModelSystem::load`].
    pub fn load_model(&self, entity: &Entity, location: AssetLocation) -> Result<LoadFuture> {
        let entity = entity.clone();
        self.with_system::<ModelSystem, _>(move |models, ctx| models.load(ctx, &entity, location))
    }

    /// Loads the file at `path`, relative to the configured asset root.
    pub fn load_from_path(&self, entity: &Entity, path: impl Into<String>) -> Result<LoadFuture> {
        self.load_model(entity, AssetLocation::Path(path.into()))
    }

    /// Downloads and loads the model at `url`.
    pub fn load_from_url(&self, entity: &Entity, url: impl Into<String>) -> Result<LoadFuture> {
        self.load_model(entity, AssetLocation::Url(url.into()))
    }

    /// Creates an entity named `name` carrying a [`Model`] for `location` and
    /// starts loading it.
    pub fn spawn_model(
        &self,
        name: &str,
        location: AssetLocation,
        keep_in_memory: bool,
    ) -> Result<(Entity, LoadFuture)> {
        let entity = Entity::new(name);
        let model = if keep_in_memory {
            Model::shared(location.clone())
        } else {
            Model::new(location.clone())
        };
        entity.attach_component(model);
        let future = self.load_model(&entity, location)?;
        Ok((entity, future))
    }

    /// Creates an entity named `name` carrying a [`Shape`]. The shape enters
    /// the scene once its registration has run on the strand.
    pub fn spawn_shape(&self, name: &str, kind: ShapeKind) -> Entity {
        let entity = Entity::new(name);
        entity.add_component(self.context(), Shape::new(kind));
        entity
    }
}
