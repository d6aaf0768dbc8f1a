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

//! Asynchronous model loading and renderable streaming.
//!
//! A load request returns a [`LoadFuture`] right away. The read and decode
//! run later as a strand task, which then attaches an engine instance to the
//! model. Renderables of attached instances enter the scene in bounded
//! batches, one batch per instance and tick.
//!
//! Models flagged `keep_in_memory` share a resident template per asset
//! location: concurrent requests for a location being decoded are queued
//! behind the running load and attached when it completes, later requests
//! instantiate the template without decoding again.

mod config;
mod pending;
mod record;

pub use config::ModelSystemConfig;
pub use pending::PendingLoadQueue;
pub use record::AssetRecord;

use crate::index::EntityIndex;
use anyhow::Context as _;
use prism_core::asset::AssetLocation;
use prism_core::math::Transform;
use prism_core::renderer::RenderEngineError;
use prism_core::{Guid, MessageType};
use prism_ecs::{
    Animation, Collidable, ComponentType, EcsContext, Entity, MessageBus, Model, ModelState,
    System, SystemType,
};
use prism_io::{
    AssetDecoder, AssetFetcher, AssetInstance, AssetLoadError, DecodedAsset, DefaultFetcher,
    GltfDecoder, LoadFuture, LoadResult, LoadStatus,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// An engine instance attached to a model entity.
struct LiveInstance {
    model: Entity,
    streaming: AssetInstance,
    record: AssetRecord,
    // Cleared once the collision shape is attached.
    collision_pending: bool,
}

/// Loads models and streams their renderables into the scene.
pub struct ModelSystem {
    bus: MessageBus<Self>,
    config: ModelSystemConfig,
    fetcher: Arc<dyn AssetFetcher>,
    decoder: Arc<dyn AssetDecoder>,
    models: EntityIndex,
    templates: HashMap<String, AssetRecord>,
    pending: PendingLoadQueue,
    instances: Vec<LiveInstance>,
    // Latest load request per model. Older decodes are discarded.
    requests: HashMap<Guid, u64>,
    next_request: u64,
    decodes: Arc<AtomicUsize>,
}

impl ModelSystem {
    /// Creates a system reading files under the configured asset root and
    /// decoding glTF.
    pub fn new(config: ModelSystemConfig) -> Result<Self, AssetLoadError> {
        let fetcher = DefaultFetcher::new(&config.asset_root, config.http_timeout())?;
        Ok(Self::with_sources(
            config,
            Arc::new(fetcher),
            Arc::new(GltfDecoder),
        ))
    }

    /// Creates a system with explicit asset sources.
    pub fn with_sources(
        config: ModelSystemConfig,
        fetcher: Arc<dyn AssetFetcher>,
        decoder: Arc<dyn AssetDecoder>,
    ) -> Self {
        Self {
            bus: MessageBus::new(),
            config,
            fetcher,
            decoder,
            models: EntityIndex::new(SystemType::Model),
            templates: HashMap::new(),
            pending: PendingLoadQueue::default(),
            instances: Vec::new(),
            requests: HashMap::new(),
            next_request: 0,
            decodes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ModelSystemConfig {
        &self.config
    }

    /// How many decodes ran so far.
    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::Acquire)
    }

    /// The model entities this system manages.
    pub fn models(&self) -> &EntityIndex {
        &self.models
    }

    /// The resident template of a location key.
    pub fn template(&self, key: &str) -> Option<&AssetRecord> {
        self.templates.get(key)
    }

    /// Number of resident templates.
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// The shared loads in flight.
    pub fn pending(&self) -> &PendingLoadQueue {
        &self.pending
    }

    /// Number of live engine instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Streaming progress of the instance attached to `model`, from 0 to 1.
    pub fn loading_progress(&self, model: &Entity) -> Option<f32> {
        self.live(model).map(|live| live.streaming.progress())
    }

    /// Returns `true` once every renderable of `model` is in the scene and
    /// every resource streamed.
    pub fn is_fully_loaded(&self, model: &Entity) -> bool {
        self.live(model)
            .is_some_and(|live| live.streaming.is_fully_loaded())
    }

    fn live(&self, model: &Entity) -> Option<&LiveInstance> {
        self.instances.iter().find(|live| live.model.ptr_eq(model))
    }

    /// Loads the file at `path` into `model`.
    pub fn load_from_path(
        &mut self,
        ctx: &EcsContext,
        model: &Entity,
        path: impl Into<String>,
    ) -> LoadFuture {
        self.load(ctx, model, AssetLocation::Path(path.into()))
    }

    /// Downloads the asset at `url` into `model`.
    pub fn load_from_url(
        &mut self,
        ctx: &EcsContext,
        model: &Entity,
        url: impl Into<String>,
    ) -> LoadFuture {
        self.load(ctx, model, AssetLocation::Url(url.into()))
    }

    /// Loads `location` into `model`, replacing any instance it had.
    ///
    /// A [`Model`] component is attached if the entity had none. The future
    /// resolves once the model is attached, or with
    /// [`LoadStatus::Queued`] right away when it joined a shared load in
    /// flight. A load still decoding for `model` is superseded: its future
    /// resolves [`AssetLoadError::Abandoned`] and nothing is attached from it.
    pub fn load(&mut self, ctx: &EcsContext, model: &Entity, location: AssetLocation) -> LoadFuture {
        let (keep_in_memory, request) = self.prepare(ctx, model, &location);
        let key = location.key().to_owned();

        if !keep_in_memory {
            set_state(model, ModelState::Loading);
            return self.start_decode(ctx, model, location, request, false);
        }

        if let Some(record) = self.templates.get(&key).cloned() {
            log::debug!("ModelSystem: instantiating resident {}", location);
            return LoadFuture::ready(self.attach(ctx, model, record));
        }

        if self.pending.enqueue(&key, model) {
            log::debug!(
                "ModelSystem: '{}' queued behind the load of {}",
                model.name(),
                location
            );
            set_state(model, ModelState::Queued);
            return LoadFuture::ready(Ok(LoadStatus::Queued));
        }

        self.pending.begin(&key);
        set_state(model, ModelState::Loading);
        self.start_decode(ctx, model, location, request, true)
    }

    /// Indexes `model`, points it at `location` and drops what it held.
    /// Returns its `keep_in_memory` flag and the id of the new request.
    fn prepare(
        &mut self,
        ctx: &EcsContext,
        model: &Entity,
        location: &AssetLocation,
    ) -> (bool, u64) {
        self.release_model(ctx, model);
        self.pending.forget(model);
        self.models.insert(model);

        self.next_request += 1;
        let request = self.next_request;
        self.requests.insert(model.guid().clone(), request);

        let keep_in_memory = model.with_component_mut(|m: &mut Model| {
            m.location = Some(location.clone());
            m.keep_in_memory
        });
        let keep_in_memory = keep_in_memory.unwrap_or_else(|| {
            model.attach_component(Model::new(location.clone()));
            false
        });
        (keep_in_memory, request)
    }

    /// Returns `true` if `request` is the latest load of `model` and the
    /// model is still managed here.
    fn is_current(&self, model: &Entity, request: u64) -> bool {
        self.models.contains(model.guid()) && self.requests.get(model.guid()) == Some(&request)
    }

    fn start_decode(
        &mut self,
        ctx: &EcsContext,
        model: &Entity,
        location: AssetLocation,
        request: u64,
        shared: bool,
    ) -> LoadFuture {
        if ctx.strand().is_stopped() {
            self.abort_load(model, &location, shared, &AssetLoadError::SystemUnavailable);
            return LoadFuture::ready(Err(AssetLoadError::SystemUnavailable));
        }

        let (promise, future) = LoadFuture::pending();
        let fetcher = Arc::clone(&self.fetcher);
        let decoder = Arc::clone(&self.decoder);
        let decodes = Arc::clone(&self.decodes);
        let target = model.clone();
        let task_location = location.clone();

        let posted = ctx.post(move |ctx| {
            let location = task_location;
            log::debug!("ModelSystem: reading {}", location);
            let decoded = fetcher.fetch(&location).and_then(|bytes| {
                decodes.fetch_add(1, Ordering::AcqRel);
                decoder.decode(&location, &bytes, fetcher.as_ref())
            });

            let Some(system) = ctx.system::<ModelSystem>() else {
                promise.resolve(Err(AssetLoadError::SystemUnavailable));
                return;
            };
            let result = system
                .lock()
                .complete_load(ctx, &target, location, request, shared, decoded);
            promise.resolve(result);
        });

        if let Err(e) = posted {
            log::error!("ModelSystem: load of {} not posted: {}", location, e);
            self.abort_load(model, &location, shared, &AssetLoadError::SystemUnavailable);
        }
        future
    }

    fn abort_load(
        &mut self,
        model: &Entity,
        location: &AssetLocation,
        shared: bool,
        error: &AssetLoadError,
    ) {
        self.fail_model(model, location, error);
        if shared {
            for queued in self.pending.take(location.key()) {
                set_state(&queued, ModelState::Failed(error.to_string()));
            }
        }
    }

    /// Marks `model` failed unless a newer load replaced the one at
    /// `location`.
    fn fail_model(&self, model: &Entity, location: &AssetLocation, error: &AssetLoadError) {
        let targets_location = model
            .with_component(|m: &Model| m.location.as_ref() == Some(location))
            .unwrap_or(false);
        if targets_location {
            set_state(model, ModelState::Failed(error.to_string()));
        }
    }

    /// Attaches the outcome of a decode to the model that requested it, and
    /// to every model queued behind a shared load.
    ///
    /// The requester is skipped when it was removed or asked for another load
    /// while this one was decoding.
    fn complete_load(
        &mut self,
        ctx: &EcsContext,
        model: &Entity,
        location: AssetLocation,
        request: u64,
        shared: bool,
        decoded: Result<DecodedAsset, AssetLoadError>,
    ) -> LoadResult {
        let still_wanted = self.is_current(model, request);
        let asset = match decoded {
            Ok(asset) => Arc::new(asset),
            Err(error) => {
                log::error!("ModelSystem: loading {} failed: {}", location, error);
                if still_wanted {
                    self.abort_load(model, &location, shared, &error);
                } else if shared {
                    for queued in self.pending.take(location.key()) {
                        set_state(&queued, ModelState::Failed(error.to_string()));
                    }
                }
                return Err(error);
            }
        };

        let engine_handle = ctx.lock_engine().create_asset(location.key());
        if still_wanted {
            self.requests.remove(model.guid());
        } else {
            log::debug!(
                "ModelSystem: '{}' no longer wants {}, discarding it",
                model.name(),
                location
            );
        }

        if !shared {
            if !still_wanted {
                ctx.lock_engine().destroy(engine_handle);
                return Err(AssetLoadError::Abandoned);
            }
            return self.attach(ctx, model, AssetRecord::owned(engine_handle, asset));
        }

        let record = AssetRecord::template(engine_handle, asset);
        self.templates
            .insert(location.key().to_owned(), record.clone());
        log::info!("ModelSystem: {} is resident", location);

        let result = if still_wanted {
            self.attach(ctx, model, record.clone())
        } else {
            Err(AssetLoadError::Abandoned)
        };
        for queued in self.pending.take(location.key()) {
            if let Err(e) = self.attach(ctx, &queued, record.clone()) {
                log::error!("ModelSystem: queued '{}': {}", queued.name(), e);
            }
        }
        result
    }

    /// Creates an engine instance of `record` for `model`. Its renderables
    /// enter the scene over the next ticks.
    fn attach(&mut self, ctx: &EcsContext, model: &Entity, record: AssetRecord) -> LoadResult {
        let streaming = match instantiate(ctx, &record) {
            Ok(streaming) => streaming,
            Err(e) => {
                if !record.is_template {
                    ctx.lock_engine().destroy(record.engine_handle);
                }
                let error = AssetLoadError::Engine {
                    source_name: record.key().to_owned(),
                    reason: e.to_string(),
                };
                set_state(model, ModelState::Failed(error.to_string()));
                return Err(error);
            }
        };
        let handle = streaming.handle();

        if let Some(transform) = model.with_component(|t: &Transform| *t) {
            if let Err(e) = ctx.lock_engine().set_transform(handle, &transform) {
                log::warn!("ModelSystem: '{}': {}", model.name(), e);
            }
        }
        model.with_component_mut(|m: &mut Model| {
            m.state = ModelState::Loaded;
            m.instance = Some(handle);
        });
        model.with_component_mut(|animation: &mut Animation| {
            animation.clips = record.asset.clips.clone();
            animation.instance = Some(handle);
        });

        let renderables = streaming.pending_renderables();
        log::info!(
            "ModelSystem: '{}' attached to {} ({} renderables)",
            model.name(),
            record.location,
            renderables
        );
        let status = LoadStatus::Loaded(format!(
            "Loaded {} ({} renderables)",
            record.location, renderables
        ));
        self.instances.push(LiveInstance {
            model: model.clone(),
            streaming,
            record,
            collision_pending: model.has_component(ComponentType::Collidable),
        });
        Ok(status)
    }

    /// Streams resources and promotes at most one batch of renderables per
    /// instance into the scene. Returns how many renderables were added.
    pub fn update_async_asset_loading(&mut self, ctx: &EcsContext) -> usize {
        let batch = self.config.batch_size();
        let budget = self.config.resources_per_tick.max(1);
        let mut added = 0;
        let mut collisions_due = Vec::new();

        {
            let mut engine = ctx.lock_engine();
            for (index, live) in self.instances.iter_mut().enumerate() {
                live.streaming.advance_streaming(budget);
                let ready = live.streaming.pop_renderables(batch);
                if !ready.is_empty() {
                    engine.add_to_scene(&ready);
                    added += ready.len();
                }
                if live.collision_pending && live.streaming.is_fully_loaded() {
                    live.collision_pending = false;
                    collisions_due.push(index);
                }
            }
        }

        for index in collisions_due {
            attach_collision(ctx, &self.instances[index]);
        }
        added
    }

    /// Releases the instances attached to `model`.
    fn release_model(&mut self, ctx: &EcsContext, model: &Entity) {
        let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.instances)
            .into_iter()
            .partition(|live| live.model.ptr_eq(model));
        self.instances = kept;
        for live in released {
            release(ctx, live);
        }
    }

    fn register_handlers(&self) {
        self.bus
            .register_handler(MessageType::ChangeTransform, |system: &mut Self, msg, ctx| {
                let transform: Transform = msg
                    .get(MessageType::ChangeTransform)
                    .context("ChangeTransform expects a transform")?;
                let Some(model) = system.models.resolve_shared(msg) else {
                    return Ok(());
                };
                if model
                    .with_component_mut(|t: &mut Transform| *t = transform)
                    .is_none()
                {
                    model.attach_component(transform);
                }
                if let Some(live) = system.live(&model) {
                    ctx.lock_engine()
                        .set_transform(live.streaming.handle(), &transform)?;
                }
                Ok(())
            });
    }
}

fn set_state(model: &Entity, state: ModelState) {
    model.with_component_mut(|m: &mut Model| m.state = state);
}

fn instantiate(ctx: &EcsContext, record: &AssetRecord) -> Result<AssetInstance, RenderEngineError> {
    let mut engine = ctx.lock_engine();
    let instance = engine.create_asset_instance(record.engine_handle)?;
    let renderables: Result<Vec<_>, _> = record
        .asset
        .primitives
        .iter()
        .map(|primitive| engine.create_renderable(instance, primitive))
        .collect();
    match renderables {
        Ok(renderables) => Ok(AssetInstance::new(
            instance,
            Arc::clone(&record.asset),
            renderables,
        )),
        Err(e) => {
            engine.destroy(instance);
            Err(e)
        }
    }
}

fn attach_collision(ctx: &EcsContext, live: &LiveInstance) {
    let Some(shape) = live.model.with_component(|c: &Collidable| c.shape) else {
        return;
    };
    let attached = ctx
        .lock_engine()
        .attach_collision(live.streaming.handle(), &shape);
    match attached {
        Ok(()) => {
            live.model
                .with_component_mut(|c: &mut Collidable| c.attached = true);
            log::debug!("ModelSystem: collision attached to '{}'", live.model.name());
        }
        Err(e) => log::warn!("ModelSystem: collision of '{}': {}", live.model.name(), e),
    }
}

/// Removes an instance from the scene and destroys it, with its asset when
/// the asset is not a template.
fn release(ctx: &EcsContext, live: LiveInstance) {
    {
        let mut engine = ctx.lock_engine();
        engine.remove_from_scene(live.streaming.added_renderables());
        engine.destroy(live.streaming.handle());
        if !live.record.is_template {
            engine.destroy(live.record.engine_handle);
        }
    }
    live.model.with_component_mut(|m: &mut Model| {
        m.instance = None;
        m.state = ModelState::Unloaded;
    });
    live.model.with_component_mut(|animation: &mut Animation| {
        animation.instance = None;
        animation.playback = None;
    });
}

impl System for ModelSystem {
    fn system_type(&self) -> SystemType {
        SystemType::Model
    }

    fn bus(&self) -> &MessageBus<Self> {
        &self.bus
    }

    fn init(&mut self, _ctx: &EcsContext) -> anyhow::Result<()> {
        self.register_handlers();
        Ok(())
    }

    fn update(&mut self, ctx: &EcsContext, _elapsed: Duration) {
        let added = self.update_async_asset_loading(ctx);
        if added > 0 {
            log::trace!("ModelSystem: {} renderables added", added);
        }
    }

    fn add_entity(&mut self, _ctx: &EcsContext, entity: &Entity) {
        self.models.insert(entity);
    }

    fn remove_entity(&mut self, ctx: &EcsContext, entity: &Entity) {
        if self.models.remove(entity.guid()).is_none() {
            return;
        }
        self.requests.remove(entity.guid());
        self.pending.forget(entity);
        self.release_model(ctx, entity);
    }

    fn shutdown(&mut self, ctx: &EcsContext) {
        for live in std::mem::take(&mut self.instances) {
            release(ctx, live);
        }
        for queued in self.pending.drain() {
            set_state(&queued, ModelState::Unloaded);
        }
        {
            let mut engine = ctx.lock_engine();
            for (_, record) in self.templates.drain() {
                engine.destroy(record.engine_handle);
            }
        }
        self.models.drain();
        self.requests.clear();
        log::info!(
            "ModelSystem: shut down after {} decodes",
            self.decode_count()
        );
    }
}
