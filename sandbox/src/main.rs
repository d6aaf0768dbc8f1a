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

use anyhow::{Context, Result};
use clap::Parser;
use prism_core::renderer::{CameraMode, HeadlessEngine, ShapeKind};
use prism_sdk::prelude::*;
use prism_sdk::{init_logging, RuntimeConfig, SceneRuntime};
use std::path::PathBuf;
use std::thread;

#[derive(Parser, Debug)]
#[command(name = "sandbox", version)]
#[command(about = "Runs a headless Prism scene for a number of frames")]
struct Cli {
    /// Runtime config (JSON). Defaults apply to every missing field.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model to load: a path under the asset root or an http(s) URL.
    #[arg(long)]
    model: Option<String>,

    /// Frames to run before shutting down.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Keep the decoded model resident so later loads share it.
    #[arg(long)]
    keep_in_memory: bool,
}

fn location_of(model: &str) -> AssetLocation {
    if model.starts_with("http://") || model.starts_with("https://") {
        AssetLocation::Url(model.to_owned())
    } else {
        AssetLocation::Path(model.to_owned())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    init_logging(&config.log_filter);

    let frame_interval = config.scheduler.frame_interval();
    let (engine, shared) = HeadlessEngine::shared();
    let mut runtime = SceneRuntime::threaded(shared, config)?;

    // Sent before the view exists on purpose: the runtime replays it.
    runtime.route_message(Message::new(MessageType::ChangeCameraMode, CameraMode::AutoOrbit));
    runtime.add_view_target(1280, 720)?;
    runtime.spawn_shape("Ground", ShapeKind::Plane);

    let load = cli
        .model
        .as_deref()
        .map(|model| runtime.spawn_model("Model", location_of(model), cli.keep_in_memory))
        .transpose()?;

    runtime.start()?;
    if let Some((_, future)) = load {
        match future.wait() {
            Ok(status) => log::info!("{}", status.message()),
            Err(e) => log::error!("Model load failed: {e}"),
        }
    }
    thread::sleep(frame_interval * cli.frames);
    runtime.stop()?;

    let stats = runtime.frame_stats();
    log::info!(
        "Frames: {} run, {} skipped ({} requested)",
        stats.ticks_run(),
        stats.ticks_skipped(),
        cli.frames
    );
    let engine = engine
        .lock()
        .map_err(|_| anyhow::anyhow!("render engine lock poisoned"))?;
    log::info!(
        "Engine after shutdown: {} object(s) alive, {} destroyed",
        engine.object_count(),
        engine.destroyed_count()
    );
    Ok(())
}
