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

// Headless GripSim session.
// Run with: cargo run -p sandbox -- --ticks 300 --record --comment "push box"

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gripsim_control::ModelClient;
use gripsim_core::draw::DrawCommand;
use gripsim_core::event::EventBus;
use gripsim_core::input::InputEvent;
use gripsim_core::model::ModelService;
use gripsim_core::recording::RecordingEvent;
use gripsim_infra::{CsvRecorder, LocalModelService, RecorderWorker, TcpModelService};
use gripsim_sdk::{Runner, ScriptedInput, SimConfig, Simulation};

#[derive(Debug, Parser)]
#[command(version, about = "Runs a scripted GripSim session without a window")]
struct Args {
    /// Configuration file; defaults are used if it does not exist.
    #[arg(short, long, default_value = "gripsim.toml")]
    config: PathBuf,
    /// Seed of the scene placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to run.
    #[arg(long, default_value_t = 300)]
    ticks: u64,
    /// `host:port` of a model server, overriding the config.
    #[arg(long)]
    address: Option<String>,
    /// Record the session.
    #[arg(long)]
    record: bool,
    /// Comment stored with the recording.
    #[arg(long, default_value = "")]
    comment: String,
    /// Run ticks back to back instead of in real time.
    #[arg(long)]
    fast: bool,
}

fn key(name: &str, pressed: bool) -> InputEvent {
    let key = name.to_owned();
    if pressed {
        InputEvent::KeyPressed { key }
    } else {
        InputEvent::KeyReleased { key }
    }
}

/// Drives along the first adaptive axis, then the second, then closes the fingers.
fn demo_script(ticks: u64) -> Vec<(u64, InputEvent)> {
    let phase = (ticks / 4).max(1);
    vec![
        (0, key("w", true)),
        (phase, key("w", false)),
        (phase, key("d", true)),
        (2 * phase, key("d", false)),
        (2 * phase, key("i", true)),
        (3 * phase, key("i", false)),
        (3 * phase, key("n", true)),
    ]
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = SimConfig::load(&args.config)?;
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    if args.address.is_some() {
        config.model.address = args.address.clone();
    }

    let service: Arc<dyn ModelService> = match &config.model.address {
        Some(addr) => {
            log::info!("Using the model server at {addr}.");
            Arc::new(TcpModelService::new(addr.clone()))
        }
        None => {
            log::info!("No model server configured, using the built-in model.");
            Arc::new(LocalModelService::new())
        }
    };
    let client = ModelClient::new(service).context("failed to start the model runtime")?;
    let model = match client.fetch_catalogue(config.model.preferred.as_deref()) {
        Ok((_, selected)) => selected,
        Err(e) => {
            log::warn!("Model catalogue unavailable, adaptive DoFs stay fixed: {e}");
            None
        }
    };
    if let Some(name) = &model {
        match client.about(name) {
            Ok(about) => log::info!("{name}: {about}"),
            Err(e) => log::debug!("No description for {name}: {e}"),
        }
    }

    let bus = EventBus::<RecordingEvent>::new();
    let recorder = RecorderWorker::spawn(
        Box::new(CsvRecorder::new(config.recording.directory.clone())),
        bus.subscriber(),
    )?;

    let fps = config.simulation.fps;
    let mut sim = Simulation::new(config, Box::new(client), bus.sender())?;
    sim.select_model(model);
    sim.set_recording_comment(args.comment.clone());
    if args.record {
        sim.start_recording();
    }

    let mut input = ScriptedInput::new(demo_script(args.ticks));
    let mut sink = |tick: u64, frame: &[DrawCommand]| {
        if tick % u64::from(fps.max(1)) == 0 {
            log::debug!("Tick {tick}: {} draw commands", frame.len());
        }
    };
    let summary = Runner::new(fps)
        .with_max_ticks(args.ticks)
        .realtime(!args.fast)
        .run(&mut sim, &mut input, &mut sink)?;

    if let Some(confirmation) = sim.stop_recording(&args.comment) {
        match confirmation.recv_timeout(Duration::from_secs(5)) {
            Ok(message) => log::info!("{message}"),
            Err(e) => log::error!("Recorder did not confirm: {e}"),
        }
    }
    if let Ok(state) = sim.gripper_state() {
        log::info!("Final gripper state: {:?}", state.to_array());
    }
    log::info!("Session over after {} ticks.", summary.ticks);

    drop(sim);
    drop(bus);
    recorder.join();
    Ok(())
}
