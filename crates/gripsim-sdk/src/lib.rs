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

//! # GripSim SDK
//!
//! The simulation facade of GripSim: a top-down gripper pushing boxes towards
//! a target, steered along adaptive DoFs supplied by an external model.
//!
//! The [`Simulation`] owns the scene and the adaptive controller; a [`Runner`]
//! ticks it at a fixed rate, feeding input from an [`InputSource`] and handing
//! each frame's draw commands to a [`FrameSink`].

#![warn(missing_docs)]

pub mod config;
pub mod entities;
pub mod overlay;
pub mod runner;
pub mod simulation;

pub use config::{ConfigError, SimConfig};
pub use runner::{FrameSink, InputSource, RunSummary, Runner, ScriptedInput};
pub use simulation::{PhysicsFactory, Simulation, SimulationError};

/// Frequently used types, for `use gripsim_sdk::prelude::*`.
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::runner::{FrameSink, InputSource, Runner, ScriptedInput};
    pub use crate::simulation::Simulation;
    pub use gripsim_control::{DofChannel, ModelClient};
    pub use gripsim_core::draw::{Canvas, DrawCommand, DrawList};
    pub use gripsim_core::event::EventBus;
    pub use gripsim_core::input::{GamepadButton, GamepadSnapshot, InputEvent};
    pub use gripsim_core::recording::RecordingEvent;
    pub use gripsim_infra::{CsvRecorder, LocalModelService, RecorderWorker, TcpModelService};
}
