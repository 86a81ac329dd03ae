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

//! # GripSim Core
//!
//! Foundational crate containing the DoF data model, control configuration,
//! and the interface contracts (physics, model service, recording, drawing)
//! that the rest of the simulator is built against.

#![warn(missing_docs)]

pub mod control;
pub mod draw;
pub mod event;
pub mod input;
pub mod math;
pub mod model;
pub mod physics;
pub mod recording;

pub use control::{ChosenDofs, ControlConfig, DofSet, EigVals, GripperState};
pub use math::{DofVector, Vec2};
