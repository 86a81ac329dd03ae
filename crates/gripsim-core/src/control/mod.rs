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

//! DoF data model and control configuration.
//!
//! The adaptive controller tracks a [`DofSet`] received from the model, a validated
//! selection of [`ChosenDofs`] bound to the user's adaptive axes, and the matching
//! [`EigVals`]. [`GripperState`] is the gripper-centric environment vector sent back
//! to the model.

pub mod config;
pub mod dofs;
pub mod state;

pub use self::config::{ControlConfig, SignPolicy, SpeedConfig, TrackingMode};
pub use self::dofs::{ChosenDofs, ChosenDofsError, DofSet, EigVals, DOF_COUNT};
pub use self::state::{GripperState, ObjectPose, QueryState};
