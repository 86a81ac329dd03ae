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

//! # GripSim Control
//!
//! The adaptive degree-of-freedom controller.
//!
//! - [`DofStore`] owns the current DoFs, the chosen DoFs and the idle timer.
//! - [`match_dofs`] keeps the user's axes pointing the same way when the model
//!   sends a new DoF set.
//! - [`compute_velocity`] blends keyboard, gamepad and adaptive DoFs into a
//!   velocity command.
//! - [`AdaptiveController`] runs the per-tick request/response state machine on top
//!   of a [`DofChannel`], usually a [`ModelClient`].

#![warn(missing_docs)]

pub mod adaptive_loop;
pub mod aggregator;
pub mod dof_store;
pub mod matcher;
pub mod model_client;

pub use adaptive_loop::{AdaptiveController, DofChannel, RequestState};
pub use aggregator::{compute_velocity, VelocityCommand};
pub use dof_store::DofStore;
pub use matcher::{match_dofs, ordered_selections, MatchOutcome};
pub use model_client::ModelClient;
