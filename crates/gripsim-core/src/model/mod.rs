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

//! Contracts for the external DoF model.
//!
//! The model is reached through a [`ModelService`]; the JSON wire types of the
//! query protocol live in [`protocol`].

pub mod protocol;
mod service;

pub use self::protocol::{
    parse_dof_response, DofQuery, DofUpdate, ModelRequest, ProtocolError, RawDofResponse,
};
pub use self::service::ModelService;

/// Name of the model picked when the user did not ask for a specific one.
pub const DEFAULT_MODEL_NAME: &str = "default";

/// Picks the model to use from a catalogue.
///
/// `preferred` wins when present, then [`DEFAULT_MODEL_NAME`], then the first entry.
pub fn select_model(names: &[String], preferred: Option<&str>) -> Option<String> {
    preferred
        .and_then(|p| names.iter().find(|n| n.as_str() == p))
        .or_else(|| names.iter().find(|n| n.as_str() == DEFAULT_MODEL_NAME))
        .or_else(|| names.first())
        .cloned()
}
