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

//! JSON wire types of the DoF query protocol.
//!
//! Requests are tagged objects, e.g.
//! `{"event":"dofs","payload":{"model":"default","state":[..8 reals..]}}`.
//! A DoF reply is `{"dofs":[[4 reals] x4],"eigVals":[4 reals]}`; it is validated
//! into a [`DofUpdate`] before anything else sees it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::{DofSet, EigVals, QueryState, DOF_COUNT};
use crate::math::DofVector;

/// Errors raised while talking to the model.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A reply had the wrong number of entries somewhere.
    #[error("malformed model response: expected {expected} {what}, found {found}")]
    Dimension {
        /// Which part of the reply was malformed.
        what: &'static str,
        /// Expected entry count.
        expected: usize,
        /// Received entry count.
        found: usize,
    },
    /// The reply was not valid JSON for the expected shape.
    #[error("invalid model message: {0}")]
    Json(#[from] serde_json::Error),
    /// The connection failed.
    #[error("model transport failed: {0}")]
    Io(#[from] std::io::Error),
    /// The service closed the connection without replying.
    #[error("model service closed the connection without a reply")]
    NoReply,
    /// The reply line exceeded the accepted size.
    #[error("model reply exceeds {0} bytes")]
    ReplyTooLong(u64),
    /// The service does not know the requested model.
    #[error("unknown model '{0}'")]
    UnknownModel(String),
}

/// A single DoF query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DofQuery {
    /// Model name from the catalogue.
    pub model: String,
    /// Gripper-centric environment state.
    pub state: QueryState,
}

/// Requests understood by the model service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ModelRequest {
    /// Ask for the DoFs at a state.
    Dofs(DofQuery),
    /// Ask for the model catalogue.
    ModelNames,
    /// Ask for a model's description.
    About(String),
}

/// DoF reply exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDofResponse {
    /// One row per DoF.
    pub dofs: Vec<Vec<f32>>,
    /// One eigenvalue per DoF.
    #[serde(rename = "eigVals")]
    pub eig_vals: Vec<f32>,
}

/// A validated DoF reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DofUpdate {
    /// The new DoF set.
    pub dofs: DofSet,
    /// Matching eigenvalues.
    pub eig_vals: EigVals,
}

impl TryFrom<RawDofResponse> for DofUpdate {
    type Error = ProtocolError;

    fn try_from(raw: RawDofResponse) -> Result<Self, Self::Error> {
        if raw.dofs.len() != DOF_COUNT {
            return Err(ProtocolError::Dimension {
                what: "DoF rows",
                expected: DOF_COUNT,
                found: raw.dofs.len(),
            });
        }
        if raw.eig_vals.len() != DOF_COUNT {
            return Err(ProtocolError::Dimension {
                what: "eigenvalues",
                expected: DOF_COUNT,
                found: raw.eig_vals.len(),
            });
        }
        let mut dofs = [DofVector::ZERO; DOF_COUNT];
        for (slot, row) in dofs.iter_mut().zip(&raw.dofs) {
            let components: [f32; DofVector::DIM] =
                row.as_slice()
                    .try_into()
                    .map_err(|_| ProtocolError::Dimension {
                        what: "DoF components",
                        expected: DofVector::DIM,
                        found: row.len(),
                    })?;
            *slot = DofVector::from(components);
        }
        let mut eig_vals = [0.0; DOF_COUNT];
        eig_vals.copy_from_slice(&raw.eig_vals);
        Ok(Self {
            dofs: DofSet(dofs),
            eig_vals,
        })
    }
}

impl From<DofUpdate> for RawDofResponse {
    fn from(update: DofUpdate) -> Self {
        Self {
            dofs: update.dofs.iter().map(|d| d.to_array().to_vec()).collect(),
            eig_vals: update.eig_vals.to_vec(),
        }
    }
}

/// Parses and validates a DoF reply line.
pub fn parse_dof_response(line: &str) -> Result<DofUpdate, ProtocolError> {
    let raw: RawDofResponse = serde_json::from_str(line)?;
    DofUpdate::try_from(raw)
}
