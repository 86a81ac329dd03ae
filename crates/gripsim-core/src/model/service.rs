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

use async_trait::async_trait;

use super::protocol::{DofQuery, DofUpdate, ProtocolError};

/// A source of adaptive DoFs.
///
/// Calls may take arbitrarily long; the control loop never awaits them on the
/// tick thread. A concrete implementation lives in `gripsim-infra`.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Lists the models the service can evaluate.
    async fn model_names(&self) -> Result<Vec<String>, ProtocolError>;

    /// Returns a human readable description of `model`.
    async fn about(&self, model: &str) -> Result<String, ProtocolError>;

    /// Evaluates the model at a state.
    ///
    /// Implementations must return [`ProtocolError::Dimension`] for replies of the
    /// wrong shape instead of padding or truncating them.
    async fn query_dofs(&self, query: &DofQuery) -> Result<DofUpdate, ProtocolError>;
}
