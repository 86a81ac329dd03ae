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

//! Bridges an async [`ModelService`] to the synchronous tick thread.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use gripsim_core::model::{select_model, DofQuery, DofUpdate, ModelService, ProtocolError};
use tokio::runtime::{Builder, Runtime};

use crate::adaptive_loop::DofChannel;

type DofResult = Result<DofUpdate, ProtocolError>;

/// Owns a small tokio runtime and runs model requests on it.
///
/// Results are handed back through a channel and collected with
/// [`DofChannel::poll`] at the start of the next tick. Requests are never
/// cancelled and have no timeout.
pub struct ModelClient {
    runtime: Runtime,
    service: Arc<dyn ModelService>,
    result_tx: Sender<DofResult>,
    result_rx: Receiver<DofResult>,
}

impl ModelClient {
    /// Creates a client for `service` with a dedicated single-worker runtime.
    pub fn new(service: Arc<dyn ModelService>) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gripsim-model")
            .enable_all()
            .build()?;
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        Ok(Self {
            runtime,
            service,
            result_tx,
            result_rx,
        })
    }

    /// Fetches the model catalogue and picks a model, blocking until done.
    ///
    /// Meant for startup, not for the tick loop.
    pub fn fetch_catalogue(
        &self,
        preferred: Option<&str>,
    ) -> Result<(Vec<String>, Option<String>), ProtocolError> {
        let names = self.runtime.block_on(self.service.model_names())?;
        let selected = select_model(&names, preferred);
        log::info!("Model catalogue: {names:?}, selected {selected:?}");
        Ok((names, selected))
    }

    /// Fetches a model's description, blocking until done.
    pub fn about(&self, model: &str) -> Result<String, ProtocolError> {
        self.runtime.block_on(self.service.about(model))
    }
}

impl DofChannel for ModelClient {
    fn submit(&mut self, query: DofQuery) {
        let service = Arc::clone(&self.service);
        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            let result = service.query_dofs(&query).await;
            if tx.send(result).is_err() {
                log::debug!("Model client dropped before the DoF response arrived.");
            }
        });
    }

    fn poll(&mut self) -> Vec<DofResult> {
        self.result_rx.try_iter().collect()
    }

    fn discard_pending(&mut self) {
        // Tasks still running keep the old sender; their results go nowhere.
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let dropped = std::mem::replace(&mut self.result_rx, result_rx).len();
        self.result_tx = result_tx;
        log::debug!("Discarded pending DoF requests ({dropped} results already arrived).");
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("pending_results", &self.result_rx.len())
            .finish_non_exhaustive()
    }
}
