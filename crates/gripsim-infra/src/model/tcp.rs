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
use gripsim_core::model::{
    DofQuery, DofUpdate, ModelRequest, ModelService, ProtocolError, RawDofResponse,
};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Longest reply line accepted from a model server, newline included.
pub const MAX_REPLY_BYTES: u64 = 64 * 1024;

/// Talks to an external model over newline-delimited JSON.
///
/// Every request opens its own connection, writes one line and reads one line
/// back. There is no timeout; a slow model simply keeps the request in flight.
#[derive(Debug, Clone)]
pub struct TcpModelService {
    addr: String,
}

impl TcpModelService {
    /// Creates a service for the model server at `addr` (`host:port`).
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Address of the model server.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: &ModelRequest,
    ) -> Result<T, ProtocolError> {
        let mut stream = TcpStream::connect(&self.addr).await?;
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        stream.write_all(line.as_bytes()).await?;
        stream.flush().await?;

        let mut reader = BufReader::new(stream.take(MAX_REPLY_BYTES));
        let mut reply = String::new();
        let read = reader.read_line(&mut reply).await?;
        if read == 0 {
            return Err(ProtocolError::NoReply);
        }
        if !reply.ends_with('\n') && read as u64 >= MAX_REPLY_BYTES {
            return Err(ProtocolError::ReplyTooLong(MAX_REPLY_BYTES));
        }
        log::trace!("Model reply from {}: {}", self.addr, reply.trim_end());
        Ok(serde_json::from_str(reply.trim_end())?)
    }
}

#[async_trait]
impl ModelService for TcpModelService {
    async fn model_names(&self) -> Result<Vec<String>, ProtocolError> {
        self.exchange(&ModelRequest::ModelNames).await
    }

    async fn about(&self, model: &str) -> Result<String, ProtocolError> {
        self.exchange(&ModelRequest::About(model.to_owned())).await
    }

    async fn query_dofs(&self, query: &DofQuery) -> Result<DofUpdate, ProtocolError> {
        let raw: RawDofResponse = self.exchange(&ModelRequest::Dofs(query.clone())).await?;
        DofUpdate::try_from(raw)
    }
}
