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

use gripsim_core::control::QueryState;
use gripsim_core::math::DofVector;
use gripsim_core::model::{DofQuery, ModelRequest, ModelService, ProtocolError};
use gripsim_infra::model::MAX_REPLY_BYTES;
use gripsim_infra::TcpModelService;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Serves `replies` in order, one connection each, and returns the requests it saw.
async fn mock_server(
    replies: Vec<&'static str>,
) -> (String, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for reply in replies {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(socket);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            seen.push(line.trim_end().to_string());
            let mut socket = reader.into_inner();
            if !reply.is_empty() {
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.write_all(b"\n").await.unwrap();
            }
        }
        seen
    });
    (addr, handle)
}

fn query() -> DofQuery {
    DofQuery {
        model: "default".into(),
        state: QueryState([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
    }
}

#[tokio::test]
async fn test_catalogue_and_dofs_round_trip() {
    let (addr, server) = mock_server(vec![
        r#"["default","other"]"#,
        r#""A model""#,
        r#"{"dofs":[[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]],"eigVals":[4,3,2,1]}"#,
    ])
    .await;
    let service = TcpModelService::new(addr);

    let names = service.model_names().await.unwrap();
    assert_eq!(names, vec!["default".to_string(), "other".to_string()]);
    assert_eq!(service.about("default").await.unwrap(), "A model");
    let update = service.query_dofs(&query()).await.unwrap();
    assert_eq!(update.dofs[3], DofVector::GRIP);
    assert_eq!(update.eig_vals, [4.0, 3.0, 2.0, 1.0]);

    let seen = server.await.unwrap();
    assert_eq!(seen[0], r#"{"event":"modelNames"}"#);
    assert_eq!(seen[1], r#"{"event":"about","payload":"default"}"#);
    let request: ModelRequest = serde_json::from_str(&seen[2]).unwrap();
    assert_eq!(request, ModelRequest::Dofs(query()));
}

#[tokio::test]
async fn test_malformed_reply_is_rejected() {
    let reply = r#"{"dofs":[[1,0,0],[0,1,0],[0,0,1],[0,0,0]],"eigVals":[1,1,1,1]}"#;
    let (addr, _server) = mock_server(vec![reply]).await;
    let err = TcpModelService::new(addr)
        .query_dofs(&query())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Dimension {
            expected: 4,
            found: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_closed_connection_is_no_reply() {
    let (addr, _server) = mock_server(vec![""]).await;
    let err = TcpModelService::new(addr).model_names().await.unwrap_err();
    assert!(matches!(err, ProtocolError::NoReply), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_io_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    let err = TcpModelService::new(addr).model_names().await.unwrap_err();
    assert!(matches!(err, ProtocolError::Io(_)), "{err:?}");
}

#[tokio::test]
async fn test_endless_reply_line_is_cut_off() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let chunk = vec![b'a'; 16 * 1024];
        let mut sent = 0u64;
        // Stops once the client hangs up.
        while sent <= 4 * MAX_REPLY_BYTES {
            if socket.write_all(&chunk).await.is_err() {
                break;
            }
            sent += chunk.len() as u64;
        }
    });

    let err = TcpModelService::new(addr).model_names().await.unwrap_err();
    assert!(
        matches!(err, ProtocolError::ReplyTooLong(limit) if limit == MAX_REPLY_BYTES),
        "{err:?}"
    );
    server.abort();
}
