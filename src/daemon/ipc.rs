//! IPC Server for the pomodoro daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for presentation-layer calls
//! - Dispatch into the shared `TimerEngine`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use crate::types::{IpcRequest, IpcResponse, ResponseData};

use super::timer::TimerEngine;

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,

    /// Peer closed the connection without sending anything
    #[error("Connection closed by client")]
    Closed,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        tracing::debug!("Listening on {:?}", socket_path);

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Reads until the client shuts down its write half, bounded by a read
    /// timeout and [`MAX_REQUEST_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = Vec::new();
        let limit = (MAX_REQUEST_SIZE + 1) as u64;

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            (&mut *stream).take(limit).read_to_end(&mut buffer),
        )
        .await;

        match read_result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        }

        if buffer.is_empty() {
            return Err(IpcError::Closed.into());
        }
        if buffer.len() > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge.into());
        }

        let request: IpcRequest = serde_json::from_slice(&buffer)
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the shared TimerEngine.
///
/// Every request takes the engine lock for its whole duration, so requests
/// and ticks never interleave.
pub struct RequestHandler {
    /// Shared reference to the timer engine
    engine: Arc<Mutex<TimerEngine>>,
}

impl RequestHandler {
    /// Creates a new request handler with the given timer engine.
    pub fn new(engine: Arc<Mutex<TimerEngine>>) -> Self {
        Self { engine }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        tracing::debug!("Handling {:?}", request);

        let message = match request {
            IpcRequest::Status => "",
            IpcRequest::Toggle => {
                engine.toggle_pause();
                if engine.clock().is_paused() {
                    "Timer paused"
                } else {
                    "Timer running"
                }
            }
            IpcRequest::OpenSettings => {
                engine.open_settings();
                "Settings opened"
            }
            IpcRequest::CloseSettings | IpcRequest::CancelSettings => {
                engine.cancel_settings();
                "Settings discarded"
            }
            IpcRequest::EditDuration { field, delta } => {
                engine.edit_pending_duration(field, delta);
                "Settings draft updated"
            }
            IpcRequest::EditFont { font } => {
                engine.edit_pending_font(font);
                "Settings draft updated"
            }
            IpcRequest::EditColor { color } => {
                engine.edit_pending_color(color);
                "Settings draft updated"
            }
            IpcRequest::CommitSettings => {
                let outcome = engine.commit_settings();
                return IpcResponse::success(
                    Self::commit_message(outcome.durations_changed, outcome.persisted),
                    Some(ResponseData {
                        commit: Some(outcome),
                        ..Self::data(&engine)
                    }),
                );
            }
        };

        IpcResponse::success(message, Some(Self::data(&engine)))
    }

    fn data(engine: &TimerEngine) -> ResponseData {
        ResponseData {
            snapshot: Some(engine.snapshot()),
            durations: Some(*engine.settings().durations()),
            pending: engine.pending().copied(),
            commit: None,
        }
    }

    fn commit_message(durations_changed: bool, persisted: bool) -> &'static str {
        match (durations_changed, persisted) {
            (true, true) => "Settings saved, timer reset",
            (false, true) => "Settings saved",
            (true, false) => "Settings applied but could not be saved, timer reset",
            (false, false) => "Settings applied but could not be saved",
        }
    }
}

/// Serves a single connection: one request, one response.
///
/// Malformed requests get an error response rather than a dropped
/// connection.
///
/// # Errors
///
/// Returns an error if the response cannot be written.
pub async fn serve_connection(mut stream: UnixStream, handler: &RequestHandler) -> Result<()> {
    let response = match IpcServer::receive_request(&mut stream).await {
        Ok(request) => handler.handle(request).await,
        Err(e) => {
            tracing::warn!("Bad request: {:#}", e);
            IpcResponse::error(format!("{:#}", e))
        }
    };
    IpcServer::send_response(&mut stream, &response).await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::daemon::timer::TimerEvent;
    use crate::settings::SettingsStore;
    use crate::types::{ActionLabel, DurationDelta, Durations, Font, Mode};

    // ------------------------------------------------------------------------
    // Helper functions
    // ------------------------------------------------------------------------

    fn create_temp_socket_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        // Keep the directory so it's not deleted
        std::mem::forget(dir);
        path
    }

    fn create_engine() -> (Arc<Mutex<TimerEngine>>, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(SettingsStore::in_memory(), tx);
        (Arc::new(Mutex::new(engine)), rx)
    }

    async fn send_raw(path: PathBuf, raw: &'static str) -> IpcResponse {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut stream = UnixStream::connect(&path).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).await.unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    // ------------------------------------------------------------------------
    // IpcServer Tests
    // ------------------------------------------------------------------------

    mod ipc_server_tests {
        use super::*;

        #[tokio::test]
        async fn test_server_creation() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path);

            assert!(server.is_ok());
            assert!(socket_path.exists());
        }

        #[tokio::test]
        async fn test_server_removes_existing_socket() {
            let socket_path = create_temp_socket_path();
            std::fs::write(&socket_path, "dummy").unwrap();

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
        }

        #[tokio::test]
        async fn test_server_creates_parent_directory() {
            let dir = tempfile::tempdir().unwrap();
            let socket_path = dir.path().join("subdir").join("test.sock");

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
            assert!(socket_path.parent().unwrap().exists());
        }

        #[tokio::test]
        async fn test_receive_request_toggle() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                stream.write_all(br#"{"command":"toggle"}"#).await.unwrap();
                stream.shutdown().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert_eq!(request.unwrap(), IpcRequest::Toggle);
            client_handle.await.unwrap();
        }

        #[tokio::test]
        async fn test_receive_request_edit_duration() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let request = r#"{"command":"edit_duration","field":"longBreak","delta":"decrement"}"#;
                stream.write_all(request.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await.unwrap();
            assert_eq!(
                request,
                IpcRequest::EditDuration {
                    field: Mode::LongBreak,
                    delta: DurationDelta::Decrement,
                }
            );

            client_handle.await.unwrap();
        }

        #[tokio::test]
        async fn test_receive_request_invalid_json() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let _client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                stream.write_all(b"not valid json").await.unwrap();
                stream.shutdown().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert!(request.is_err());
        }

        #[tokio::test]
        async fn test_receive_request_too_large() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let _client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let payload = vec![b' '; MAX_REQUEST_SIZE + 10];
                let _ = stream.write_all(&payload).await;
                let _ = stream.shutdown().await;
            });

            let mut stream = server.accept().await.unwrap();
            let err = IpcServer::receive_request(&mut stream).await.unwrap_err();
            assert!(err.to_string().contains("too large"));
        }

        #[tokio::test]
        async fn test_send_response() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                let mut buffer = Vec::new();
                stream.read_to_end(&mut buffer).await.unwrap();
                serde_json::from_slice::<IpcResponse>(&buffer).unwrap()
            });

            let mut stream = server.accept().await.unwrap();
            let response = IpcResponse::success("Test message", None);
            IpcServer::send_response(&mut stream, &response)
                .await
                .unwrap();
            drop(stream);

            let received = client_handle.await.unwrap();
            assert_eq!(received.status, "success");
            assert_eq!(received.message, "Test message");
        }

        #[tokio::test]
        async fn test_socket_path_getter() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            assert_eq!(server.socket_path(), socket_path);
        }

        #[tokio::test]
        async fn test_server_drop_cleanup() {
            let socket_path = create_temp_socket_path();

            {
                let _server = IpcServer::new(&socket_path).unwrap();
                assert!(socket_path.exists());
            }

            assert!(!socket_path.exists());
        }
    }

    // ------------------------------------------------------------------------
    // RequestHandler Tests
    // ------------------------------------------------------------------------

    mod request_handler_tests {
        use super::*;

        #[tokio::test]
        async fn test_handle_status() {
            let (engine, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler.handle(IpcRequest::Status).await;

            assert!(response.is_success());
            let data = response.data.unwrap();
            let snapshot = data.snapshot.unwrap();
            assert_eq!(snapshot.mode, Mode::Work);
            assert_eq!(snapshot.minutes, "25");
            assert_eq!(snapshot.seconds, "00");
            assert_eq!(snapshot.action_label, ActionLabel::Start);
            assert_eq!(data.durations, Some(Durations::default()));
            assert!(data.pending.is_none());
        }

        #[tokio::test]
        async fn test_handle_toggle_twice() {
            let (engine, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let response = handler.handle(IpcRequest::Toggle).await;
            assert_eq!(response.message, "Timer running");
            let snapshot = response.data.unwrap().snapshot.unwrap();
            assert_eq!(snapshot.action_label, ActionLabel::Pause);

            let response = handler.handle(IpcRequest::Toggle).await;
            assert_eq!(response.message, "Timer paused");
        }

        #[tokio::test]
        async fn test_handle_settings_flow() {
            let (engine, _rx) = create_engine();
            let handler = RequestHandler::new(engine.clone());

            let response = handler.handle(IpcRequest::OpenSettings).await;
            assert_eq!(response.data.unwrap().pending.unwrap().durations.pomodoro, 25);

            let response = handler
                .handle(IpcRequest::EditDuration {
                    field: Mode::Work,
                    delta: DurationDelta::Increment,
                })
                .await;
            assert_eq!(response.data.unwrap().pending.unwrap().durations.pomodoro, 26);

            handler
                .handle(IpcRequest::EditFont { font: Font::Mono })
                .await;

            let response = handler.handle(IpcRequest::CommitSettings).await;
            assert_eq!(response.message, "Settings saved, timer reset");
            let data = response.data.unwrap();
            let commit = data.commit.unwrap();
            assert!(commit.durations_changed);
            assert!(commit.preferences_changed);
            let snapshot = data.snapshot.unwrap();
            assert_eq!(snapshot.seconds_left, 26 * 60);
            assert_eq!(snapshot.font, Font::Mono);

            assert!(engine.lock().await.pending().is_none());
        }

        #[tokio::test]
        async fn test_handle_cancel_and_close() {
            let (engine, _rx) = create_engine();
            let handler = RequestHandler::new(engine.clone());

            for discard in [IpcRequest::CancelSettings, IpcRequest::CloseSettings] {
                handler
                    .handle(IpcRequest::EditFont { font: Font::Serif })
                    .await;
                let response = handler.handle(discard).await;
                assert!(response.data.unwrap().pending.is_none());
                assert_eq!(
                    engine.lock().await.settings().preferences().font,
                    Font::Sans
                );
            }
        }

        #[tokio::test]
        async fn test_commit_message_variants() {
            assert_eq!(
                RequestHandler::commit_message(false, true),
                "Settings saved"
            );
            assert!(RequestHandler::commit_message(true, false).contains("could not be saved"));
        }
    }

    // ------------------------------------------------------------------------
    // Connection Tests
    // ------------------------------------------------------------------------

    mod connection_tests {
        use super::*;

        #[tokio::test]
        async fn test_serve_connection_round_trip() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();
            let (engine, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let client = tokio::spawn(send_raw(socket_path.clone(), r#"{"command":"toggle"}"#));

            let stream = server.accept().await.unwrap();
            serve_connection(stream, &handler).await.unwrap();

            let response = client.await.unwrap();
            assert!(response.is_success());
            assert!(!response.data.unwrap().snapshot.unwrap().is_paused);
        }

        #[tokio::test]
        async fn test_serve_connection_bad_request_gets_error() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();
            let (engine, _rx) = create_engine();
            let handler = RequestHandler::new(engine);

            let client = tokio::spawn(send_raw(socket_path.clone(), r#"{"command":"explode"}"#));

            let stream = server.accept().await.unwrap();
            serve_connection(stream, &handler).await.unwrap();

            let response = client.await.unwrap();
            assert!(!response.is_success());
            assert!(response.message.contains("deserialize"));
        }

        #[tokio::test]
        async fn test_connection_closed() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let _client = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let stream = UnixStream::connect(&client_path).await.unwrap();
                drop(stream);
            });

            let mut stream = server.accept().await.unwrap();
            let result = IpcServer::receive_request(&mut stream).await;

            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_ipc_error_display() {
            let err = IpcError::ReadError("test error".to_string());
            assert_eq!(err.to_string(), "Failed to read request: test error");

            let err = IpcError::Timeout;
            assert_eq!(err.to_string(), "Operation timed out");

            let err = IpcError::RequestTooLarge;
            assert!(err.to_string().contains("4096"));
        }
    }
}
