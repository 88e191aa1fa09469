//! IPC Client for communicating with the pomocycle daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling
//! - Connection retry logic
//! - Timeout handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::types::{IpcRequest, IpcResponse};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: u64 = 65536;

/// Maximum retry attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
pub struct IpcClient {
    /// Socket path
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
    /// Attempts per request
    max_retries: u32,
}

impl IpcClient {
    /// Creates a new IPC client with a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            max_retries: MAX_RETRIES,
        }
    }

    /// Sets the number of attempts per request (at least one).
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Sends a toggle command to the daemon.
    pub async fn toggle(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Toggle).await
    }

    /// Sends a status query to the daemon.
    pub async fn status(&self) -> Result<IpcResponse> {
        self.send(&IpcRequest::Status).await
    }

    /// Sends a request to the daemon with retry logic.
    ///
    /// # Errors
    ///
    /// Returns the last transport error once all attempts fail, or the
    /// daemon's message if it answered with an error response.
    pub async fn send(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut attempt = 1;
        loop {
            match self.send_request(request).await {
                Ok(response) => return Self::check(response),
                Err(e) if attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {:#}",
                        attempt,
                        self.max_retries,
                        e
                    );
                    let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn check(response: IpcResponse) -> Result<IpcResponse> {
        if !response.is_success() {
            anyhow::bail!("{}", response.message);
        }
        Ok(response)
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &IpcRequest) -> Result<IpcResponse> {
        // Connect with timeout
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .with_context(|| {
                format!(
                    "Cannot connect to daemon at {:?}. Start it with 'pomocycle daemon'",
                    self.socket_path
                )
            })?;

        let request_json = serde_json::to_vec(request).context("Failed to serialize request")?;

        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.write_all(&request_json),
        )
        .await
        .context("Write timed out")?
        .context("Failed to send request")?;

        // Shutdown write side to signal end of request
        stream
            .shutdown()
            .await
            .context("Failed to shut down write half")?;

        let mut buffer = Vec::new();
        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            (&mut stream).take(MAX_RESPONSE_SIZE).read_to_end(&mut buffer),
        )
        .await
        .context("Read timed out")?
        .context("Failed to receive response")?;

        if buffer.is_empty() {
            anyhow::bail!("No response from daemon");
        }

        serde_json::from_slice(&buffer).context("Failed to parse response")
    }
}

// ============================================================================
// Tests
// ============================================================================
