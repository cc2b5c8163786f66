//! One peer↔backend relay session and its two directional copy loops.
//!
//! A session owns a pair of already-connected streams. `run` splits both into
//! owned halves and drives two independent loops in a `JoinSet`:
//!
//! - peer→backend forwards chunks verbatim, appending every chunk to the
//!   session's capture buffer before the write; when the loop ends it shuts
//!   down the backend writer and hands the buffer off to the session logger.
//! - backend→peer rewrites every occurrence of the backend host with the
//!   relay's public address before the write; nothing is captured on this
//!   direction. When the loop ends it shuts down the peer writer.
//!
//! Each loop stops on EOF (`Ok(0)`) or any read/write error; the two
//! directions are independent and unordered relative to each other. `run`
//! returns only after both loops have terminated, at which point both
//! endpoints are closed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, trace, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::capture::session_log::CaptureReport;
use crate::configuration::types::RelayConfig;
use crate::error_handling::types::RelayError;

use super::rewriter::rewrite;

/// Read chunk size for both directional copy loops.
const CHUNK_SIZE: usize = 32 * 1024;

/// A single peer↔backend pairing, alive from accept-time until both
/// directional loops terminate.
pub struct RelaySession {
    id: Uuid,
    config: Arc<RelayConfig>,
    report_tx: Sender<CaptureReport>,
    start_time: DateTime<Utc>,
}

impl RelaySession {
    pub fn new(config: Arc<RelayConfig>, report_tx: Sender<CaptureReport>) -> Self {
        let id = Uuid::new_v4();
        debug!("[{}] session created", id);
        Self {
            id,
            config,
            report_tx,
            start_time: Utc::now(),
        }
    }

    /// Unique session identifier (correlates log lines and the emitted record).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Relays between `peer` and `backend` until both directions finish.
    ///
    /// Returns the first directional error, if any; a clean EOF on both
    /// directions is `Ok(())`. The capture hand-off happens in both cases.
    pub async fn run(self, peer: TcpStream, backend: TcpStream) -> Result<(), RelayError> {
        let peer_addr = peer.peer_addr().map_err(RelayError::AddrUnavailable)?;
        let local_addr = peer.local_addr().map_err(RelayError::AddrUnavailable)?;

        let (mut peer_read, mut peer_write) = peer.into_split();
        let (mut backend_read, mut backend_write) = backend.into_split();

        info!("[{}] relaying {} <-> {}", self.id, peer_addr, self.config.backend_addr);

        let mut set = JoinSet::new();

        // Peer -> backend: capture, then forward verbatim.
        {
            let id = self.id;
            let report_tx = self.report_tx.clone();
            set.spawn(async move {
                let mut buf = vec![0u8; CHUNK_SIZE];
                let mut capture: Vec<u8> = Vec::new();
                let result = loop {
                    let n = match peer_read.read(&mut buf).await {
                        Ok(0) => {
                            trace!("[{}] peer EOF; shutting down backend writer", id);
                            break Ok(());
                        }
                        Ok(n) => n,
                        Err(e) => break Err(RelayError::ReadError(e)),
                    };
                    capture.extend_from_slice(&buf[..n]);
                    if let Err(e) = backend_write.write_all(&buf[..n]).await {
                        break Err(RelayError::WriteError(e));
                    }
                    trace!("[{}] peer->backend {} bytes", id, n);
                };
                let _ = backend_write.shutdown().await;

                // One-shot hand-off to the logger; never blocks loop teardown.
                // A full or closed channel drops the record.
                let report = CaptureReport {
                    session_id: id,
                    peer_addr,
                    local_addr,
                    payload: capture,
                };
                if let Err(e) = report_tx.try_send(report) {
                    warn!("[{}] session record dropped: {}", id, e);
                }

                result
            });
        }

        // Backend -> peer: rewrite the backend address, then forward.
        {
            let id = self.id;
            let config = Arc::clone(&self.config);
            set.spawn(async move {
                let mut buf = vec![0u8; CHUNK_SIZE];
                let result = loop {
                    let n = match backend_read.read(&mut buf).await {
                        Ok(0) => {
                            trace!("[{}] backend EOF; shutting down peer writer", id);
                            break Ok(());
                        }
                        Ok(n) => n,
                        Err(e) => break Err(RelayError::ReadError(e)),
                    };
                    let chunk = rewrite(
                        &buf[..n],
                        config.backend_ip.as_bytes(),
                        config.public_ip.as_bytes(),
                    );
                    if let Err(e) = peer_write.write_all(&chunk).await {
                        break Err(RelayError::WriteError(e));
                    }
                    trace!("[{}] backend->peer {} bytes ({} after rewrite)", id, n, chunk.len());
                };
                let _ = peer_write.shutdown().await;
                result
            });
        }

        let mut outcome = Ok(());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!("[{}] direction terminated: {}", self.id, e);
                    if outcome.is_ok() {
                        outcome = Err(e);
                    }
                }
                Err(e) => {
                    if outcome.is_ok() {
                        outcome = Err(RelayError::TaskFailed(e.to_string()));
                    }
                }
            }
        }

        let duration = Utc::now() - self.start_time;
        info!(
            "[{}] session terminated ({}, {}ms)",
            self.id,
            if outcome.is_ok() { "clean" } else { "error" },
            duration.num_milliseconds()
        );
        outcome
    }
}
