//! Structured session records and the logger task that emits them.
//!
//! Each completed peer→backend copy loop hands its capture buffer off exactly
//! once as a [`CaptureReport`]. A single long-lived [`SessionLogger`] task
//! drains the report channel, encodes each payload through the codec and
//! writes one JSON line per record to a line-oriented sink (stdout in
//! production). The task exits once every report sender has been dropped, so
//! awaiting its join handle drains all in-flight records before shutdown.

use std::net::SocketAddr;

use log::{debug, error};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::Receiver;
use uuid::Uuid;

use crate::capture::codec;
use crate::error_handling::types::LogError;

/// One-shot hand-off from a finished peer→backend loop to the logger task.
///
/// `peer_addr` is the remote end of the accepted connection; `local_addr` is
/// the relay's own end of that same connection (the agent-facing identity in
/// the emitted record).
#[derive(Debug)]
pub struct CaptureReport {
    pub session_id: Uuid,
    pub peer_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub payload: Vec<u8>,
}

/// The serialized record shape, one JSON line per completed capture.
///
/// Field names and order are the wire format consumed downstream; ports are
/// carried as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub r_ip: String,
    pub r_port: String,
    pub a_ip: String,
    pub a_port: String,
    pub payload: String,
}

impl SessionRecord {
    /// Builds a record from a report, encoding the captured payload.
    pub fn from_report(report: &CaptureReport) -> Result<Self, LogError> {
        Ok(Self {
            r_ip: report.peer_addr.ip().to_string(),
            r_port: report.peer_addr.port().to_string(),
            a_ip: report.local_addr.ip().to_string(),
            a_port: report.local_addr.port().to_string(),
            payload: codec::encode(&report.payload)?,
        })
    }
}

/// Drains [`CaptureReport`]s into a line-oriented sink.
///
/// Encoding, serialization or sink failures are logged and the record is
/// dropped; the relay path is never affected.
pub struct SessionLogger<W> {
    report_rx: Receiver<CaptureReport>,
    sink: W,
}

impl<W: AsyncWrite + Unpin> SessionLogger<W> {
    pub fn new(report_rx: Receiver<CaptureReport>, sink: W) -> Self {
        Self { report_rx, sink }
    }

    /// Runs until every report sender is dropped and the channel is drained.
    pub async fn run(mut self) {
        while let Some(report) = self.report_rx.recv().await {
            if let Err(e) = self.emit(&report).await {
                error!("[{}] dropping session record: {}", report.session_id, e);
            }
        }
        debug!("session logger drained");
    }

    async fn emit(&mut self, report: &CaptureReport) -> Result<(), LogError> {
        let record = SessionRecord::from_report(report)?;

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        self.sink.write_all(&line).await.map_err(LogError::SinkError)?;
        self.sink.flush().await.map_err(LogError::SinkError)?;

        debug!(
            "[{}] session record emitted ({} captured bytes)",
            report.session_id,
            report.payload.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::sync::mpsc;

    fn sim_report(payload: &[u8]) -> CaptureReport {
        CaptureReport {
            session_id: Uuid::new_v4(),
            peer_addr: "198.51.100.23:49152".parse().unwrap(),
            local_addr: "192.0.2.1:8022".parse().unwrap(),
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_record_field_order_is_stable() {
        let record = SessionRecord::from_report(&sim_report(b"hello")).unwrap();
        let json = serde_json::to_string(&record).unwrap();

        let fields: Vec<usize> = ["\"r_ip\"", "\"r_port\"", "\"a_ip\"", "\"a_port\"", "\"payload\""]
            .iter()
            .map(|f| json.find(f).unwrap())
            .collect();

        assert!(fields.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_record_carries_endpoint_identity() {
        let record = SessionRecord::from_report(&sim_report(b"hello")).unwrap();

        assert_eq!(record.r_ip, "198.51.100.23");
        assert_eq!(record.r_port, "49152");
        assert_eq!(record.a_ip, "192.0.2.1");
        assert_eq!(record.a_port, "8022");
        assert_eq!(codec::decode(&record.payload).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_logger_emits_one_line_per_report() {
        let (tx, rx) = mpsc::channel(8);
        let (mut read_half, write_half) = tokio::io::duplex(64 * 1024);

        let logger = SessionLogger::new(rx, write_half);
        let handle = tokio::spawn(logger.run());

        tx.send(sim_report(b"first")).await.unwrap();
        tx.send(sim_report(b"second")).await.unwrap();
        drop(tx); // all senders gone, logger drains and exits

        handle.await.unwrap();

        let mut output = String::new();
        read_half.read_to_string(&mut output).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: SessionRecord = serde_json::from_str(lines[0]).unwrap();
        let second: SessionRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(codec::decode(&first.payload).unwrap(), b"first");
        assert_eq!(codec::decode(&second.payload).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_logger_writes_exact_line_to_sink() {
        let report = sim_report(b"payload bytes");
        let mut expected = serde_json::to_vec(&SessionRecord::from_report(&report).unwrap()).unwrap();
        expected.push(b'\n');

        // The mock sink fails the test if anything else is written.
        let sink = tokio_test::io::Builder::new().write(&expected).build();
        let (tx, rx) = mpsc::channel(8);
        let logger = SessionLogger::new(rx, sink);
        let handle = tokio::spawn(logger.run());

        tx.send(report).await.unwrap();
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_logger_exits_when_senders_drop_without_reports() {
        let (tx, rx) = mpsc::channel::<CaptureReport>(8);
        let (mut read_half, write_half) = tokio::io::duplex(1024);

        let logger = SessionLogger::new(rx, write_half);
        let handle = tokio::spawn(logger.run());

        drop(tx);
        handle.await.unwrap();

        let mut output = Vec::new();
        read_half.read_to_end(&mut output).await.unwrap();
        assert!(output.is_empty());
    }
}
