//! Accept loop and backend dial-out.
//!
//! The dispatcher binds the configured listen port and loops: accept one
//! inbound peer, dial the fixed backend address, hand the pair to a new
//! [`RelaySession`] running on its own task, keep accepting. Accept failures
//! are logged and non-fatal; a failed dial drops that peer connection and
//! nothing else. One bad session never blocks or terminates the listener.

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::Sender;

use crate::capture::session_log::CaptureReport;
use crate::configuration::types::RelayConfig;
use crate::error_handling::types::NetworkError;
use crate::relay::session::RelaySession;

pub struct Listener {
    config: Arc<RelayConfig>,
    report_tx: Sender<CaptureReport>,
}

impl Listener {
    pub fn new(config: Arc<RelayConfig>, report_tx: Sender<CaptureReport>) -> Self {
        Self { config, report_tx }
    }

    /// Binds the configured listen port.
    ///
    /// Kept separate from [`serve`](Self::serve) so callers (and tests) can
    /// observe the bound address before the accept loop starts.
    pub async fn bind(&self) -> Result<TcpListener, NetworkError> {
        let listener = TcpListener::bind(("0.0.0.0", self.config.listen_port))
            .await
            .map_err(NetworkError::BindError)?;

        info!(
            "listening on {}, forwarding to {}",
            listener.local_addr().map_err(NetworkError::BindError)?,
            self.config.backend_addr
        );
        Ok(listener)
    }

    /// Runs the accept loop forever.
    ///
    /// The backend is dialed inline, so the dispatcher does not accept while
    /// a dial is in flight; sessions themselves run on their own tasks.
    pub async fn serve(&self, listener: TcpListener) {
        loop {
            let (peer, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("accept failed: {}", e);
                    continue;
                }
            };
            debug!("accepted connection from {}", peer_addr);

            let backend = match TcpStream::connect(self.config.backend_addr.as_str()).await {
                Ok(stream) => stream,
                Err(e) => {
                    // No retry: the peer connection is dropped on the spot.
                    error!(
                        "dial to backend {} failed: {}; dropping peer {}",
                        self.config.backend_addr, e, peer_addr
                    );
                    continue;
                }
            };

            let session = RelaySession::new(Arc::clone(&self.config), self.report_tx.clone());
            tokio::spawn(async move {
                let id = session.id();
                if let Err(e) = session.run(peer, backend).await {
                    warn!("[{}] session closed with error: {}", id, e);
                }
            });
        }
    }
}
