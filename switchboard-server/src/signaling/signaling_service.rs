use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::{Relay, RelayCommand, RelayStats};
use crate::signaling::PeerSink;
use std::sync::Arc;
use switchboard_core::PeerId;
use tokio::sync::{mpsc, oneshot};

struct SignalingInner {
    config: RelayConfig,
}

/// Cloneable front door to the relay loop, shared by every connection task.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    relay_tx: mpsc::Sender<RelayCommand>,
}

impl SignalingService {
    /// Spawns the relay loop on the current tokio runtime.
    pub fn new(config: RelayConfig) -> Self {
        let (relay_tx, relay_rx) = mpsc::channel(config.command_buffer.max(1));
        tokio::spawn(Relay::new(relay_rx).run());

        Self {
            inner: Arc::new(SignalingInner { config }),
            relay_tx,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    pub async fn connect(&self, sink: PeerSink) -> Result<PeerId, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::Connect { sink, reply }).await?;
        rx.await.map_err(|_| RelayError::RelayClosed)
    }

    pub async fn forward(&self, peer_id: PeerId, text: String) -> Result<(), RelayError> {
        self.send(RelayCommand::Envelope { peer_id, text }).await
    }

    pub async fn disconnect(&self, peer_id: PeerId) -> Result<(), RelayError> {
        self.send(RelayCommand::Disconnect { peer_id }).await
    }

    pub async fn stats(&self) -> Result<RelayStats, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::Stats { reply }).await?;
        rx.await.map_err(|_| RelayError::RelayClosed)
    }

    async fn send(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.relay_tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::RelayClosed)
    }
}
