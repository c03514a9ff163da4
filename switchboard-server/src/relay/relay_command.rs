use crate::relay::RelayStats;
use crate::signaling::PeerSink;
use switchboard_core::PeerId;
use tokio::sync::oneshot;

/// Commands fed to the relay loop by connection tasks.
#[derive(Debug)]
pub enum RelayCommand {
    /// A transport connection was established; the relay answers with the
    /// identity it assigned.
    Connect {
        sink: PeerSink,
        reply: oneshot::Sender<PeerId>,
    },

    /// One text frame received from a peer.
    Envelope { peer_id: PeerId, text: String },

    /// The transport connection closed. Always the last command for a peer.
    Disconnect { peer_id: PeerId },

    Stats { reply: oneshot::Sender<RelayStats> },
}
