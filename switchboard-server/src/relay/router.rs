use crate::registry::{Peer, PeerRegistry, RoomRegistry};
use crate::signaling::PeerSink;
use serde::Serialize;
use switchboard_core::{Envelope, Inbound, PeerId, RoomId, ServerSignal, SignalKind};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub peers: usize,
    pub rooms: usize,
}

/// Peer and room state plus the per-envelope routing rules.
///
/// Every method runs to completion without awaiting: outbound frames are only
/// queued on the recipients' sinks, never written to a socket here.
#[derive(Default)]
pub struct Router {
    peers: PeerRegistry,
    rooms: RoomRegistry,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, sink: PeerSink) -> PeerId {
        let peer_id = self.peers.register(sink);
        info!("New peer connected: {}", peer_id);
        peer_id
    }

    /// Parses one text frame from `peer_id` and routes it.
    pub fn dispatch(&mut self, peer_id: &PeerId, text: &str) {
        if self.peers.lookup(peer_id).is_none() {
            debug!("Dropping envelope from unknown peer {}", peer_id);
            return;
        }

        match Inbound::parse(text) {
            Ok(inbound) => self.route(peer_id, inbound),
            Err(e) => warn!("Invalid envelope from {}: {}", peer_id, e),
        }
    }

    pub fn route(&mut self, peer_id: &PeerId, inbound: Inbound) {
        match inbound {
            Inbound::Join { room_id } => self.join(peer_id, room_id),
            Inbound::Leave => {
                if !self.leave_room(peer_id) {
                    debug!("Peer {} sent leave outside of any room", peer_id);
                }
            }
            Inbound::Direct {
                kind,
                recipient,
                envelope,
            } => self.relay_direct(peer_id, kind, &recipient, envelope),
            Inbound::Broadcast { envelope } => self.relay_broadcast(peer_id, envelope),
            Inbound::Unrecognized { kind } => {
                warn!("Unknown message type from {}: {}", peer_id, kind)
            }
        }
    }

    /// Final cleanup for a closed connection. Safe to call for unknown peers.
    pub fn disconnect(&mut self, peer_id: &PeerId) {
        if self.peers.lookup(peer_id).is_none() {
            return;
        }

        self.leave_room(peer_id);
        self.peers.remove(peer_id);
        info!("Peer {} disconnected", peer_id);
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            peers: self.peers.len(),
            rooms: self.rooms.len(),
        }
    }

    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    fn join(&mut self, peer_id: &PeerId, room_id: RoomId) {
        let Some(peer) = self.peers.lookup(peer_id) else {
            return;
        };

        // One room per peer; switching requires an explicit leave.
        if let Some(current) = &peer.room {
            warn!(
                "Peer {} is already in room {}, ignoring join to {}",
                peer_id, current, room_id
            );
            return;
        }

        self.rooms.join(room_id.clone(), peer_id.clone());
        self.peers.assign_room(peer_id, room_id.clone());

        let peers = self.rooms.members_excluding(&room_id, peer_id);
        info!(
            "Peer {} joined room {} ({} already there)",
            peer_id,
            room_id,
            peers.len()
        );

        if let Some(peer) = self.peers.lookup(peer_id) {
            send_signal(peer, &ServerSignal::Peers { peers });
        }
    }

    /// Takes the peer out of its room and tells whoever is left. Returns
    /// `false` if the peer was not in a room.
    fn leave_room(&mut self, peer_id: &PeerId) -> bool {
        let Some(room_id) = self.peers.clear_room(peer_id) else {
            return false;
        };

        self.rooms.leave(&room_id, peer_id);
        info!("Peer {} left room {}", peer_id, room_id);

        let remaining = self.rooms.members_excluding(&room_id, peer_id);
        if !remaining.is_empty() {
            let signal = ServerSignal::PeerDisconnected {
                peer_id: peer_id.clone(),
            };
            match serde_json::to_string(&signal) {
                Ok(json) => self.deliver_all(&remaining, json),
                Err(e) => error!("Failed to serialize signal message: {}", e),
            }
        }
        true
    }

    fn relay_direct(&self, sender: &PeerId, kind: SignalKind, recipient: &str, envelope: Envelope) {
        let target = recipient
            .parse::<PeerId>()
            .ok()
            .and_then(|id| self.peers.lookup(&id));

        let Some(target) = target else {
            debug!(
                "Dropping {} from {}: recipient {} is not connected",
                kind.as_str(),
                sender,
                recipient
            );
            return;
        };

        match envelope.stamped(sender) {
            Ok(text) => deliver(target, text),
            Err(e) => warn!("Failed to encode {} from {}: {}", kind.as_str(), sender, e),
        }
    }

    fn relay_broadcast(&self, sender: &PeerId, envelope: Envelope) {
        let room_id = self
            .peers
            .lookup(sender)
            .and_then(|peer| peer.room.clone());

        let Some(room_id) = room_id else {
            debug!("Dropping message from {}: not in a room", sender);
            return;
        };

        let targets = self.rooms.members_excluding(&room_id, sender);
        match envelope.stamped(sender) {
            Ok(text) => self.deliver_all(&targets, text),
            Err(e) => warn!("Failed to encode message from {}: {}", sender, e),
        }
    }

    fn deliver_all(&self, targets: &[PeerId], text: String) {
        for target in targets {
            if let Some(peer) = self.peers.lookup(target) {
                deliver(peer, text.clone());
            }
        }
    }
}

fn send_signal(peer: &Peer, signal: &ServerSignal) {
    match serde_json::to_string(signal) {
        Ok(json) => deliver(peer, json),
        Err(e) => error!("Failed to serialize signal message: {}", e),
    }
}

fn deliver(peer: &Peer, text: String) {
    if !peer.sink.is_open() {
        debug!("Skipping closed sink for {}", peer.id);
        return;
    }

    if let Err(e) = peer.sink.send_text(text) {
        warn!("Failed to queue message for {}: {}", peer.id, e);
    }
}
