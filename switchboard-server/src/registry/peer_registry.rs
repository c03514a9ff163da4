use crate::signaling::PeerSink;
use std::collections::HashMap;
use switchboard_core::{PeerId, RoomId};

/// One live connection.
pub struct Peer {
    pub id: PeerId,
    pub room: Option<RoomId>,
    pub sink: PeerSink,
}

/// Owns every live [`Peer`]. Rooms refer to peers only by id.
#[derive(Default)]
pub struct PeerRegistry {
    peers: HashMap<PeerId, Peer>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: PeerSink) -> PeerId {
        let mut id = PeerId::new();
        while self.peers.contains_key(&id) {
            id = PeerId::new();
        }

        self.peers.insert(
            id.clone(),
            Peer {
                id: id.clone(),
                room: None,
                sink,
            },
        );
        id
    }

    /// Returns `false` if the peer is unknown.
    pub fn assign_room(&mut self, peer_id: &PeerId, room_id: RoomId) -> bool {
        match self.peers.get_mut(peer_id) {
            Some(peer) => {
                peer.room = Some(room_id);
                true
            }
            None => false,
        }
    }

    pub fn clear_room(&mut self, peer_id: &PeerId) -> Option<RoomId> {
        self.peers.get_mut(peer_id)?.room.take()
    }

    pub fn lookup(&self, peer_id: &PeerId) -> Option<&Peer> {
        self.peers.get(peer_id)
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> Option<Peer> {
        self.peers.remove(peer_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.values()
    }
}
