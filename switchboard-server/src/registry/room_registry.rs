use std::collections::{HashMap, HashSet};
use switchboard_core::{PeerId, RoomId};
use tracing::info;

/// Room membership by peer id. A room exists only while it has members.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashSet<PeerId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, room_id: RoomId, peer_id: PeerId) {
        let members = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            HashSet::new()
        });
        members.insert(peer_id);
    }

    pub fn members_excluding(&self, room_id: &RoomId, peer_id: &PeerId) -> Vec<PeerId> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().filter(|id| *id != peer_id).cloned().collect())
            .unwrap_or_default()
    }

    /// Removes the peer, dropping the room once it is empty. Returns whether
    /// the peer was a member.
    pub fn leave(&mut self, room_id: &RoomId, peer_id: &PeerId) -> bool {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return false;
        };

        let removed = members.remove(peer_id);
        if members.is_empty() {
            self.rooms.remove(room_id);
            info!("Room {} is empty, removing", room_id);
        }
        removed
    }

    pub fn members(&self, room_id: &str) -> Option<&HashSet<PeerId>> {
        self.rooms.get(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoomId, &HashSet<PeerId>)> {
        self.rooms.iter()
    }
}
