use crate::model::envelope::{Envelope, EnvelopeError};
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// Negotiation envelopes that are relayed to a single named recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::Candidate => "candidate",
        }
    }
}

/// A client envelope, classified by its `type` field.
#[derive(Debug)]
pub enum Inbound {
    Join {
        room_id: RoomId,
    },
    Leave,
    /// `offer`, `answer` or `candidate` addressed to `recipient`.
    Direct {
        kind: SignalKind,
        recipient: String,
        envelope: Envelope,
    },
    /// `message`, fanned out to the caller's room.
    Broadcast {
        envelope: Envelope,
    },
    Unrecognized {
        kind: String,
    },
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let envelope = Envelope::parse(text)?;
        let kind = envelope.kind()?;

        let inbound = match kind.as_str() {
            "join" => {
                let room_id = envelope
                    .string_field("roomId")?
                    .and_then(RoomId::new)
                    .ok_or(EnvelopeError::MissingField {
                        kind: "join",
                        field: "roomId",
                    })?;
                Inbound::Join { room_id }
            }
            "leave" => Inbound::Leave,
            "offer" => Self::direct(SignalKind::Offer, envelope)?,
            "answer" => Self::direct(SignalKind::Answer, envelope)?,
            "candidate" => Self::direct(SignalKind::Candidate, envelope)?,
            "message" => Inbound::Broadcast { envelope },
            other => Inbound::Unrecognized {
                kind: other.to_owned(),
            },
        };

        Ok(inbound)
    }

    fn direct(kind: SignalKind, envelope: Envelope) -> Result<Self, EnvelopeError> {
        let recipient = envelope
            .string_field("recipient")?
            .ok_or(EnvelopeError::MissingField {
                kind: kind.as_str(),
                field: "recipient",
            })?;

        Ok(Inbound::Direct {
            kind,
            recipient,
            envelope,
        })
    }
}

/// Envelopes the relay itself originates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerSignal {
    /// Sent once to a peer that just joined: everyone else in the room.
    Peers { peers: Vec<PeerId> },

    #[serde(rename_all = "camelCase")]
    PeerDisconnected { peer_id: PeerId },
}
