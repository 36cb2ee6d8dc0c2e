use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// Envelope exchanged with the rendezvous server over the signaling socket.
///
/// Event names keep the original wire spellings (including spaces). SDP
/// bodies and ICE candidates travel as opaque strings; the candidate string
/// is itself a JSON-encoded candidate init.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "payload")]
pub enum SignalMessage {
    /// Client → server: enter a room.
    #[serde(rename = "join room")]
    JoinRoom {
        #[serde(rename = "roomID")]
        room_id: RoomId,
    },
    /// Server → client, delivered to the first participant: a second
    /// participant has arrived, start hosting.
    #[serde(rename = "joined")]
    Joined,
    /// Server → client, delivered to the second participant on arrival.
    #[serde(rename = "other joined")]
    OtherJoined,
    #[serde(rename = "offer")]
    Offer {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        offer: String,
    },
    #[serde(rename = "answer")]
    Answer {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        answer: String,
    },
    #[serde(rename = "ice")]
    Ice {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        candidate: String,
    },
    /// Server → client: the room already has two participants.
    #[serde(rename = "room full")]
    RoomFull,
    /// Client → server: leaving the room.
    #[serde(rename = "leave")]
    Leave {
        #[serde(rename = "roomID")]
        room_id: RoomId,
    },
}
