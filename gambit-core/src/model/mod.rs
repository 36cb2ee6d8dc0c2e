mod game;
mod message;
mod peer;
mod room;
mod signaling;

pub use game::{GameMove, QUEEN};
pub use message::{AppMessage, ProtocolError};
pub use peer::PeerRole;
pub use room::RoomId;
pub use signaling::SignalMessage;
