pub mod model;

pub use model::{AppMessage, GameMove, PeerRole, ProtocolError, RoomId, SignalMessage};
