pub mod peer;
pub mod session;
pub mod signaling;

mod error;

pub use error::ClientError;
pub use session::{
    ChatEntry, ConnectionState, GameRules, Notice, Session, SessionBehavior, SessionHandle,
};
