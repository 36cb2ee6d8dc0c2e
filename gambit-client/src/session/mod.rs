mod behavior;
mod handle;
mod rules;
#[allow(clippy::module_inception)]
mod session;
mod state;

pub use behavior::{ChatEntry, Notice, SessionBehavior};
pub use handle::{SessionCommand, SessionHandle};
pub use rules::GameRules;
pub use session::Session;
pub use state::ConnectionState;
