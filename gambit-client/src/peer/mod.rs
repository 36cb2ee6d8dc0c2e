mod link;
mod link_config;
mod link_event;

pub use link::PeerLink;
pub use link_config::LinkConfig;
pub use link_event::{LinkEvent, LinkState};
