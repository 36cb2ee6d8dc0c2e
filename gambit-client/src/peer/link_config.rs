/// ICE and data-channel configuration for a peer link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// STUN urls used for NAT traversal.
    pub ice_servers: Vec<String>,
    /// Label of the single game data channel.
    pub channel_label: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec!["stun:stun.l.google.com:19302".to_string()],
            channel_label: "sendChannel".to_string(),
        }
    }
}

impl LinkConfig {
    /// No ICE servers at all; negotiation over host candidates only.
    /// Enough for same-network peers and for tests.
    pub fn host_only() -> Self {
        Self {
            ice_servers: Vec::new(),
            ..Self::default()
        }
    }
}
