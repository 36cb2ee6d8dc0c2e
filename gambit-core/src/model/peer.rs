/// Which side of the negotiation this participant plays.
///
/// The host creates the offer and the data channel; the guest answers and
/// receives the channel. Assigned once per session, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    Host,
    Guest,
}

impl PeerRole {
    pub fn is_host(self) -> bool {
        matches!(self, Self::Host)
    }
}
