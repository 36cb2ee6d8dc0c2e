mod transport;
mod ws;

pub use transport::SignalingTransport;
pub use ws::WsTransport;
