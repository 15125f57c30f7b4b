//! HTTP side of the unibot client.

pub mod http_transport;

pub use http_transport::HttpChatTransport;
