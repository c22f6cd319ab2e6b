pub mod forwarding;
pub mod odoh;
pub mod transport;
pub mod upstream;

pub use odoh::OdohClient;
pub use upstream::DirectUpstream;
