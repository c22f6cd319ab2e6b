pub mod dns_server_mock;
pub mod odoh_server_mock;

pub use dns_server_mock::{MockBehavior, MockDnsServer};
pub use odoh_server_mock::MockOdohServer;
