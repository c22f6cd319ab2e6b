//! Ferrous Q Domain Layer
pub mod config;
pub mod dns_name;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;
pub mod query_options;
pub mod question;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_name::{fqdn, reverse_name};
pub use dns_protocol::{DnsProtocol, UpstreamAddr};
pub use dns_record::{QueryClass, RecordType};
pub use errors::DomainError;
pub use query_options::{QueryOptions, UPSTREAM_TIMEOUT};
pub use question::Question;
