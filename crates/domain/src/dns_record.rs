pub mod query_class;
pub mod record_type;

pub use query_class::QueryClass;
pub use record_type::RecordType;
