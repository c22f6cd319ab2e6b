use super::{QueryClass, RecordType};
use std::sync::Arc;

/// A single DNS question as it goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub query_class: QueryClass,
    pub dnssec_ok: bool,
}

impl Question {
    pub fn new(
        name: impl Into<Arc<str>>,
        record_type: RecordType,
        query_class: QueryClass,
        dnssec_ok: bool,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            query_class,
            dnssec_ok,
        }
    }
}
