//! Mapping between the domain's record types/classes and `hickory-proto`'s.

use ferrous_q_domain::{QueryClass, RecordType};
use hickory_proto::rr::{DNSClass, RecordType as HickoryRecordType};

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    pub fn class_to_hickory(query_class: QueryClass) -> DNSClass {
        match query_class {
            QueryClass::Internet => DNSClass::IN,
            QueryClass::Chaos => DNSClass::CH,
        }
    }
}
