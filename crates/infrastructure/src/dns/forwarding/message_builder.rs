//! DNS Message Builder
//!
//! Turns a [`Question`] into a recursive query in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use ferrous_q_domain::{DomainError, Question};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::BinEncodable;

/// Advertised UDP payload size in the EDNS(0) OPT record.
pub const EDNS_PAYLOAD_SIZE: u16 = 4096;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build the query message for `question` with a fresh random ID.
    ///
    /// The message has RD set and exactly one question. When the question asks
    /// for DNSSEC, an OPT record with the DO bit is attached.
    pub fn build_message(question: &Question) -> Result<Message, DomainError> {
        let name = Name::from_ascii(&*question.name).map_err(|e| {
            DomainError::InvalidDomainName(format!("'{}': {}", question.name, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(question.record_type));
        query.set_query_class(RecordTypeMapper::class_to_hickory(question.query_class));

        let mut message = Message::new();
        message.set_id(fastrand::u16(..));
        message.set_message_type(MessageType::Query);
        message.set_op_code(OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        if question.dnssec_ok {
            let mut edns = Edns::new();
            edns.set_max_payload(EDNS_PAYLOAD_SIZE);
            edns.set_dnssec_ok(true);
            message.set_edns(edns);
        }

        Ok(message)
    }

    /// Build the query and serialize it. Returns the message ID for response matching.
    pub fn build_query(question: &Question) -> Result<(u16, Vec<u8>), DomainError> {
        let message = Self::build_message(question)?;
        let bytes = Self::serialize_message(&message)?;
        Ok((message.id(), bytes))
    }

    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        message.to_vec().map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to serialize DNS message: {}", e))
        })
    }
}
