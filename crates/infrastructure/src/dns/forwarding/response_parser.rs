use ferrous_q_domain::DomainError;
use hickory_proto::op::Message;
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decode a wire-format reply and check it answers the query with `expected_id`.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<Message, DomainError> {
        let message = Message::from_vec(response_bytes)
            .map_err(|e| DomainError::InvalidDnsResponse(format!("malformed message: {}", e)))?;

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "id mismatch: expected {}, got {}",
                expected_id,
                message.id()
            )));
        }

        debug!(
            rcode = %message.response_code(),
            answers = message.answers().len(),
            truncated = message.truncated(),
            "DNS response parsed"
        );

        Ok(message)
    }
}
