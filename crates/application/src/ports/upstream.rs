use async_trait::async_trait;
use ferrous_q_domain::{DomainError, Question};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::Record;

/// The response to exactly one question.
#[derive(Debug, Clone)]
pub struct Reply {
    pub message: Message,
}

impl Reply {
    pub fn new(message: Message) -> Self {
        Self { message }
    }

    pub fn answers(&self) -> &[Record] {
        self.message.answers()
    }

    pub fn response_code(&self) -> ResponseCode {
        self.message.response_code()
    }

    pub fn truncated(&self) -> bool {
        self.message.truncated()
    }
}

/// A resolving server reachable over one concrete transport.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Normalized address of the server, used in diagnostics and the raw summary line.
    fn address(&self) -> String;

    async fn exchange(&self, question: &Question) -> Result<Reply, DomainError>;
}
