use super::Reply;
use async_trait::async_trait;
use ferrous_q_domain::{DomainError, Question};

/// Oblivious DoH (RFC 9230): the question is sealed for `target` and relayed by `proxy`.
#[async_trait]
pub trait ObliviousExchange: Send + Sync {
    async fn exchange(
        &self,
        question: &Question,
        proxy: &str,
        target: &str,
    ) -> Result<Reply, DomainError>;
}
