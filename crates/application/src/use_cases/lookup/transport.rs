use crate::ports::{ObliviousExchange, Reply, Upstream};
use ferrous_q_domain::{DomainError, Question};
use std::sync::Arc;
use tracing::debug;

/// How every question of a run reaches the resolver. Chosen once, before the
/// first question is sent.
#[derive(Clone)]
pub enum QueryTransport {
    Direct(Arc<dyn Upstream>),
    Oblivious {
        exchange: Arc<dyn ObliviousExchange>,
        proxy: Arc<str>,
        target: Arc<str>,
    },
}

impl QueryTransport {
    pub fn direct(upstream: Arc<dyn Upstream>) -> Self {
        Self::Direct(upstream)
    }

    pub fn oblivious(
        exchange: Arc<dyn ObliviousExchange>,
        proxy: impl Into<Arc<str>>,
        target: impl Into<Arc<str>>,
    ) -> Self {
        Self::Oblivious {
            exchange,
            proxy: proxy.into(),
            target: target.into(),
        }
    }

    pub async fn send(&self, question: &Question) -> Result<Reply, DomainError> {
        match self {
            Self::Direct(upstream) => upstream.exchange(question).await,
            Self::Oblivious {
                exchange,
                proxy,
                target,
            } => {
                debug!(proxy = %proxy, target = %target, "using ODoH proxy");
                exchange.exchange(question, proxy, target).await
            }
        }
    }

    /// Server the replies come from.
    pub fn address(&self) -> String {
        match self {
            Self::Direct(upstream) => upstream.address(),
            Self::Oblivious { target, .. } => target.to_string(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Oblivious { .. } => "odoh",
        }
    }
}
