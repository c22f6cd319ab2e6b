use super::resolve_query_target::QueryTargetResolver;
use super::resolve_record_types::RecordTypeResolver;
use super::transport::QueryTransport;
use crate::ports::Reply;
use ferrous_q_domain::{DomainError, QueryClass, QueryOptions, Question, RecordType};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// The ordered questions of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub name: Arc<str>,
    pub record_types: Vec<RecordType>,
    pub query_class: QueryClass,
    pub dnssec_ok: bool,
}

impl QueryPlan {
    pub fn build(options: &QueryOptions) -> Result<Self, DomainError> {
        let mut record_types = RecordTypeResolver::resolve(options.type_tokens.as_slice())?;
        let (name, extra_type) = QueryTargetResolver::resolve(&options.name, options.reverse)?;
        if let Some(extra_type) = extra_type {
            record_types.push(extra_type);
        }

        Ok(Self {
            name: name.into(),
            record_types,
            query_class: options.query_class,
            dnssec_ok: options.want_dnssec,
        })
    }

    pub fn questions(&self) -> impl Iterator<Item = Question> + '_ {
        self.record_types.iter().map(|record_type| {
            Question::new(
                Arc::clone(&self.name),
                *record_type,
                self.query_class,
                self.dnssec_ok,
            )
        })
    }
}

/// Replies of a completed run, in plan order.
#[derive(Debug, Clone)]
pub struct ReplySet {
    pub replies: Vec<Reply>,
    pub elapsed: Duration,
    pub server: String,
}

impl ReplySet {
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

pub struct RunQueryPlanUseCase {
    transport: QueryTransport,
}

impl RunQueryPlanUseCase {
    pub fn new(transport: QueryTransport) -> Self {
        Self { transport }
    }

    pub async fn execute(&self, options: &QueryOptions) -> Result<ReplySet, DomainError> {
        let plan = QueryPlan::build(options)?;
        self.run(&plan).await
    }

    /// Sends one question per planned record type, strictly in order. The
    /// first failure aborts the run and drops every reply collected so far.
    pub async fn run(&self, plan: &QueryPlan) -> Result<ReplySet, DomainError> {
        debug!(
            types = ?plan.record_types.iter().map(RecordType::as_str).collect::<Vec<_>>(),
            "RR types"
        );
        debug!(qname = %plan.name, "qname");
        debug!(
            server = %self.transport.address(),
            strategy = self.transport.strategy_name(),
            "using server"
        );

        let start = Instant::now();
        let mut replies = Vec::with_capacity(plan.record_types.len());

        for question in plan.questions() {
            let reply = self.transport.send(&question).await?;
            debug!(
                qtype = %question.record_type,
                rcode = %reply.response_code(),
                answers = reply.answers().len(),
                "reply received"
            );
            replies.push(reply);
        }

        Ok(ReplySet {
            replies,
            elapsed: start.elapsed(),
            server: self.transport.address(),
        })
    }
}
