#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_q_application::ports::{ObliviousExchange, Reply, Upstream};
use ferrous_q_domain::{DomainError, Question, RecordType};
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::rdata::{A, AAAA, MX};
use hickory_proto::rr::{Name, RData, Record};
use std::sync::{Arc, Mutex};

pub fn record(name: &str, ttl: u32, rdata: RData) -> Record {
    Record::from_rdata(Name::from_ascii(name).unwrap(), ttl, rdata)
}

/// A plausible answer for `question`: one A, AAAA or MX record, or none.
pub fn canned_reply(question: &Question) -> Reply {
    let mut message = Message::new();
    message.set_message_type(MessageType::Response);

    let rdata = match question.record_type {
        RecordType::A => Some(RData::A(A::new(93, 184, 216, 34))),
        RecordType::AAAA => Some(RData::AAAA(AAAA::new(0x2606, 0x2800, 0x220, 1, 0, 0, 0, 1))),
        RecordType::MX => Some(RData::MX(MX::new(10, Name::from_ascii("mail.example.com.").unwrap()))),
        _ => None,
    };
    if let Some(rdata) = rdata {
        message.add_answer(record(&question.name, 300, rdata));
    }
    Reply::new(message)
}

/// Records every question it is asked and answers from `canned_reply`.
#[derive(Clone)]
pub struct MockUpstream {
    address: String,
    seen: Arc<Mutex<Vec<Question>>>,
    fail_at: Option<usize>,
}

impl MockUpstream {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            seen: Arc::new(Mutex::new(Vec::new())),
            fail_at: None,
        }
    }

    /// Fails the exchange with the given zero-based index.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn seen(&self) -> Vec<Question> {
        self.seen.lock().unwrap().clone()
    }

    pub fn seen_types(&self) -> Vec<RecordType> {
        self.seen().iter().map(|q| q.record_type).collect()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn exchange(&self, question: &Question) -> Result<Reply, DomainError> {
        let index = {
            let mut seen = self.seen.lock().unwrap();
            seen.push(question.clone());
            seen.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(DomainError::TransportTimeout {
                server: self.address.clone(),
            });
        }
        Ok(canned_reply(question))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObliviousCall {
    pub question: Question,
    pub proxy: String,
    pub target: String,
}

#[derive(Clone, Default)]
pub struct MockObliviousExchange {
    calls: Arc<Mutex<Vec<ObliviousCall>>>,
}

impl MockObliviousExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ObliviousCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObliviousExchange for MockObliviousExchange {
    async fn exchange(
        &self,
        question: &Question,
        proxy: &str,
        target: &str,
    ) -> Result<Reply, DomainError> {
        self.calls.lock().unwrap().push(ObliviousCall {
            question: question.clone(),
            proxy: proxy.to_string(),
            target: target.to_string(),
        });
        Ok(canned_reply(question))
    }
}
