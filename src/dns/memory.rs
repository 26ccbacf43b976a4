//! An in-memory implementation of the [`DnsLookup`][super::DnsLookup] trait.
//!
//! Serves answers registered up front and remembers every question it was asked, which makes it
//! suitable for dry runs and for exercising the checkers without a network.
use crate::dns::{DnsLookup, LookupError, RecordSet};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use trust_dns_proto::op::ResponseCode;
use trust_dns_proto::rr::{RData, RecordType};

/// A canned answer for one `(name, type)` question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Records(RecordSet),
    NotFound,
    Timeout,
    Response(ResponseCode),
}

impl Answer {
    fn to_result(&self) -> Result<RecordSet, LookupError> {
        match self {
            Answer::Records(set) => Ok(set.clone()),
            Answer::NotFound => Err(LookupError::NotFound),
            Answer::Timeout => Err(LookupError::Timeout),
            Answer::Response(code) => Err(LookupError::Response(*code)),
        }
    }
}

/// Questions without a registered answer are answered with [`LookupError::NotFound`].
#[derive(Debug, Default)]
pub struct InMemoryLookup {
    answers: HashMap<(String, RecordType), Answer>,
    queries: Mutex<Vec<(String, RecordType)>>,
}

impl InMemoryLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer questions for `rtype` records at `name` with `rdata`, advertised with `ttl`.
    #[must_use]
    pub fn with_records(self, name: &str, rtype: RecordType, ttl: u32, rdata: Vec<RData>) -> Self {
        self.with_answer(name, rtype, Answer::Records(RecordSet { ttl, rdata }))
    }

    #[must_use]
    pub fn with_answer(mut self, name: &str, rtype: RecordType, answer: Answer) -> Self {
        self.answers.insert((name.to_string(), rtype), answer);
        self
    }

    /// Every question asked so far, in the order received.
    pub fn queries(&self) -> Vec<(String, RecordType)> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl DnsLookup for InMemoryLookup {
    async fn lookup(&self, name: &str, rtype: RecordType) -> Result<RecordSet, LookupError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.to_string(), rtype));
        self.answers
            .get(&(name.to_string(), rtype))
            .map_or(Err(LookupError::NotFound), Answer::to_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn serves_registered_answers() {
        let lookup = InMemoryLookup::new()
            .with_records(
                "www.example.com",
                RecordType::A,
                300,
                vec![RData::A(Ipv4Addr::new(192, 0, 2, 1))],
            )
            .with_answer("api.example.com", RecordType::A, Answer::Timeout);

        let set = lookup.lookup("www.example.com", RecordType::A).await.unwrap();
        assert_eq!(set.ttl, 300);
        assert_eq!(set.rdata, vec![RData::A(Ipv4Addr::new(192, 0, 2, 1))]);

        assert!(matches!(
            lookup.lookup("www.example.com", RecordType::AAAA).await,
            Err(LookupError::NotFound)
        ));
        assert!(matches!(
            lookup.lookup("api.example.com", RecordType::A).await,
            Err(LookupError::Timeout)
        ));
        assert_eq!(
            lookup.queries(),
            vec![
                ("www.example.com".to_string(), RecordType::A),
                ("www.example.com".to_string(), RecordType::AAAA),
                ("api.example.com".to_string(), RecordType::A),
            ]
        );
    }
}
