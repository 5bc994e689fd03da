//! Utilities to help with testing the locator

use crate::resolver::{QueryError, SrvQuery};
use crate::{HostLookup, LookupError};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Mutex;

/// A host table with fixed answers.
///
/// Unknown hosts report [`LookupError::NoData`]; hosts marked with
/// [`StaticHosts::failing`] report a temporary failure.
#[derive(Default)]
pub struct StaticHosts {
    hosts: HashMap<String, Vec<IpAddr>>,
    failing: HashSet<String>,
}

impl StaticHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, name: &str, addrs: &[&str]) -> Self {
        let addrs = addrs.iter().map(|a| a.parse().unwrap()).collect();
        self.hosts.insert(name.to_ascii_lowercase(), addrs);
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_ascii_lowercase());
        self
    }
}

impl HostLookup for StaticHosts {
    fn lookup_host(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError> {
        let hostname = hostname.to_ascii_lowercase();
        if self.failing.contains(&hostname) {
            return Err(LookupError::TemporaryFailure);
        }
        self.hosts.get(&hostname).cloned().ok_or(LookupError::NoData)
    }
}

/// A SRV backend that answers from canned response messages and remembers
/// every name it was asked about.
#[derive(Default)]
pub struct CannedSrv {
    responses: HashMap<String, Vec<u8>>,
    queries: Mutex<Vec<String>>,
}

impl CannedSrv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn response(mut self, name: &str, msg: Vec<u8>) -> Self {
        self.responses.insert(name.to_string(), msg);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl SrvQuery for CannedSrv {
    fn query_srv(&self, name: &str) -> Result<Vec<u8>, QueryError> {
        self.queries.lock().unwrap().push(name.to_string());
        self.responses
            .get(name)
            .cloned()
            .ok_or_else(|| format!("no canned response for {name}").into())
    }
}

enum Answer {
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    A([u8; 4]),
}

/// Builds DNS response messages the way a server would: one question, and
/// answers whose owner names point back at the question.
pub struct MessageBuilder {
    question: String,
    answers: Vec<Answer>,
    answer_count: Option<u16>,
}

impl MessageBuilder {
    pub fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answers: vec![],
            answer_count: None,
        }
    }

    pub fn srv(mut self, priority: u16, weight: u16, port: u16, target: &str) -> Self {
        self.answers.push(Answer::Srv {
            priority,
            weight,
            port,
            target: target.to_string(),
        });
        self
    }

    pub fn a(mut self, addr: [u8; 4]) -> Self {
        self.answers.push(Answer::A(addr));
        self
    }

    /// Overrides the answer count written into the header.
    pub fn answer_count(mut self, count: u16) -> Self {
        self.answer_count = Some(count);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let answer_count = self.answer_count.unwrap_or(self.answers.len() as u16);
        let mut msg = Vec::new();
        msg.extend_from_slice(&0x1234u16.to_be_bytes());
        msg.extend_from_slice(&0x8180u16.to_be_bytes());
        msg.extend_from_slice(&1u16.to_be_bytes());
        msg.extend_from_slice(&answer_count.to_be_bytes());
        msg.extend_from_slice(&[0, 0, 0, 0]);

        encode_name(&mut msg, &self.question);
        msg.extend_from_slice(&33u16.to_be_bytes());
        msg.extend_from_slice(&1u16.to_be_bytes());

        for answer in &self.answers {
            // Owner name: pointer to the question at offset 12.
            msg.extend_from_slice(&[0xC0, 12]);
            let (rtype, rdata) = match answer {
                Answer::Srv {
                    priority,
                    weight,
                    port,
                    target,
                } => {
                    let mut rdata = Vec::new();
                    rdata.extend_from_slice(&priority.to_be_bytes());
                    rdata.extend_from_slice(&weight.to_be_bytes());
                    rdata.extend_from_slice(&port.to_be_bytes());
                    encode_name(&mut rdata, target);
                    (33u16, rdata)
                }
                Answer::A(addr) => (1u16, addr.to_vec()),
            };
            msg.extend_from_slice(&rtype.to_be_bytes());
            msg.extend_from_slice(&1u16.to_be_bytes());
            msg.extend_from_slice(&300u32.to_be_bytes());
            msg.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            msg.extend_from_slice(&rdata);
        }
        msg
    }
}

fn encode_name(buf: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|label| !label.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
}
