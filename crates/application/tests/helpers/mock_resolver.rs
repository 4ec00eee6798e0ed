#![allow(dead_code)]

use async_trait::async_trait;
use dnsbl_application::ports::DnsblResolver;
use dnsbl_domain::{DomainError, ResponseStatus, ZoneAnswer};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock DnsblResolver
// ============================================================================

/// Scripted answer for a query name or a whole zone.
#[derive(Debug, Clone)]
pub enum Behavior {
    Listed(Vec<Ipv4Addr>),
    Status(ResponseStatus),
    Timeout,
    Malformed,
    /// Times out `n` times, then behaves like the inner rule.
    FailTimes(u32, Box<Behavior>),
    Delayed(Duration, Box<Behavior>),
}

impl Behavior {
    pub fn listed_127_0_0_2() -> Self {
        Self::Listed(vec![Ipv4Addr::new(127, 0, 0, 2)])
    }

    pub fn nxdomain() -> Self {
        Self::Status(ResponseStatus::NxDomain)
    }
}

#[derive(Clone, Default)]
pub struct MockDnsblResolver {
    by_name: Arc<Mutex<HashMap<String, Behavior>>>,
    by_zone: Arc<Mutex<HashMap<String, Behavior>>>,
    calls: Arc<Mutex<HashMap<String, u32>>>,
    total: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockDnsblResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule for one exact query name, e.g. `2.0.0.127.bl.example.`
    pub fn on_name(self, fqdn: &str, behavior: Behavior) -> Self {
        self.by_name
            .lock()
            .unwrap()
            .insert(fqdn.to_string(), behavior);
        self
    }

    /// Rule for every query below `zone`. Unmatched names get NXDOMAIN.
    pub fn on_zone(self, zone: &str, behavior: Behavior) -> Self {
        self.by_zone
            .lock()
            .unwrap()
            .insert(zone.to_string(), behavior);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, fqdn: &str) -> u32 {
        self.calls.lock().unwrap().get(fqdn).copied().unwrap_or(0)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn rule_for(&self, query_name: &str) -> Behavior {
        if let Some(rule) = self.by_name.lock().unwrap().get(query_name) {
            return rule.clone();
        }
        let name = query_name.trim_end_matches('.');
        self.by_zone
            .lock()
            .unwrap()
            .iter()
            .find(|(zone, _)| name.ends_with(&format!(".{}", zone)))
            .map(|(_, rule)| rule.clone())
            .unwrap_or_else(Behavior::nxdomain)
    }

    async fn play(&self, behavior: Behavior, seen: u32) -> Result<ZoneAnswer, DomainError> {
        let mut behavior = behavior;
        loop {
            match behavior {
                Behavior::Listed(addrs) => return Ok(ZoneAnswer::listed(addrs)),
                Behavior::Status(status) => return Ok(ZoneAnswer::empty(status)),
                Behavior::Timeout => {
                    return Err(DomainError::TransportTimeout {
                        server: "mock".to_string(),
                    })
                }
                Behavior::Malformed => {
                    return Err(DomainError::InvalidDnsResponse(
                        "mock garbage".to_string(),
                    ))
                }
                Behavior::FailTimes(n, inner) => {
                    if seen <= n {
                        behavior = Behavior::Timeout;
                    } else {
                        behavior = *inner;
                    }
                }
                Behavior::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    behavior = *inner;
                }
            }
        }
    }
}

#[async_trait]
impl DnsblResolver for MockDnsblResolver {
    async fn exchange(&self, query_name: &str) -> Result<ZoneAnswer, DomainError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        let seen = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(query_name.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let behavior = self.rule_for(query_name);
        let result = self.play(behavior, seen).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
