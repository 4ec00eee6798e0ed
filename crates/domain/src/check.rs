use crate::reverse_address::{query_name, reverse_label};
use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// Response code of a DNSBL exchange, reduced to what classification needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u16),
}

impl ResponseStatus {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NxDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            other => Self::Other(other),
        }
    }

    pub fn is_success(&self) -> bool {
        *self == Self::NoError
    }

    pub fn is_server_failure(&self) -> bool {
        *self == Self::ServFail
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "NOERROR",
            Self::FormErr => "FORMERR",
            Self::ServFail => "SERVFAIL",
            Self::NxDomain => "NXDOMAIN",
            Self::NotImp => "NOTIMP",
            Self::Refused => "REFUSED",
            Self::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "RCODE{}", code),
            known => f.write_str(known.as_str()),
        }
    }
}

/// What a zone said about one query name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAnswer {
    pub status: ResponseStatus,
    pub addresses: Vec<Ipv4Addr>,
}

impl ZoneAnswer {
    pub fn listed(addresses: Vec<Ipv4Addr>) -> Self {
        Self {
            status: ResponseStatus::NoError,
            addresses,
        }
    }

    pub fn empty(status: ResponseStatus) -> Self {
        Self {
            status,
            addresses: Vec::new(),
        }
    }
}

/// One pending (IP, zone) check.
///
/// `attempt` starts at zero and is bumped each time the item is re-enqueued
/// after a transient failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub ip: IpAddr,
    pub zone: Arc<str>,
    pub attempt: u32,
}

impl WorkItem {
    pub fn new(ip: IpAddr, zone: impl Into<Arc<str>>) -> Self {
        Self {
            ip,
            zone: zone.into(),
            attempt: 0,
        }
    }

    pub fn next_attempt(&self) -> Self {
        Self {
            ip: self.ip,
            zone: Arc::clone(&self.zone),
            attempt: self.attempt + 1,
        }
    }

    pub fn query_name(&self) -> String {
        query_name(&self.ip, &self.zone)
    }
}

/// Outcome of a single worker run.
///
/// `attempts` counts exchanges made for the zone, retries included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub ip: IpAddr,
    pub reverse: String,
    pub zone: Arc<str>,
    pub fqdn: String,
    pub attempts: u32,
    pub addresses: Vec<Ipv4Addr>,
    pub error: Option<DomainError>,
}

impl QueryResult {
    pub fn for_item(item: &WorkItem) -> Self {
        Self {
            ip: item.ip,
            reverse: reverse_label(&item.ip),
            zone: Arc::clone(&item.zone),
            fqdn: item.query_name(),
            attempts: item.attempt + 1,
            addresses: Vec::new(),
            error: None,
        }
    }

    pub fn with_addresses(mut self, addresses: Vec<Ipv4Addr>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_error(mut self, error: DomainError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn is_hit(&self) -> bool {
        !self.addresses.is_empty()
    }
}

/// A zone that lists the checked address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub ip: IpAddr,
    pub zone: Arc<str>,
    pub addresses: Vec<Ipv4Addr>,
}

impl From<QueryResult> for Listing {
    fn from(result: QueryResult) -> Self {
        Self {
            ip: result.ip,
            zone: result.zone,
            addresses: result.addresses,
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} blacklisted on {} with ", self.ip, self.zone)?;
        for (i, addr) in self.addresses.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", addr)?;
        }
        Ok(())
    }
}

/// Aggregated outcome of checking one address against every zone.
///
/// `listings` keeps arrival order. `exhausted` holds the last failed query of
/// zones that never answered within the retry budget, `malformed` the query
/// whose answer could not be decoded. Both are treated as "not listed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub ip: IpAddr,
    pub listings: Vec<Listing>,
    pub exhausted: Vec<QueryResult>,
    pub malformed: Vec<QueryResult>,
}

impl CheckReport {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            listings: Vec::new(),
            exhausted: Vec::new(),
            malformed: Vec::new(),
        }
    }

    pub fn is_listed(&self) -> bool {
        !self.listings.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.listings.iter().map(ToString::to_string).collect()
    }
}
