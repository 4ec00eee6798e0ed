use dnsbl_domain::{DomainError, ResponseStatus, ZoneAnswer};
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::RData;
use std::net::Ipv4Addr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsblResponse {
    pub id: u16,

    pub status: ResponseStatus,

    /// A records of the answer section, in wire order
    pub addresses: Vec<Ipv4Addr>,

    pub truncated: bool,
}

impl DnsblResponse {
    pub fn into_answer(self) -> ZoneAnswer {
        ZoneAnswer {
            status: self.status,
            addresses: self.addresses,
        }
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsblResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Message is not a response".to_string(),
            ));
        }

        let status = ResponseStatus::from_code(u16::from(message.response_code()));
        let truncated = message.truncated();

        let mut addresses = Vec::with_capacity(message.answers().len().min(8));

        for record in message.answers() {
            // CNAMEs in front of the A records are followed by the resolver
            if let RData::A(a) = record.data() {
                addresses.push(a.0);
            }
        }

        debug!(
            id = message.id(),
            rcode = %status,
            addresses = addresses.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsblResponse {
            id: message.id(),
            status,
            addresses,
            truncated,
        })
    }
}
