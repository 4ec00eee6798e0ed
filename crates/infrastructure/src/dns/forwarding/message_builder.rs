//! DNS Message Builder
//!
//! Constructs DNSBL query messages in wire format using `hickory-proto`.

use dnsbl_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNSBL query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build an A query for `query_name` and serialize to wire format bytes
    ///
    /// Creates a standard recursive query with:
    /// - Random ID for request/response matching
    /// - RD (Recursion Desired) flag set
    /// - Single question section, class IN
    pub fn build_query(query_name: &str) -> Result<Vec<u8>, DomainError> {
        Self::build_query_with_id(query_name).map(|(_, bytes)| bytes)
    }

    /// Build a query message and return both its ID and bytes
    ///
    /// The ID is needed to match the response.
    pub fn build_query_with_id(query_name: &str) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(query_name).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", query_name, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordType::A);
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(128);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
