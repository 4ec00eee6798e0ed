//! DNSBL Checker Infrastructure Layer
pub mod dns;
