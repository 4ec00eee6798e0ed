pub mod dnsbl_resolver;

pub use dnsbl_resolver::DnsblResolver;
