#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock answers queries below a zone.
#[derive(Debug, Clone)]
pub enum MockAnswer {
    /// NOERROR with these A records
    Listed(Vec<Ipv4Addr>),
    /// Empty answer with the given RCODE
    Rcode(u8),
    /// Never answers
    Silent,
    /// Two bytes that are not a DNS message
    Garbage,
    /// Valid answer carrying the wrong transaction id
    WrongId(Vec<Ipv4Addr>),
}

/// Mock DNSBL resolver for tests.
///
/// Listens on an ephemeral localhost UDP port and answers from a rule table
/// keyed by zone suffix, or by full query name. Names that match no rule get
/// NXDOMAIN.
pub struct MockDnsblServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsblServer {
    pub async fn start(rules: Vec<(&str, MockAnswer)>) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let rules: Vec<(String, MockAnswer)> = rules
            .into_iter()
            .map(|(suffix, answer)| (suffix.trim_end_matches('.').to_lowercase(), answer))
            .collect();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let counter = Arc::clone(&queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::respond(&rules, &buf[..len]) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn respond(rules: &[(String, MockAnswer)], query: &[u8]) -> Option<Vec<u8>> {
        let (name, question_end) = Self::parse_question(query)?;

        let answer = rules
            .iter()
            .find(|(suffix, _)| name == *suffix || name.ends_with(&format!(".{}", suffix)))
            .map(|(_, answer)| answer.clone())
            .unwrap_or(MockAnswer::Rcode(3));

        match answer {
            MockAnswer::Listed(addrs) => Some(Self::build_response(query, question_end, 0, &addrs)),
            MockAnswer::Rcode(rcode) => Some(Self::build_response(query, question_end, rcode, &[])),
            MockAnswer::Silent => None,
            MockAnswer::Garbage => Some(vec![0xde, 0xad]),
            MockAnswer::WrongId(addrs) => {
                let mut response = Self::build_response(query, question_end, 0, &addrs);
                response[0] ^= 0xff;
                Some(response)
            }
        }
    }

    /// Answers `query` with `rcode` and one A record per address.
    pub fn answer_query(query: &[u8], rcode: u8, addrs: &[Ipv4Addr]) -> Vec<u8> {
        let (_, question_end) =
            Self::parse_question(query).expect("query should carry a question");
        Self::build_response(query, question_end, rcode, addrs)
    }

    /// Returns the lowercase query name and the offset right after the question.
    pub fn parse_question(query: &[u8]) -> Option<(String, usize)> {
        if query.len() < 12 {
            return None;
        }

        let mut labels = Vec::new();
        let mut pos = 12;
        loop {
            let len = *query.get(pos)? as usize;
            pos += 1;
            if len == 0 {
                break;
            }
            let label = query.get(pos..pos + len)?;
            labels.push(String::from_utf8_lossy(label).to_lowercase());
            pos += len;
        }

        // QTYPE + QCLASS
        let question_end = pos + 4;
        if query.len() < question_end {
            return None;
        }
        Some((labels.join("."), question_end))
    }

    /// Builds a response: query header and question, then one A record per address.
    pub fn build_response(
        query: &[u8],
        question_end: usize,
        rcode: u8,
        addrs: &[Ipv4Addr],
    ) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);

        // Transaction ID
        response.extend_from_slice(&query[0..2]);

        // Flags: QR=1 (response), RD=1, RA=1
        response.push(0x81);
        response.push(0x80 | (rcode & 0x0f));

        // Questions: 1
        response.extend_from_slice(&[0x00, 0x01]);

        // Answers
        response.extend_from_slice(&(addrs.len() as u16).to_be_bytes());

        // Authority RRs: 0
        response.extend_from_slice(&[0x00, 0x00]);

        // Additional RRs: 0
        response.extend_from_slice(&[0x00, 0x00]);

        // Question section
        response.extend_from_slice(&query[12..question_end]);

        for addr in addrs {
            response.extend_from_slice(&[
                0xc0, 0x0c, // Name pointer to question
                0x00, 0x01, // Type A
                0x00, 0x01, // Class IN
                0x00, 0x00, 0x0e, 0x10, // TTL: 3600 seconds
                0x00, 0x04, // Data length: 4 bytes
            ]);
            response.extend_from_slice(&addr.octets());
        }

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsblServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockDnsblServer::start(vec![]).await.unwrap();
        assert!(server.addr().ip().is_loopback());
        assert_ne!(server.addr().port(), 0);
        server.shutdown();
    }

    #[test]
    fn test_parse_question() {
        let query = [
            0xab, 0xcd, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // header
            0x01, b'2', 0x02, b'b', b'l', 0x00, // 2.bl.
            0x00, 0x01, 0x00, 0x01, // A IN
        ];

        let (name, end) = MockDnsblServer::parse_question(&query).unwrap();
        assert_eq!(name, "2.bl");
        assert_eq!(end, query.len());
    }

    #[test]
    fn test_mock_response_builder() {
        let query = [
            0xab, 0xcd, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x01,
        ];

        let response =
            MockDnsblServer::build_response(&query, query.len(), 3, &[]);

        assert_eq!(response[0..2], [0xab, 0xcd]);
        assert_eq!(response[2], 0x81);
        assert_eq!(response[3] & 0x0f, 3);
        assert_eq!(response.len(), query.len());
    }
}
