#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// One A record (93.184.216.34, TTL 60) for every question.
    Answer,
    /// UDP replies carry TC and no answers; TCP answers normally.
    TruncateUdp,
    /// Replies with the query ID plus one.
    WrongId,
}

/// Answers on UDP and TCP at the same 127.0.0.1 port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_hits: Arc<AtomicUsize>,
    tcp_hits: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_hits = Arc::new(AtomicUsize::new(0));
        let tcp_hits = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let (udp_counter, tcp_counter) = (udp_hits.clone(), tcp_hits.clone());
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_counter.fetch_add(1, Ordering::SeqCst);
                            let truncate = behavior == MockBehavior::TruncateUdp;
                            let response = build_mock_response(&buf[..len], behavior, truncate);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                    result = listener.accept() => {
                        if let Ok((mut stream, _)) = result {
                            tcp_counter.fetch_add(1, Ordering::SeqCst);
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_err() {
                                continue;
                            }
                            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                            if stream.read_exact(&mut query).await.is_err() {
                                continue;
                            }
                            let response = build_mock_response(&query, behavior, false);
                            let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                            let _ = stream.write_all(&response).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_hits,
            tcp_hits,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_hits(&self) -> usize {
        self.udp_hits.load(Ordering::SeqCst)
    }

    pub fn tcp_hits(&self) -> usize {
        self.tcp_hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// End offset of the first question (QNAME labels + QTYPE + QCLASS).
fn question_end(query: &[u8]) -> usize {
    let mut pos = 12;
    while pos < query.len() && query[pos] != 0 {
        pos += query[pos] as usize + 1;
    }
    (pos + 5).min(query.len())
}

pub fn build_mock_response(query: &[u8], behavior: MockBehavior, truncate: bool) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    let mut response = Vec::with_capacity(512);

    let mut id = u16::from_be_bytes([query[0], query[1]]);
    if behavior == MockBehavior::WrongId {
        id = id.wrapping_add(1);
    }
    response.extend_from_slice(&id.to_be_bytes());

    // QR + RD, plus TC when truncating; RA + NOERROR.
    response.push(if truncate { 0x83 } else { 0x81 });
    response.push(0x80);

    // QDCOUNT, ANCOUNT, NSCOUNT, ARCOUNT
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(if truncate { &[0x00, 0x00] } else { &[0x00, 0x01] });
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);

    response.extend_from_slice(&query[12..question_end(query)]);

    if !truncate {
        response.extend_from_slice(&[
            0xc0, 0x0c, // pointer to QNAME
            0x00, 0x01, // A
            0x00, 0x01, // IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04, // RDLENGTH
            93, 184, 216, 34,
        ]);
    }

    response
}
