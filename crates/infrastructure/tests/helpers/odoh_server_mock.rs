#![allow(dead_code)]
use super::dns_server_mock::{build_mock_response, MockBehavior};
use odoh_rs::{
    compose, decrypt_query, encrypt_response, parse, ObliviousDoHConfig, ObliviousDoHConfigs,
    ObliviousDoHKeyPair, ObliviousDoHMessage, ObliviousDoHMessagePlaintext,
};
use rand::RngCore;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Plain HTTP/1.1 stand-in for both the ODoH target and the relay.
///
/// `GET /.well-known/odohconfigs` serves the key config; `POST /proxy`
/// decrypts the query, answers it like [`MockBehavior::Answer`] and seals
/// the reply.
pub struct MockOdohServer {
    addr: SocketAddr,
    config_hits: Arc<AtomicUsize>,
    relay_hits: Arc<AtomicUsize>,
    relay_queries: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

struct Shared {
    key_pair: ObliviousDoHKeyPair,
    configs_body: Vec<u8>,
    config_hits: Arc<AtomicUsize>,
    relay_hits: Arc<AtomicUsize>,
    relay_queries: Arc<Mutex<Vec<String>>>,
}

impl MockOdohServer {
    pub async fn start() -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let key_pair = ObliviousDoHKeyPair::new(&mut rand::thread_rng());
        let configs: ObliviousDoHConfigs =
            vec![ObliviousDoHConfig::from(key_pair.public().clone())].into();
        let configs_body = compose(&configs).expect("compose configs").to_vec();

        let shared = Arc::new(Shared {
            key_pair,
            configs_body,
            config_hits: Arc::new(AtomicUsize::new(0)),
            relay_hits: Arc::new(AtomicUsize::new(0)),
            relay_queries: Arc::new(Mutex::new(Vec::new())),
        });
        let (config_hits, relay_hits, relay_queries) = (
            shared.config_hits.clone(),
            shared.relay_hits.clone(),
            shared.relay_queries.clone(),
        );

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        if let Ok((stream, _)) = result {
                            let shared = shared.clone();
                            tokio::spawn(async move {
                                let _ = serve(stream, &shared).await;
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            config_hits,
            relay_hits,
            relay_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn config_hits(&self) -> usize {
        self.config_hits.load(Ordering::SeqCst)
    }

    pub fn relay_hits(&self) -> usize {
        self.relay_hits.load(Ordering::SeqCst)
    }

    /// Query strings seen on `/proxy`.
    pub fn relay_queries(&self) -> Vec<String> {
        self.relay_queries.lock().unwrap().clone()
    }
}

impl Drop for MockOdohServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve(mut stream: TcpStream, shared: &Shared) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let request_line = head.lines().next().unwrap_or_default().to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = buf[head_end..].to_vec();

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let (status, payload) = match (method, path) {
        ("GET", "/.well-known/odohconfigs") => {
            shared.config_hits.fetch_add(1, Ordering::SeqCst);
            ("200 OK", shared.configs_body.clone())
        }
        ("POST", "/proxy") => {
            shared.relay_hits.fetch_add(1, Ordering::SeqCst);
            shared.relay_queries.lock().unwrap().push(query.to_string());
            match answer(&body, &shared.key_pair) {
                Some(sealed) => ("200 OK", sealed),
                None => ("400 Bad Request", Vec::new()),
            }
        }
        _ => ("404 Not Found", Vec::new()),
    };

    let header = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/oblivious-dns-message\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        payload.len()
    );
    stream.write_all(header.as_bytes()).await?;
    stream.write_all(&payload).await?;
    stream.shutdown().await
}

fn answer(body: &[u8], key_pair: &ObliviousDoHKeyPair) -> Option<Vec<u8>> {
    let mut body = bytes::Bytes::copy_from_slice(body);
    let sealed: ObliviousDoHMessage = parse(&mut body).ok()?;
    let (query, secret) = decrypt_query(&sealed, key_pair).ok()?;

    let dns_response = build_mock_response(&query.clone().into_msg(), MockBehavior::Answer, false);
    let plaintext = ObliviousDoHMessagePlaintext::new(&dns_response, 0);

    let mut nonce = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut nonce);
    let sealed_response = encrypt_response(&query, &plaintext, secret, nonce).ok()?;
    compose(&sealed_response).ok().map(|b| b.to_vec())
}
