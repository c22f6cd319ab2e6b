//! Oblivious DNS-over-HTTPS client (RFC 9230)
//!
//! The query is sealed with the target's HPKE config and POSTed to the proxy,
//! which relays it to the target without seeing the plaintext.

use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::https::build_client;
use async_trait::async_trait;
use bytes::Bytes;
use ferrous_q_application::ports::{ObliviousExchange, Reply};
use ferrous_q_domain::dns_protocol::DEFAULT_DOH_PATH;
use ferrous_q_domain::{DomainError, Question};
use odoh_rs::{
    compose, decrypt_response, encrypt_query, parse, ObliviousDoHConfigContents,
    ObliviousDoHConfigs, ObliviousDoHMessage, ObliviousDoHMessagePlaintext,
};
use reqwest::Url;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

pub const ODOH_CONTENT_TYPE: &str = "application/oblivious-dns-message";
pub const ODOH_CONFIGS_PATH: &str = "/.well-known/odohconfigs";

fn odoh_error(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::ObliviousDoh(format!("{}: {}", context, err))
}

/// Normalizes the target into an absolute URL; bare hosts get `https://` and the DoH path.
pub fn target_url(target: &str) -> Result<Url, DomainError> {
    let absolute = if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{}{}", target, DEFAULT_DOH_PATH)
    };

    let mut url = Url::parse(&absolute).map_err(|e| odoh_error("invalid target", e))?;
    if url.host_str().is_none() {
        return Err(DomainError::ObliviousDoh(format!("target '{}' has no host", target)));
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(DEFAULT_DOH_PATH);
    }
    Ok(url)
}

/// `<proxy>?targethost=<host>&targetpath=<path>`
pub fn relay_url(proxy: &str, target: &Url) -> Result<Url, DomainError> {
    let mut url = Url::parse(proxy).map_err(|e| odoh_error("invalid proxy", e))?;
    let host = target.host_str().unwrap_or_default();

    url.query_pairs_mut()
        .append_pair("targethost", host)
        .append_pair("targetpath", target.path());
    Ok(url)
}

fn configs_url(target: &Url) -> Result<Url, DomainError> {
    target
        .join(ODOH_CONFIGS_PATH)
        .map_err(|e| odoh_error("invalid config url", e))
}

/// One client serves one target per run; its config is fetched on the first
/// question and reused afterwards.
pub struct OdohClient {
    client: reqwest::Client,
    timeout: Duration,
    target_config: OnceCell<(Url, ObliviousDoHConfigContents)>,
}

impl OdohClient {
    pub fn new(timeout: Duration, insecure: bool) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(insecure)?,
            timeout,
            target_config: OnceCell::new(),
        })
    }

    async fn config_for(&self, target: &Url) -> Result<&ObliviousDoHConfigContents, DomainError> {
        let (cached_for, config) = self
            .target_config
            .get_or_try_init(|| async {
                let config = self.fetch_config(target).await?;
                Ok::<_, DomainError>((target.clone(), config))
            })
            .await?;

        if cached_for != target {
            return Err(DomainError::ObliviousDoh(format!(
                "client holds the config of {}, cannot query {}",
                cached_for, target
            )));
        }
        Ok(config)
    }

    async fn fetch_config(&self, target: &Url) -> Result<ObliviousDoHConfigContents, DomainError> {
        let url = configs_url(target)?;
        debug!(url = %url, "fetching ODoH target config");

        let mut body = self.get_bytes(self.client.get(url.clone())).await?;
        let configs: ObliviousDoHConfigs =
            parse(&mut body).map_err(|e| odoh_error("malformed target config", e))?;

        configs
            .supported()
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| {
                DomainError::ObliviousDoh(format!("{} offers no supported config", url))
            })
    }

    async fn get_bytes(&self, request: reqwest::RequestBuilder) -> Result<Bytes, DomainError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: "odoh".to_string(),
            })?
            .map_err(|e| DomainError::TransportError(format!("ODoH request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::TransportError(format!(
                "{} returned HTTP {}",
                response.url(),
                status.as_u16()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| DomainError::TransportError(format!("ODoH response body: {}", e)))
    }
}

#[async_trait]
impl ObliviousExchange for OdohClient {
    async fn exchange(
        &self,
        question: &Question,
        proxy: &str,
        target: &str,
    ) -> Result<Reply, DomainError> {
        let target = target_url(target)?;
        let relay = relay_url(proxy, &target)?;
        let config = self.config_for(&target).await?;

        let (id, bytes) = MessageBuilder::build_query(question)?;
        let plaintext = ObliviousDoHMessagePlaintext::new(&bytes, 0);
        let (sealed, secret) = encrypt_query(&plaintext, config, &mut rand::thread_rng())
            .map_err(|e| odoh_error("encrypt query", e))?;
        let body = compose(&sealed)
            .map_err(|e| odoh_error("encode query", e))?
            .freeze();

        debug!(relay = %relay, query_len = bytes.len(), "sending ODoH query");

        let mut response = self
            .get_bytes(
                self.client
                    .post(relay)
                    .header("Content-Type", ODOH_CONTENT_TYPE)
                    .header("Accept", ODOH_CONTENT_TYPE)
                    .body(body),
            )
            .await?;

        let sealed_response: ObliviousDoHMessage =
            parse(&mut response).map_err(|e| odoh_error("malformed response", e))?;
        let plaintext_response = decrypt_response(&plaintext, &sealed_response, secret)
            .map_err(|e| odoh_error("decrypt response", e))?;

        let message = ResponseParser::parse(&plaintext_response.into_msg(), id)?;
        Ok(Reply::new(message))
    }
}
