use super::QueryClass;
use std::time::Duration;

/// Fixed per-exchange timeout applied by every upstream.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a lookup run needs, built once from user input and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryOptions {
    /// Hostname, or an address literal when `reverse` is set.
    pub name: String,
    /// Upstream server, scheme-prefixed or bare.
    pub server: String,
    /// Record type tokens as typed by the user; resolved when the plan is built.
    pub type_tokens: Vec<String>,
    pub reverse: bool,
    pub want_dnssec: bool,
    pub query_class: QueryClass,
    pub odoh_proxy: Option<String>,
    pub insecure_tls: bool,
    pub raw_output: bool,
}

impl QueryOptions {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            ..Self::default()
        }
    }

    pub fn with_types<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_dnssec(mut self, want_dnssec: bool) -> Self {
        self.want_dnssec = want_dnssec;
        self
    }

    pub fn with_query_class(mut self, query_class: QueryClass) -> Self {
        self.query_class = query_class;
        self
    }

    pub fn with_odoh_proxy(mut self, proxy: Option<String>) -> Self {
        self.odoh_proxy = proxy.filter(|p| !p.is_empty());
        self
    }

    pub fn with_insecure_tls(mut self, insecure_tls: bool) -> Self {
        self.insecure_tls = insecure_tls;
        self
    }

    pub fn with_raw_output(mut self, raw_output: bool) -> Self {
        self.raw_output = raw_output;
        self
    }
}
