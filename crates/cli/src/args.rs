use clap::Parser;
use ferrous_q_application::use_cases::RecordTypeResolver;
use ferrous_q_domain::{Config, DomainError, QueryClass, QueryOptions};
use std::net::IpAddr;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "ferrous-q")]
#[command(version)]
#[command(about = "Ferrous Q - DNS lookup client (UDP, TCP, TLS, HTTPS, ODoH)")]
#[command(after_help = "Positional arguments: @SERVER, record type names (A, MX, ...) and a NAME containing a dot.")]
pub struct Cli {
    /// Query name
    #[arg(short = 'q', long = "qname", value_name = "NAME")]
    pub qname: Option<String>,

    /// DNS server
    #[arg(short = 's', long, value_name = "SERVER")]
    pub server: Option<String>,

    /// RR type (repeatable)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Reverse lookup
    #[arg(short = 'x', long)]
    pub reverse: bool,

    /// Request DNSSEC
    #[arg(short = 'd', long)]
    pub dnssec: bool,

    /// Output raw DNS format
    #[arg(short = 'r', long)]
    pub raw: bool,

    /// Use CHAOS query class
    #[arg(short = 'c', long)]
    pub chaos: bool,

    /// ODoH proxy
    #[arg(short = 'p', long = "odoh-proxy", value_name = "PROXY")]
    pub odoh_proxy: Option<String>,

    /// Disable TLS certificate verification
    #[arg(short = 'i', long)]
    pub insecure: bool,

    /// Show verbose log messages
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Defaults file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// @SERVER, TYPE and NAME in any order
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

/// What the positional arguments were taken to mean. Later arguments win.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Positionals {
    pub server: Option<String>,
    pub name: Option<String>,
    pub types: Vec<String>,
}

impl Positionals {
    pub fn classify(args: &[String]) -> Self {
        let mut positionals = Self::default();

        for arg in args {
            if let Some(server) = arg.strip_prefix('@') {
                positionals.server = Some(server.to_string());
            } else if RecordTypeResolver::is_record_type(arg) {
                positionals.types.push(arg.clone());
            } else if arg.contains('.') || arg.parse::<IpAddr>().is_ok() {
                positionals.name = Some(arg.clone());
            } else {
                debug!(arg = %arg, "ignoring argument");
            }
        }

        positionals
    }
}

impl Cli {
    /// `-s` beats `@SERVER`; both beat the config file.
    pub fn server_override(&self) -> Option<String> {
        self.server
            .clone()
            .or_else(|| Positionals::classify(&self.args).server)
    }

    pub fn query_options(&self, config: &Config) -> Result<QueryOptions, DomainError> {
        let positionals = Positionals::classify(&self.args);

        let server = self
            .server_override()
            .or_else(|| config.query.server.clone())
            .ok_or_else(|| {
                DomainError::UpstreamConstruction(
                    "no server given; use -s SERVER or @SERVER".to_string(),
                )
            })?;

        let name = self
            .qname
            .clone()
            .or(positionals.name)
            .unwrap_or_default();

        let types = self.types.iter().cloned().chain(positionals.types);

        Ok(QueryOptions::new(name, server)
            .with_types(types)
            .with_reverse(self.reverse)
            .with_dnssec(self.dnssec)
            .with_query_class(QueryClass::from_chaos_flag(self.chaos))
            .with_odoh_proxy(
                self.odoh_proxy
                    .clone()
                    .or_else(|| config.query.odoh_proxy.clone()),
            )
            .with_insecure_tls(self.insecure || config.query.insecure)
            .with_raw_output(self.raw))
    }
}
