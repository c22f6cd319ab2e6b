use ferrous_q_application::services::ResponseFormatter;
use ferrous_q_application::use_cases::{QueryTransport, RunQueryPlanUseCase};
use ferrous_q_domain::{DomainError, QueryOptions, UPSTREAM_TIMEOUT};
use ferrous_q_infrastructure::dns::{DirectUpstream, OdohClient};
use std::sync::Arc;
use tracing::debug;

pub struct LookupServices {
    pub run_query_plan: RunQueryPlanUseCase,
    pub formatter: ResponseFormatter,
}

impl LookupServices {
    pub async fn new(options: &QueryOptions) -> Result<Self, DomainError> {
        let transport = Self::build_transport(options).await?;
        debug!(
            server = %transport.address(),
            strategy = transport.strategy_name(),
            "transport ready"
        );

        Ok(Self {
            run_query_plan: RunQueryPlanUseCase::new(transport),
            formatter: ResponseFormatter::new(options.raw_output),
        })
    }

    async fn build_transport(options: &QueryOptions) -> Result<QueryTransport, DomainError> {
        match &options.odoh_proxy {
            Some(proxy) => {
                let client = OdohClient::new(UPSTREAM_TIMEOUT, options.insecure_tls)?;
                Ok(QueryTransport::oblivious(
                    Arc::new(client),
                    proxy.as_str(),
                    options.server.as_str(),
                ))
            }
            None => {
                let upstream =
                    DirectUpstream::connect(&options.server, UPSTREAM_TIMEOUT, options.insecure_tls)
                        .await?;
                Ok(QueryTransport::direct(Arc::new(upstream)))
            }
        }
    }
}
