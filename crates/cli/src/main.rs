use anyhow::Context;
use clap::Parser;
use ferrous_q_application::use_cases::QueryPlan;
use ferrous_q_domain::{CliOverrides, Config};
use std::process::ExitCode;
use tracing::error;

mod args;
mod bootstrap;
mod di;

use args::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        server: cli.server_override(),
        odoh_proxy: cli.odoh_proxy.clone(),
        insecure: cli.insecure,
        log_level: None,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides);

    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| bootstrap::DEFAULT_LOG_LEVEL.to_string());
    bootstrap::init_logging(&level, cli.verbose);

    let result = match config {
        Ok(config) => run(&cli, &config).await,
        Err(e) => Err(e.context("cannot load configuration")),
    };

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Everything is rendered only after the whole plan succeeded.
async fn run(cli: &Cli, config: &Config) -> anyhow::Result<Vec<String>> {
    let options = cli.query_options(config)?;
    let plan = QueryPlan::build(&options)?;

    let services = di::LookupServices::new(&options)
        .await
        .context("cannot create upstream")?;

    let replies = services
        .run_query_plan
        .run(&plan)
        .await
        .context("upstream query")?;

    Ok(services.formatter.render(&replies))
}
