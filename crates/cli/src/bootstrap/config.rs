use ferrous_q_domain::{CliOverrides, Config};
use tracing::debug;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    debug!(
        server = ?config.query.server,
        odoh_proxy = ?config.query.odoh_proxy,
        "configuration loaded"
    );
    Ok(config)
}
