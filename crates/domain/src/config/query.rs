use serde::{Deserialize, Serialize};

/// Lookup defaults that apply when the command line leaves them unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct QueryDefaults {
    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub odoh_proxy: Option<String>,

    #[serde(default)]
    pub insecure: bool,
}
