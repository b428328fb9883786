use std::{
    collections::{BTreeMap, HashMap},
    net::SocketAddr,
};

use serde::{Deserialize, Serialize};

/// Scope whose headers are sent to every host.
pub const GLOBAL_SCOPE: &str = "global";

/// Request headers per scope: either [`GLOBAL_SCOPE`] or a host name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderConfig(HashMap<String, HashMap<String, String>>);

impl HeaderConfig {
    /// Replace the headers of `scope`, e.g. `"pcpartpicker.com"` or `"global"`.
    pub fn set_headers<I, K, V>(&mut self, scope: &str, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.0.insert(scope.to_string(), headers);
    }

    /// Headers to send to `host`: the global ones overridden by the host's own.
    /// Entries with an empty name or value are left out.
    pub fn merged_for(&self, host: &str) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();

        for scope in [GLOBAL_SCOPE, host] {
            if let Some(headers) = self.0.get(scope) {
                for (name, value) in headers {
                    merged.insert(name.clone(), value.clone());
                }
            }
        }

        merged.retain(|name, value| !name.is_empty() && !value.is_empty());
        merged
    }
}

/// Service configuration, read from `partpicker.toml` and `PARTPICKER__*` variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    #[serde(default)]
    pub headers: HeaderConfig,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3030))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            headers: HeaderConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("partpicker").required(false))
            .add_source(config::Environment::with_prefix("PARTPICKER").separator("__"))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}
