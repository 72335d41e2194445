use std::env;
use url::Url;

use crate::client::DEFAULT_UPSTREAM_URL;

#[derive(Debug)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    /// Bearer token for the upstream API (`COC_API_KEY`)
    pub api_token: String,
    /// Default clan tag, without the `#` prefix (`CLAN_TAG`)
    pub clan_tag: String,
    pub upstream_url: Url,
    pub listener: Listener,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variables: {}; define them in the environment or a .env file", .0.join(", "))]
    MissingVars(Vec<&'static str>),
    #[error("could not parse {0}: {1}")]
    Invalid(&'static str, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup so tests do not
    /// have to mutate process-global environment state.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (Some(api_token), Some(clan_tag)) = (get("COC_API_KEY"), get("CLAN_TAG")) else {
            let missing: Vec<&'static str> = ["COC_API_KEY", "CLAN_TAG"]
                .into_iter()
                .filter(|name| get(name).is_none())
                .collect();
            return Err(ConfigError::MissingVars(missing));
        };

        let upstream_url = match get("COC_API_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::Invalid("COC_API_URL", e.to_string()))?,
            None => Url::parse(DEFAULT_UPSTREAM_URL).expect("default upstream URL parses"),
        };

        let mut listener = Listener::default();
        if let Some(host) = get("HOST") {
            listener.host = host;
        }
        if let Some(raw) = get("PORT") {
            listener.port = raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?;
        }

        Ok(Config {
            api_token,
            clan_tag,
            upstream_url,
            listener,
        })
    }
}
