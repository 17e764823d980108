use std::{
    fmt::Display,
    net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr},
    num::ParseIntError,
};

use tracing::info;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(getset::Getters, getset::CopyGetters)]
pub(crate) struct Config {
    #[getset(get_copy = "pub(crate)")]
    host: IpAddr,
    #[getset(get_copy = "pub(crate)")]
    port: u16,
    #[getset(get = "pub(crate)")]
    database_url: String,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),
    #[error("invalid PORT environment variable {value:?}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid HOST environment variable {value:?}")]
    InvalidHost {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "address={} database_url={}", self.address(), self.database_url)
    }
}

impl Config {
    pub(crate) fn from_lookup<F>(lookup_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup_env("PORT").ok_or(ConfigError::Missing("PORT"))?;
        let port = port
            .parse()
            .map_err(|source| ConfigError::InvalidPort { value: port, source })?;

        let database_url = lookup_env("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = match lookup_env("HOST") {
            Some(host) => host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { value: host, source })?,
            None => DEFAULT_HOST,
        };

        let config = Config {
            host,
            port,
            database_url,
        };

        info!(address = %config.address(), "initialized config");

        Ok(config)
    }

    pub(crate) fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
