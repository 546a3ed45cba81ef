use crate::error::AppError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REQUEST_DELAY_MS: u64 = 150;
const DEFAULT_RATE_LIMIT_BACKOFF_MS: u64 = 2000;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 20;

/// Game server the ladder is read from. One server per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Server {
    #[default]
    Euw,
    Eune,
    Na,
    Kr,
    Br,
    Lan,
    Las,
    Oce,
    Tr,
    Ru,
    Jp,
}

impl Server {
    pub const ALL: [Server; 11] = [
        Server::Euw,
        Server::Eune,
        Server::Na,
        Server::Kr,
        Server::Br,
        Server::Lan,
        Server::Las,
        Server::Oce,
        Server::Tr,
        Server::Ru,
        Server::Jp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Server::Euw => "euw",
            Server::Eune => "eune",
            Server::Na => "na",
            Server::Kr => "kr",
            Server::Br => "br",
            Server::Lan => "lan",
            Server::Las => "las",
            Server::Oce => "oce",
            Server::Tr => "tr",
            Server::Ru => "ru",
            Server::Jp => "jp",
        }
    }

    /// Platform host used by the league endpoints.
    pub fn platform(self) -> &'static str {
        match self {
            Server::Euw => "euw1",
            Server::Eune => "eun1",
            Server::Na => "na1",
            Server::Kr => "kr",
            Server::Br => "br1",
            Server::Lan => "la1",
            Server::Las => "la2",
            Server::Oce => "oc1",
            Server::Tr => "tr1",
            Server::Ru => "ru",
            Server::Jp => "jp1",
        }
    }

    /// Regional routing host used by the match endpoints.
    pub fn regional_routing(self) -> &'static str {
        match self {
            Server::Na | Server::Br | Server::Lan | Server::Las => "americas",
            Server::Euw | Server::Eune | Server::Tr | Server::Ru => "europe",
            Server::Kr | Server::Jp => "asia",
            Server::Oce => "sea",
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Server {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Server::ALL
            .iter()
            .copied()
            .find(|server| server.as_str() == wanted)
            .ok_or_else(|| AppError::ConfigError(format!("unknown server '{}'", s)))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub server: Server,
    pub request_delay: Duration,
    pub rate_limit_backoff: Duration,
    pub requests_per_second: u32,
    pub platform_url: String,
    pub regional_url: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>, server: Server) -> Self {
        Config {
            api_key: api_key.into(),
            server,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            rate_limit_backoff: Duration::from_millis(DEFAULT_RATE_LIMIT_BACKOFF_MS),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            platform_url: platform_url_for(server),
            regional_url: regional_url_for(server),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("RIOT_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("RIOT_API_KEY not found in .env file".to_string())
            })?;

        let server = match lookup("RIOT_SERVER") {
            Some(value) => value.parse()?,
            None => Server::default(),
        };

        let mut config = Config::new(api_key.trim(), server);

        if let Some(ms) = parse_number::<u64>(&lookup, "RIOT_REQUEST_DELAY_MS")? {
            config.request_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_number::<u64>(&lookup, "RIOT_RATE_LIMIT_BACKOFF_MS")? {
            config.rate_limit_backoff = Duration::from_millis(ms);
        }
        if let Some(rps) = parse_number::<u32>(&lookup, "RIOT_REQUESTS_PER_SECOND")? {
            if rps == 0 {
                return Err(AppError::ConfigError(
                    "RIOT_REQUESTS_PER_SECOND must be at least 1".to_string(),
                ));
            }
            config.requests_per_second = rps;
        }
        if let Some(url) = lookup("RIOT_PLATFORM_URL") {
            config.platform_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("RIOT_REGIONAL_URL") {
            config.regional_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    /// Switches server, re-deriving the base URLs.
    pub fn with_server(mut self, server: Server) -> Self {
        self.server = server;
        self.platform_url = platform_url_for(server);
        self.regional_url = regional_url_for(server);
        self
    }
}

fn platform_url_for(server: Server) -> String {
    format!("https://{}.api.riotgames.com", server.platform())
}

fn regional_url_for(server: Server) -> String {
    format!("https://{}.api.riotgames.com", server.regional_routing())
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::ConfigError(format!("{} is not a valid number: '{}'", key, raw))),
        None => Ok(None),
    }
}
