use crate::config::Config;
use crate::error::{AppError, StatusClass};
use crate::rate_limit::RequestThrottle;
use log::{debug, error, warn};
use std::thread;

use super::endpoints;
use super::models::*;
use super::RankedApi;

const USER_AGENT: &str = concat!("crown_meta/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REJECTION_MESSAGE: &str = "invalid or expired API key";

pub struct RiotApiClient {
    config: Config,
    agent: ureq::Agent,
    throttle: RequestThrottle,
}

impl RiotApiClient {
    pub fn new(config: Config) -> Self {
        let throttle = RequestThrottle::new(config.request_delay, config.requests_per_second);
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        RiotApiClient {
            config,
            agent,
            throttle,
        }
    }

    /// Sends one logical GET. A 429 suspends for the configured cooldown and
    /// re-sends the same request, with no cap on attempts. Every attempt goes
    /// through the throttle.
    fn execute_request(&self, url: &str, query: &[(&str, String)]) -> Result<String, AppError> {
        loop {
            self.throttle.wait();

            let mut request = self
                .agent
                .get(url)
                .set("X-Riot-Token", &self.config.api_key);
            for (name, value) in query {
                request = request.query(name, value);
            }

            debug!("GET {}", url);
            match request.call() {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map_err(|e| AppError::Transport(e.to_string()));
                }
                Err(ureq::Error::Status(status, resp)) => match StatusClass::from_status(status) {
                    StatusClass::RateLimited => {
                        warn!(
                            "rate limited on {}, waiting {}ms before retry",
                            url,
                            self.config.rate_limit_backoff.as_millis()
                        );
                        thread::sleep(self.config.rate_limit_backoff);
                    }
                    StatusClass::NotFound => {
                        debug!("404 for {}", url);
                        return Err(AppError::NotFound(url.to_string()));
                    }
                    StatusClass::Unauthorized => {
                        let message = rejection_message(resp);
                        error!("credential rejected ({}): {}", status, message);
                        return Err(AppError::Unauthorized { status, message });
                    }
                    StatusClass::Other => {
                        let body = resp.into_string().unwrap_or_default();
                        return Err(AppError::Http {
                            status,
                            message: body.chars().take(200).collect(),
                        });
                    }
                },
                Err(ureq::Error::Transport(transport)) => {
                    return Err(AppError::Transport(transport.to_string()));
                }
            }
        }
    }
}

/// Riot puts the reason for a 401/403 in `status.message`.
fn rejection_message(resp: ureq::Response) -> String {
    resp.into_json::<serde_json::Value>()
        .ok()
        .and_then(|body| {
            body.get("status")
                .and_then(|status| status.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string())
}

impl RankedApi for RiotApiClient {
    fn get_league(&self, tier: LeagueTier) -> Result<Option<LeagueListDto>, AppError> {
        let url = endpoints::apex_league_url(&self.config.platform_url, tier);

        match self.execute_request(&url, &[]) {
            Ok(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| AppError::JsonError(e.to_string())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids_url(&self.config.regional_url, puuid);
        let query = [
            ("queue", RANKED_SOLO_QUEUE_ID.to_string()),
            ("type", "ranked".to_string()),
            ("start", "0".to_string()),
            ("count", count.to_string()),
        ];

        let body = self.execute_request(&url, &query)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = endpoints::match_url(&self.config.regional_url, match_id);

        let body = self.execute_request(&url, &[])?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }
}
