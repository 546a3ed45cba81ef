pub mod client;
pub mod endpoints;
pub mod models;

use crate::error::AppError;
use log::warn;
use models::{LeagueListDto, LeagueTier, MatchDto};

pub const DEFAULT_MATCH_COUNT: usize = 20;

/// The three reads the collection pipeline needs from the ranked API.
pub trait RankedApi {
    /// `Ok(None)` when the bracket does not exist on this server (404).
    fn get_league(&self, tier: LeagueTier) -> Result<Option<LeagueListDto>, AppError>;

    /// Most recent ranked solo-queue match ids for a player, newest first.
    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError>;

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError>;

    /// Fetches matches one at a time. Missing matches are skipped; any other
    /// failure aborts the batch.
    fn get_matches(&self, match_ids: &[String]) -> Result<Vec<MatchDto>, AppError> {
        let mut matches = Vec::with_capacity(match_ids.len());
        for match_id in match_ids {
            match self.get_match(match_id) {
                Ok(found) => matches.push(found),
                Err(e) if e.is_not_found() => {
                    warn!("match {} not found, skipping", match_id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(matches)
    }
}
