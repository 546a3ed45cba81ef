//! Sequential collection run: ladder, top players, their recent ranked games,
//! per-player counts, global ranking, snapshot.
//!
//! Everything goes through one [`RankedApi`] one request at a time. Only a
//! rejected credential escapes the per-player loop.

use crate::analysis::champion_stats::{ChampionStatsTracker, PlayerChampionCounts};
use crate::analysis::ranking::rank_champions;
use crate::api::models::{LeaderboardEntry, LeagueTier};
use crate::api::{RankedApi, DEFAULT_MATCH_COUNT};
use crate::error::AppError;
use crate::snapshot::{Snapshot, SnapshotStore, MAX_HISTORY};
use chrono::Utc;
use indicatif::ProgressBar;
use log::{info, warn};
use std::path::PathBuf;

pub const DEFAULT_PLAYER_COUNT: usize = 100;
pub const MAX_MATCH_COUNT: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub player_count: usize,
    pub match_count: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            player_count: DEFAULT_PLAYER_COUNT,
            match_count: DEFAULT_MATCH_COUNT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub snapshot: Snapshot,
    pub leaderboard_size: usize,
    pub players_selected: usize,
    pub players_failed: usize,
}

/// Shortened player id for diagnostics.
pub fn redact(puuid: &str) -> String {
    let prefix: String = puuid.chars().take(8).collect();
    format!("{}...", prefix)
}

/// Highest league points first, regardless of tier. Equal points keep
/// ladder order (Challenger before Grandmaster before Master).
pub fn select_top_players(mut entries: Vec<LeaderboardEntry>, count: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.league_points.cmp(&a.league_points));
    entries.truncate(count);
    entries
}

pub struct Collector<'a, A: RankedApi> {
    api: &'a A,
    options: CollectOptions,
    progress: ProgressBar,
    output: Box<dyn Fn(&str) + 'a>,
}

impl<'a, A: RankedApi> Collector<'a, A> {
    pub fn new(api: &'a A, options: CollectOptions) -> Self {
        Collector {
            api,
            options,
            progress: ProgressBar::hidden(),
            output: Box::new(|line| println!("{}", line)),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces stdout as the destination of per-tier and per-player lines.
    pub fn with_output(mut self, output: impl Fn(&str) + 'a) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Writes one console line above the bar. The bar is cleared while the
    /// line is written, and a hidden bar does not swallow it.
    fn announce(&self, line: String) {
        self.progress.suspend(|| (self.output)(&line));
    }

    /// Reads all three apex brackets. A missing bracket, or one that fails
    /// for a non-fatal reason, is skipped.
    pub fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        let mut players = Vec::new();

        for tier in LeagueTier::ALL {
            match self.api.get_league(tier) {
                Ok(Some(league)) => {
                    info!("{} {} players found", league.entries.len(), tier.label());
                    self.announce(format!(
                        "  ✓ {} {} players found",
                        league.entries.len(),
                        tier.label()
                    ));
                    players.extend(league.entries.into_iter().map(|entry| LeaderboardEntry {
                        puuid: entry.puuid,
                        league_points: entry.league_points,
                        tier,
                    }));
                }
                Ok(None) => warn!("{} leaderboard not available", tier.label()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("{} leaderboard skipped: {}", tier.label(), e),
            }
        }

        Ok(players)
    }

    /// One player's counts over their recent ranked games.
    pub fn process_player(&self, player: &LeaderboardEntry) -> Result<PlayerChampionCounts, AppError> {
        let match_ids = self
            .api
            .get_match_ids(&player.puuid, self.options.match_count)?;
        if match_ids.is_empty() {
            return Ok(PlayerChampionCounts::new());
        }

        let matches = self.api.get_matches(&match_ids)?;
        if matches.len() < match_ids.len() {
            info!(
                "{}: {} of {} matches available",
                redact(&player.puuid),
                matches.len(),
                match_ids.len()
            );
        }

        Ok(PlayerChampionCounts::from_matches(&matches, &player.puuid))
    }

    /// Runs the whole collection. Nothing is returned on a fatal error, so
    /// partial results can never be published.
    pub fn collect(&self, history: &[Snapshot]) -> Result<CollectionReport, AppError> {
        let leaderboard = self.fetch_leaderboard()?;
        if leaderboard.is_empty() {
            return Err(AppError::NoLeaderboardData);
        }
        let leaderboard_size = leaderboard.len();

        let players = select_top_players(leaderboard, self.options.player_count);
        info!(
            "{} players selected out of {}",
            players.len(),
            leaderboard_size
        );

        self.progress.set_length(players.len() as u64);
        let mut tracker = ChampionStatsTracker::new();
        let mut players_failed = 0;

        for player in &players {
            let player_id = redact(&player.puuid);
            self.progress.set_message(format!(
                "{} {} ({} LP)",
                player_id,
                player.tier.label(),
                player.league_points
            ));

            match self.process_player(player) {
                Ok(counts) if counts.is_empty() => {
                    self.announce(format!("  ⚠ No ranked champions found for {}", player_id));
                }
                Ok(counts) => {
                    let summary = counts
                        .sorted()
                        .iter()
                        .map(|(key, count)| format!("{} ({}x)", key, count))
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.announce(format!("  ✓ {}: {}", player_id, summary));
                    tracker.add_player(counts);
                }
                Err(e) if e.is_fatal() => {
                    self.progress.abandon();
                    return Err(e);
                }
                Err(e) => {
                    self.progress.suspend(|| {
                        warn!(
                            "player {} ({}) skipped: {}",
                            player_id,
                            player.tier.label(),
                            e
                        )
                    });
                    players_failed += 1;
                }
            }

            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        info!(
            "{} players with data, {} observations",
            tracker.players_analyzed(),
            tracker.total_observations()
        );

        let results = rank_champions(&tracker, history);
        Ok(CollectionReport {
            snapshot: Snapshot {
                timestamp: Utc::now(),
                total_players_analyzed: tracker.players_analyzed(),
                results,
            },
            leaderboard_size,
            players_selected: players.len(),
            players_failed,
        })
    }

    /// Loads trend history from `store`, collects, then writes the new snapshot.
    pub fn run(&self, store: &SnapshotStore) -> Result<(CollectionReport, PathBuf), AppError> {
        let history = store.load_history(MAX_HISTORY)?;
        info!("{} historical snapshots loaded", history.len());

        let report = self.collect(&history)?;
        let path = store.write(&report.snapshot)?;
        Ok((report, path))
    }
}
