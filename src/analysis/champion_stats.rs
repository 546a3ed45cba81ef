use super::extract::{extract_observation, MatchObservation};
use super::role::Role;
use crate::api::models::MatchDto;
use std::collections::HashMap;
use std::fmt;

/// Composite key of the count tables.
///
/// Ordering (champion name, then role) is the tie-break of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChampionKey {
    pub champion: String,
    pub role: Role,
}

impl ChampionKey {
    pub fn new(champion: impl Into<String>, role: Role) -> Self {
        ChampionKey {
            champion: champion.into(),
            role,
        }
    }
}

impl fmt::Display for ChampionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.champion, self.role)
    }
}

impl From<MatchObservation> for ChampionKey {
    fn from(observation: MatchObservation) -> Self {
        ChampionKey {
            champion: observation.champion,
            role: observation.role,
        }
    }
}

/// How often one player used each champion/role over their recent games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerChampionCounts {
    counts: HashMap<ChampionKey, usize>,
}

impl PlayerChampionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: &[MatchDto], puuid: &str) -> Self {
        let mut counts = Self::new();
        for observation in matches.iter().filter_map(|m| extract_observation(m, puuid)) {
            counts.record(observation);
        }
        counts
    }

    pub fn record(&mut self, observation: MatchObservation) {
        *self.counts.entry(observation.into()).or_insert(0) += 1;
    }

    pub fn get(&self, champion: &str, role: Role) -> usize {
        self.counts
            .get(&ChampionKey::new(champion, role))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries by descending count, ties by key.
    pub fn sorted(&self) -> Vec<(&ChampionKey, usize)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, v)| (k, *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Sums per-player tables into the global table.
#[derive(Debug, Default)]
pub struct ChampionStatsTracker {
    counts: HashMap<ChampionKey, usize>,
    players_analyzed: usize,
}

impl ChampionStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one player's table. Empty tables do not count as analyzed players.
    pub fn add_player(&mut self, player: PlayerChampionCounts) {
        if player.is_empty() {
            return;
        }
        for (key, count) in player.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
        self.players_analyzed += 1;
    }

    pub fn players_analyzed(&self) -> usize {
        self.players_analyzed
    }

    pub fn total_observations(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn counts(&self) -> &HashMap<ChampionKey, usize> {
        &self.counts
    }
}
