use super::champion_stats::{ChampionKey, ChampionStatsTracker};
use super::role::Role;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Trend reported when a key had a zero historical average.
pub const SATURATED_TREND: f64 = 100.0;

/// One row of a published snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedChampionStat {
    /// Never resolved by the collector; always 0.
    #[serde(default)]
    pub champion_id: i32,
    pub champion_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_historical_count: Option<f64>,
}

impl AggregatedChampionStat {
    pub fn new(key: ChampionKey, count: usize) -> Self {
        AggregatedChampionStat {
            champion_id: 0,
            champion_name: key.champion,
            role: Some(key.role),
            count,
            trend_percentage: None,
            average_historical_count: None,
        }
    }

    pub fn key(&self) -> Option<ChampionKey> {
        self.role
            .map(|role| ChampionKey::new(self.champion_name.clone(), role))
    }
}

/// Percentage change of `current` against a historical average.
///
/// No history gives no trend. A zero average with a positive count
/// saturates at +100%.
pub fn trend_percentage(current: usize, historical_average: Option<f64>) -> Option<f64> {
    let average = historical_average?;
    if average == 0.0 {
        if current > 0 {
            Some(SATURATED_TREND)
        } else {
            Some(0.0)
        }
    } else {
        Some((current as f64 - average) / average * 100.0)
    }
}

/// Whether a snapshot can take part in keyed averages. Files written before
/// roles existed hold rows but no keys, so they carry no usable counts.
fn has_keyed_rows(snapshot: &Snapshot) -> bool {
    snapshot.results.is_empty() || snapshot.results.iter().any(|stat| stat.role.is_some())
}

/// Mean count per key over every usable earlier snapshot, a snapshot
/// without the key counting as zero. Keys seen in none of them are absent.
pub fn historical_averages(history: &[Snapshot]) -> HashMap<ChampionKey, f64> {
    let mut sums: HashMap<ChampionKey, usize> = HashMap::new();
    let mut snapshots_used = 0;

    for snapshot in history.iter().filter(|s| has_keyed_rows(s)) {
        snapshots_used += 1;
        for stat in &snapshot.results {
            if let Some(key) = stat.key() {
                *sums.entry(key).or_insert(0) += stat.count;
            }
        }
    }

    sums.into_iter()
        .map(|(key, sum)| (key, sum as f64 / snapshots_used as f64))
        .collect()
}

/// Fills trend fields of every keyed row from `history`, overwriting any
/// previous values.
pub fn attach_trends(stats: &mut [AggregatedChampionStat], history: &[Snapshot]) {
    let averages = historical_averages(history);

    for stat in stats.iter_mut() {
        let average = stat.key().and_then(|key| averages.get(&key).copied());
        stat.average_historical_count = average;
        stat.trend_percentage = trend_percentage(stat.count, average);
    }
}

/// Descending count; equal counts by champion name, then role order.
pub fn compare_stats(a: &AggregatedChampionStat, b: &AggregatedChampionStat) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.champion_name.cmp(&b.champion_name))
        .then_with(|| a.role.cmp(&b.role))
}

/// Builds the published, sorted result set from the global table.
pub fn rank_champions(
    tracker: &ChampionStatsTracker,
    history: &[Snapshot],
) -> Vec<AggregatedChampionStat> {
    let mut stats: Vec<AggregatedChampionStat> = tracker
        .counts()
        .iter()
        .map(|(key, count)| AggregatedChampionStat::new(key.clone(), *count))
        .collect();

    attach_trends(&mut stats, history);
    stats.sort_by(compare_stats);
    stats
}
