//! Filtered, ranked view over a loaded result set. Recomputed from scratch on
//! every filter change; the loaded snapshot is never touched.

use crate::analysis::ranking::{compare_stats, AggregatedChampionStat};
use crate::analysis::role::Role;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleFilter::All => "all",
            RoleFilter::Only(role) => role.as_str(),
        }
    }

    /// Rows without a role only show up under `All`.
    pub fn matches(self, role: Option<Role>) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(wanted) => role == Some(wanted),
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(RoleFilter::All)
        } else {
            s.parse::<Role>().map(RoleFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub role: RoleFilter,
    pub search_query: String,
}

impl ViewFilter {
    pub fn matches(&self, stat: &AggregatedChampionStat) -> bool {
        if !self.role.matches(stat.role) {
            return false;
        }
        let query = self.search_query.trim().to_lowercase();
        query.is_empty() || stat.champion_name.to_lowercase().contains(&query)
    }
}

/// A row of the view with the rank it holds in the unfiltered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRow<'a> {
    pub rank: usize,
    pub stat: &'a AggregatedChampionStat,
}

/// Copy of `results` in published order.
pub fn sorted_results(results: &[AggregatedChampionStat]) -> Vec<AggregatedChampionStat> {
    let mut sorted = results.to_vec();
    sorted.sort_by(compare_stats);
    sorted
}

/// Applies `filter` to an already sorted list, keeping global ranks.
pub fn apply_filter<'a>(sorted: &'a [AggregatedChampionStat], filter: &ViewFilter) -> Vec<RankedRow<'a>> {
    sorted
        .iter()
        .enumerate()
        .filter(|(_, stat)| filter.matches(stat))
        .map(|(idx, stat)| RankedRow { rank: idx + 1, stat })
        .collect()
}
