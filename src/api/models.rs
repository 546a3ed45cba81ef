use serde::Deserialize;

/// Ranked solo/duo queue as reported in `info.queueId`.
pub const RANKED_SOLO_QUEUE_ID: i32 = 420;
pub const RANKED_SOLO_QUEUE: &str = "RANKED_SOLO_5x5";

/// The three apex brackets of the ranked ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeagueTier {
    Challenger,
    Grandmaster,
    Master,
}

impl LeagueTier {
    pub const ALL: [LeagueTier; 3] = [
        LeagueTier::Challenger,
        LeagueTier::Grandmaster,
        LeagueTier::Master,
    ];

    pub fn path_segment(self) -> &'static str {
        match self {
            LeagueTier::Challenger => "challengerleagues",
            LeagueTier::Grandmaster => "grandmasterleagues",
            LeagueTier::Master => "masterleagues",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeagueTier::Challenger => "Challenger",
            LeagueTier::Grandmaster => "Grandmaster",
            LeagueTier::Master => "Master",
        }
    }
}

// League V4 apex league response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueListDto {
    #[serde(default)]
    pub league_id: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub queue: String,
    #[serde(default)]
    pub entries: Vec<LeagueItemDto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueItemDto {
    pub puuid: String,
    pub league_points: i32,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
}

/// One ladder player, tagged with the bracket that listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub puuid: String,
    pub league_points: i32,
    pub tier: LeagueTier,
}

// Match V5 response
#[derive(Debug, Deserialize, Clone)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(default)]
    pub queue_id: i32,
    #[serde(default)]
    pub game_duration: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    #[serde(default)]
    pub champion_id: i32,
    pub champion_name: String,
    #[serde(default)]
    pub team_id: i32,
    #[serde(default)]
    pub individual_position: String, // TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY, Invalid
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub lane: String, // TOP, JUNGLE, MIDDLE, BOTTOM, NONE
    #[serde(default)]
    pub role: String, // SOLO, NONE, CARRY, SUPPORT, DUO
}
