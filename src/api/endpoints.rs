// URL builders for the league and match endpoints. Base URLs come from Config
// so they can point at a proxy or a local stub.

use super::models::{LeagueTier, RANKED_SOLO_QUEUE};

pub fn apex_league_url(platform_url: &str, tier: LeagueTier) -> String {
    format!(
        "{}/lol/league/v4/{}/by-queue/{}",
        platform_url,
        tier.path_segment(),
        RANKED_SOLO_QUEUE
    )
}

pub fn match_ids_url(regional_url: &str, puuid: &str) -> String {
    format!("{}/lol/match/v5/matches/by-puuid/{}/ids", regional_url, puuid)
}

pub fn match_url(regional_url: &str, match_id: &str) -> String {
    format!("{}/lol/match/v5/matches/{}", regional_url, match_id)
}
