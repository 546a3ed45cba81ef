use super::role::{derive_role, Role};
use crate::api::models::{MatchDto, RANKED_SOLO_QUEUE_ID};

/// The champion a player used in one ranked game, and where they played it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchObservation {
    pub champion: String,
    pub role: Role,
}

/// Finds `puuid` among the participants of a ranked solo-queue match.
/// Any other queue, or a player who is not in the game, yields nothing.
pub fn extract_observation(match_data: &MatchDto, puuid: &str) -> Option<MatchObservation> {
    if match_data.info.queue_id != RANKED_SOLO_QUEUE_ID {
        return None;
    }

    let participant = match_data
        .info
        .participants
        .iter()
        .find(|p| p.puuid == puuid)?;

    Some(MatchObservation {
        champion: participant.champion_name.clone(),
        role: derive_role(
            &participant.individual_position,
            &participant.team_position,
            &participant.lane,
            &participant.role,
        ),
    })
}
