use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lane assignment of a champion in one game.
///
/// Variant order is the display order and the secondary sort key for ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    /// Used when no positional field is recognized.
    pub const FALLBACK: Role = Role::Mid;

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Support => "support",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

/// Derives a role from the raw positional fields of a participant.
///
/// Candidates are tried in order: individual position, team position, lane.
/// The first one that names a position wins. `role_hint` is the raw `role`
/// sub-field and only matters for bottom lane. Total: anything unrecognized
/// lands on [`Role::FALLBACK`].
pub fn derive_role(
    individual_position: &str,
    team_position: &str,
    lane: &str,
    role_hint: &str,
) -> Role {
    [individual_position, team_position, lane]
        .iter()
        .find_map(|candidate| match_position(candidate, role_hint))
        .unwrap_or(Role::FALLBACK)
}

fn match_position(candidate: &str, role_hint: &str) -> Option<Role> {
    let position = candidate.to_ascii_uppercase();

    if position.contains("TOP") {
        Some(Role::Top)
    } else if position.contains("JUNGLE") {
        Some(Role::Jungle)
    } else if position.contains("MIDDLE") || position.contains("MID") {
        Some(Role::Mid)
    } else if position.contains("BOTTOM") || position.contains("BOT") {
        Some(bottom_lane_role(role_hint))
    } else if position.contains("UTILITY") {
        Some(Role::Support)
    } else {
        None
    }
}

// An unqualified bottom-lane signal is the damage carry.
fn bottom_lane_role(role_hint: &str) -> Role {
    let hint = role_hint.to_ascii_uppercase();
    if hint.contains("SUPPORT") || hint.contains("UTILITY") {
        Role::Support
    } else {
        Role::Adc
    }
}
