use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a selectable player, as issued by the remote game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the club a player belongs to; squads cap members per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playing position. Declaration order is the order the squad selector fills positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Maps the remote `element_type` code (1..=4).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Goalkeeper),
            2 => Some(Self::Defender),
            3 => Some(Self::Midfielder),
            4 => Some(Self::Forward),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Goalkeeper => 1,
            Self::Defender => 2,
            Self::Midfielder => 3,
            Self::Forward => 4,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Goalkeeper => "GKP",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One value per position, used for squad shapes, lineup limits and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionTable<T> {
    pub goalkeeper: T,
    pub defender: T,
    pub midfielder: T,
    pub forward: T,
}

impl<T> PositionTable<T> {
    pub const fn new(goalkeeper: T, defender: T, midfielder: T, forward: T) -> Self {
        Self {
            goalkeeper,
            defender,
            midfielder,
            forward,
        }
    }

    pub fn get(&self, position: Position) -> &T {
        match position {
            Position::Goalkeeper => &self.goalkeeper,
            Position::Defender => &self.defender,
            Position::Midfielder => &self.midfielder,
            Position::Forward => &self.forward,
        }
    }

    pub fn get_mut(&mut self, position: Position) -> &mut T {
        match position {
            Position::Goalkeeper => &mut self.goalkeeper,
            Position::Defender => &mut self.defender,
            Position::Midfielder => &mut self.midfielder,
            Position::Forward => &mut self.forward,
        }
    }
}

impl<T: Default> Default for PositionTable<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default(), T::default(), T::default())
    }
}

impl PositionTable<u8> {
    pub fn total(&self) -> usize {
        Position::ALL
            .iter()
            .map(|position| usize::from(*self.get(*position)))
            .sum()
    }
}

/// Fitness state derived from the status flag and the free-text news note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityState {
    Available,
    Doubtful,
    Unavailable,
}

/// Normalized, validated player record consumed by scoring and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// Lower-cased, whitespace-collapsed name used to look up auxiliary signals.
    pub name_key: String,
    pub position: Position,
    pub group: GroupId,
    pub group_name: String,
    /// Price in tenths (55 == 5.5m).
    pub cost: u32,
    pub projected_value: f64,
    pub recent_form: f64,
    pub influence_index: f64,
    pub availability: AvailabilityState,
}
