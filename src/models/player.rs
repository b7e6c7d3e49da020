//! Player and Position data structures.

use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (opaque string, a v4 uuid when generated here).
pub type PlayerId = String;

/// Level used when a player has none recorded.
pub const DEFAULT_LEVEL: u8 = 3;

/// Lowest and highest valid skill levels.
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

fn default_level() -> u8 {
    DEFAULT_LEVEL
}

/// Null and zero take the default; anything else must be within `MIN_LEVEL..=MAX_LEVEL`.
fn deserialize_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u8>::deserialize(deserializer)? {
        None | Some(0) => Ok(DEFAULT_LEVEL),
        Some(level) if (MIN_LEVEL..=MAX_LEVEL).contains(&level) => Ok(level),
        Some(level) => Err(de::Error::custom(format!(
            "level {} is outside {}..={}",
            level, MIN_LEVEL, MAX_LEVEL
        ))),
    }
}

fn deserialize_position<'de, D>(deserializer: D) -> Result<Position, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Position>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field position. Missing positions default to midfield; anything unrecognized
/// becomes `Unknown` and is dealt last by the position policy.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Goalkeeper,
    Defender,
    #[default]
    Midfielder,
    Attacker,
    Unknown,
}

impl From<String> for Position {
    fn from(code: String) -> Self {
        Position::from_code(&code)
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.code().to_string()
    }
}

impl Position {
    /// Dealing order used by the position policy.
    pub const DEAL_ORDER: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Attacker,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "G",
            Position::Defender => "D",
            Position::Midfielder => "M",
            Position::Attacker => "A",
            Position::Unknown => "?",
        }
    }

    /// Parse a one-letter code (case-insensitive). Empty input yields the default.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "" | "M" => Position::Midfielder,
            "G" => Position::Goalkeeper,
            "D" => Position::Defender,
            "A" => Position::Attacker,
            _ => Position::Unknown,
        }
    }
}

/// A rostered player. Read-only as far as team balancing is concerned.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Skill level 1..=5. Missing, null, or zero input reads as the default.
    #[serde(default = "default_level", deserialize_with = "deserialize_level")]
    pub level: u8,
    #[serde(default, deserialize_with = "deserialize_position")]
    pub position: Position,
}

impl Player {
    /// Create a new player with the default level and position.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            level: DEFAULT_LEVEL,
            position: Position::default(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Level used for balancing: a zero (unset) level counts as the default.
    pub fn effective_level(&self) -> u32 {
        if self.level == 0 {
            u32::from(DEFAULT_LEVEL)
        } else {
            u32::from(self.level)
        }
    }
}
