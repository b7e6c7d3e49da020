//! Roster import from CSV (`name,level,position[,id]`, header row required).

use crate::models::{Player, Position, TournamentError, DEFAULT_LEVEL, MAX_LEVEL, MIN_LEVEL};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

/// Read players from CSV. Empty or missing level and position cells take the defaults
/// (3 and M); a missing id gets a fresh one.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<Player>, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut players = Vec::new();
    let mut seen_ids = HashSet::new();
    for (i, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        // Row 1 is the header.
        let line = i + 2;
        let row = row.map_err(|e| TournamentError::InvalidRoster(e.to_string()))?;
        if row.name.is_empty() {
            return Err(TournamentError::InvalidRoster(format!("line {}: empty name", line)));
        }
        let level = row.level.unwrap_or(DEFAULT_LEVEL);
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(TournamentError::InvalidRoster(format!(
                "line {}: level {} is outside {}..={}",
                line, level, MIN_LEVEL, MAX_LEVEL
            )));
        }
        let id = row
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if !seen_ids.insert(id.clone()) {
            return Err(TournamentError::InvalidRoster(format!("line {}: duplicate id {}", line, id)));
        }
        players.push(Player {
            id,
            name: row.name,
            level,
            position: Position::from_code(row.position.as_deref().unwrap_or_default()),
        });
    }
    log::debug!("imported {} players from csv", players.len());
    Ok(players)
}
