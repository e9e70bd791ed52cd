//! CSV roster import and standings export.

use crate::models::{EngineError, StandingsRow};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Deserialize)]
struct RosterRecord {
    name: String,
}

#[derive(Serialize)]
struct StandingsRecord<'a> {
    position: usize,
    team: &'a str,
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    points: u32,
}

/// Read team names from CSV with a `name` header column. Blank names are skipped.
pub fn read_team_names<R: Read>(reader: R) -> Result<Vec<String>, EngineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut names = Vec::new();
    for record in rdr.deserialize::<RosterRecord>() {
        let record = record?;
        if !record.name.is_empty() {
            names.push(record.name);
        }
    }
    Ok(names)
}

/// Write already-sorted standings as CSV, numbering positions from 1.
pub fn write_standings<W: Write>(rows: &[StandingsRow], writer: W) -> Result<(), EngineError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (idx, row) in rows.iter().enumerate() {
        wtr.serialize(StandingsRecord {
            position: idx + 1,
            team: &row.team_name,
            played: row.games_played,
            wins: row.wins,
            draws: row.draws,
            losses: row.losses,
            points: row.points,
        })?;
    }
    wtr.flush().map_err(|e| EngineError::Csv(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn reads_names_and_skips_blanks() {
        let data = "name\n Lions \n\nTigers\n  \n";
        let names = read_team_names(data.as_bytes()).unwrap();
        assert_eq!(names, vec!["Lions".to_string(), "Tigers".to_string()]);
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let data = "team\nLions\n";
        assert!(matches!(read_team_names(data.as_bytes()), Err(EngineError::Csv(_))));
    }

    #[test]
    fn writes_header_and_positions() {
        let mut row = StandingsRow::new(Uuid::nil(), Uuid::nil(), "Lions");
        row.games_played = 2;
        row.wins = 1;
        row.draws = 1;
        row.points = 4;
        let mut out = Vec::new();
        write_standings(&[row], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "position,team,played,wins,draws,losses,points\n1,Lions,2,1,1,0,4\n"
        );
    }
}
