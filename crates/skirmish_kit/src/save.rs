//! Plain-text save files.
//!
//! ```text
//! # comment
//! round 3
//! team 2 Red Army
//! LI 1 42 70 20 HR
//! HI 2 100 100
//! team 1 Blue
//! A 1 40 40
//! ```
//!
//! Unit records use [`skirmish_core::record`]. A record that fails to decode
//! is skipped and reported as a [`SaveWarning`], as is a record whose position
//! is not its place in the team. A bad `round`/`team` header aborts the load.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use skirmish_core::{record, Battle, Dice, Roster, Team};
use tracing::{info, warn};

use crate::error::{SaveError, SaveWarning};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveGame {
    /// Last fully resolved round.
    pub round: u32,
    pub home: Team,
    pub away: Team,
}

impl SaveGame {
    pub fn new(round: u32, home: Team, away: Team) -> Self {
        Self { round, home, away }
    }

    pub fn capture<D: Dice>(battle: &Battle<D>) -> Self {
        Self::new(battle.round(), battle.home().clone(), battle.away().clone())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# skirmish save");
        let _ = writeln!(out, "round {}", self.round);
        for team in [&self.home, &self.away] {
            let _ = writeln!(out, "team {} {}", team.roster.len(), team.name);
            for unit in &team.roster {
                let _ = writeln!(out, "{}", record::encode(unit));
            }
        }
        out
    }

    pub fn parse(text: &str) -> Result<(SaveGame, Vec<SaveWarning>), SaveError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .peekable();
        let mut warnings = Vec::new();

        let (line_no, line) = lines.next().ok_or(SaveError::MissingSection("round"))?;
        let round = match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["round", n] => n.parse().map_err(|_| malformed(line_no, line))?,
            _ => return Err(malformed(line_no, line)),
        };

        let mut teams = Vec::with_capacity(2);
        for section in ["home team", "away team"] {
            let (line_no, line) = lines.next().ok_or(SaveError::MissingSection(section))?;
            let (expected, name) = parse_team_header(line_no, line)?;

            let mut units = Vec::with_capacity(expected);
            for found in 0..expected {
                let truncated = || SaveError::TruncatedTeam {
                    team: name.clone(),
                    expected,
                    found,
                };
                match lines.peek() {
                    None => return Err(truncated()),
                    Some((_, next)) if next.starts_with("team ") => return Err(truncated()),
                    Some(_) => {}
                }
                let Some((line_no, line)) = lines.next() else {
                    return Err(truncated());
                };
                match record::decode(line) {
                    Ok(unit) => {
                        if unit.position != found + 1 {
                            warn!(target: "skirmish_kit.save", line = line_no, found = unit.position, expected = units.len() + 1, "unit position out of order");
                            warnings.push(SaveWarning::Renumbered {
                                line: line_no,
                                team: name.clone(),
                                found: unit.position,
                                expected: units.len() + 1,
                            });
                        }
                        units.push(unit);
                    }
                    Err(error) => {
                        warn!(target: "skirmish_kit.save", line = line_no, %error, "skipping unit record");
                        warnings.push(SaveWarning::SkippedRecord {
                            line: line_no,
                            error,
                        });
                    }
                }
            }
            teams.push(Team::with_roster(name, Roster::from_units(units)));
        }

        if let Some((line_no, line)) = lines.next() {
            return Err(malformed(line_no, line));
        }

        let away = teams.pop().ok_or(SaveError::MissingSection("away team"))?;
        let home = teams.pop().ok_or(SaveError::MissingSection("home team"))?;
        Ok((SaveGame { round, home, away }, warnings))
    }

    pub fn load(path: &Path) -> Result<(SaveGame, Vec<SaveWarning>), SaveError> {
        let text = fs::read_to_string(path)?;
        let loaded = Self::parse(&text)?;
        info!(
            target: "skirmish_kit.save",
            path = %path.display(),
            round = loaded.0.round,
            skipped = loaded.1.len(),
            "save loaded"
        );
        Ok(loaded)
    }

    pub fn store(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_text())?;
        info!(target: "skirmish_kit.save", path = %path.display(), round = self.round, "save written");
        Ok(())
    }
}

fn malformed(line: usize, text: &str) -> SaveError {
    SaveError::MalformedHeader {
        line,
        text: text.to_string(),
    }
}

fn parse_team_header(line_no: usize, line: &str) -> Result<(usize, String), SaveError> {
    let mut words = line.split_whitespace();
    if words.next() != Some("team") {
        return Err(malformed(line_no, line));
    }
    let count = words
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| malformed(line_no, line))?;
    let name = words.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(malformed(line_no, line));
    }
    Ok((count, name))
}
