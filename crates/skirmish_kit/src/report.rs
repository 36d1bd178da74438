use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use skirmish_core::{record, BattleEvent, Outcome, Severity, Team};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub id: String,
    pub timestamp: String,
    pub seed: u64,
    pub rounds: u32,
    pub outcome: Outcome,
    pub survivors: Vec<TeamSummary>,
    pub events: Vec<BattleEvent>,
}

impl BattleReport {
    pub fn new(
        id: impl Into<String>,
        seed: u64,
        rounds: u32,
        outcome: Outcome,
        teams: [&Team; 2],
        events: Vec<BattleEvent>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now().to_rfc3339(),
            seed,
            rounds,
            outcome,
            survivors: teams.into_iter().map(TeamSummary::of).collect(),
            events,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read report {}", path.display()))?;
        let report = serde_json::from_str(&data)
            .with_context(|| format!("invalid report {}", path.display()))?;
        Ok(report)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events.iter().filter(|e| e.severity == severity).count()
    }

    /// Short human-readable digest.
    pub fn summary(&self) -> String {
        let verdict = match &self.outcome {
            Outcome::Victory { team, .. } => format!("{team} won"),
            Outcome::Draw => "draw".to_string(),
            Outcome::Stalemate => "stalemate".to_string(),
        };
        let mut lines = vec![format!(
            "Battle {} (seed {}): {verdict} after {} rounds, {} events",
            self.id,
            self.seed,
            self.rounds,
            self.events.len()
        )];
        for team in &self.survivors {
            lines.push(format!("  {}: {} survivors", team.name, team.units.len()));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamSummary {
    pub name: String,
    /// Unit records of everyone still standing.
    pub units: Vec<String>,
}

impl TeamSummary {
    pub fn of(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            units: team.roster.iter().map(record::encode).collect(),
        }
    }
}
