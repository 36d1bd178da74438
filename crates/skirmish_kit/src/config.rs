use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use skirmish_core::{Rules, SimulationParams};

pub const DEFAULT_BUDGET: u32 = 150;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub army: ArmyConfig,
    #[serde(default)]
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl GameConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        let cfg: GameConfig = toml::from_str(data)?;
        Ok(cfg)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Seed precedence: explicit override, config file, `SKIRMISH_SEED`,
    /// then the built-in default.
    pub fn simulation_params(&self, override_seed: Option<u64>) -> SimulationParams {
        match override_seed.or(self.seed) {
            Some(seed) => SimulationParams::from_seed(seed),
            None => SimulationParams::from_env(),
        }
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report.as_ref().map(|r| r.path.as_path())
    }

    pub fn trace_filter(&self) -> Option<&str> {
        self.telemetry
            .as_ref()
            .and_then(|t| t.trace_filter.as_deref())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArmyConfig {
    #[serde(default = "default_budget")]
    pub budget: u32,
}

fn default_budget() -> u32 {
    DEFAULT_BUDGET
}

impl Default for ArmyConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub trace_filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = GameConfig::from_toml("").unwrap();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.rules, Rules::default());
        assert_eq!(cfg.army.budget, DEFAULT_BUDGET);
        assert!(cfg.report_path().is_none());
        assert!(cfg.trace_filter().is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml(
            r#"
seed = 7

[rules]
clone_chance_percent = 45
heal_amount = 5

[army]
budget = 90

[report]
path = "reports/last.json"

[telemetry]
trace_filter = "skirmish_core=debug"
"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.rules.clone_chance_percent, 45);
        assert_eq!(cfg.rules.heal_amount, 5);
        assert_eq!(cfg.rules.archer_reach, 3);
        assert_eq!(cfg.rules.max_rounds, 500);
        assert_eq!(cfg.army.budget, 90);
        assert_eq!(cfg.report_path(), Some(Path::new("reports/last.json")));
        assert_eq!(cfg.trace_filter(), Some("skirmish_core=debug"));
    }

    #[test]
    fn explicit_seed_beats_config_seed() {
        let cfg = GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        };
        assert_eq!(cfg.simulation_params(Some(99)).seed, 99);
        assert_eq!(cfg.simulation_params(None).seed, 7);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(GameConfig::from_toml("seed = \"seven\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = GameConfig::from_path(Path::new("/nonexistent/skirmish.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
