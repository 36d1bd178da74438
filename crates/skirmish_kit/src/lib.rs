pub mod builder;
pub mod config;
pub mod error;
pub mod history;
pub mod report;
pub mod save;

pub use builder::{BuildCommand, Purchase, TeamDraft};
pub use config::{ArmyConfig, GameConfig, ReportConfig, TelemetryConfig, DEFAULT_BUDGET};
pub use error::{BuildError, SaveError, SaveWarning};
pub use history::History;
pub use report::{BattleReport, TeamSummary};
pub use save::SaveGame;
