use std::io;

use skirmish_core::{CodeError, GrantError, RecordError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error(transparent)]
    Code(#[from] CodeError),

    #[error("{item} costs {cost}, only {budget} left")]
    InsufficientFunds {
        item: &'static str,
        cost: u32,
        budget: u32,
    },

    #[error("no unit at position {0}")]
    NoSuchPosition(usize),

    #[error("unit at position {0} is not light infantry")]
    NotLightInfantry(usize),

    #[error("unit at position {position} already carries {buff}")]
    DuplicateBuff { position: usize, buff: &'static str },

    #[error("nothing to {0}")]
    EmptyHistory(&'static str),
}

impl BuildError {
    pub(crate) fn from_grant(err: GrantError, position: usize, buff: &'static str) -> Self {
        match err {
            GrantError::NotLightInfantry => BuildError::NotLightInfantry(position),
            GrantError::AlreadyActive => BuildError::DuplicateBuff { position, buff },
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file io failed")]
    Io(#[from] io::Error),

    #[error("line {line}: malformed header '{text}'")]
    MalformedHeader { line: usize, text: String },

    #[error("save file has no {0}")]
    MissingSection(&'static str),

    #[error("team '{team}' declares {expected} units but the file ends after {found}")]
    TruncatedTeam {
        team: String,
        expected: usize,
        found: usize,
    },
}

/// Something the loader tolerated while reading a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveWarning {
    /// The unit record could not be decoded and was left out.
    SkippedRecord { line: usize, error: RecordError },
    /// The record's position did not match its place in the team; the unit
    /// was renumbered to `expected`.
    Renumbered {
        line: usize,
        team: String,
        found: usize,
        expected: usize,
    },
}

impl SaveWarning {
    pub fn line(&self) -> usize {
        match self {
            SaveWarning::SkippedRecord { line, .. } | SaveWarning::Renumbered { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for SaveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveWarning::SkippedRecord { line, error } => {
                write!(f, "line {line}: skipped unit record ({error})")
            }
            SaveWarning::Renumbered {
                line,
                team,
                found,
                expected,
            } => write!(
                f,
                "line {line}: {team} unit listed at position {found}, loaded as {expected}"
            ),
        }
    }
}
