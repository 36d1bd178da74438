//! Parse errors for the textual unit codes and records.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("unknown unit code '{0}'")]
    UnknownUnit(String),

    #[error("unknown buff code '{0}'")]
    UnknownBuff(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("empty unit record")]
    Empty,

    #[error(transparent)]
    Code(#[from] CodeError),

    #[error("{kind} record expects {expected} fields, found {found}")]
    FieldCount {
        kind: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("field '{field}' is not a number: '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("hp {hp} exceeds max hp {max_hp}")]
    HpAboveMax { hp: u32, max_hp: u32 },

    #[error("position must be at least 1")]
    ZeroPosition,

    #[error("buff list '{0}' is not a sequence of 2-character codes")]
    BuffList(String),
}
