//! Errors surfaced by the aggregation pipeline.
//!
//! These are user-input range problems or view-fatal data problems. I/O and
//! parsing failures travel as [`anyhow::Error`] instead.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(
        "Select any number of routes between 1 and 5. There are {selected} routes currently selected."
    )]
    SelectionOutOfRange { selected: usize },

    #[error("Global mean on-time percent is zero; cannot compute a relative delta")]
    ZeroGlobalMean,

    #[error("Global mean on-time percent is not finite: {0}")]
    NonFiniteGlobalMean(f64),

    #[error("Relative delta for route '{0}' is not finite")]
    NonFiniteDelta(String),

    #[error("No valid on-time records for route '{0}'")]
    NoRecordsForRoute(String),

    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
