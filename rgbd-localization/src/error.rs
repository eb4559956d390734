use multilateration::SolveError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid setting `{setting}`: {reason}")]
    InvalidSettings {
        setting: &'static str,
        reason: &'static str,
    },
    #[error("{configured} landmark positions are configured but at most {max} can be tracked")]
    TooManyLandmarks { configured: usize, max: usize },
    #[error("multilateration failed: {0}")]
    Solve(#[from] SolveError),
}
