use thiserror::Error;

/// Errors that can occur when constructing a planner.
///
/// All conditions are checked up front, at planner construction; a failed
/// construction with identical inputs fails identically, so callers are
/// expected to treat these as fatal for the decision epoch rather than retry.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid planner configuration: {0}")]
    InvalidConfiguration(String),

    #[error("transition model exposes no actions")]
    EmptyActionSet,
}

/// Convenience Result type for planner operations
pub type Result<T> = std::result::Result<T, PlanError>;
