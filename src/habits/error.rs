use thiserror::Error;

#[derive(Debug, Error)]
pub enum HabitError {
    #[error("{0}")]
    Validation(String),
    #[error("habit '{0}' already exists")]
    Duplicate(String),
    #[error("habit '{0}' not found")]
    NotFound(String),
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}
