use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown category label '{0}'")]
    UnknownLabel(String),

    #[error("concurrency key cannot be empty")]
    EmptyConcurrencyKey,
}

pub type Result<T> = std::result::Result<T, CoreError>;
