use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine the current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error(transparent)]
    Operation(#[from] shipgate_operations::OperationError),

    #[error("failed to load project configuration")]
    Project(#[from] shipgate_project::ProjectError),

    #[error("invalid change-request title")]
    Title(#[from] shipgate_title::TitleError),

    #[error("invalid concurrency key")]
    ConcurrencyKey(#[from] shipgate_core::CoreError),

    #[error("--{flag} must name a command")]
    EmptyCommand { flag: &'static str },
}

pub type Result<T> = std::result::Result<T, CliError>;
