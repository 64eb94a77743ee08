//! Error type for the command-line front end.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(#[from] gt_project::ProjectError),

    #[error("Model error: {0}")]
    Model(#[from] gt_model::ModelError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type AppResult<T> = Result<T, AppError>;
