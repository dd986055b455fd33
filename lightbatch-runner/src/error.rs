use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to launch audit engine '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid audit request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
