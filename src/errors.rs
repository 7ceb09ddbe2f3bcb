/// Domain-specific error types for the ranking engine.
/// Per-row failures (Parse, InvalidOdds) are recovered by the scanner:
/// the affected bet type is skipped and the scan continues.
/// Everything else surfaces to the cycle loop, which logs and waits for the next tick.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid american odds: {0}")]
    InvalidOdds(i32),

    #[error("invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("model computation error: {0}")]
    Model(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("scan worker failed: {0}")]
    Worker(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Snapshot(e.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(e: tokio::task::JoinError) -> Self {
        EngineError::Worker(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
