use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Api(#[from] api_client::ClientError),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no {kind} matches '{input}'")]
    NoMatch { kind: &'static str, input: String },
    #[error("'{input}' matches several {kind}: {candidates}")]
    Ambiguous {
        kind: &'static str,
        input: String,
        candidates: String,
    },
}
