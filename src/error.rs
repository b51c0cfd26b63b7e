use thiserror::Error;

/// Main error type for javadep operations
#[derive(Error, Debug)]
pub enum JavadepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extractor error: {0}")]
    Extractor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM provider error: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, JavadepError>;
