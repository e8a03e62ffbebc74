use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TallyError>;
