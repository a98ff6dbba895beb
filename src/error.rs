use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Jira API error: {0}")]
    Api(String),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, TrayError>;
