use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConquestError {
    #[error("Tile not found: {0:?}")]
    TileNotFound(crate::core::types::TileCoord),

    #[error("Invalid game data: {0}")]
    InvalidGameData(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConquestError>;
