use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("invalid grid size {size}: {reason}")]
    InvalidGridSize { size: u32, reason: &'static str },
    #[error("failed to allocate {count} elements for the {buffer} buffer")]
    AllocationFailure { buffer: &'static str, count: usize },
    #[error("invalid terrain config: {0}")]
    InvalidConfig(String),
    #[error("failed to read terrain config: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("failed to parse terrain config ron: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}
