use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("No hidden payload: {0}")]
    NoHiddenPayload(String),

    #[error("Tag access failed: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
