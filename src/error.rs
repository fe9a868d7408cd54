pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("not an image")]
    NotAnImage,

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
