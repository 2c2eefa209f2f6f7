use thiserror::Error;

#[derive(Debug, Error)]
pub enum SysmarkError {
    #[error("measurement error: {0}")]
    Measurement(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("unknown benchmark key: {0}")]
    InvalidKey(String),
    #[error("a benchmark run is already in progress")]
    Busy,
}

impl SysmarkError {
    pub fn measurement<T: Into<String>>(msg: T) -> Self {
        SysmarkError::Measurement(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        SysmarkError::Store(msg.into())
    }

    pub fn invalid_key<T: Into<String>>(msg: T) -> Self {
        SysmarkError::InvalidKey(msg.into())
    }
}
