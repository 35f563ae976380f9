use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not connected: the host bridge handshake has not completed")]
    NotConnected,

    #[error("Already connected: the host bridge handshake was already started")]
    AlreadyConnected,

    #[error("Handshake timed out after {0:?} waiting for the host bridge")]
    HandshakeTimeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Connection closed")]
    ConnectionClosed,
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn response_shape(msg: impl Into<String>) -> Self {
        Self::ResponseShape(msg.into())
    }
}

impl From<tether_core::Error> for Error {
    fn from(err: tether_core::Error) -> Self {
        match err {
            tether_core::Error::Serialization(e) => Error::Codec(e.to_string()),
            tether_core::Error::InvalidArgument(msg) => Error::InvalidArgument(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
