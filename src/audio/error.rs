use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AudioError {
    #[error("Audio output device error: {0}")]
    DeviceError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Queue item not found: {0}")]
    ItemNotFound(usize),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for AudioError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AudioError::DecodingError(err.to_string())
        } else {
            AudioError::NetworkError(err.to_string())
        }
    }
}

impl From<rodio::decoder::DecoderError> for AudioError {
    fn from(err: rodio::decoder::DecoderError) -> Self {
        AudioError::DecodingError(err.to_string())
    }
}

impl From<rodio::StreamError> for AudioError {
    fn from(err: rodio::StreamError) -> Self {
        AudioError::DeviceError(err.to_string())
    }
}
