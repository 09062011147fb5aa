use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Slider needs at least one slide")]
    EmptySlides,
}

pub type Result<T> = std::result::Result<T, ClientError>;
