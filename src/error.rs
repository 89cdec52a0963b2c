use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum QrError {
    // Encoder
    InvalidPayload,
    PayloadTooLong,
    CapacityExceeded,
    InvalidVersion,
    InvalidMaskPattern,

    // Renderer
    RenderTargetInvalid,
    UnsupportedStyle(String),
    InvalidColor(String),
    InvalidDimensions,

    // Persistence
    Io(String),
}

impl Display for QrError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            // Encoder
            Self::InvalidPayload => f.write_str("Empty payload"),
            Self::PayloadTooLong => f.write_str("Payload exceeds the content length limit"),
            Self::CapacityExceeded => {
                f.write_str("Payload exceeds version 40 capacity at the requested EC level")
            }
            Self::InvalidVersion => f.write_str("Version must lie in 1..=40"),
            Self::InvalidMaskPattern => f.write_str("Mask pattern must lie in 0..=7"),

            // Renderer
            Self::RenderTargetInvalid => {
                f.write_str("Render target cannot fit the symbol and quiet zone")
            }
            Self::UnsupportedStyle(s) => write!(f, "Unsupported style id: {s}"),
            Self::InvalidColor(c) => write!(f, "Invalid hex color: {c}"),
            Self::InvalidDimensions => {
                f.write_str("Width and height must be equal and lie in 100..=1000")
            }

            // Persistence
            Self::Io(e) => write!(f, "Persistence failed: {e}"),
        }
    }
}

impl std::error::Error for QrError {}

pub type QrResult<T> = Result<T, QrError>;
