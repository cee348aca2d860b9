use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetPackerError {
    #[error("Invalid texture size {size}: {reason}")]
    InvalidTextureSize { size: u32, reason: &'static str },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Frame {frame} of sprite '{sprite}' has zero size ({width}x{height})")]
    ZeroSizedFrame {
        sprite: String,
        frame: usize,
        width: u32,
        height: u32,
    },
    #[error(
        "Can't pack any of {remaining} remaining sprite frame(s): max texture size {max_size} is too small"
    )]
    CannotPlace { remaining: usize, max_size: u32 },
    #[error("Packing failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, SheetPackerError>;
