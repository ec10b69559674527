use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no drawable surface ({width}x{height})")]
    SurfaceUnavailable { width: f32, height: f32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O: {0}")]
    Io(#[from] std::io::Error),
}
