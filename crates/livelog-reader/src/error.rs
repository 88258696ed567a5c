use std::io;

use thiserror::Error;

use livelog_types::ConfigError;

/// Errors that end a tail session
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to render output: {0}")]
    Render(#[source] io::Error),
}
