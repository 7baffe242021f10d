use thiserror::Error;

/// Error type for display operations
#[derive(Error, Debug)]
pub enum ShowError {
    /// The figure sentinel was displayed while no figure is active.
    #[error("no current figure to save")]
    NoActiveFigure,

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
