use thiserror::Error;

/// Everything that can go wrong while configuring or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("set associative cache requires a valid --nway value")]
    MissingWays,

    #[error("malformed address '{token}' at trace line {line}")]
    MalformedAddress { line: usize, token: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
