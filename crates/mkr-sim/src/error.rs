use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no interior free cell available for placement")]
    NoFreeCells,
}

pub type SimResult<T> = Result<T, SimError>;
