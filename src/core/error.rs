use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("initial velocity cannot be negative ({0} m/s)")]
    NegativeVelocity(f64),

    #[error("time compression must be greater than zero (got {0})")]
    NonPositiveTimeCompression(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("render sink is closed")]
    SinkClosed,

    #[error("render backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
