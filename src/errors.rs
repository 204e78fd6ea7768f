//! All errors that can occur in the sweepsim library.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulationError {
    InvalidParameter(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter(message) => {
                write!(f, "InvalidParameter: {}", message)
            }
        }
    }
}

impl std::error::Error for SimulationError {}
