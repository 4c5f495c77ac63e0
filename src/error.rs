#[cfg(feature = "python")]
use pyo3::exceptions::{PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

use crate::mapping::Role;

#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error("Failed to load CSV: {0}")]
    Load(String),

    #[error("Column '{column}' selected for {role} does not exist in the table")]
    Configuration { role: Role, column: String },

    #[error("No column selected for {0}")]
    MissingRole(Role),

    #[error("Invalid mapping file: {0}")]
    Config(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl ConsistencyError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::MissingRole(_) | Self::Config(_)
        )
    }
}

#[cfg(feature = "python")]
impl From<ConsistencyError> for PyErr {
    fn from(err: ConsistencyError) -> PyErr {
        if err.is_configuration() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}
