use thiserror::Error;

#[derive(Error, Debug)]
pub enum KinematicsError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("{what} has {actual} elements, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("no dynamics model registered under type `{0}`")]
    UnknownModelType(String),
    #[error("no dynamics model configured under name `{0}`")]
    UnknownModelName(String),
    #[error("at least one dynamics model must be configured")]
    NoModels,
    #[error("`{0}` is not implemented for this dynamics model")]
    Unimplemented(&'static str),
    #[error("malformed model parameters: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub(crate) fn check_len(
    what: &'static str,
    values: &[f64],
    expected: usize,
) -> Result<(), KinematicsError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(KinematicsError::DimensionMismatch {
            what,
            expected,
            actual: values.len(),
        })
    }
}
