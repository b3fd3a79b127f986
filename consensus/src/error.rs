use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("validator roster is empty")]
    EmptyRoster,

    #[error("validator {0} appears more than once in the roster")]
    DuplicateValidator(String),
}
