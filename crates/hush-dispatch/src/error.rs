use thiserror::Error;

use crate::interaction::OptionKind;

/// Problems reading the options of an inbound command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("missing option `{0}`")]
    MissingOption(&'static str),

    #[error("option `{option}` should be a {expected}")]
    WrongType {
        option: &'static str,
        expected: OptionKind,
    },

    #[error("option `{option}` is invalid: {reason}")]
    InvalidValue {
        option: &'static str,
        reason: String,
    },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
