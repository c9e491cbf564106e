/*!
error.rs - PLC error taxonomy.

Overview
========
One error type, `PlcError`, covers both load-time and scan-time failures:

  - `Validation`    : malformed program/LAD (bad discriminator, missing
                      coil, rung with no coil, invalid tag/address syntax).
                      Fatal for the current load attempt.
  - `UnsupportedCall`: call to an unknown function-block name at runtime.
  - `DivisionByZero` : DIV/MOD by zero during expression evaluation.
  - `OperandUnresolved`: an operand with neither `tag` nor `address`.
                      Raised statically by validation when detectable,
                      otherwise raised at evaluation time.
  - `Parse`         : wraps `serde_json`/`io` failures when loading program
                      files; ambient plumbing, not a distinct functional
                      category.

Every variant carries enough context (statement id where applicable) for a
structured diagnostic, per the "offending statement id" requirement.
*/

use thiserror::Error;

/// Crate-wide result alias.
pub type PlcResult<T> = Result<T, PlcError>;

#[derive(Debug, Error)]
pub enum PlcError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("unsupported function block call {name:?} in statement {statement_id}")]
    UnsupportedCall { name: String, statement_id: String },

    #[error("division by zero in statement {statement_id}")]
    DivisionByZero { statement_id: String },

    #[error("operand unresolved (neither tag nor address) in statement {statement_id}")]
    OperandUnresolved { statement_id: String },

    #[error("failed to parse program: {0}")]
    Parse(String),
}

impl PlcError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlcError::Validation {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PlcError {
    fn from(e: serde_json::Error) -> Self {
        PlcError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for PlcError {
    fn from(e: std::io::Error) -> Self {
        PlcError::Parse(e.to_string())
    }
}
