use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a number.";
pub const CONNECTION_FAILURE_MESSAGE: &str = "Error connecting to server";

/// Category of a user-visible conversion error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    EmptyInput,
    ServerMessage,
    ConnectionFailure,
}

/// Reason a keystroke was refused by input validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("input contains a non-digit character")]
    NonNumeric,
    #[error("input is outside the convertible range 1-3999")]
    OutOfRange,
}
