//! Error vocabulary shared by both sides of the boundary
//!
//! Codes travel as plain 16-bit ordinals inside sentinel words, so any value
//! is representable; only the ordinals below have a name.

use std::fmt;

/// Wire-level error code (16-bit ordinal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const SUCCESS: ErrorCode = ErrorCode(0);
    pub const FAILURE: ErrorCode = ErrorCode(1);
    pub const ARGUMENT_DESERIALIZATION_FAILED: ErrorCode = ErrorCode(2);
    pub const OUT_OF_MEMORY: ErrorCode = ErrorCode(3);
    pub const RECEIVED_WRONG_ACTION_RESULT: ErrorCode = ErrorCode(4);
    pub const CALLBACK_FAILED: ErrorCode = ErrorCode(5);
    pub const RECURSIVE_CALL_FORBIDDEN: ErrorCode = ErrorCode(6);
    pub const RESPONSE_SERIALIZATION_FAILED: ErrorCode = ErrorCode(7);
    pub const PAGE_OVERFLOW_ERROR: ErrorCode = ErrorCode(8);

    /// Every code with a defined name, in ordinal order
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::SUCCESS,
        ErrorCode::FAILURE,
        ErrorCode::ARGUMENT_DESERIALIZATION_FAILED,
        ErrorCode::OUT_OF_MEMORY,
        ErrorCode::RECEIVED_WRONG_ACTION_RESULT,
        ErrorCode::CALLBACK_FAILED,
        ErrorCode::RECURSIVE_CALL_FORBIDDEN,
        ErrorCode::RESPONSE_SERIALIZATION_FAILED,
        ErrorCode::PAGE_OVERFLOW_ERROR,
    ];

    /// Display name used for any ordinal outside the defined set
    pub const UNKNOWN_NAME: &'static str = "Unknown Error";

    pub const fn from_ordinal(ordinal: u16) -> Self {
        Self(ordinal)
    }

    pub const fn ordinal(self) -> u16 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    pub const fn is_known(self) -> bool {
        self.0 <= Self::PAGE_OVERFLOW_ERROR.0
    }

    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::SUCCESS => "Success",
            ErrorCode::FAILURE => "Failure",
            ErrorCode::ARGUMENT_DESERIALIZATION_FAILED => "Argument Deserialization Failed",
            ErrorCode::OUT_OF_MEMORY => "OutOfMemory",
            ErrorCode::RECEIVED_WRONG_ACTION_RESULT => "Received Wrong Action Result",
            ErrorCode::CALLBACK_FAILED => "Callback Failed",
            ErrorCode::RECURSIVE_CALL_FORBIDDEN => "Recursive Call Forbidden",
            ErrorCode::RESPONSE_SERIALIZATION_FAILED => "Response Serialization Failed",
            ErrorCode::PAGE_OVERFLOW_ERROR => "Page Overflow Error",
            _ => Self::UNKNOWN_NAME,
        }
    }
}

/// Human-readable name for `code`. Total: unknown ordinals get
/// [`ErrorCode::UNKNOWN_NAME`].
pub fn error_code_to_string(code: ErrorCode) -> &'static str {
    code.name()
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<u16> for ErrorCode {
    fn from(ordinal: u16) -> Self {
        Self(ordinal)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}
