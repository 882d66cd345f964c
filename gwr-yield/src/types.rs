// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::{fmt, io};

use gwr_wafer::types::WaferError;

#[macro_export]
/// Build a [YieldError] from a format string and arguments
macro_rules! yield_error {
    ($($arg:tt)+) => {
        Err($crate::types::YieldError(format!($($arg)+)))
    };
}

/// The `YieldError` is what should be returned in the case of an error
#[derive(Debug)]
pub struct YieldError(pub String);

impl fmt::Display for YieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for YieldError {}

impl From<WaferError> for YieldError {
    fn from(e: WaferError) -> Self {
        // Drop the "Error: " prefix so that it is not repeated
        let msg = e.to_string();
        YieldError(msg.strip_prefix("Error: ").unwrap_or(&msg).to_string())
    }
}

impl From<io::Error> for YieldError {
    fn from(e: io::Error) -> Self {
        YieldError(format!("I/O failure: {e}"))
    }
}

impl From<figment::Error> for YieldError {
    fn from(e: figment::Error) -> Self {
        YieldError(format!("invalid settings: {e}"))
    }
}

/// The YieldResult is the return type for most functions of this crate
pub type YieldResult<T> = Result<T, YieldError>;
