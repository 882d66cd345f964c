// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

/// The state of a single tile on a wafer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileState {
    Functional,
    Faulty,
}

impl TileState {
    #[must_use]
    pub fn is_faulty(self) -> bool {
        self == TileState::Faulty
    }

    /// Convert from the bit notation used in yield maps: `1` is functional,
    /// anything else is faulty.
    #[must_use]
    pub fn from_bit(bit: u8) -> Self {
        if bit == 1 {
            TileState::Functional
        } else {
            TileState::Faulty
        }
    }

    #[must_use]
    pub fn to_bit(self) -> u8 {
        match self {
            TileState::Functional => 1,
            TileState::Faulty => 0,
        }
    }
}

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TileState::Functional => {
                write!(f, "Functional")
            }
            TileState::Faulty => {
                write!(f, "Faulty")
            }
        }
    }
}

/// The `WaferError` is returned when a caller breaks the contract of the
/// wafer model.
#[derive(Debug, PartialEq)]
pub enum WaferError {
    /// A probability or fault fraction outside `[0, 1]` (or not a number).
    InvalidProbability(String),

    /// A chip window that does not fit on the wafer.
    InvalidWindowSize {
        segments_per_chip: usize,
        segments_per_wafer: usize,
    },

    /// A layout, segment or wafer that does not match its dimensions.
    InvalidLayout(String),
}

impl fmt::Display for WaferError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WaferError::InvalidProbability(msg) => {
                write!(f, "Error: invalid probability: {msg}")
            }
            WaferError::InvalidWindowSize {
                segments_per_chip,
                segments_per_wafer,
            } => {
                write!(
                    f,
                    "Error: invalid window size: {segments_per_chip} segments per chip on a wafer of {segments_per_wafer} segments"
                )
            }
            WaferError::InvalidLayout(msg) => {
                write!(f, "Error: invalid layout: {msg}")
            }
        }
    }
}

impl Error for WaferError {}

/// The WaferResult is the return type for fallible wafer model functions
pub type WaferResult<T> = Result<T, WaferError>;
