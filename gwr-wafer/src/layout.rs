// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Fixed dimensions of the wafer and of the device classes cut from it.
//!
//! These are read-only for the lifetime of a run and are passed explicitly to
//! the [generator](crate::generator) and the [counters](crate::counter).

use std::fmt;

use crate::types::{WaferError, WaferResult};

pub const DEFAULT_TILES_PER_SEGMENT: usize = 10;
pub const DEFAULT_SEGMENTS_PER_WAFER: usize = 5;

pub const DEFAULT_LARGE_CHIP_SEGMENTS: usize = 5;
pub const DEFAULT_MEDIUM_CHIP_SEGMENTS: usize = 4;
pub const DEFAULT_SMALL_CHIP_SEGMENTS: usize = 3;

/// The shape of every wafer in a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WaferLayout {
    tiles_per_segment: usize,
    segments_per_wafer: usize,
}

impl Default for WaferLayout {
    fn default() -> Self {
        Self {
            tiles_per_segment: DEFAULT_TILES_PER_SEGMENT,
            segments_per_wafer: DEFAULT_SEGMENTS_PER_WAFER,
        }
    }
}

impl WaferLayout {
    pub fn new(tiles_per_segment: usize, segments_per_wafer: usize) -> WaferResult<Self> {
        if tiles_per_segment == 0 {
            return Err(WaferError::InvalidLayout(
                "a segment must contain at least one tile".to_string(),
            ));
        }
        if segments_per_wafer == 0 {
            return Err(WaferError::InvalidLayout(
                "a wafer must contain at least one segment".to_string(),
            ));
        }
        Ok(Self {
            tiles_per_segment,
            segments_per_wafer,
        })
    }

    #[must_use]
    pub fn tiles_per_segment(&self) -> usize {
        self.tiles_per_segment
    }

    #[must_use]
    pub fn segments_per_wafer(&self) -> usize {
        self.segments_per_wafer
    }

    #[must_use]
    pub fn tiles_per_wafer(&self) -> usize {
        self.tiles_per_segment * self.segments_per_wafer
    }

    /// Number of window positions for a chip of `segments_per_chip` segments.
    ///
    /// Fails if the chip does not fit on the wafer.
    pub fn num_windows(&self, segments_per_chip: usize) -> WaferResult<usize> {
        if segments_per_chip == 0 || segments_per_chip > self.segments_per_wafer {
            return Err(WaferError::InvalidWindowSize {
                segments_per_chip,
                segments_per_wafer: self.segments_per_wafer,
            });
        }
        Ok(self.segments_per_wafer - segments_per_chip + 1)
    }
}

impl fmt::Display for WaferLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} segments of {} tiles",
            self.segments_per_wafer, self.tiles_per_segment
        )
    }
}

/// A named chip size, given as the number of consecutive segments it spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceClass {
    pub name: String,
    pub segments_per_chip: usize,
}

impl DeviceClass {
    #[must_use]
    pub fn new(name: &str, segments_per_chip: usize) -> Self {
        Self {
            name: name.to_string(),
            segments_per_chip,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The three device classes diced from each wafer, largest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceClasses {
    pub large: DeviceClass,
    pub medium: DeviceClass,
    pub small: DeviceClass,
}

impl Default for DeviceClasses {
    fn default() -> Self {
        Self {
            large: DeviceClass::new("Large", DEFAULT_LARGE_CHIP_SEGMENTS),
            medium: DeviceClass::new("Medium", DEFAULT_MEDIUM_CHIP_SEGMENTS),
            small: DeviceClass::new("Small", DEFAULT_SMALL_CHIP_SEGMENTS),
        }
    }
}

impl DeviceClasses {
    /// Default class names with the given sizes.
    #[must_use]
    pub fn with_sizes(large: usize, medium: usize, small: usize) -> Self {
        let mut classes = Self::default();
        classes.large.segments_per_chip = large;
        classes.medium.segments_per_chip = medium;
        classes.small.segments_per_chip = small;
        classes
    }

    /// The classes in report column order.
    #[must_use]
    pub fn as_array(&self) -> [&DeviceClass; 3] {
        [&self.large, &self.medium, &self.small]
    }

    /// Check every class fits on a wafer of the given layout.
    pub fn validate(&self, layout: &WaferLayout) -> WaferResult<()> {
        for class in self.as_array() {
            layout.num_windows(class.segments_per_chip)?;
        }
        Ok(())
    }
}
