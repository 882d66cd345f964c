// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Counting good chips on a wafer.
//!
//! A chip of `k` segments may start at any of the `S - k + 1` offsets of a
//! wafer of `S` segments. Every offset is a separate candidate, so
//! neighbouring candidates overlap and a single faulty segment can reject up
//! to `k` of them.
//!
//! ```text
//!  segments:  [0] [1] [2] [3] [4]
//!  offset 0:  |-----------|
//!  offset 1:      |-----------|
//!  offset 2:          |-----------|
//! ```

use std::fmt;

use log::trace;

use crate::evaluator::is_acceptable;
use crate::fraction::FaultFraction;
use crate::layout::{DeviceClass, DeviceClasses, WaferLayout};
use crate::types::{TileState, WaferError, WaferResult};
use crate::wafer::{SegmentYieldMap, WaferYieldMap};

/// A window of consecutive segments considered as one chip.
#[derive(Clone, Copy, Debug)]
pub struct ChipCandidate<'a> {
    offset: usize,
    segments: &'a [SegmentYieldMap],
}

impl<'a> ChipCandidate<'a> {
    /// Index of the first segment of this candidate on the wafer.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn segments(&self) -> &'a [SegmentYieldMap] {
        self.segments
    }

    /// The tiles of all segments in order.
    #[must_use]
    pub fn tiles(&self) -> Vec<TileState> {
        self.segments
            .iter()
            .flat_map(|s| s.tiles().iter().copied())
            .collect()
    }

    #[must_use]
    pub fn is_acceptable(&self, max_fault_fraction: &FaultFraction) -> bool {
        is_acceptable(&self.tiles(), max_fault_fraction)
    }
}

/// Iterate over every candidate chip of `segments_per_chip` segments.
///
/// Fails if the chip is empty or longer than the wafer.
pub fn chip_candidates(
    wafer: &WaferYieldMap,
    segments_per_chip: usize,
) -> WaferResult<impl Iterator<Item = ChipCandidate<'_>>> {
    if segments_per_chip == 0 || segments_per_chip > wafer.num_segments() {
        return Err(WaferError::InvalidWindowSize {
            segments_per_chip,
            segments_per_wafer: wafer.num_segments(),
        });
    }

    Ok(wafer
        .segments()
        .windows(segments_per_chip)
        .enumerate()
        .map(|(offset, segments)| ChipCandidate { offset, segments }))
}

/// Count the candidate chips of `segments_per_chip` segments whose fault
/// fraction is acceptable.
///
/// The result is in `[0, num_segments - segments_per_chip + 1]`.
pub fn count_good_chips(
    wafer: &WaferYieldMap,
    segments_per_chip: usize,
    max_fault_fraction: &FaultFraction,
) -> WaferResult<usize> {
    let mut num_good = 0;
    for candidate in chip_candidates(wafer, segments_per_chip)? {
        if candidate.is_acceptable(max_fault_fraction) {
            num_good += 1;
        } else {
            trace!(
                "reject {segments_per_chip}-segment chip at offset {}",
                candidate.offset()
            );
        }
    }
    Ok(num_good)
}

/// Good chips found on one wafer for each device class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChipCounts {
    pub large: usize,
    pub medium: usize,
    pub small: usize,
}

impl ChipCounts {
    /// The counts in report column order.
    #[must_use]
    pub fn as_array(&self) -> [usize; 3] {
        [self.large, self.medium, self.small]
    }
}

impl fmt::Display for ChipCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.large, self.medium, self.small)
    }
}

/// Good-chip counters bound to the configured device classes.
///
/// All classes are checked against the layout when the counters are built so
/// that the counting functions can not be handed a window that does not fit.
#[derive(Clone, Debug)]
pub struct DeviceClassCounters {
    layout: WaferLayout,
    classes: DeviceClasses,
}

impl DeviceClassCounters {
    pub fn new(layout: WaferLayout, classes: DeviceClasses) -> WaferResult<Self> {
        classes.validate(&layout)?;
        Ok(Self { layout, classes })
    }

    #[must_use]
    pub fn layout(&self) -> &WaferLayout {
        &self.layout
    }

    #[must_use]
    pub fn classes(&self) -> &DeviceClasses {
        &self.classes
    }

    /// Upper bound of the count for `class` on any wafer.
    pub fn max_chips(&self, class: &DeviceClass) -> WaferResult<usize> {
        self.layout.num_windows(class.segments_per_chip)
    }

    fn count(
        &self,
        wafer: &WaferYieldMap,
        class: &DeviceClass,
        max_fault_fraction: &FaultFraction,
    ) -> WaferResult<usize> {
        if wafer.layout() != &self.layout {
            return Err(WaferError::InvalidLayout(format!(
                "wafer of {} but counters expect {}",
                wafer.layout(),
                self.layout
            )));
        }
        count_good_chips(wafer, class.segments_per_chip, max_fault_fraction)
    }

    pub fn count_large_chips(
        &self,
        wafer: &WaferYieldMap,
        max_fault_fraction: &FaultFraction,
    ) -> WaferResult<usize> {
        self.count(wafer, &self.classes.large, max_fault_fraction)
    }

    pub fn count_medium_chips(
        &self,
        wafer: &WaferYieldMap,
        max_fault_fraction: &FaultFraction,
    ) -> WaferResult<usize> {
        self.count(wafer, &self.classes.medium, max_fault_fraction)
    }

    pub fn count_small_chips(
        &self,
        wafer: &WaferYieldMap,
        max_fault_fraction: &FaultFraction,
    ) -> WaferResult<usize> {
        self.count(wafer, &self.classes.small, max_fault_fraction)
    }

    pub fn count_all(
        &self,
        wafer: &WaferYieldMap,
        max_fault_fraction: &FaultFraction,
    ) -> WaferResult<ChipCounts> {
        Ok(ChipCounts {
            large: self.count_large_chips(wafer, max_fault_fraction)?,
            medium: self.count_medium_chips(wafer, max_fault_fraction)?,
            small: self.count_small_chips(wafer, max_fault_fraction)?,
        })
    }
}
