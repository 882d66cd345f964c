// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The acceptance policy for a candidate chip.

use crate::fraction::FaultFraction;
use crate::types::TileState;

/// Decide whether a chip made of `tiles` is usable.
///
/// The chip is accepted when its number of faulty tiles does not exceed
/// `floor(max_fault_fraction * tiles.len())`.
#[must_use]
pub fn is_acceptable(tiles: &[TileState], max_fault_fraction: &FaultFraction) -> bool {
    let max_faults = max_fault_fraction.max_faults(tiles.len());
    let num_faulty = tiles.iter().filter(|t| t.is_faulty()).count();
    num_faulty <= max_faults
}
