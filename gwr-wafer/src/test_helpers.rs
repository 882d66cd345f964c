// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build fixed yield maps from bit patterns, where `1` is a functional tile
//! and `0` a faulty one.

use crate::layout::WaferLayout;
use crate::types::TileState;
use crate::wafer::{SegmentYieldMap, WaferYieldMap};

#[must_use]
pub fn tiles_from_bits(bits: &[u8]) -> Vec<TileState> {
    bits.iter().copied().map(TileState::from_bit).collect()
}

/// A segment whose length defines the layout's tiles per segment.
///
/// Panics if `bits` is empty.
#[must_use]
pub fn segment_from_bits(bits: &[u8]) -> SegmentYieldMap {
    let layout = WaferLayout::new(bits.len(), 1).unwrap();
    SegmentYieldMap::new(&layout, tiles_from_bits(bits)).unwrap()
}

/// A wafer with one segment per row of `rows`.
///
/// Panics if the rows are empty or of different lengths.
#[must_use]
pub fn wafer_from_bits(rows: &[&[u8]]) -> WaferYieldMap {
    let layout = WaferLayout::new(rows[0].len(), rows.len()).unwrap();
    let segments = rows.iter().map(|row| segment_from_bits(row)).collect();
    WaferYieldMap::new(&layout, segments).unwrap()
}

/// A wafer of `num_segments` copies of the same segment.
#[must_use]
pub fn uniform_wafer(bits: &[u8], num_segments: usize) -> WaferYieldMap {
    let rows = vec![bits; num_segments];
    wafer_from_bits(&rows)
}
