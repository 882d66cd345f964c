// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Yield maps of segments and wafers.
//!
//! Both are immutable once built. A [WaferYieldMap] always holds exactly
//! `segments_per_wafer` segments, each of exactly `tiles_per_segment` tiles.

use std::fmt;

use crate::layout::WaferLayout;
use crate::types::{TileState, WaferError, WaferResult};

/// One segment's tile states, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentYieldMap {
    tiles: Vec<TileState>,
}

impl SegmentYieldMap {
    /// Wrap `tiles` as a segment of `layout`.
    pub fn new(layout: &WaferLayout, tiles: Vec<TileState>) -> WaferResult<Self> {
        if tiles.len() != layout.tiles_per_segment() {
            return Err(WaferError::InvalidLayout(format!(
                "segment has {} tiles, expected {}",
                tiles.len(),
                layout.tiles_per_segment()
            )));
        }
        Ok(Self { tiles })
    }

    #[must_use]
    pub fn tiles(&self) -> &[TileState] {
        &self.tiles
    }

    #[must_use]
    pub fn num_faulty(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_faulty()).count()
    }

    #[must_use]
    pub fn is_fully_functional(&self) -> bool {
        self.num_faulty() == 0
    }
}

impl fmt::Display for SegmentYieldMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for tile in &self.tiles {
            write!(f, "{}", tile.to_bit())?;
        }
        Ok(())
    }
}

/// A whole wafer: the unit of one simulation trial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaferYieldMap {
    layout: WaferLayout,
    segments: Vec<SegmentYieldMap>,
}

impl WaferYieldMap {
    /// Build a wafer of `layout` from its segments.
    pub fn new(layout: &WaferLayout, segments: Vec<SegmentYieldMap>) -> WaferResult<Self> {
        if segments.len() != layout.segments_per_wafer() {
            return Err(WaferError::InvalidLayout(format!(
                "wafer has {} segments, expected {}",
                segments.len(),
                layout.segments_per_wafer()
            )));
        }
        if let Some((i, segment)) = segments
            .iter()
            .enumerate()
            .find(|(_, s)| s.tiles().len() != layout.tiles_per_segment())
        {
            return Err(WaferError::InvalidLayout(format!(
                "segment {i} has {} tiles, expected {}",
                segment.tiles().len(),
                layout.tiles_per_segment()
            )));
        }
        Ok(Self {
            layout: *layout,
            segments,
        })
    }

    /// The layout this wafer was built for.
    #[must_use]
    pub fn layout(&self) -> &WaferLayout {
        &self.layout
    }

    #[must_use]
    pub fn segments(&self) -> &[SegmentYieldMap] {
        &self.segments
    }

    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn num_faulty(&self) -> usize {
        self.segments.iter().map(SegmentYieldMap::num_faulty).sum()
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileState> + '_ {
        self.segments.iter().flat_map(|s| s.tiles().iter().copied())
    }
}

impl fmt::Display for WaferYieldMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
