// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Random generation of segment and wafer yield maps.

use log::trace;

use crate::layout::WaferLayout;
use crate::sampler::{FaultProbability, TileSampler};
use crate::types::WaferResult;
use crate::wafer::{SegmentYieldMap, WaferYieldMap};

/// Builds yield maps of a fixed layout from a [TileSampler].
pub struct WaferGenerator<S>
where
    S: TileSampler,
{
    layout: WaferLayout,
    sampler: S,
}

impl<S> WaferGenerator<S>
where
    S: TileSampler,
{
    pub fn new(layout: WaferLayout, sampler: S) -> Self {
        Self { layout, sampler }
    }

    #[must_use]
    pub fn layout(&self) -> &WaferLayout {
        &self.layout
    }

    /// Generate one segment with a single draw of `tiles_per_segment` tiles.
    ///
    /// Fails only if the sampler returns the wrong number of tiles.
    pub fn generate_segment(
        &mut self,
        probability: FaultProbability,
    ) -> WaferResult<SegmentYieldMap> {
        let tiles = self
            .sampler
            .sample(probability, self.layout.tiles_per_segment());
        SegmentYieldMap::new(&self.layout, tiles)
    }

    /// Generate a wafer of independently drawn segments.
    pub fn generate_wafer(&mut self, probability: FaultProbability) -> WaferResult<WaferYieldMap> {
        let segments = (0..self.layout.segments_per_wafer())
            .map(|_| self.generate_segment(probability))
            .collect::<WaferResult<Vec<_>>>()?;

        let wafer = WaferYieldMap::new(&self.layout, segments)?;
        trace!(
            "generated wafer with {}/{} faulty tiles: {wafer}",
            wafer.num_faulty(),
            self.layout.tiles_per_wafer()
        );
        Ok(wafer)
    }
}
