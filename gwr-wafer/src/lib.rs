// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `gwr-wafer` - a model of a tiled wafer and of the chips diced from it.
//!
//! A wafer is an ordered row of segments, each an ordered row of tiles, and
//! every tile is either functional or faulty. Chips are formed from runs of
//! consecutive segments and a chip is usable only if the fraction of faulty
//! tiles within it does not exceed a threshold.
//!
//! The library is split into:
//!  - the [sampler] which draws random tile states,
//!  - the [generator] which builds [segments](wafer::SegmentYieldMap) and
//!    [wafers](wafer::WaferYieldMap) from a sampler,
//!  - the [evaluator] which decides whether a set of tiles makes a usable
//!    chip,
//!  - the [counter] which slides a chip-sized window over a wafer and counts
//!    the usable positions for each [device class](layout::DeviceClass).
//!
//! # Example
//!
//! ```rust
//! use gwr_wafer::counter::DeviceClassCounters;
//! use gwr_wafer::fraction::FaultFraction;
//! use gwr_wafer::generator::WaferGenerator;
//! use gwr_wafer::layout::{DeviceClasses, WaferLayout};
//! use gwr_wafer::sampler::{FaultProbability, RandomTileSampler};
//!
//! let layout = WaferLayout::default();
//! let counters = DeviceClassCounters::new(layout, DeviceClasses::default())
//!     .expect("default classes should fit the default layout");
//! let mut generator = WaferGenerator::new(layout, RandomTileSampler::with_seed(1));
//!
//! let probability = FaultProbability::new(0.0).unwrap();
//! let wafer = generator.generate_wafer(probability).unwrap();
//! let counts = counters
//!     .count_all(&wafer, &FaultFraction::new(1, 10).unwrap())
//!     .unwrap();
//! assert_eq!(counts.as_array(), [1, 2, 3]);
//! ```

pub mod counter;
pub mod evaluator;
pub mod fraction;
pub mod generator;
pub mod layout;
pub mod sampler;
pub mod test_helpers;
pub mod types;
pub mod wafer;
