// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use gwr_wafer::counter::{ChipCounts, DeviceClassCounters};
use gwr_wafer::fraction::FaultFraction;
use gwr_wafer::generator::WaferGenerator;
use gwr_wafer::layout::{DeviceClasses, WaferLayout};
use gwr_wafer::sampler::{FaultProbability, RandomTileSampler};
use gwr_wafer::test_helpers::{uniform_wafer, wafer_from_bits};

const FIRST_TILE_FAULTY: [u8; 10] = [0, 1, 1, 1, 1, 1, 1, 1, 1, 1];
const ALL_FUNCTIONAL: [u8; 10] = [1; 10];

fn default_counters() -> DeviceClassCounters {
    DeviceClassCounters::new(WaferLayout::default(), DeviceClasses::default()).unwrap()
}

#[test]
fn default_bounds() {
    let counters = default_counters();
    let classes = counters.classes().clone();
    assert_eq!(counters.max_chips(&classes.large).unwrap(), 1);
    assert_eq!(counters.max_chips(&classes.medium).unwrap(), 2);
    assert_eq!(counters.max_chips(&classes.small).unwrap(), 3);
}

#[test]
fn large_class() {
    let counters = default_counters();
    let threshold = FaultFraction::new(1, 20).unwrap();

    let wafer = uniform_wafer(&FIRST_TILE_FAULTY, 5);
    assert_eq!(counters.count_large_chips(&wafer, &threshold).unwrap(), 0);

    let wafer = wafer_from_bits(&[
        &FIRST_TILE_FAULTY,
        &FIRST_TILE_FAULTY,
        &ALL_FUNCTIONAL,
        &ALL_FUNCTIONAL,
        &ALL_FUNCTIONAL,
    ]);
    assert_eq!(counters.count_large_chips(&wafer, &threshold).unwrap(), 1);
}

#[test]
fn small_class() {
    let counters = default_counters();
    let wafer = wafer_from_bits(&[
        &ALL_FUNCTIONAL,
        &FIRST_TILE_FAULTY,
        &FIRST_TILE_FAULTY,
        &FIRST_TILE_FAULTY,
        &FIRST_TILE_FAULTY,
    ]);

    let two_in_thirty = FaultFraction::new(2, 30).unwrap();
    let three_in_thirty = FaultFraction::new(3, 30).unwrap();
    assert_eq!(counters.count_small_chips(&wafer, &two_in_thirty).unwrap(), 1);
    assert_eq!(
        counters.count_small_chips(&wafer, &three_in_thirty).unwrap(),
        3
    );
}

#[test]
fn medium_class() {
    let counters = default_counters();
    let wafer = wafer_from_bits(&[
        &ALL_FUNCTIONAL,
        &ALL_FUNCTIONAL,
        &FIRST_TILE_FAULTY,
        &FIRST_TILE_FAULTY,
        &FIRST_TILE_FAULTY,
    ]);

    // 40 tiles per chip, so 1/20 allows 2 faults
    let threshold = FaultFraction::new(1, 20).unwrap();
    assert_eq!(counters.count_medium_chips(&wafer, &threshold).unwrap(), 1);
}

#[test]
fn count_all_matches_individual_counts() {
    let counters = default_counters();
    let layout = *counters.layout();
    let mut generator = WaferGenerator::new(layout, RandomTileSampler::with_seed(11));
    let probability = FaultProbability::new(0.05).unwrap();
    let threshold = FaultFraction::new(1, 10).unwrap();

    for _ in 0..50 {
        let wafer = generator.generate_wafer(probability).unwrap();
        let counts = counters.count_all(&wafer, &threshold).unwrap();
        assert_eq!(
            counts,
            ChipCounts {
                large: counters.count_large_chips(&wafer, &threshold).unwrap(),
                medium: counters.count_medium_chips(&wafer, &threshold).unwrap(),
                small: counters.count_small_chips(&wafer, &threshold).unwrap(),
            }
        );
        assert!(counts.large <= 1);
        assert!(counts.medium <= 2);
        assert!(counts.small <= 3);
    }
}

#[test]
fn perfect_wafer_counts() {
    let counters = default_counters();
    let wafer = uniform_wafer(&ALL_FUNCTIONAL, 5);
    let counts = counters
        .count_all(&wafer, &FaultFraction::new(0, 1).unwrap())
        .unwrap();
    assert_eq!(counts.as_array(), [1, 2, 3]);
    assert_eq!(counts.to_string(), "1\t2\t3");
}

#[test]
fn custom_classes_recompute_bounds() {
    let layout = WaferLayout::new(10, 8).unwrap();
    let counters = DeviceClassCounters::new(layout, DeviceClasses::with_sizes(6, 2, 1)).unwrap();
    let classes = counters.classes().clone();
    assert_eq!(counters.max_chips(&classes.large).unwrap(), 3);
    assert_eq!(counters.max_chips(&classes.medium).unwrap(), 7);
    assert_eq!(counters.max_chips(&classes.small).unwrap(), 8);

    let wafer = uniform_wafer(&ALL_FUNCTIONAL, 8);
    let counts = counters.count_all(&wafer, &FaultFraction::one()).unwrap();
    assert_eq!(counts.as_array(), [3, 7, 8]);
}
