// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Estimate how many good chips can be diced from randomly faulty wafers.
//!
//! Each experiment generates a number of wafers with a given tile fault
//! probability and counts, for each of three device classes, how many chip
//! positions on the wafer have an acceptable fraction of faulty tiles. See
//! the `gwr-wafer` crate for the model itself.
//!
//! # Examples
//!
//! Run the default experiment:
//! ```txt
//! cargo run --bin gwr-yield --release
//! ```
//!
//! Sweep over several fault probabilities with a fixed seed and see the mean
//! number of good chips per class:
//! ```txt
//! cargo run --bin gwr-yield --release -- --num-wafers 1000 \
//!     --fault-probabilities 0.01,0.02,0.05 --max-fault-fractions 3/30 \
//!     --seed 1 --log-level info
//! ```

use std::io::Write;

use gwr_wafer::counter::DeviceClassCounters;
use gwr_wafer::generator::WaferGenerator;
use gwr_wafer::sampler::RandomTileSampler;
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::report::ExperimentReport;
use crate::settings::Settings;
use crate::types::YieldResult;

pub mod experiment;
pub mod report;
pub mod settings;
pub mod types;

use experiment::ExperimentRunner;

/// Run every experiment defined by `settings`, writing each report to
/// `writer` as soon as it completes.
///
/// Each experiment draws from its own generator, seeded from a master
/// generator seeded with `settings.seed()`, so results are reproducible and
/// experiments do not share a random stream.
pub fn run_sweep<W>(settings: &Settings, writer: &mut W) -> YieldResult<Vec<ExperimentReport>>
where
    W: Write + ?Sized,
{
    let layout = settings.layout()?;
    let counters = DeviceClassCounters::new(layout, settings.device_classes())?;
    let experiments = settings.experiments()?;

    info!(
        "Wafers of {layout}, {} experiment(s), seed {}",
        experiments.len(),
        settings.seed()
    );

    let mut master_rng = StdRng::seed_from_u64(settings.seed());
    let mut reports = Vec::with_capacity(experiments.len());
    for experiment in &experiments {
        let sampler = RandomTileSampler::with_seed(master_rng.next_u64());
        let generator = WaferGenerator::new(layout, sampler);
        let mut runner = ExperimentRunner::new(generator, counters.clone())?;

        let report = runner.run(experiment)?;
        report.write_to(writer)?;
        reports.push(report);
    }
    writer.flush()?;

    Ok(reports)
}
