// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Run a number of wafer trials with fixed parameters.

use std::fmt;

use gwr_wafer::counter::DeviceClassCounters;
use gwr_wafer::fraction::FaultFraction;
use gwr_wafer::generator::WaferGenerator;
use gwr_wafer::sampler::{FaultProbability, TileSampler};
use log::{debug, info};

use crate::report::{ExperimentReport, YieldReportRow};
use crate::types::YieldResult;
use crate::yield_error;

/// The parameters of one experiment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Experiment {
    num_wafers: usize,
    fault_probability: FaultProbability,
    max_fault_fraction: FaultFraction,
}

impl Experiment {
    pub fn new(
        num_wafers: usize,
        fault_probability: FaultProbability,
        max_fault_fraction: FaultFraction,
    ) -> YieldResult<Self> {
        if num_wafers == 0 {
            return yield_error!("an experiment needs at least one wafer");
        }
        Ok(Self {
            num_wafers,
            fault_probability,
            max_fault_fraction,
        })
    }

    #[must_use]
    pub fn num_wafers(&self) -> usize {
        self.num_wafers
    }

    #[must_use]
    pub fn fault_probability(&self) -> FaultProbability {
        self.fault_probability
    }

    #[must_use]
    pub fn max_fault_fraction(&self) -> FaultFraction {
        self.max_fault_fraction
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Wafers: {}, fault probability: {}, max fault fraction: {}",
            self.num_wafers, self.fault_probability, self.max_fault_fraction
        )
    }
}

/// Generates wafers and counts the good chips of every device class on each.
pub struct ExperimentRunner<S>
where
    S: TileSampler,
{
    generator: WaferGenerator<S>,
    counters: DeviceClassCounters,
}

impl<S> ExperimentRunner<S>
where
    S: TileSampler,
{
    /// The generator and counters must agree on the wafer layout.
    pub fn new(generator: WaferGenerator<S>, counters: DeviceClassCounters) -> YieldResult<Self> {
        if generator.layout() != counters.layout() {
            return yield_error!(
                "generator builds wafers of {} but counters expect {}",
                generator.layout(),
                counters.layout()
            );
        }
        Ok(Self {
            generator,
            counters,
        })
    }

    pub fn run(&mut self, experiment: &Experiment) -> YieldResult<ExperimentReport> {
        info!("Start experiment: {experiment}");

        let mut rows = Vec::with_capacity(experiment.num_wafers);
        for wafer_number in 1..=experiment.num_wafers {
            let wafer = self.generator.generate_wafer(experiment.fault_probability)?;
            let counts = self
                .counters
                .count_all(&wafer, &experiment.max_fault_fraction)?;
            debug!("Wafer {wafer_number}: {wafer} -> {counts}");
            rows.push(YieldReportRow {
                wafer_number,
                counts,
            });
        }

        let report = ExperimentReport::new(*experiment, self.counters.classes(), rows);
        let [large, medium, small] = report.mean_counts();
        info!(
            "Finished experiment: mean good chips {} {large:.3}, {} {medium:.3}, {} {small:.3}",
            self.counters.classes().large,
            self.counters.classes().medium,
            self.counters.classes().small,
        );
        Ok(report)
    }
}
