// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The tabulated report of an experiment.
//!
//! The format is consumed by other tools so must not change:
//! ```text
//! Wafers: 3, fault probability: 0.05, max fault fraction: 1/10
//! Wafer, Large, Medium, Small
//! 1	1	2	3
//! 2	0	1	2
//! 3	1	2	3
//!
//! ```
//! Rows are tab separated and every report ends with a blank line.

use std::fmt;
use std::io::Write;

use gwr_wafer::counter::ChipCounts;
use gwr_wafer::layout::DeviceClasses;

use crate::experiment::Experiment;
use crate::types::YieldResult;

/// The good chips found on one wafer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YieldReportRow {
    /// Wafer trial number, starting from 1.
    pub wafer_number: usize,
    pub counts: ChipCounts,
}

impl fmt::Display for YieldReportRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.wafer_number, self.counts)
    }
}

#[derive(Clone, Debug)]
pub struct ExperimentReport {
    experiment: Experiment,
    class_names: [String; 3],
    rows: Vec<YieldReportRow>,
}

impl ExperimentReport {
    #[must_use]
    pub fn new(experiment: Experiment, classes: &DeviceClasses, rows: Vec<YieldReportRow>) -> Self {
        Self {
            experiment,
            class_names: classes.as_array().map(|class| class.name.clone()),
            rows,
        }
    }

    #[must_use]
    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    #[must_use]
    pub fn rows(&self) -> &[YieldReportRow] {
        &self.rows
    }

    /// Mean number of good chips per wafer for each class, in column order.
    #[must_use]
    pub fn mean_counts(&self) -> [f64; 3] {
        if self.rows.is_empty() {
            return [0.0; 3];
        }
        let mut totals = [0_usize; 3];
        for row in &self.rows {
            for (total, count) in totals.iter_mut().zip(row.counts.as_array()) {
                *total += count;
            }
        }
        totals.map(|total| total as f64 / self.rows.len() as f64)
    }

    pub fn write_to<W>(&self, writer: &mut W) -> YieldResult<()>
    where
        W: Write + ?Sized,
    {
        write!(writer, "{self}")?;
        Ok(())
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.experiment)?;
        let [large, medium, small] = &self.class_names;
        writeln!(f, "Wafer, {large}, {medium}, {small}")?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        writeln!(f)
    }
}
