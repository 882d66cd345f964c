// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Settings for a yield run, gathered from several sources.
//!
//! Values are merged in increasing order of precedence:
//!  1. the defaults defined by [Settings::default()],
//!  2. a TOML settings file given by `--conf-file` (or
//!     `GWR_YIELD_CONF_FILE`),
//!  3. environment variables prefixed with `GWR_YIELD_`, for example
//!     `GWR_YIELD_NUM_WAFERS=100`,
//!  4. options given on the command line.
//!
//! A settings file uses the field names directly:
//! ```toml
//! num_wafers = 20
//! fault_probabilities = [0.01, 0.05]
//! max_fault_fractions = ["1/10", "0.2"]
//! seed = 7
//! ```
//!
//! The list settings also accept a single value or a comma-separated string,
//! so `GWR_YIELD_FAULT_PROBABILITIES=0.01,0.05` and
//! `GWR_YIELD_MAX_FAULT_FRACTIONS=1/10` are both valid.

use std::path::{Path, PathBuf};

use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use gwr_wafer::fraction::FaultFraction;
use gwr_wafer::layout::{
    DEFAULT_LARGE_CHIP_SEGMENTS, DEFAULT_MEDIUM_CHIP_SEGMENTS, DEFAULT_SEGMENTS_PER_WAFER,
    DEFAULT_SMALL_CHIP_SEGMENTS, DEFAULT_TILES_PER_SEGMENT, DeviceClasses, WaferLayout,
};
use gwr_wafer::sampler::FaultProbability;
use itertools::iproduct;
use serde::{Deserialize, Serialize, de};

use crate::experiment::Experiment;
use crate::types::YieldResult;
use crate::yield_error;

pub const ENV_PREFIX: &str = "GWR_YIELD_";

pub const DEFAULT_NUM_WAFERS: usize = 10;
pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.05;
pub const DEFAULT_MAX_FAULT_FRACTION: &str = "1/10";
pub const DEFAULT_SEED: u64 = 123;

/// Use '-' to write the report to stdout.
pub const STDOUT_REPORT_FILE: &str = "-";

#[derive(Parser, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[command(about = "Monte Carlo estimate of good chips per wafer")]
pub struct Settings {
    /// Number of wafers simulated in each experiment
    #[arg(long)]
    pub num_wafers: Option<usize>,

    /// Probability of any one tile being faulty
    ///
    /// More than one value can be given (comma separated); one experiment is
    /// run per combination of probability and fault fraction.
    #[arg(long, value_delimiter = ',')]
    #[serde(default, deserialize_with = "parse_fault_probabilities")]
    pub fault_probabilities: Option<Vec<f64>>,

    /// Largest fraction of faulty tiles accepted in a chip
    ///
    /// Accepts fractions such as "3/30" as well as decimals such as "0.1".
    /// More than one value can be given (comma separated).
    #[arg(long, value_delimiter = ',')]
    #[serde(default, deserialize_with = "parse_max_fault_fractions")]
    pub max_fault_fractions: Option<Vec<String>>,

    /// Set the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of tiles in each segment
    #[arg(long)]
    pub tiles_per_segment: Option<usize>,

    /// Number of segments in each wafer
    #[arg(long)]
    pub segments_per_wafer: Option<usize>,

    /// Number of segments in a large chip
    #[arg(long)]
    pub large_chip_segments: Option<usize>,

    /// Number of segments in a medium chip
    #[arg(long)]
    pub medium_chip_segments: Option<usize>,

    /// Number of segments in a small chip
    #[arg(long)]
    pub small_chip_segments: Option<usize>,

    /// Level of log message to display (written to stderr)
    #[arg(long)]
    pub log_level: Option<String>,

    /// File the report is written to
    ///
    /// Use '-' to write to stdout.
    #[arg(long)]
    pub report_file: Option<String>,

    /// Path to additional configuration file
    ///
    /// This additional configuration file must contain TOML, and set values
    /// for fields of this struct.
    #[arg(long)]
    pub conf_file: Option<PathBuf>,
}

/// One entry of a list setting as written in a file or the environment.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListItem {
    Integer(u64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListSetting {
    Many(Vec<ListItem>),
    One(ListItem),
}

/// Parse a list setting into its string entries.
///
/// The list can be a sequence, a single number or a string. Strings are
/// split on ',' so that a whole list can be given in one environment
/// variable.
fn parse_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let items = match Option::<ListSetting>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(ListSetting::Many(items)) => items,
        Some(ListSetting::One(item)) => vec![item],
    };

    let mut values = Vec::new();
    for item in items {
        match item {
            ListItem::Integer(n) => values.push(n.to_string()),
            ListItem::Float(f) => values.push(f.to_string()),
            ListItem::Text(s) => values.extend(
                s.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            ),
        }
    }
    Ok(Some(values))
}

fn parse_fault_probabilities<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let Some(values) = parse_list(deserializer)? else {
        return Ok(None);
    };
    values
        .iter()
        .map(|v| {
            v.parse::<f64>().map_err(|e| {
                de::Error::custom(format!("unable to parse fault probability '{v}': {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Fractions are kept as text and parsed exactly when the sweep is built.
fn parse_max_fault_fractions<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: de::Deserializer<'de>,
{
    parse_list(deserializer)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_wafers: Some(DEFAULT_NUM_WAFERS),
            fault_probabilities: Some(vec![DEFAULT_FAULT_PROBABILITY]),
            max_fault_fractions: Some(vec![DEFAULT_MAX_FAULT_FRACTION.to_string()]),
            seed: Some(DEFAULT_SEED),
            tiles_per_segment: Some(DEFAULT_TILES_PER_SEGMENT),
            segments_per_wafer: Some(DEFAULT_SEGMENTS_PER_WAFER),
            large_chip_segments: Some(DEFAULT_LARGE_CHIP_SEGMENTS),
            medium_chip_segments: Some(DEFAULT_MEDIUM_CHIP_SEGMENTS),
            small_chip_segments: Some(DEFAULT_SMALL_CHIP_SEGMENTS),
            log_level: Some("warn".to_string()),
            report_file: Some(STDOUT_REPORT_FILE.to_string()),
            conf_file: Some(Default::default()),
        }
    }
}

impl Settings {
    /// Parse the command line and merge it with all other sources.
    pub fn parse_all_sources() -> YieldResult<Self> {
        Self::from_cli(Self::parse())
    }

    /// Merge already parsed command-line options with all other sources.
    pub fn from_cli(cli: Settings) -> YieldResult<Self> {
        let conf_file = match &cli.conf_file {
            Some(conf_file) => conf_file.clone(),
            None => {
                let env_only = Self::figment_env_var_merge(Self::figment_with_defaults());
                Self::figment_extract(env_only)?
                    .conf_file
                    .unwrap_or_default()
            }
        };

        let mut figment = Self::figment_with_defaults();
        figment = Self::figment_conf_file_merge(figment, &conf_file)?;
        figment = Self::figment_env_var_merge(figment);
        let config = Self::figment_extract(figment)?;

        Ok(config.with_cli_overrides(cli))
    }

    fn figment_with_defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(Self::default()))
    }

    fn figment_conf_file_merge(figment: Figment, conf_file: &Path) -> YieldResult<Figment> {
        if conf_file.as_os_str().is_empty() {
            return Ok(figment);
        }
        if conf_file.is_dir() {
            return yield_error!("{} is not a file path", conf_file.display());
        }
        if !conf_file.exists() {
            return yield_error!("{} not found", conf_file.display());
        }
        Ok(figment.merge(Toml::file(conf_file)))
    }

    fn figment_env_var_merge(figment: Figment) -> Figment {
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn figment_extract(figment: Figment) -> YieldResult<Self> {
        Ok(figment.extract()?)
    }

    /// Replace values with those given on the command line.
    ///
    /// Options not given on the command line are left unchanged.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: Settings) -> Settings {
        macro_rules! merge_fields {
            ($($field:ident),+) => {
                $(
                    if cli.$field.is_some() {
                        self.$field = cli.$field;
                    }
                )+
            };
        }
        merge_fields!(
            num_wafers,
            fault_probabilities,
            max_fault_fractions,
            seed,
            tiles_per_segment,
            segments_per_wafer,
            large_chip_segments,
            medium_chip_segments,
            small_chip_segments,
            log_level,
            report_file,
            conf_file
        );
        self
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }

    #[must_use]
    pub fn report_file(&self) -> &str {
        self.report_file.as_deref().unwrap_or(STDOUT_REPORT_FILE)
    }

    pub fn layout(&self) -> YieldResult<WaferLayout> {
        Ok(WaferLayout::new(
            self.tiles_per_segment.unwrap_or(DEFAULT_TILES_PER_SEGMENT),
            self.segments_per_wafer.unwrap_or(DEFAULT_SEGMENTS_PER_WAFER),
        )?)
    }

    #[must_use]
    pub fn device_classes(&self) -> DeviceClasses {
        DeviceClasses::with_sizes(
            self.large_chip_segments
                .unwrap_or(DEFAULT_LARGE_CHIP_SEGMENTS),
            self.medium_chip_segments
                .unwrap_or(DEFAULT_MEDIUM_CHIP_SEGMENTS),
            self.small_chip_segments
                .unwrap_or(DEFAULT_SMALL_CHIP_SEGMENTS),
        )
    }

    /// Every experiment of the sweep, probability-major.
    ///
    /// All values are validated before any experiment is returned.
    pub fn experiments(&self) -> YieldResult<Vec<Experiment>> {
        let num_wafers = self.num_wafers.unwrap_or(DEFAULT_NUM_WAFERS);

        let probabilities = match &self.fault_probabilities {
            Some(p) if !p.is_empty() => p.clone(),
            _ => return yield_error!("at least one fault probability is required"),
        };
        let probabilities = probabilities
            .into_iter()
            .map(FaultProbability::new)
            .collect::<Result<Vec<_>, _>>()?;

        let fractions = match &self.max_fault_fractions {
            Some(f) if !f.is_empty() => f.clone(),
            _ => return yield_error!("at least one max fault fraction is required"),
        };
        let fractions = fractions
            .iter()
            .map(|f| f.parse::<FaultFraction>())
            .collect::<Result<Vec<_>, _>>()?;

        iproduct!(probabilities, fractions)
            .map(|(probability, fraction)| Experiment::new(num_wafers, probability, fraction))
            .collect()
    }
}
