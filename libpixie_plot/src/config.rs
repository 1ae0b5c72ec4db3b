use std::path::PathBuf;
use std::str::FromStr;

use super::error::{AxisLimitsError, ConfigError};

/// An x-axis range parsed from the command line (`"10,400"`).
///
/// Exactly two comma separated integers are accepted; a reversed pair is
/// sorted rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLimits {
    pub low: i64,
    pub high: i64,
}

impl FromStr for AxisLimits {
    type Err = AxisLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|value| value.trim().parse::<i64>())
            .collect::<Result<Vec<i64>, _>>()?;
        if values.len() != 2 {
            return Err(AxisLimitsError::WrongCount(values.len()));
        }
        let (low, high) = if values[1] < values[0] {
            (values[1], values[0])
        } else {
            (values[0], values[1])
        };
        Ok(Self { low, high })
    }
}

impl AxisLimits {
    pub fn range_f64(&self) -> std::ops::Range<f64> {
        (self.low as f64)..(self.high as f64)
    }
}

/// Everything the run needs, derived directly from CLI arguments and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Input data file (CSV, or raw list-mode binary with `list_mode` set)
    pub file: PathBuf,
    /// Directory rendered PNGs are written into
    pub output_dir: PathBuf,
    /// Plot a single channel instead of every channel
    pub channel: Option<usize>,
    pub xlim: Option<AxisLimits>,
    pub list_mode: bool,
    /// ADC sampling frequency in MSPS; required with `list_mode`
    pub frequency: Option<u32>,
    /// Firmware revision; required with `list_mode`
    pub revision: Option<u32>,
    pub n_workers: usize,
}

impl PlotConfig {
    /// Cross-argument validation that clap cannot express on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_workers == 0 {
            return Err(ConfigError::BadWorkerCount);
        }
        if self.list_mode && (self.frequency.is_none() || self.revision.is_none()) {
            return Err(ConfigError::MissingListModeParams);
        }
        Ok(())
    }

    /// The frequency/revision pair, available only for a valid list-mode run
    pub fn list_mode_params(&self) -> Result<(u32, u32), ConfigError> {
        match (self.frequency, self.revision) {
            (Some(frequency), Some(revision)) => Ok((frequency, revision)),
            _ => Err(ConfigError::MissingListModeParams),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlotConfig {
        PlotConfig {
            file: PathBuf::from("run.bin"),
            output_dir: PathBuf::from("."),
            channel: None,
            xlim: None,
            list_mode: true,
            frequency: Some(250),
            revision: Some(30474),
            n_workers: 4,
        }
    }

    #[test]
    fn test_xlim_parses_in_order() {
        let limits = AxisLimits::from_str("10,400").unwrap();
        assert_eq!(limits, AxisLimits { low: 10, high: 400 });
    }

    #[test]
    fn test_xlim_sorts_reversed() {
        let limits = AxisLimits::from_str("400,10").unwrap();
        assert_eq!(limits, AxisLimits { low: 10, high: 400 });
    }

    #[test]
    fn test_xlim_rejects_wrong_count() {
        assert!(matches!(
            AxisLimits::from_str("1,2,3"),
            Err(AxisLimitsError::WrongCount(3))
        ));
        assert!(matches!(
            AxisLimits::from_str("10"),
            Err(AxisLimitsError::WrongCount(1))
        ));
    }

    #[test]
    fn test_xlim_rejects_garbage() {
        assert!(AxisLimits::from_str("ten,400").is_err());
    }

    #[test]
    fn test_list_mode_requires_freq_and_rev() {
        let mut bad = config();
        bad.frequency = None;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.revision = None;
        assert!(bad.validate().is_err());

        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_worker_count() {
        let mut bad = config();
        bad.n_workers = 0;
        assert!(bad.validate().is_err());
    }
}
