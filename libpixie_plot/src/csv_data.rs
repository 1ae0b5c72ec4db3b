use std::io::Read;
use std::path::Path;

use super::constants::{CSV_CHANNEL_PREFIX, CSV_INDEX_COLUMN};
use super::error::CsvFrameError;

/// A pre-decoded acquisition CSV, loaded column-wise.
///
/// The file must carry a `bin` index column; every other column is a numeric
/// series (traces, MCA spectra, baselines) keyed by its header name. Parsing
/// is strict: a cell that does not parse as a number fails the whole load,
/// as does a ragged row.
#[derive(Debug, Clone, Default)]
pub struct CsvFrame {
    index: Vec<i64>,
    columns: Vec<(String, Vec<f64>)>,
}

impl CsvFrame {
    /// Load a CSV file from disk
    pub fn from_path(path: &Path) -> Result<Self, CsvFrameError> {
        if !path.exists() {
            return Err(CsvFrameError::BadFilePath(path.to_path_buf()));
        }
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Load a CSV from any reader
    pub fn from_reader(reader: impl Read) -> Result<Self, CsvFrameError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let index_position = headers
            .iter()
            .position(|name| name == CSV_INDEX_COLUMN)
            .ok_or_else(|| CsvFrameError::MissingIndexColumn(CSV_INDEX_COLUMN.to_string()))?;

        let mut frame = CsvFrame::default();
        for (position, name) in headers.iter().enumerate() {
            if position != index_position {
                frame.columns.push((name.to_string(), Vec::new()));
            }
        }

        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let mut column_iter = frame.columns.iter_mut();
            for (position, value) in record.iter().enumerate() {
                if position == index_position {
                    let bin = value.trim().parse::<i64>().map_err(|_| {
                        CsvFrameError::BadValue(CSV_INDEX_COLUMN.to_string(), row)
                    })?;
                    frame.index.push(bin);
                } else {
                    // columns and record positions stay in step because the
                    // csv reader rejects ragged rows before we get here
                    let (name, series) = column_iter
                        .next()
                        .ok_or_else(|| CsvFrameError::BadValue(value.to_string(), row))?;
                    let parsed = value
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| CsvFrameError::BadValue(name.clone(), row))?;
                    series.push(parsed);
                }
            }
        }

        Ok(frame)
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get a column by header name
    pub fn column(&self, name: &str) -> Result<&[f64], CsvFrameError> {
        self.columns
            .iter()
            .find(|(column_name, _)| column_name == name)
            .map(|(_, series)| series.as_slice())
            .ok_or_else(|| CsvFrameError::MissingColumn(name.to_string()))
    }

    /// Get the series for a channel number (column `Chan{n}`)
    pub fn channel_column(&self, channel: usize) -> Result<&[f64], CsvFrameError> {
        self.column(&format!("{CSV_CHANNEL_PREFIX}{channel}"))
    }

    /// Remove a column from the frame, returning it if it was present. Used
    /// to strip the timestamp series before plotting baselines.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<f64>> {
        let position = self
            .columns
            .iter()
            .position(|(column_name, _)| column_name == name)?;
        Some(self.columns.remove(position).1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GOOD_CSV: &str = "bin,Chan0,Chan1,timestamp\n0,10.0,20.0,100\n1,11.5,21.5,200\n2,12.0,22.0,300\n";

    #[test]
    fn test_load_well_formed() {
        let frame = CsvFrame::from_reader(Cursor::new(GOOD_CSV)).unwrap();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.index(), &[0, 1, 2]);
        assert_eq!(frame.column_names(), vec!["Chan0", "Chan1", "timestamp"]);
        assert_eq!(frame.column("Chan1").unwrap(), &[20.0, 21.5, 22.0]);
        assert_eq!(frame.channel_column(0).unwrap(), &[10.0, 11.5, 12.0]);
    }

    #[test]
    fn test_missing_index_column() {
        let result = CsvFrame::from_reader(Cursor::new("Chan0,Chan1\n1.0,2.0\n"));
        assert!(matches!(result, Err(CsvFrameError::MissingIndexColumn(_))));
    }

    #[test]
    fn test_bad_cell() {
        let result = CsvFrame::from_reader(Cursor::new("bin,Chan0\n0,oops\n"));
        assert!(matches!(result, Err(CsvFrameError::BadValue(_, 0))));
    }

    #[test]
    fn test_missing_column_lookup() {
        let frame = CsvFrame::from_reader(Cursor::new(GOOD_CSV)).unwrap();
        assert!(frame.column("Chan7").is_err());
    }

    #[test]
    fn test_drop_column() {
        let mut frame = CsvFrame::from_reader(Cursor::new(GOOD_CSV)).unwrap();
        assert!(frame.drop_column("timestamp").is_some());
        assert_eq!(frame.column_names(), vec!["Chan0", "Chan1"]);
        assert!(frame.drop_column("timestamp").is_none());
    }
}
