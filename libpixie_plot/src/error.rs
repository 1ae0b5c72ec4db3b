use std::path::PathBuf;
use thiserror::Error;

use super::constants::*;
use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, Error)]
pub enum DataMaskError {
    #[error("Invalid sampling frequency {0} MSPS given to ListModeDataMask; expected one of {exp:?}", exp=VALID_FREQUENCIES)]
    BadFrequency(u32),
    #[error("Firmware revision {0} given to ListModeDataMask is older than the oldest supported revision {min}", min=MIN_REVISION)]
    BadRevision(u32),
}

#[derive(Debug, Clone, Error)]
pub enum DecoderError {
    #[error("Buffer ended mid-header with only {0} words where {exp} were expected", exp=HEADER_WORDS)]
    TruncatedHeader(usize),
    #[error("Buffer ended mid-event; event needed {0} words but only {1} remain")]
    TruncatedEvent(usize, usize),
    #[error("Invalid header length {0} found in event header; expected at least {exp}", exp=HEADER_WORDS)]
    BadHeaderLength(u32),
    #[error("Event length {0} in header disagrees with header length plus trace words ({1})")]
    EventLengthMismatch(u32, usize),
    #[error("Buffer length {0} is not a multiple of the word size; {1} dangling bytes")]
    DanglingBytes(usize, usize),
    #[error("Buffer contained no events to decode")]
    EmptyBuffer,
}

#[derive(Debug, Error)]
pub enum ChunkReaderError {
    #[error("Could not open data file because {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("ChunkReader failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CsvFrameError {
    #[error("Could not open CSV file because {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("CSV file is missing the required index column {0}")]
    MissingIndexColumn(String),
    #[error("CSV file does not contain a column named {0}")]
    MissingColumn(String),
    #[error("Could not parse value in column {0}, row {1} of CSV file")]
    BadValue(String, usize),
    #[error("CsvFrame failed to read records: {0}")]
    CsvError(#[from] csv::Error),
    #[error("CsvFrame failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Error)]
pub enum LayoutError {
    #[error("Cannot layout a subplot grid for zero channels")]
    NoChannels,
}

#[derive(Debug, Clone, Error)]
pub enum AxisLimitsError {
    #[error("Axis limits expect two and only two values; found {0}")]
    WrongCount(usize),
    #[error("Axis limits failed to parse an integer: {0}")]
    BadValue(#[from] std::num::ParseIntError),
}

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("List-mode data was requested without the hardware's sampling frequency and firmware revision")]
    MissingListModeParams,
    #[error("Worker count must be at least 1")]
    BadWorkerCount,
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Plot rendering failed: {0}")]
    Render(String),
    #[error("No data found for requested channel {0}")]
    NoSuchChannel(usize),
    #[error("Cannot plot an empty data set")]
    EmptyTable,
    #[error("Plot failed due to layout error: {0}")]
    LayoutError(#[from] LayoutError),
    #[error("Plot failed due to CsvFrame error: {0}")]
    FrameError(#[from] CsvFrameError),
    #[error("Plot failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

impl PlotError {
    /// Plotters error types are generic over the backend, so they are
    /// flattened to a message at the call site
    pub fn render<E: std::fmt::Display>(error: E) -> Self {
        Self::Render(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to DataMask error: {0}")]
    MaskError(#[from] DataMaskError),
    #[error("Processor failed due to Decoder error: {0}")]
    DecodeError(#[from] DecoderError),
    #[error("Processor failed due to ChunkReader error: {0}")]
    ReaderError(#[from] ChunkReaderError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("A decode worker panicked")]
    WorkerPanic,
    #[error("Processor failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}
