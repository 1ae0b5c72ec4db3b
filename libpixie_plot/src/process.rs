use std::sync::mpsc::Sender;

use super::chunk_reader::ChunkReader;
use super::config::PlotConfig;
use super::data_mask::ListModeDataMask;
use super::dispatcher::decode_chunks;
use super::error::ProcessorError;
use super::event_table::EventTable;
use super::worker_status::WorkerStatus;

/// The list-mode pipeline: read every data buffer off the file, fan the
/// buffers out to the decode workers, and hand back the aggregated table.
///
/// This is the function to run on a separate thread (the CLI does) so the
/// caller can draw progress bars from the WorkerStatus messages while the
/// pool is busy.
pub fn process_list_mode_file(
    config: &PlotConfig,
    tx: &Sender<WorkerStatus>,
) -> Result<EventTable, ProcessorError> {
    config.validate()?;
    let (frequency, revision) = config.list_mode_params()?;
    let mask = ListModeDataMask::new(frequency, revision)?;

    let mut reader = ChunkReader::open(&config.file)?;
    let chunks = reader.read_to_end()?;
    log::info!("Sending {} data buffers for decoding.", chunks.len());

    let table = decode_chunks(chunks, mask, config.n_workers, tx)?;
    log::info!("Aggregated {} triggers into a single table.", table.len());
    Ok(table)
}
