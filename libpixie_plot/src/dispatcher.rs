use std::sync::mpsc::Sender;

use super::data_mask::ListModeDataMask;
use super::decoder::decode_first;
use super::error::ProcessorError;
use super::event::PixieEvent;
use super::event_table::EventTable;
use super::worker_status::{BarColor, WorkerStatus};

/// Divide the chunk list into per-worker subsets, round-robin
pub fn create_subsets(chunks: Vec<Vec<u8>>, n_workers: usize) -> Vec<Vec<Vec<u8>>> {
    let mut subsets: Vec<Vec<Vec<u8>>> = vec![Vec::new(); n_workers.max(1)];
    let n_subsets = subsets.len();

    for (idx, chunk) in chunks.into_iter().enumerate() {
        subsets[idx % n_subsets].push(chunk)
    }

    subsets
}

/// Decode every chunk on a fixed-size worker pool and aggregate the primary
/// result per chunk into an EventTable.
///
/// Each chunk is an independent, stateless decode task; workers only share
/// the read-only mask. Row order is whatever order the pool yields, which is
/// fine because the table is order-independent. The first decode error from
/// any worker aborts the whole run; there is no partial-result recovery.
pub fn decode_chunks(
    chunks: Vec<Vec<u8>>,
    mask: ListModeDataMask,
    n_workers: usize,
    tx: &Sender<WorkerStatus>,
) -> Result<EventTable, ProcessorError> {
    let mut handles = Vec::new();
    for (worker_id, subset) in create_subsets(chunks, n_workers).into_iter().enumerate() {
        if subset.is_empty() {
            continue;
        }
        let worker_tx = tx.clone();
        handles.push(std::thread::spawn(move || {
            decode_subset(subset, mask, worker_id, worker_tx)
        }));
    }

    let mut table = EventTable::new();
    let mut first_error: Option<ProcessorError> = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(rows)) => table.extend(rows),
            Ok(Err(error)) => {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
            Err(_) => return Err(ProcessorError::WorkerPanic),
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(table),
    }
}

/// One worker's share of the decode, with progress reported over the channel
fn decode_subset(
    subset: Vec<Vec<u8>>,
    mask: ListModeDataMask,
    worker_id: usize,
    tx: Sender<WorkerStatus>,
) -> Result<Vec<PixieEvent>, ProcessorError> {
    let total = subset.len();
    let flush_interval = (total / 100).max(1);
    tx.send(WorkerStatus::new(0.0, worker_id, BarColor::CYAN))?;

    let mut rows = Vec::with_capacity(total);
    for (idx, chunk) in subset.iter().enumerate() {
        rows.push(decode_first(chunk, &mask)?);
        if (idx + 1) % flush_interval == 0 {
            tx.send(WorkerStatus::new(
                (idx + 1) as f32 / total as f32,
                worker_id,
                BarColor::CYAN,
            ))?;
        }
    }

    tx.send(WorkerStatus::new(1.0, worker_id, BarColor::GREEN))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HEADER_WORDS;
    use byteorder::{ByteOrder, LittleEndian};
    use std::sync::mpsc::channel;

    fn header_chunk(channel: u32, energy: u32) -> Vec<u8> {
        let header_length = HEADER_WORDS as u32;
        let words = [
            channel | (header_length << 12) | (header_length << 17),
            0,
            0,
            energy,
        ];
        let mut bytes = vec![0_u8; words.len() * 4];
        LittleEndian::write_u32_into(&words, &mut bytes);
        bytes
    }

    fn test_mask() -> ListModeDataMask {
        ListModeDataMask::new(250, 30474).unwrap()
    }

    #[test]
    fn test_subsets_round_robin() {
        let chunks: Vec<Vec<u8>> = (0..5).map(|i| vec![i as u8]).collect();
        let subsets = create_subsets(chunks, 2);
        assert_eq!(subsets.len(), 2);
        assert_eq!(subsets[0].len(), 3);
        assert_eq!(subsets[1].len(), 2);
    }

    #[test]
    fn test_all_rows_arrive() {
        let chunks: Vec<Vec<u8>> = (0..7).map(|i| header_chunk(i % 3, 100 + i)).collect();
        let (tx, rx) = channel();
        let table = decode_chunks(chunks, test_mask(), 3, &tx).unwrap();
        drop(rx);
        assert_eq!(table.len(), 7);
        assert_eq!(table.channels(), vec![0, 1, 2]);
    }

    #[test]
    fn test_single_worker_matches() {
        let chunks: Vec<Vec<u8>> = (0..4).map(|i| header_chunk(i, i)).collect();
        let (tx, rx) = channel();
        let table = decode_chunks(chunks, test_mask(), 1, &tx).unwrap();
        drop(rx);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_poisoned_chunk_aborts() {
        let mut chunks: Vec<Vec<u8>> = (0..3).map(|i| header_chunk(i, i)).collect();
        chunks.push(vec![0xFF; 8]); // half a header
        let (tx, rx) = channel();
        let result = decode_chunks(chunks, test_mask(), 2, &tx);
        drop(rx);
        assert!(matches!(result, Err(ProcessorError::DecodeError(_))));
    }
}
