use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use human_bytes::human_bytes;

use super::constants::BUFFER_SIZE;
use super::error::ChunkReaderError;

/// ChunkReader pulls fixed-size, word-aligned data buffers off a list-mode
/// file until the file runs out.
///
/// There is no retry and no checksum; the loop is terminated purely by
/// end-of-file. A final buffer shorter than the chunk size (file size not a
/// multiple of the buffer size) is still handed downstream as-is, where the
/// decoder will reject it if it does not hold a complete event.
#[derive(Debug)]
pub struct ChunkReader<R: Read> {
    reader: R,
    chunk_size: usize,
}

impl ChunkReader<BufReader<File>> {
    /// Open a list-mode data file for chunked reading
    pub fn open(path: &Path) -> Result<Self, ChunkReaderError> {
        if !path.exists() {
            return Err(ChunkReaderError::BadFilePath(path.to_path_buf()));
        }
        Ok(Self::with_chunk_size(
            BufReader::new(File::open(path)?),
            BUFFER_SIZE,
        ))
    }
}

impl<R: Read> ChunkReader<R> {
    /// Wrap any reader with the standard buffer size
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, BUFFER_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self { reader, chunk_size }
    }

    /// Read the next chunk.
    ///
    /// Returns a `Result<Option<Vec<u8>>>`. The Option is None once the
    /// underlying reader is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, ChunkReaderError> {
        let mut chunk = vec![0_u8; self.chunk_size];
        let mut filled: usize = 0;
        while filled < self.chunk_size {
            let n_read = self.reader.read(&mut chunk[filled..])?;
            if n_read == 0 {
                break;
            }
            filled += n_read;
        }
        if filled == 0 {
            Ok(None)
        } else {
            chunk.truncate(filled);
            Ok(Some(chunk))
        }
    }

    /// Drain the reader, collecting every chunk into memory
    pub fn read_to_end(&mut self) -> Result<Vec<Vec<u8>>, ChunkReaderError> {
        log::info!("Started reading data buffers into memory.");
        let mut chunks: Vec<Vec<u8>> = Vec::new();
        let mut total_bytes: usize = 0;
        while let Some(chunk) = self.next_chunk()? {
            total_bytes += chunk.len();
            chunks.push(chunk);
        }
        log::info!(
            "Read {} data buffers ({}) from file.",
            chunks.len(),
            human_bytes(total_bytes as f64)
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_exactly_one_chunk() {
        let data = vec![0xAA_u8; BUFFER_SIZE];
        let mut reader = ChunkReader::new(Cursor::new(data));
        let chunks = reader.read_to_end().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), BUFFER_SIZE);
    }

    #[test]
    fn test_partial_final_chunk() {
        // 40 bytes with 16-byte chunks: two full chunks plus a short tail
        let data = vec![0x55_u8; 40];
        let mut reader = ChunkReader::new(Cursor::new(data));
        let chunks = reader.read_to_end().unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), BUFFER_SIZE);
        assert_eq!(chunks[1].len(), BUFFER_SIZE);
        assert_eq!(chunks[2].len(), 40 - 2 * BUFFER_SIZE);
        assert!(!chunks[2].is_empty());
    }

    #[test]
    fn test_empty_file() {
        let mut reader = ChunkReader::new(Cursor::new(Vec::new()));
        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn test_missing_file() {
        let result = ChunkReader::open(Path::new("/this/does/not/exist.bin"));
        assert!(matches!(result, Err(ChunkReaderError::BadFilePath(_))));
    }
}
