use std::io::Write;

use fxhash::FxHashSet;

use super::error::CsvFrameError;
use super::event::PixieEvent;

/// The aggregated output of decoding: one row per decoded trigger, in
/// whatever order the worker pool produced them.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    rows: Vec<PixieEvent>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: PixieEvent) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, rows: Vec<PixieEvent>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PixieEvent] {
        &self.rows
    }

    /// The sorted, unique set of channels present in the table
    pub fn channels(&self) -> Vec<u32> {
        let set: FxHashSet<u32> = self.rows.iter().map(|row| row.channel).collect();
        let mut channels: Vec<u32> = set.into_iter().collect();
        channels.sort_unstable();
        channels
    }

    /// The energy column for one channel
    pub fn energies(&self, channel: u32) -> Vec<u32> {
        self.rows
            .iter()
            .filter(|row| row.channel == channel)
            .map(|row| row.energy)
            .collect()
    }

    /// Dump the table (minus traces) as CSV for downstream tooling
    pub fn write_csv(&self, writer: impl Write) -> Result<(), CsvFrameError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(channel: u32, energy: u32) -> PixieEvent {
        PixieEvent {
            channel,
            energy,
            ..Default::default()
        }
    }

    #[test]
    fn test_channels_sorted_unique() {
        let mut table = EventTable::new();
        for (chan, energy) in [(3, 10), (0, 20), (3, 30), (1, 40)] {
            table.push(row(chan, energy));
        }
        assert_eq!(table.channels(), vec![0, 1, 3]);
    }

    #[test]
    fn test_energies_per_channel() {
        let mut table = EventTable::new();
        table.extend(vec![row(2, 5), row(1, 7), row(2, 9)]);
        assert_eq!(table.energies(2), vec![5, 9]);
        assert_eq!(table.energies(1), vec![7]);
        assert!(table.energies(15).is_empty());
    }

    #[test]
    fn test_write_csv() {
        let mut table = EventTable::new();
        table.push(row(4, 100));
        let mut bytes: Vec<u8> = Vec::new();
        table.write_csv(&mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("channel,"));
        assert!(text.contains("4,"));
    }
}
