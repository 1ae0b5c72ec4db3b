//! Constants used to process Pixie-16 data files

/// Size of a Pixie-16 data word (32 bits) in bytes
pub const WORD_SIZE: usize = 4;
/// Number of words in a standard list-mode event header
pub const HEADER_WORDS: usize = 4;
/// Size of one data buffer handed to the decoder. The read loop pulls one
/// event header's worth of words at a time, same as the acquisition examples.
pub const BUFFER_SIZE: usize = WORD_SIZE * 4;
/// Two 16-bit ADC samples are packed into each trace word
pub const SAMPLES_PER_WORD: usize = 2;

/// Name of the index column in pre-decoded CSV files
pub const CSV_INDEX_COLUMN: &str = "bin";
/// Prefix of per-channel columns in pre-decoded CSV files (Chan0, Chan1, ...)
pub const CSV_CHANNEL_PREFIX: &str = "Chan";

/// Oldest firmware revision with the header layout we know how to decode
pub const MIN_REVISION: u32 = 17562;
/// First revision where the energy field narrows to 15 bits, with the
/// out-of-range flag taking bit 15
pub const REV_ENERGY_NARROWED: u32 = 29432;
/// First revision carrying the CFD forced-trigger bit
pub const REV_FORCED_TRIGGER: u32 = 30474;

/// Supported ADC sampling frequencies in MSPS
pub const VALID_FREQUENCIES: [u32; 3] = [100, 250, 500];

/// Number of bins used when histogramming list-mode energies
pub const ENERGY_HISTOGRAM_BINS: usize = 256;
