use byteorder::{ByteOrder, LittleEndian};

use super::constants::*;
use super::data_mask::ListModeDataMask;
use super::error::DecoderError;
use super::event::PixieEvent;

/// Decode every list-mode event in a data buffer.
///
/// An event is a 4-word header, optionally followed by extra header words
/// (energy sums, QDC values; skipped here) up to the recorded header length,
/// followed by `trace_length / 2` words of packed 16-bit ADC samples. Words
/// are little-endian. A buffer that ends partway through an event is an
/// error; there is no partial-event recovery.
pub fn decode_buffer(
    buffer: &[u8],
    mask: &ListModeDataMask,
) -> Result<Vec<PixieEvent>, DecoderError> {
    let dangling = buffer.len() % WORD_SIZE;
    if dangling != 0 {
        return Err(DecoderError::DanglingBytes(buffer.len(), dangling));
    }
    let words: Vec<u32> = buffer
        .chunks_exact(WORD_SIZE)
        .map(LittleEndian::read_u32)
        .collect();

    let mut events = Vec::new();
    let mut cursor: usize = 0;
    while cursor < words.len() {
        let remaining = words.len() - cursor;
        if remaining < HEADER_WORDS {
            return Err(DecoderError::TruncatedHeader(remaining));
        }
        let header = &words[cursor..(cursor + HEADER_WORDS)];

        let header_length = mask.header_length().extract(header[0]) as usize;
        if header_length < HEADER_WORDS {
            return Err(DecoderError::BadHeaderLength(header_length as u32));
        }
        let trace_length = mask.trace_length().extract(header[3]) as usize;
        let trace_words = trace_length.div_ceil(SAMPLES_PER_WORD);
        let event_words = header_length + trace_words;
        let event_length = mask.event_length().extract(header[0]);
        if event_length as usize != event_words {
            return Err(DecoderError::EventLengthMismatch(event_length, event_words));
        }
        if event_words > remaining {
            return Err(DecoderError::TruncatedEvent(event_words, remaining));
        }

        let time_low = mask.event_time_low().extract(header[1]) as u64;
        let time_high = mask.event_time_high().extract(header[2]) as u64;
        let cfd_raw = mask.cfd_fractional_time().extract(header[2]);

        let mut trace = Vec::with_capacity(trace_length);
        for word in &words[(cursor + header_length)..(cursor + event_words)] {
            trace.push((word & 0xFFFF) as u16);
            trace.push((word >> 16) as u16);
        }
        trace.truncate(trace_length);

        events.push(PixieEvent {
            channel: mask.channel().extract(header[0]),
            slot: mask.slot().extract(header[0]),
            crate_id: mask.crate_id().extract(header[0]),
            energy: mask.energy().extract(header[3]),
            timestamp: (time_high << 32) | time_low,
            cfd_fractional_time: cfd_raw as f64 / mask.cfd_size() as f64,
            cfd_forced_trigger: mask
                .cfd_forced_trigger()
                .map(|field| field.extract(header[2]) == 1)
                .unwrap_or(false),
            energy_out_of_range: mask
                .energy_out_of_range()
                .map(|field| field.extract(header[3]) == 1)
                .unwrap_or(false),
            finish_code: mask.finish_code().extract(header[0]) == 1,
            trace,
        });
        cursor += event_words;
    }

    Ok(events)
}

/// Decode a buffer and keep only its primary (first) event.
///
/// The decoder can emit several events per buffer; the dispatch loop keeps
/// one row per chunk, so the first value wins.
pub fn decode_first(
    buffer: &[u8],
    mask: &ListModeDataMask,
) -> Result<PixieEvent, DecoderError> {
    decode_buffer(buffer, mask)?
        .into_iter()
        .next()
        .ok_or(DecoderError::EmptyBuffer)
}
